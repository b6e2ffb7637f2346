/// A script body and its file name inside the job-source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedScript {
    pub file_name: String,
    pub content: String,
}

impl RenderedScript {
    pub fn new(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self { file_name: file_name.into(), content: content.into() }
    }
}

/// A pipeline-authored file (macro, file list) written into the job-source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub file_name: String,
    pub content: String,
}

impl GeneratedFile {
    pub fn new(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self { file_name: file_name.into(), content: content.into() }
    }
}
