mod job_filesystem;

pub use job_filesystem::JobFilesystem;
