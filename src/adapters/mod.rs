pub mod assets;
pub mod local_filesystem;

pub use local_filesystem::LocalFilesystem;
