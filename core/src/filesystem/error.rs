use std::fmt;

#[derive(Debug, PartialEq)]
pub(crate) enum FileSystemError {
    OpenFile,
    ReadFile,
    NotFile,
    LargeFile,
}

impl std::error::Error for FileSystemError {}

impl fmt::Display for FileSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSystemError::OpenFile => write!(f, "Failed to open file"),
            FileSystemError::ReadFile => write!(f, "Failed to read file"),
            FileSystemError::NotFile => write!(f, "Not a file"),
            FileSystemError::LargeFile => write!(f, "File larger than 2GB"),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum AcquireError {
    /**The source path does not exist. Nothing was copied */
    SourceNotFound,
    /**The source exists but could not be snapshotted (not a regular file, permissions, temp directory) */
    AcquisitionFailed,
}

impl std::error::Error for AcquireError {}

impl fmt::Display for AcquireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquireError::SourceNotFound => write!(f, "Source file not found"),
            AcquireError::AcquisitionFailed => write!(f, "Failed to snapshot source file"),
        }
    }
}
