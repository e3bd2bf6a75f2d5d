//! Filesystem abstraction for the photo frame.
//! Backed by the SD card on hardware and by an in-memory mock on the host.

use alloc::string::String;
use alloc::vec::Vec;

/// A single entry in a directory listing.
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    pub is_directory: bool,
}

/// Filesystem error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSystemError {
    NotFound,
    NotADirectory,
    IoError(String),
}

impl core::fmt::Display for FileSystemError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FileSystemError::NotFound => write!(f, "File not found"),
            FileSystemError::NotADirectory => write!(f, "Not a directory"),
            FileSystemError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FileSystemError {}

/// Trait for the storage operations the slideshow needs.
///
/// Implementations:
/// - `SdCardFs` in the firmware (FAT over SD-SPI)
/// - `MockFileSystem` for the simulator and tests
pub trait FileSystem {
    /// List the entries of a directory, in the backend's native order.
    fn list_files(&mut self, path: &str) -> Result<Vec<FileInfo>, FileSystemError>;

    /// Read an entire file. Photos are binary, so this returns bytes.
    fn read(&mut self, path: &str) -> Result<Vec<u8>, FileSystemError>;

    /// Check whether a path exists.
    fn exists(&mut self, path: &str) -> bool;

    /// Get info for a single path.
    fn file_info(&mut self, path: &str) -> Result<FileInfo, FileSystemError>;
}

/// Get filename without path
pub fn basename(path: &str) -> &str {
    path.rfind('/').map(|i| &path[i + 1..]).unwrap_or(path)
}

/// Get parent directory
pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(i) => &path[..i],
        None => ".",
    }
}

/// Join paths
pub fn join_path(base: &str, name: &str) -> String {
    use alloc::format;
    if base.ends_with('/') {
        format!("{}{}", base, name)
    } else {
        format!("{}/{}", base, name)
    }
}
