//! In-memory filesystem for the simulator and host tests.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::filesystem::{basename, dirname, join_path, FileInfo, FileSystem, FileSystemError};

/// In-memory file entry
#[derive(Clone)]
enum MockEntry {
    File { content: Vec<u8> },
    Directory { children: Vec<String> },
}

/// Mock filesystem.
///
/// Listing order is insertion order, which keeps catalog scans
/// deterministic in tests.
pub struct MockFileSystem {
    entries: BTreeMap<String, MockEntry>,
}

impl MockFileSystem {
    /// Create a mock filesystem containing only the root directory.
    pub fn new() -> Self {
        let mut fs = Self {
            entries: BTreeMap::new(),
        };
        fs.entries.insert(
            "/".to_string(),
            MockEntry::Directory {
                children: Vec::new(),
            },
        );
        fs
    }

    /// A filesystem with no mounted card: even the root listing fails.
    pub fn unmounted() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Add a file with binary content.
    pub fn add_file(&mut self, path: &str, content: &[u8]) {
        self.entries.insert(
            path.to_string(),
            MockEntry::File {
                content: content.to_vec(),
            },
        );
        self.link_to_parent(path);
    }

    /// Add a directory.
    pub fn add_directory(&mut self, path: &str) {
        self.entries.insert(
            path.to_string(),
            MockEntry::Directory {
                children: Vec::new(),
            },
        );
        if path != "/" {
            self.link_to_parent(path);
        }
    }

    /// Remove a file, leaving any catalog references to it dangling.
    pub fn remove_file(&mut self, path: &str) {
        self.entries.remove(path);
        let parent = dirname(path);
        let name = basename(path);
        if let Some(MockEntry::Directory { children }) = self.entries.get_mut(parent) {
            children.retain(|child| child != name);
        }
    }

    fn link_to_parent(&mut self, path: &str) {
        let parent = dirname(path);
        let name = basename(path).to_string();
        if let Some(MockEntry::Directory { children }) = self.entries.get_mut(parent) {
            if !children.contains(&name) {
                children.push(name);
            }
        }
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MockFileSystem {
    fn list_files(&mut self, path: &str) -> Result<Vec<FileInfo>, FileSystemError> {
        match self.entries.get(path) {
            Some(MockEntry::Directory { children }) => {
                let mut files = Vec::new();
                for child_name in children {
                    let child_path = join_path(path, child_name);
                    if let Some(entry) = self.entries.get(&child_path) {
                        let (size, is_directory) = match entry {
                            MockEntry::File { content } => (content.len() as u64, false),
                            MockEntry::Directory { .. } => (0, true),
                        };
                        files.push(FileInfo {
                            name: child_name.clone(),
                            size,
                            is_directory,
                        });
                    }
                }
                Ok(files)
            }
            Some(MockEntry::File { .. }) => Err(FileSystemError::NotADirectory),
            None => Err(FileSystemError::NotFound),
        }
    }

    fn read(&mut self, path: &str) -> Result<Vec<u8>, FileSystemError> {
        match self.entries.get(path) {
            Some(MockEntry::File { content }) => Ok(content.clone()),
            Some(MockEntry::Directory { .. }) => Err(FileSystemError::NotADirectory),
            None => Err(FileSystemError::NotFound),
        }
    }

    fn exists(&mut self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    fn file_info(&mut self, path: &str) -> Result<FileInfo, FileSystemError> {
        let name = basename(path).to_string();
        match self.entries.get(path) {
            Some(MockEntry::File { content }) => Ok(FileInfo {
                name,
                size: content.len() as u64,
                is_directory: false,
            }),
            Some(MockEntry::Directory { .. }) => Ok(FileInfo {
                name,
                size: 0,
                is_directory: true,
            }),
            None => Err(FileSystemError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_preserves_insertion_order() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/b.jpg", b"b");
        fs.add_file("/a.jpg", b"a");

        let names: Vec<_> = fs
            .list_files("/")
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, ["b.jpg", "a.jpg"]);
    }

    #[test]
    fn test_read_and_info() {
        let mut fs = MockFileSystem::new();
        fs.add_directory("/photos");
        fs.add_file("/photos/cat.jpg", &[0xFF, 0xD8, 0xFF]);

        assert_eq!(fs.read("/photos/cat.jpg").unwrap(), [0xFF, 0xD8, 0xFF]);
        let info = fs.file_info("/photos/cat.jpg").unwrap();
        assert_eq!(info.size, 3);
        assert!(!info.is_directory);
        assert!(fs.file_info("/photos").unwrap().is_directory);
    }

    #[test]
    fn test_missing_paths() {
        let mut fs = MockFileSystem::new();
        assert_eq!(fs.read("/gone.jpg"), Err(FileSystemError::NotFound));
        assert!(!fs.exists("/gone.jpg"));
    }

    #[test]
    fn test_remove_file_unlinks_from_parent() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/cat.jpg", b"x");
        fs.remove_file("/cat.jpg");

        assert!(!fs.exists("/cat.jpg"));
        assert!(fs.list_files("/").unwrap().is_empty());
    }
}
