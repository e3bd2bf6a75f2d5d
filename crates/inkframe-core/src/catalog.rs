//! Bounded catalog of displayable photos discovered on storage.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::filesystem::{join_path, FileSystem};

/// Extensions accepted into the catalog, matched case-insensitively.
const PHOTO_EXTENSIONS: [&str; 2] = ["jpg", "jpeg"];

/// Scan failure conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    /// The root path could not be listed (card missing or unreadable).
    StorageUnavailable,
}

impl core::fmt::Display for ScanError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ScanError::StorageUnavailable => write!(f, "Storage unavailable"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ScanError {}

/// Ordered, bounded list of photo paths.
///
/// Immutable once built; a rescan replaces the whole catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<String>,
}

impl Catalog {
    /// Discover photos under `root`.
    ///
    /// Depth-first traversal driven by an explicit stack of pending
    /// directories, so deep trees cannot grow the call stack. Traversal
    /// stops as soon as `capacity` photos are collected; the rest of the
    /// card is simply not visited.
    pub fn scan(
        fs: &mut dyn FileSystem,
        root: &str,
        recursive: bool,
        capacity: usize,
    ) -> Result<Self, ScanError> {
        let mut entries: Vec<String> = Vec::new();
        let mut pending: Vec<String> = Vec::new();
        pending.push(root.to_string());

        let mut first = true;
        while let Some(dir) = pending.pop() {
            let listing = match fs.list_files(&dir) {
                Ok(listing) => listing,
                Err(err) if first => {
                    log::warn!("catalog scan: cannot open {}: {}", dir, err);
                    return Err(ScanError::StorageUnavailable);
                }
                Err(err) => {
                    log::warn!("catalog scan: skipping {}: {}", dir, err);
                    continue;
                }
            };
            first = false;

            let mut subdirs: Vec<String> = Vec::new();
            for entry in listing {
                if entry.is_directory {
                    if recursive {
                        subdirs.push(join_path(&dir, &entry.name));
                    }
                    continue;
                }
                if !has_photo_extension(&entry.name) {
                    continue;
                }
                let path = join_path(&dir, &entry.name);
                if !entries.contains(&path) {
                    entries.push(path);
                }
                if entries.len() >= capacity {
                    log::info!("catalog scan: capacity {} reached", capacity);
                    return Ok(Self { entries });
                }
            }

            // Depth-first: this directory's subdirectories are visited
            // before its siblings, in listing order.
            for sub in subdirs.into_iter().rev() {
                pending.push(sub);
            }
        }

        log::info!("catalog scan: {} photos under {}", entries.len(), root);
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

fn has_photo_extension(name: &str) -> bool {
    let ext = match name.rsplit_once('.') {
        Some((_, ext)) => ext,
        None => return false,
    };
    PHOTO_EXTENSIONS
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_filesystem::MockFileSystem;

    fn scan_all(fs: &mut MockFileSystem) -> Catalog {
        Catalog::scan(fs, "/", true, 100).unwrap()
    }

    #[test]
    fn test_extension_filter_is_case_insensitive() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/a.jpg", b"");
        fs.add_file("/b.JPEG", b"");
        fs.add_file("/c.png", b"");
        fs.add_file("/notes.txt", b"");
        fs.add_file("/noext", b"");

        let catalog = scan_all(&mut fs);
        assert_eq!(catalog.entries(), ["/a.jpg", "/b.JPEG"]);
    }

    #[test]
    fn test_depth_first_discovery_order() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/top.jpg", b"");
        fs.add_directory("/alpha");
        fs.add_directory("/beta");
        fs.add_file("/alpha/a1.jpg", b"");
        fs.add_directory("/alpha/deep");
        fs.add_file("/alpha/deep/d1.jpg", b"");
        fs.add_file("/beta/b1.jpg", b"");

        let catalog = scan_all(&mut fs);
        assert_eq!(
            catalog.entries(),
            [
                "/top.jpg",
                "/alpha/a1.jpg",
                "/alpha/deep/d1.jpg",
                "/beta/b1.jpg"
            ]
        );
    }

    #[test]
    fn test_capacity_is_a_hard_cap() {
        let mut fs = MockFileSystem::new();
        for i in 0..10 {
            fs.add_file(&format!("/p{}.jpg", i), b"");
        }

        let catalog = Catalog::scan(&mut fs, "/", true, 3).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.entries(), ["/p0.jpg", "/p1.jpg", "/p2.jpg"]);
    }

    #[test]
    fn test_non_recursive_scan_skips_subdirectories() {
        let mut fs = MockFileSystem::new();
        fs.add_file("/top.jpg", b"");
        fs.add_directory("/sub");
        fs.add_file("/sub/nested.jpg", b"");

        let catalog = Catalog::scan(&mut fs, "/", false, 100).unwrap();
        assert_eq!(catalog.entries(), ["/top.jpg"]);
    }

    #[test]
    fn test_unreadable_root_is_storage_unavailable() {
        let mut fs = MockFileSystem::new();
        let result = Catalog::scan(&mut fs, "/missing", true, 100);
        assert_eq!(result.unwrap_err(), ScanError::StorageUnavailable);
    }

    #[test]
    fn test_empty_root_gives_empty_catalog() {
        let mut fs = MockFileSystem::new();
        let catalog = scan_all(&mut fs);
        assert!(catalog.is_empty());
        assert_eq!(catalog.get(0), None);
    }
}
