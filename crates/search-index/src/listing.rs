//! Directory-listing collaborator boundary.
//!
//! The engine never touches the filesystem directly: listings come from a
//! [`DirectoryLister`], which a remote filesystem service implements in
//! production and [`LocalDirectoryLister`] implements over `tokio::fs`.

use std::time::UNIX_EPOCH;

use async_trait::async_trait;

use crate::error::DirectoryAccessError;
use crate::types::EntryKind;

bitflags::bitflags! {
    /// Coarse permission bits reported with each listed entry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EntryPermissions: u8 {
        const READ = 1;
        const WRITE = 1 << 1;
        const EXECUTE = 1 << 2;
    }
}

/// One child returned by a directory listing.
#[derive(Debug, Clone)]
pub struct ListedEntry {
    pub name: String,
    /// Absolute path of the child.
    pub path: String,
    pub kind: EntryKind,
    pub size: u64,
    /// Seconds since the Unix epoch; 0 when unknown.
    pub modified_at: u64,
    pub is_hidden: bool,
    pub permissions: EntryPermissions,
}

/// A listing: the listed path, its children, and their combined size.
#[derive(Debug, Clone)]
pub struct DirectoryListing {
    pub path: String,
    pub entries: Vec<ListedEntry>,
    pub total_size: u64,
}

/// Capability to list directories, the crawler's only suspension point.
#[async_trait]
pub trait DirectoryLister: Send + Sync {
    /// Lists the children of `path`. Hidden entries are included only
    /// when `include_hidden` is set.
    async fn list_directory(
        &self,
        path: &str,
        include_hidden: bool,
    ) -> Result<DirectoryListing, DirectoryAccessError>;

    /// Filesystem roots available for crawling: drive letters on Windows,
    /// `/` elsewhere. Used by the warm-up crawl at engine start.
    async fn roots(&self) -> Vec<String>;
}

/// Lists directories on the local filesystem.
#[derive(Debug, Default)]
pub struct LocalDirectoryLister;

#[async_trait]
impl DirectoryLister for LocalDirectoryLister {
    async fn list_directory(
        &self,
        path: &str,
        include_hidden: bool,
    ) -> Result<DirectoryListing, DirectoryAccessError> {
        let metadata = tokio::fs::symlink_metadata(path)
            .await
            .map_err(|error| DirectoryAccessError::from_io(path, error))?;
        if !metadata.is_dir() {
            return Err(DirectoryAccessError::NotADirectory(path.to_string()));
        }

        let mut reader = tokio::fs::read_dir(path)
            .await
            .map_err(|error| DirectoryAccessError::from_io(path, error))?;

        let mut entries = Vec::new();
        let mut total_size = 0u64;
        loop {
            let child = match reader.next_entry().await {
                Ok(Some(child)) => child,
                Ok(None) => break,
                Err(error) => return Err(DirectoryAccessError::from_io(path, error)),
            };

            let name = child.file_name().to_string_lossy().into_owned();
            if name.is_empty() {
                continue;
            }
            let is_hidden = name.starts_with('.');
            if !include_hidden && is_hidden {
                continue;
            }

            // A child that vanishes or turns unreadable mid-listing is
            // dropped, not a listing failure.
            let meta = match child.metadata().await {
                Ok(meta) => meta,
                Err(_) => continue,
            };

            let file_type = meta.file_type();
            let kind = if file_type.is_symlink() {
                EntryKind::Symlink
            } else if file_type.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };

            let size = meta.len();
            total_size += size;
            let modified_at = meta
                .modified()
                .ok()
                .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
                .map(|elapsed| elapsed.as_secs())
                .unwrap_or(0);

            entries.push(ListedEntry {
                path: child.path().to_string_lossy().into_owned(),
                name,
                kind,
                size,
                modified_at,
                is_hidden,
                permissions: permissions_of(&meta),
            });
        }

        Ok(DirectoryListing {
            path: path.to_string(),
            entries,
            total_size,
        })
    }

    async fn roots(&self) -> Vec<String> {
        #[cfg(windows)]
        {
            let mut roots = Vec::new();
            for letter in b'A'..=b'Z' {
                let drive = format!("{}:\\", letter as char);
                if tokio::fs::metadata(&drive).await.is_ok() {
                    roots.push(drive);
                }
            }
            roots
        }

        #[cfg(not(windows))]
        {
            vec!["/".to_string()]
        }
    }
}

#[cfg(unix)]
fn permissions_of(meta: &std::fs::Metadata) -> EntryPermissions {
    use std::os::unix::fs::PermissionsExt;

    let mode = meta.permissions().mode();
    let mut permissions = EntryPermissions::empty();
    if mode & 0o444 != 0 {
        permissions |= EntryPermissions::READ;
    }
    if mode & 0o222 != 0 {
        permissions |= EntryPermissions::WRITE;
    }
    if mode & 0o111 != 0 {
        permissions |= EntryPermissions::EXECUTE;
    }
    permissions
}

#[cfg(not(unix))]
fn permissions_of(meta: &std::fs::Metadata) -> EntryPermissions {
    if meta.permissions().readonly() {
        EntryPermissions::READ
    } else {
        EntryPermissions::READ | EntryPermissions::WRITE
    }
}

/// In-memory lister for crawler and engine tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use super::*;

    #[derive(Debug, Default)]
    pub struct StaticLister {
        pub roots: Vec<String>,
        pub directories: HashMap<String, Vec<ListedEntry>>,
        /// Paths whose listing fails with permission denied.
        pub denied: Vec<String>,
        /// Paths whose listing fails with a generic I/O error.
        pub broken: Vec<String>,
    }

    impl StaticLister {
        pub fn new(roots: &[&str]) -> Self {
            Self {
                roots: roots.iter().map(|r| r.to_string()).collect(),
                ..Default::default()
            }
        }

        pub fn directory(mut self, path: &str, children: Vec<ListedEntry>) -> Self {
            self.directories.insert(path.to_string(), children);
            self
        }

        pub fn denied(mut self, path: &str) -> Self {
            self.denied.push(path.to_string());
            self
        }

        pub fn broken(mut self, path: &str) -> Self {
            self.broken.push(path.to_string());
            self
        }
    }

    pub fn file(path: &str, name: &str, size: u64, modified_at: u64) -> ListedEntry {
        ListedEntry {
            name: name.to_string(),
            path: path.to_string(),
            kind: EntryKind::File,
            size,
            modified_at,
            is_hidden: name.starts_with('.'),
            permissions: EntryPermissions::READ | EntryPermissions::WRITE,
        }
    }

    pub fn directory(path: &str, name: &str) -> ListedEntry {
        ListedEntry {
            name: name.to_string(),
            path: path.to_string(),
            kind: EntryKind::Directory,
            size: 0,
            modified_at: 0,
            is_hidden: name.starts_with('.'),
            permissions: EntryPermissions::all(),
        }
    }

    #[async_trait]
    impl DirectoryLister for StaticLister {
        async fn list_directory(
            &self,
            path: &str,
            include_hidden: bool,
        ) -> Result<DirectoryListing, DirectoryAccessError> {
            if self.denied.iter().any(|denied| denied == path) {
                return Err(DirectoryAccessError::PermissionDenied(path.to_string()));
            }
            if self.broken.iter().any(|broken| broken == path) {
                return Err(DirectoryAccessError::Other(format!("listing failed: {path}")));
            }
            let children = self
                .directories
                .get(path)
                .ok_or_else(|| DirectoryAccessError::NotFound(path.to_string()))?;
            let entries: Vec<ListedEntry> = children
                .iter()
                .filter(|entry| include_hidden || !entry.is_hidden)
                .cloned()
                .collect();
            let total_size = entries.iter().map(|entry| entry.size).sum();
            Ok(DirectoryListing {
                path: path.to_string(),
                entries,
                total_size,
            })
        }

        async fn roots(&self) -> Vec<String> {
            self.roots.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn lists_files_and_directories() {
        let temp = TempDir::new().unwrap();
        File::create(temp.path().join("a.txt")).unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();

        let lister = LocalDirectoryLister;
        let listing = lister
            .list_directory(&temp.path().to_string_lossy(), false)
            .await
            .unwrap();

        assert_eq!(listing.entries.len(), 2);
        let sub = listing.entries.iter().find(|e| e.name == "sub").unwrap();
        assert_eq!(sub.kind, EntryKind::Directory);
        let file = listing.entries.iter().find(|e| e.name == "a.txt").unwrap();
        assert_eq!(file.kind, EntryKind::File);
        assert!(file.modified_at > 0);
        assert!(file.permissions.contains(EntryPermissions::READ));
    }

    #[tokio::test]
    async fn hidden_entries_require_opt_in() {
        let temp = TempDir::new().unwrap();
        File::create(temp.path().join(".hidden")).unwrap();
        File::create(temp.path().join("visible")).unwrap();
        let path = temp.path().to_string_lossy().into_owned();

        let lister = LocalDirectoryLister;
        let without = lister.list_directory(&path, false).await.unwrap();
        assert_eq!(without.entries.len(), 1);
        assert_eq!(without.entries[0].name, "visible");

        let with = lister.list_directory(&path, true).await.unwrap();
        assert_eq!(with.entries.len(), 2);
        assert!(with.entries.iter().any(|e| e.name == ".hidden" && e.is_hidden));
    }

    #[tokio::test]
    async fn missing_path_is_not_found() {
        let lister = LocalDirectoryLister;
        let error = lister
            .list_directory("/definitely/not/here", false)
            .await
            .unwrap_err();
        assert!(matches!(error, DirectoryAccessError::NotFound(_)));
    }

    #[tokio::test]
    async fn file_path_is_not_a_directory() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("plain.txt");
        File::create(&file_path).unwrap();

        let lister = LocalDirectoryLister;
        let error = lister
            .list_directory(&file_path.to_string_lossy(), false)
            .await
            .unwrap_err();
        assert!(matches!(error, DirectoryAccessError::NotADirectory(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlinks_are_typed_as_symlinks() {
        let temp = TempDir::new().unwrap();
        File::create(temp.path().join("target")).unwrap();
        std::os::unix::fs::symlink(temp.path().join("target"), temp.path().join("link")).unwrap();

        let lister = LocalDirectoryLister;
        let listing = lister
            .list_directory(&temp.path().to_string_lossy(), false)
            .await
            .unwrap();
        let link = listing.entries.iter().find(|e| e.name == "link").unwrap();
        assert_eq!(link.kind, EntryKind::Symlink);
    }

    #[tokio::test]
    async fn total_size_sums_children() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a"), b"12345").unwrap();
        fs::write(temp.path().join("b"), b"123").unwrap();

        let lister = LocalDirectoryLister;
        let listing = lister
            .list_directory(&temp.path().to_string_lossy(), false)
            .await
            .unwrap();
        assert_eq!(listing.total_size, 8);
    }
}
