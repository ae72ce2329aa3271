//! Entry classification
//!
//! Answers whether a path is a symlink, a named pipe or something else,
//! and whether two paths are the same underlying file.

use crate::error::{IoResultExt, Result};
use std::fs::Metadata;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::{FileTypeExt, MetadataExt};

/// Kind of filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file
    Regular,
    /// Symbolic link (only reported by a no-follow query)
    Symlink,
    /// Named pipe (FIFO)
    NamedPipe,
    /// Directory
    Directory,
    /// Device node, socket or anything else
    Other,
}

impl EntryKind {
    /// Classify a metadata snapshot
    pub fn of(metadata: &Metadata) -> Self {
        if is_symlink(metadata) {
            EntryKind::Symlink
        } else if is_special(metadata) {
            EntryKind::NamedPipe
        } else if metadata.is_dir() {
            EntryKind::Directory
        } else if metadata.is_file() {
            EntryKind::Regular
        } else {
            EntryKind::Other
        }
    }
}

/// A path plus its resolved metadata
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Path as queried
    pub path: PathBuf,
    /// Entry kind
    pub kind: EntryKind,
    /// Size in bytes (for a symlink: length of the target string)
    pub size: u64,
    /// Mode bits (type and permissions)
    pub mode: u32,
    /// Device id
    pub dev: u64,
    /// Inode number
    pub ino: u64,
    metadata: Metadata,
}

impl FileEntry {
    /// Query a path without following a trailing symlink
    pub fn lstat(path: &Path) -> Result<Self> {
        let metadata = std::fs::symlink_metadata(path).with_path(path)?;
        Ok(Self::from_metadata(path, metadata))
    }

    /// Query a path following symlinks
    pub fn stat(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path).with_path(path)?;
        Ok(Self::from_metadata(path, metadata))
    }

    /// Build an entry from an existing metadata snapshot
    pub fn from_metadata(path: &Path, metadata: Metadata) -> Self {
        #[cfg(unix)]
        let (mode, dev, ino) = (metadata.mode(), metadata.dev(), metadata.ino());

        #[cfg(not(unix))]
        let (mode, dev, ino) = (if metadata.permissions().readonly() { 0o444 } else { 0o644 }, 0, 0);

        FileEntry {
            path: path.to_path_buf(),
            kind: EntryKind::of(&metadata),
            size: metadata.len(),
            mode,
            dev,
            ino,
            metadata,
        }
    }

    /// Raw metadata snapshot
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Consume the entry, keeping the metadata snapshot
    pub fn into_metadata(self) -> Metadata {
        self.metadata
    }

    /// Is this a symlink?
    pub fn is_symlink(&self) -> bool {
        self.kind == EntryKind::Symlink
    }

    /// Is this a named pipe?
    pub fn is_special(&self) -> bool {
        self.kind == EntryKind::NamedPipe
    }

    /// Is this a directory?
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Permission bits only (setuid/setgid/sticky included)
    pub fn permissions(&self) -> u32 {
        self.mode & 0o7777
    }
}

/// True iff the metadata describes a symlink.
///
/// Must be given no-follow metadata (`symlink_metadata`), otherwise a link
/// is indistinguishable from its target.
pub fn is_symlink(metadata: &Metadata) -> bool {
    metadata.file_type().is_symlink()
}

/// True iff the metadata describes a named pipe.
///
/// Device nodes and sockets are not checked here and pass as regular.
#[cfg(unix)]
pub fn is_special(metadata: &Metadata) -> bool {
    metadata.file_type().is_fifo()
}

/// Named pipes do not exist on this platform
#[cfg(not(unix))]
pub fn is_special(_metadata: &Metadata) -> bool {
    false
}

/// Best-effort check that two paths resolve to the same file.
///
/// Both paths are followed. A failed query on either side counts as
/// "not the same file".
#[cfg(unix)]
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::metadata(a), std::fs::metadata(b)) {
        (Ok(ma), Ok(mb)) => ma.dev() == mb.dev() && ma.ino() == mb.ino(),
        _ => false,
    }
}

/// Best-effort check that two paths resolve to the same file
#[cfg(not(unix))]
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(ca), Ok(cb)) => ca == cb,
        _ => false,
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs::File;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    #[test]
    fn test_classify_regular_and_dir() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        std::fs::write(&file, b"hello").unwrap();

        let entry = FileEntry::lstat(&file).unwrap();
        assert_eq!(entry.kind, EntryKind::Regular);
        assert_eq!(entry.size, 5);
        assert!(!entry.is_symlink());

        let entry = FileEntry::lstat(dir.path()).unwrap();
        assert!(entry.is_dir());
    }

    #[test]
    fn test_symlink_only_visible_without_follow() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("target");
        let link = dir.path().join("link");
        File::create(&target).unwrap();
        symlink(&target, &link).unwrap();

        assert!(is_symlink(&std::fs::symlink_metadata(&link).unwrap()));
        assert!(!is_symlink(&std::fs::metadata(&link).unwrap()));
        assert!(FileEntry::lstat(&link).unwrap().is_symlink());
        assert_eq!(FileEntry::stat(&link).unwrap().kind, EntryKind::Regular);
    }

    #[test]
    fn test_fifo_is_special() {
        let dir = TempDir::new().unwrap();
        let pipe = dir.path().join("pipe");
        nix::unistd::mkfifo(&pipe, nix::sys::stat::Mode::S_IRWXU).unwrap();

        let entry = FileEntry::lstat(&pipe).unwrap();
        assert_eq!(entry.kind, EntryKind::NamedPipe);
        assert!(is_special(entry.metadata()));
    }

    #[test]
    fn test_same_file() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        let link = dir.path().join("link");
        std::fs::write(&a, b"x").unwrap();
        std::fs::write(&b, b"x").unwrap();
        symlink(&a, &link).unwrap();

        assert!(same_file(&a, &a));
        assert!(same_file(&a, &link));
        assert!(!same_file(&a, &b));
        assert!(!same_file(&a, &dir.path().join("missing")));
    }

    #[test]
    fn test_missing_path_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = FileEntry::lstat(&dir.path().join("nope")).unwrap_err();
        assert!(err.is_not_found());
    }
}
