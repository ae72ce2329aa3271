//! Copy primitives
//!
//! `copy_file` moves contents, `copy_mode`/`copy_stat` move metadata and
//! `copy`/`copy2` combine them, resolving a directory destination first.
//! Each call opens at most two handles and releases them on every exit
//! path when they drop.

use crate::config::{CloneMode, CopyOptions};
use crate::error::{CopyError, IoResultExt, Result};
use crate::fs::clone::try_clone;
use crate::fs::entry::{same_file, FileEntry};
use filetime::FileTime;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Copy operation statistics
#[derive(Debug, Clone, Default)]
pub struct CopyStats {
    /// Bytes copied (or shared, for a clone)
    pub bytes_copied: u64,
    /// Duration of the copy
    pub duration: Duration,
    /// Throughput in bytes/second
    pub throughput: f64,
    /// Method used for copy
    pub method: CopyMethod,
}

impl CopyStats {
    /// Calculate throughput from bytes and duration
    pub fn calculate_throughput(&mut self) {
        if self.duration.as_secs_f64() > 0.0 {
            self.throughput = self.bytes_copied as f64 / self.duration.as_secs_f64();
        }
    }
}

/// Copy method used
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CopyMethod {
    /// Read/write loop
    #[default]
    ByteCopy,
    /// Filesystem block clone
    Cloned,
    /// Destination recreated as a symlink with the source's target
    Symlink,
}

/// File copier carrying the options shared by all primitives
#[derive(Debug, Clone, Default)]
pub struct FileCopier {
    options: CopyOptions,
}

impl FileCopier {
    /// Create a new file copier with the given options
    pub fn new(options: CopyOptions) -> Self {
        Self { options }
    }

    /// Create with default options (follows symlinks, clones when possible)
    pub fn default_copier() -> Self {
        Self::new(CopyOptions::default())
    }

    /// Options in effect
    pub fn options(&self) -> &CopyOptions {
        &self.options
    }

    /// Copy file contents (not mode bits) from `src` to `dst`.
    ///
    /// Fails with [`CopyError::SameFile`] when both paths resolve to one
    /// file and with [`CopyError::SpecialFile`] when either side is a named
    /// pipe. Without `follow_symlinks` a symlink source is recreated at
    /// `dst` with the same target string; an existing `dst` then fails with
    /// the OS `AlreadyExists` error, so repeating such a copy is not
    /// idempotent. A symlink `dst` leading to a named pipe is refused too.
    /// A failed copy may leave a partial `dst` behind.
    pub fn copy_file(&self, src: &Path, dst: &Path) -> Result<CopyStats> {
        let start = Instant::now();

        if same_file(src, dst) {
            return Err(CopyError::SameFile {
                src: src.to_path_buf(),
                dst: dst.to_path_buf(),
            });
        }

        let mut src_entry = FileEntry::lstat(src)?;
        if src_entry.is_special() {
            return Err(special_file(src_entry));
        }

        match FileEntry::lstat(dst) {
            Ok(dst_entry) if dst_entry.is_special() => return Err(special_file(dst_entry)),
            Ok(dst_entry) if dst_entry.is_symlink() => {
                // Creating through the link would open whatever it points at
                match FileEntry::stat(dst) {
                    Ok(target) if target.is_special() => return Err(special_file(target)),
                    Ok(_) => {}
                    Err(e) if e.is_not_found() => {}
                    Err(e) => return Err(e),
                }
            }
            Ok(_) => {}
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        if src_entry.is_symlink() {
            if !self.options.follow_symlinks {
                let target = std::fs::read_link(src).with_path(src)?;
                tracing::debug!("Recreating symlink {:?} -> {:?}", dst, target);
                create_symlink(&target, dst).with_path(dst)?;
                return Ok(finish(0, CopyMethod::Symlink, start));
            }

            // Resolve the whole chain so the expected size is the final target's
            src_entry = FileEntry::stat(src)?;
            if src_entry.is_special() {
                return Err(special_file(src_entry));
            }
        }

        if src_entry.is_dir() {
            return Err(CopyError::io(src, is_a_directory()));
        }

        let expected = src_entry.size;
        let (copied, method) = self.copy_contents(src, dst)?;

        if copied != expected {
            return Err(CopyError::SizeMismatch {
                path: src.to_path_buf(),
                copied,
                expected,
            });
        }

        Ok(finish(copied, method, start))
    }

    /// Open both ends, try the clone fast path, then stream bytes
    fn copy_contents(&self, src: &Path, dst: &Path) -> Result<(u64, CopyMethod)> {
        let mut src_file = File::open(src).with_path(src)?;
        let mut dst_file = File::create(dst).with_path(dst)?;

        if self.options.clone == CloneMode::Auto && try_clone(&src_file, &dst_file) {
            let len = dst_file.metadata().with_path(dst)?.len();
            tracing::debug!("Cloned {:?} -> {:?} ({} bytes)", src, dst, len);
            return Ok((len, CopyMethod::Cloned));
        }

        let mut buffer = vec![0u8; self.options.buffer_size.max(1)];
        let mut bytes_copied = 0u64;

        loop {
            let bytes_read = match src_file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(CopyError::io(src, e)),
            };

            dst_file
                .write_all(&buffer[..bytes_read])
                .with_path(dst)?;

            bytes_copied += bytes_read as u64;
        }

        dst_file.flush().with_path(dst)?;

        Ok((bytes_copied, CopyMethod::ByteCopy))
    }

    /// Copy permission bits from `src` to `dst`.
    ///
    /// Without `follow_symlinks`, two symlinks are left untouched: there is
    /// no portable way to set the mode of a link itself.
    pub fn copy_mode(&self, src: &Path, dst: &Path) -> Result<()> {
        let src_entry = FileEntry::lstat(src)?;
        let dst_entry = FileEntry::lstat(dst)?;

        if !self.options.follow_symlinks && src_entry.is_symlink() && dst_entry.is_symlink() {
            tracing::debug!("Both {:?} and {:?} are symlinks, leaving mode alone", src, dst);
            return Ok(());
        }

        let src_entry = if src_entry.is_symlink() {
            FileEntry::stat(src)?
        } else {
            src_entry
        };

        set_mode(&src_entry, dst)
    }

    /// Copy permission bits plus access and modification times.
    ///
    /// Two symlinks without `follow_symlinks` get only the link's own
    /// timestamps copied.
    pub fn copy_stat(&self, src: &Path, dst: &Path) -> Result<()> {
        let src_entry = FileEntry::lstat(src)?;
        let dst_entry = FileEntry::lstat(dst)?;

        if !self.options.follow_symlinks && src_entry.is_symlink() && dst_entry.is_symlink() {
            let (atime, mtime) = file_times(src_entry.metadata());
            return filetime::set_symlink_file_times(dst, atime, mtime).with_path(dst);
        }

        self.copy_mode(src, dst)?;

        let metadata = std::fs::metadata(src).with_path(src)?;
        let (atime, mtime) = file_times(&metadata);
        filetime::set_file_times(dst, atime, mtime).with_path(dst)
    }

    /// Copy contents and mode bits ("cp src dst"), returning the final path.
    ///
    /// An existing directory at `dst` receives `dst/basename(src)`.
    pub fn copy(&self, src: &Path, dst: &Path) -> Result<PathBuf> {
        self.copy_with_stats(src, dst, false).map(|(dst, _)| dst)
    }

    /// Like [`FileCopier::copy`], also preserving access and modification times
    pub fn copy2(&self, src: &Path, dst: &Path) -> Result<PathBuf> {
        self.copy_with_stats(src, dst, true).map(|(dst, _)| dst)
    }

    /// Resolve the destination, copy contents, then mode bits (plus times
    /// when `preserve_times`), returning the final path and data statistics
    pub fn copy_with_stats(
        &self,
        src: &Path,
        dst: &Path,
        preserve_times: bool,
    ) -> Result<(PathBuf, CopyStats)> {
        let dst = resolve_destination(src, dst)?;
        let stats = self.copy_file(src, &dst)?;
        if preserve_times {
            self.copy_stat(src, &dst)?;
        } else {
            self.copy_mode(src, &dst)?;
        }
        Ok((dst, stats))
    }
}

/// Redirect into `dst/basename(src)` when `dst` is an existing directory
pub fn resolve_destination(src: &Path, dst: &Path) -> Result<PathBuf> {
    match std::fs::metadata(dst) {
        Ok(metadata) if metadata.is_dir() => {
            let name = src
                .file_name()
                .ok_or_else(|| CopyError::InvalidPath(src.to_path_buf()))?;
            let target = dst.join(name);
            tracing::debug!("{:?} is a directory, copying to {:?}", dst, target);
            Ok(target)
        }
        Ok(_) => Ok(dst.to_path_buf()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(dst.to_path_buf()),
        Err(e) => Err(CopyError::io(dst, e)),
    }
}

/// Copy file contents; see [`FileCopier::copy_file`]
pub fn copy_file(src: impl AsRef<Path>, dst: impl AsRef<Path>, follow_symlinks: bool) -> Result<()> {
    FileCopier::new(CopyOptions::follow(follow_symlinks))
        .copy_file(src.as_ref(), dst.as_ref())
        .map(|_| ())
}

/// Copy permission bits; see [`FileCopier::copy_mode`]
pub fn copy_mode(src: impl AsRef<Path>, dst: impl AsRef<Path>, follow_symlinks: bool) -> Result<()> {
    FileCopier::new(CopyOptions::follow(follow_symlinks)).copy_mode(src.as_ref(), dst.as_ref())
}

/// Copy permission bits and timestamps; see [`FileCopier::copy_stat`]
pub fn copy_stat(src: impl AsRef<Path>, dst: impl AsRef<Path>, follow_symlinks: bool) -> Result<()> {
    FileCopier::new(CopyOptions::follow(follow_symlinks)).copy_stat(src.as_ref(), dst.as_ref())
}

/// Copy contents and mode bits; see [`FileCopier::copy`]
pub fn copy(src: impl AsRef<Path>, dst: impl AsRef<Path>, follow_symlinks: bool) -> Result<PathBuf> {
    FileCopier::new(CopyOptions::follow(follow_symlinks)).copy(src.as_ref(), dst.as_ref())
}

/// Copy contents, mode bits and timestamps; see [`FileCopier::copy2`]
pub fn copy2(src: impl AsRef<Path>, dst: impl AsRef<Path>, follow_symlinks: bool) -> Result<PathBuf> {
    FileCopier::new(CopyOptions::follow(follow_symlinks)).copy2(src.as_ref(), dst.as_ref())
}

fn finish(bytes_copied: u64, method: CopyMethod, start: Instant) -> CopyStats {
    let mut stats = CopyStats {
        bytes_copied,
        duration: start.elapsed(),
        throughput: 0.0,
        method,
    };
    stats.calculate_throughput();
    stats
}

fn special_file(entry: FileEntry) -> CopyError {
    CopyError::SpecialFile {
        path: entry.path.clone(),
        metadata: entry.into_metadata(),
    }
}

fn file_times(metadata: &std::fs::Metadata) -> (FileTime, FileTime) {
    (
        FileTime::from_last_access_time(metadata),
        FileTime::from_last_modification_time(metadata),
    )
}

#[cfg(unix)]
fn is_a_directory() -> io::Error {
    io::Error::from_raw_os_error(libc::EISDIR)
}

#[cfg(not(unix))]
fn is_a_directory() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "is a directory")
}

#[cfg(unix)]
fn set_mode(src: &FileEntry, dst: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let permissions = std::fs::Permissions::from_mode(src.permissions());
    std::fs::set_permissions(dst, permissions).with_path(dst)
}

#[cfg(not(unix))]
fn set_mode(src: &FileEntry, dst: &Path) -> Result<()> {
    std::fs::set_permissions(dst, src.metadata().permissions()).with_path(dst)
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

#[cfg(not(any(unix, windows)))]
fn create_symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(io::ErrorKind::Unsupported, "symlinks are not supported"))
}
