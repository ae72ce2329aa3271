//! # filecopy - shutil-style file copy over raw OS primitives
//!
//! Copies a single file the way scripting-language standard libraries do
//! (`copyfile`, `copymode`, `copy`, `copy2`), with explicit handling of the
//! awkward cases:
//!
//! - **Same file**: copying a file onto itself (directly or through a
//!   symlink) is refused instead of truncating it
//! - **Named pipes**: FIFOs on either side are refused
//! - **Symlinks**: followed, or recreated with the same target string
//! - **Reflink fast path**: on Linux copy-on-write filesystems the data
//!   blocks are cloned; anywhere else bytes are streamed
//! - **Size verification**: a source that changes size mid-copy is reported
//!
//! ## Quick Start
//!
//! ```no_run
//! use filecopy::copy;
//!
//! // Copies contents and mode bits; "/backup" may be a directory
//! let dst = copy("/data/report.csv", "/backup", true).unwrap();
//! println!("Copied to {}", dst.display());
//! ```
//!
//! ## Options
//!
//! ```no_run
//! use filecopy::config::{CloneMode, CopyOptions};
//! use filecopy::fs::FileCopier;
//! use std::path::Path;
//!
//! let copier = FileCopier::new(CopyOptions {
//!     follow_symlinks: false,
//!     clone: CloneMode::Never,
//!     buffer_size: 256 * 1024,
//! });
//!
//! let stats = copier
//!     .copy_file(Path::new("/data/in.bin"), Path::new("/data/out.bin"))
//!     .unwrap();
//! println!("{} bytes via {:?}", stats.bytes_copied, stats.method);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod fs;

// Re-export commonly used types
pub use config::{CloneMode, CopyOptions};
pub use error::{CopyError, Result};
pub use fs::{
    copy, copy2, copy_file, copy_mode, copy_stat, is_special, is_symlink, same_file, CopyMethod,
    CopyStats, FileCopier,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use filecopy::prelude::*;
    //! ```

    pub use crate::config::{CloneMode, CopyOptions};
    pub use crate::error::{CopyError, Result};
    pub use crate::fs::{
        copy, copy2, copy_file, copy_mode, copy_stat, is_special, is_symlink, same_file,
        CopyMethod, CopyStats, EntryKind, FileCopier, FileEntry,
    };
}
