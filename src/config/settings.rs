//! Configuration settings for filecopy
//!
//! Defines the runtime copy options, CLI arguments, and defaults.

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// filecopy - copy a file with its permission bits, cloning when possible
#[derive(Parser, Debug, Clone)]
#[command(name = "filecopy")]
#[command(author = "SmartCopy Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Copy a file and its mode bits, using reflinks where the filesystem allows")]
#[command(long_about = r#"
filecopy copies a single file like `cp`, preserving permission bits.

On copy-on-write filesystems (btrfs, XFS) the data blocks are cloned
instead of copied. Named pipes are refused and copying a file onto
itself is an error.

Examples:
  filecopy a.txt b.txt             # Copy contents and mode
  filecopy a.txt /some/dir         # Copy to /some/dir/a.txt
  filecopy -P link other-link      # Recreate a symlink instead of following it
  filecopy -p a.txt b.txt          # Also preserve access/modification times
"#)]
pub struct CliArgs {
    /// Source file
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Destination file or directory
    #[arg(value_name = "DESTINATION")]
    pub destination: PathBuf,

    /// Never follow symlinks in SOURCE (copy the link itself)
    #[arg(short = 'P', long)]
    pub no_dereference: bool,

    /// Preserve access and modification times as well as mode bits
    #[arg(short = 'p', long)]
    pub preserve: bool,

    /// Block-clone strategy
    #[arg(long, value_enum, default_value = "auto", value_name = "WHEN")]
    pub reflink: CloneMode,

    /// Buffer size for byte copies (e.g., 1M, 64K)
    #[arg(short = 'b', long, default_value = "1M", value_name = "SIZE")]
    pub buffer_size: String,

    /// Verbose output (-v for debug logging)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// When to attempt the block-clone fast path
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CloneMode {
    /// Clone when the build and filesystem support it, else copy bytes
    #[default]
    Auto,
    /// Always copy bytes
    Never,
}

/// Options shared by every copy primitive
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyOptions {
    /// Follow a symlink source instead of recreating the link
    pub follow_symlinks: bool,
    /// Block-clone strategy
    pub clone: CloneMode,
    /// Buffer size in bytes for the byte-copy path
    pub buffer_size: usize,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            follow_symlinks: true,
            clone: CloneMode::Auto,
            buffer_size: 1024 * 1024, // 1MB
        }
    }
}

impl CopyOptions {
    /// Default options with the given symlink policy
    pub fn follow(follow_symlinks: bool) -> Self {
        Self {
            follow_symlinks,
            ..Default::default()
        }
    }

    /// Create options from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        let buffer_size = parse_size(&args.buffer_size)
            .map_err(|e| format!("Invalid buffer size: {}", e))?;
        if buffer_size == 0 {
            return Err("Invalid buffer size: must be greater than zero".to_string());
        }

        Ok(Self {
            follow_symlinks: !args.no_dereference,
            clone: args.reflink,
            buffer_size: buffer_size as usize,
        })
    }
}

/// Parse size string (e.g., "1M", "64K", "1G")
pub fn parse_size(size: &str) -> Result<u64, String> {
    let size = size.trim().to_uppercase();

    if size.is_empty() {
        return Err("Empty size string".to_string());
    }

    let (num_str, multiplier) = if size.ends_with("GB") || size.ends_with('G') {
        (size.trim_end_matches(['G', 'B']), 1024u64 * 1024 * 1024)
    } else if size.ends_with("MB") || size.ends_with('M') {
        (size.trim_end_matches(['M', 'B']), 1024u64 * 1024)
    } else if size.ends_with("KB") || size.ends_with('K') {
        (size.trim_end_matches(['K', 'B']), 1024u64)
    } else {
        // Bytes, with or without a trailing B
        (size.trim_end_matches('B'), 1u64)
    };

    let num: f64 = num_str
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number: {}", num_str))?;

    if num < 0.0 {
        return Err(format!("Negative size: {}", num_str));
    }

    Ok((num * multiplier as f64) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1024").unwrap(), 1024);
        assert_eq!(parse_size("512B").unwrap(), 512);
        assert_eq!(parse_size("64K").unwrap(), 64 * 1024);
        assert_eq!(parse_size("1KB").unwrap(), 1024);
        assert_eq!(parse_size("1m").unwrap(), 1024 * 1024);
        assert_eq!(parse_size("1.5G").unwrap(), (1.5 * 1024.0 * 1024.0 * 1024.0) as u64);
        assert!(parse_size("").is_err());
        assert!(parse_size("lots").is_err());
        assert!(parse_size("-1K").is_err());
    }

    #[test]
    fn test_from_cli() {
        let args = CliArgs::parse_from(["filecopy", "-P", "--reflink", "never", "-b", "64K", "a", "b"]);
        let options = CopyOptions::from_cli(&args).unwrap();
        assert!(!options.follow_symlinks);
        assert_eq!(options.clone, CloneMode::Never);
        assert_eq!(options.buffer_size, 64 * 1024);
        assert_eq!(args.source, PathBuf::from("a"));
        assert_eq!(args.destination, PathBuf::from("b"));
    }

    #[test]
    fn test_from_cli_defaults() {
        let args = CliArgs::parse_from(["filecopy", "a", "b"]);
        let options = CopyOptions::from_cli(&args).unwrap();
        assert!(options.follow_symlinks);
        assert_eq!(options.clone, CloneMode::Auto);
        assert_eq!(options.buffer_size, 1024 * 1024);
        assert!(!args.preserve);
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let args = CliArgs::parse_from(["filecopy", "-b", "0", "a", "b"]);
        assert!(CopyOptions::from_cli(&args).is_err());
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: CopyOptions = serde_json::from_str(r#"{"clone": "never"}"#).unwrap();
        assert_eq!(options.clone, CloneMode::Never);
        assert!(options.follow_symlinks);
        assert_eq!(options.buffer_size, 1024 * 1024);
    }
}
