//! Block-clone fast path
//!
//! On Linux builds with the `reflink` feature the destination is asked to
//! share the source's data blocks through the clone ioctl (btrfs, XFS and
//! other copy-on-write filesystems). Every other build gets a stub that
//! never clones, so callers always fall through to a byte copy.

use std::fs::File;

#[cfg(all(target_os = "linux", feature = "reflink"))]
mod imp {
    use std::fs::File;
    use std::os::unix::io::AsRawFd;

    // _IOW(0x94, 9, int): BTRFS_IOC_CLONE, same request number as FICLONE
    nix::ioctl_write_int!(ioc_clone, 0x94, 9);

    pub fn try_clone(src: &File, dst: &File) -> bool {
        // SAFETY: both descriptors are borrowed from open `File`s for the
        // duration of the call and the request takes no pointer argument.
        match unsafe { ioc_clone(dst.as_raw_fd(), src.as_raw_fd() as _) } {
            Ok(_) => true,
            Err(errno) => {
                tracing::debug!("Clone ioctl refused ({}), falling back to byte copy", errno);
                false
            }
        }
    }
}

#[cfg(not(all(target_os = "linux", feature = "reflink")))]
mod imp {
    use std::fs::File;

    pub fn try_clone(_src: &File, _dst: &File) -> bool {
        false
    }
}

/// Whether this build carries a clone implementation at all
pub const CLONE_SUPPORTED: bool = cfg!(all(target_os = "linux", feature = "reflink"));

/// Ask the kernel to share `src`'s blocks with `dst`.
///
/// Returns `false` on any failure (wrong filesystem, cross-device,
/// unsupported, permission). A `false` is never fatal; the caller copies
/// bytes instead. `dst` must be open for writing and is left truncated.
pub fn try_clone(src: &File, dst: &File) -> bool {
    imp::try_clone(src, dst)
}
