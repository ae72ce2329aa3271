//! File system operations module
//!
//! Entry classification, the block-clone fast path, and the copy
//! primitives built on top of them.

mod entry;
mod operations;
pub mod clone;

pub use entry::*;
pub use operations::*;
pub use clone::{try_clone, CLONE_SUPPORTED};
