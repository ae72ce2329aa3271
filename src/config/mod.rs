//! Configuration module for filecopy
//!
//! Provides the copy options shared by the library primitives and the
//! CLI arguments of the bundled binary.

mod settings;

pub use settings::*;
