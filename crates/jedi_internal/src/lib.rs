//! This module is separated into its own crate to enable simple dynamic linking for `jedi-rs`, and should not be used directly.

/// `use jedi_rs::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export jedi_types for convenience
pub use jedi_types;

// Re-export commonly used types at crate root
pub use jedi_types::file::{
	Asset, BmFile, Cell, Compression, FileType, FmeFile, GobFile, JediFileError, LfdFile, PalFile,
	TypedFile, Warning, WaxFile,
};
