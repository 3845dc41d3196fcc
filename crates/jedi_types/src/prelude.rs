//! Prelude module for `jedi_types`.
//!
//! This module provides a convenient way to import commonly used types,
//! traits, and constants.
//!
//! # Examples
//!
//! ```no_run
//! use jedi_types::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut archive = GobFile::new();
//! let bitmap = BmFile::new(Cell::blank(64, 64));
//! archive.add("WALL.BM", bitmap.to_bytes()?)?;
//! # Ok(())
//! # }
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	// Dispatch
	Asset,

	// Raster types
	BmFile,
	Cell,
	Color,
	Compression,
	DeltFile,

	// Errors and warnings
	FileType,
	FmeFile,

	// Archive types
	GobFile,
	JediFileError,
	LfdFile,

	// Palette types
	PalFile,
	PlttFile,
	RawFile,

	TypedFile,
	Warning,
	WaxFile,
};

// Sprite graph types
#[doc(inline)]
pub use crate::file::wax::{CellId, Frame, FrameId, Pose, PoseId, Sequence, SequenceId};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
