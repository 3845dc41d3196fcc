//! File format support for the `jedi-rs` project.
//!
//! Binary container and raster formats of the Jedi engine:
//!
//! - **GOB**: flat archive with a trailing directory
//! - **LFD**: directory-first archive, forward-only friendly
//! - **BM**: texture bitmap over the shared cell codec
//! - **FME**: single sprite frame (anchor, flip, cell)
//! - **WAX**: composite sprite graph with offset-identity sharing
//! - **PAL / PLTT**: VGA and Landru palettes
//! - **DELT**: sparse delta image
//!
//! plus the [`text`] tokenizer the plain-text formats build on and an
//! opaque [`raw`] fallback for everything else.
//!
//! All types are plain owned data (`Send + Sync`); nothing locks
//! internally, so a shared mutable file must be serialized by its owner.
//! Concurrent reads of an archive that is not being mutated are safe.

mod error;
pub(crate) mod warning;

pub mod asset;
pub mod bm;
pub mod cell;
pub mod delt;
pub mod fme;
pub mod gob;
pub mod lfd;
pub mod pal;
pub mod pltt;
pub mod raw;
pub mod text;
pub mod wax;

pub use asset::Asset;
pub use error::{FileType, JediFileError};
pub use warning::Warning;

// Re-export main file types
pub use bm::File as BmFile;
pub use cell::{Cell, Compression};
pub use delt::File as DeltFile;
pub use fme::File as FmeFile;
pub use gob::File as GobFile;
pub use lfd::File as LfdFile;
pub use pal::{Color, File as PalFile};
pub use pltt::File as PlttFile;
pub use raw::File as RawFile;
pub use wax::File as WaxFile;

/// The load/save contract every file format implements.
///
/// Loading fills every field from the data wholesale; recoverable
/// anomalies are collected into the value's warning list and only
/// unrecoverable conditions surface as errors. Saving recomputes every
/// derived field (sizes, offsets, counts) from the current state and
/// never consults anything remembered from a previous load. Saves are not
/// transactional: write to a scratch target and swap it in after success.
pub trait TypedFile: Sized {
	/// The format this type decodes.
	const FILE_TYPE: FileType;

	/// Loads a value from a byte slice.
	fn from_bytes(data: &[u8]) -> Result<Self, JediFileError>;

	/// Serializes the value to canonical bytes.
	fn to_bytes(&self) -> Result<Vec<u8>, JediFileError>;

	/// Warnings accumulated by the load that produced this value.
	fn warnings(&self) -> &[Warning];
}
