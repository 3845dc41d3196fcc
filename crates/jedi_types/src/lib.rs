//! This crate provides core data types and file format support for the `jedi-rs` project.
//!
//! # File Formats
//!
//! - **GOB**: flat archive containers bundling the game's named resources
//! - **LFD**: directory-first archive containers used by the Landru cutscene system
//! - **BM**: indexed-color texture bitmaps with run-length compression
//! - **FME**: single sprite frames with anchor points and shared pixel cells
//! - **WAX**: fully animated sprites sharing sequences, frames and cells by offset
//! - **PAL / PLTT**: 6-bit VGA palettes and Landru palette ranges
//! - **DELT**: sparse delta images drawn over cutscene backdrops
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use jedi_types::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Walk an archive and decode what it contains
//! let archive = GobFile::open("TEXTURES.GOB")?;
//! for entry in archive.entries() {
//!     match Asset::from_named_bytes(entry.name(), entry.data()) {
//!         Ok(asset) => println!("{}: {}", entry.name(), asset.file_type()),
//!         Err(err) => eprintln!("{}: {err}", entry.name()),
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use jedi_types::file::{BmFile, Compression};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bm = BmFile::open("WALL.BM")?;
//! println!("{}x{} pixels", bm.width(), bm.height());
//! let raw = bm.to_bytes_with(Compression::None)?;
//! # Ok(())
//! # }
//! ```

pub mod file;

/// `use jedi_types::prelude::*;` to import commonly used items.
pub mod prelude;
