//! Closed decoder dispatch for archive entries.
//!
//! Archives carry opaque byte payloads; what decodes them is decided by
//! the entry name's extension (GOB) or the four-character type tag (LFD).
//! The mapping is a closed sum type resolved at compile time; unknown
//! names fall back to [`raw::File`] so any archive remains walkable.

use crate::file::warning::Warning;
use crate::file::{FileType, JediFileError, TypedFile};
use crate::file::{bm, delt, fme, pal, pltt, raw, wax};

/// A decoded archive entry.
#[derive(Debug, Clone)]
pub enum Asset {
	/// A BM texture bitmap
	Bitmap(bm::File),
	/// An FME sprite frame
	Frame(fme::File),
	/// A WAX composite sprite
	Sprite(wax::File),
	/// A PAL VGA palette
	Palette(pal::File),
	/// A PLTT Landru palette range
	LandruPalette(pltt::File),
	/// A DELT delta image
	Delta(delt::File),
	/// Anything without a known decoder
	Raw(raw::File),
}

impl Asset {
	/// Decodes a GOB-style entry, dispatching on the filename extension.
	///
	/// # Errors
	///
	/// Propagates the decoder's hard errors; callers walking an archive
	/// are expected to catch per entry and continue with the rest.
	pub fn from_named_bytes(name: &str, data: &[u8]) -> Result<Self, JediFileError> {
		let extension = name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
		match extension.to_ascii_uppercase().as_str() {
			"BM" => Ok(Self::Bitmap(bm::File::from_bytes(data)?)),
			"FME" => Ok(Self::Frame(fme::File::from_bytes(data)?)),
			"WAX" => Ok(Self::Sprite(wax::File::from_bytes(data)?)),
			"PAL" => Ok(Self::Palette(pal::File::from_bytes(data)?)),
			_ => Ok(Self::Raw(raw::File::from_bytes(data)?)),
		}
	}

	/// Decodes an LFD-style entry, dispatching on the resource type tag.
	pub fn from_tagged_bytes(type_tag: &str, data: &[u8]) -> Result<Self, JediFileError> {
		match type_tag.to_ascii_uppercase().as_str() {
			"DELT" => Ok(Self::Delta(delt::File::from_bytes(data)?)),
			"PLTT" => Ok(Self::LandruPalette(pltt::File::from_bytes(data)?)),
			_ => Ok(Self::Raw(raw::File::from_bytes(data)?)),
		}
	}

	/// The format this asset decoded as.
	pub fn file_type(&self) -> FileType {
		match self {
			Asset::Bitmap(_) => FileType::Bm,
			Asset::Frame(_) => FileType::Fme,
			Asset::Sprite(_) => FileType::Wax,
			Asset::Palette(_) => FileType::Pal,
			Asset::LandruPalette(_) => FileType::Pltt,
			Asset::Delta(_) => FileType::Delt,
			Asset::Raw(_) => FileType::Raw,
		}
	}

	/// Serializes the asset back to canonical bytes.
	pub fn to_bytes(&self) -> Result<Vec<u8>, JediFileError> {
		match self {
			Asset::Bitmap(file) => file.to_bytes(),
			Asset::Frame(file) => file.to_bytes(),
			Asset::Sprite(file) => file.to_bytes(),
			Asset::Palette(file) => file.to_bytes(),
			Asset::LandruPalette(file) => file.to_bytes(),
			Asset::Delta(file) => file.to_bytes(),
			Asset::Raw(file) => TypedFile::to_bytes(file),
		}
	}

	/// Warnings accumulated by the load that produced this asset.
	pub fn warnings(&self) -> &[Warning] {
		match self {
			Asset::Bitmap(file) => file.warnings(),
			Asset::Frame(file) => file.warnings(),
			Asset::Sprite(file) => file.warnings(),
			Asset::Palette(file) => file.warnings(),
			Asset::LandruPalette(file) => file.warnings(),
			Asset::Delta(file) => file.warnings(),
			Asset::Raw(file) => TypedFile::warnings(file),
		}
	}
}
