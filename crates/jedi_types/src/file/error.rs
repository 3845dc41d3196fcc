//! Error types for file format parsing and manipulation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifies which file format an error or warning originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
	/// GOB flat archive container
	Gob,
	/// LFD directory-first archive container
	Lfd,
	/// BM texture bitmap
	Bm,
	/// FME single sprite frame
	Fme,
	/// WAX composite sprite
	Wax,
	/// PAL 256-color VGA palette
	Pal,
	/// PLTT Landru palette resource
	Pltt,
	/// DELT Landru delta image
	Delt,
	/// Opaque raw resource
	Raw,
}

impl std::fmt::Display for FileType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			FileType::Gob => "GOB",
			FileType::Lfd => "LFD",
			FileType::Bm => "BM",
			FileType::Fme => "FME",
			FileType::Wax => "WAX",
			FileType::Pal => "PAL",
			FileType::Pltt => "PLTT",
			FileType::Delt => "DELT",
			FileType::Raw => "RAW",
		};
		write!(f, "{name}")
	}
}

/// Unified error type for all file formats.
///
/// Only unrecoverable conditions become errors: a bad magic number, a stream
/// too short for a mandatory header, or an offset pointing outside the data.
/// Recoverable anomalies are reported through per-file warning lists instead.
#[derive(Debug, Error)]
pub enum JediFileError {
	/// Not enough data to parse a mandatory structure
	#[error("{file_type}: insufficient data: expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Format being parsed
		file_type: FileType,
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Invalid magic number or type tag
	#[error("{file_type}: invalid magic: expected {expected:02X?}, got {actual:02X?}")]
	InvalidMagic {
		/// Format being parsed
		file_type: FileType,
		/// Expected magic bytes
		expected: [u8; 4],
		/// Actual magic bytes
		actual: [u8; 4],
	},

	/// A stored offset points outside the available data
	#[error("{file_type}: offset {offset} out of bounds (data length {len})")]
	OffsetOutOfBounds {
		/// Format being parsed
		file_type: FileType,
		/// Offending offset
		offset: u64,
		/// Length of the addressable data
		len: u64,
	},

	/// An entry name exceeds the format's fixed field width
	#[error("{file_type}: name '{name}' exceeds {max} characters")]
	NameTooLong {
		/// Format being written
		file_type: FileType,
		/// Offending name
		name: String,
		/// Maximum visible characters
		max: usize,
	},

	/// A slot index lies outside the format's fixed slot table
	#[error("{file_type}: slot {slot} out of range (max {max})")]
	SlotOutOfRange {
		/// Format being manipulated
		file_type: FileType,
		/// Requested slot
		slot: usize,
		/// Number of available slots
		max: usize,
	},

	/// More references than the fixed slot table can hold
	#[error("{file_type}: {count} entries exceed the {max}-slot table")]
	TooManySlots {
		/// Format being written
		file_type: FileType,
		/// Actual number of entries
		count: usize,
		/// Number of available slots
		max: usize,
	},

	/// Pixel buffer length does not match the declared dimensions
	#[error("{file_type}: pixel count mismatch: {width}x{height} needs {expected}, got {actual}")]
	PixelCountMismatch {
		/// Format being manipulated
		file_type: FileType,
		/// Declared width
		width: u32,
		/// Declared height
		height: u32,
		/// Expected pixel count
		expected: usize,
		/// Actual pixel count
		actual: usize,
	},

	/// Unknown compression discriminant in a cell header
	#[error("{file_type}: unsupported compression type {compression}")]
	UnsupportedCompression {
		/// Format being parsed
		file_type: FileType,
		/// Raw discriminant found on disk
		compression: u32,
	},

	/// A run stream contains a control byte that makes no progress
	#[error("{file_type}: corrupt run stream at byte {position:#X}")]
	CorruptRunStream {
		/// Format being parsed
		file_type: FileType,
		/// Absolute byte position of the offending control byte
		position: u64,
	},

	/// A dimension exceeds the format's fixed field width
	#[error("{file_type}: dimension {dimension} exceeds the format maximum {max}")]
	DimensionTooLarge {
		/// Format being written
		file_type: FileType,
		/// Offending dimension
		dimension: u32,
		/// Largest representable value
		max: u32,
	},

	/// Slice conversion error
	#[error(transparent)]
	TryFromSlice(#[from] std::array::TryFromSliceError),

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}

impl JediFileError {
	/// Shorthand for [`JediFileError::InsufficientData`].
	pub fn insufficient_data(file_type: FileType, expected: usize, actual: usize) -> Self {
		Self::InsufficientData {
			file_type,
			expected,
			actual,
		}
	}

	/// Shorthand for [`JediFileError::InvalidMagic`].
	pub fn invalid_magic(file_type: FileType, expected: &[u8; 4], actual: &[u8; 4]) -> Self {
		Self::InvalidMagic {
			file_type,
			expected: *expected,
			actual: *actual,
		}
	}

	/// Shorthand for [`JediFileError::OffsetOutOfBounds`].
	pub fn offset_out_of_bounds(file_type: FileType, offset: u64, len: u64) -> Self {
		Self::OffsetOutOfBounds {
			file_type,
			offset,
			len,
		}
	}
}
