//! `.BM` texture bitmap support.
//!
//! BM files hold a single indexed-color cell behind a 32-byte header:
//!
//! ```text
//! Offset  Size  Field        Description
//! ------  ----  -----------  -----------------------------------------
//! 0x00    4     magic        "BM \x1E"
//! 0x04    2     width        Width in pixels
//! 0x06    2     height       Height in pixels
//! 0x08    2     idem_x       Copy of width
//! 0x0A    2     idem_y       Copy of height
//! 0x0C    1     flags        0x36 opaque, 0x3E transparent, 0x08 weapon
//! 0x0D    1     log_size_y   log2(height) when height is a power of two
//! 0x0E    2     compression  0 none, 1 RLE, 2 RLE0
//! 0x10    4     data_size    Payload bytes after the header
//! 0x14    12    pad
//! 0x20    -     payload      Cell payload (see [`crate::file::cell`])
//! ```
//!
//! Saving recomputes every derived header field from the live cell and
//! picks the cheapest compression unless one is requested explicitly.

use std::io::Read;

use crate::file::cell::{self, Cell, Compression};
use crate::file::warning::{self, Warning};
use crate::file::{FileType, JediFileError, TypedFile};

/// BM file constants.
pub mod constants {
	/// Magic bytes, "BM" followed by 0x20 0x1E
	pub const MAGIC: [u8; 4] = *b"BM \x1E";

	/// Size of the header in bytes
	pub const HEADER_SIZE: usize = 32;

	/// Flags value for an ordinary opaque texture
	pub const FLAG_OPAQUE: u8 = 0x36;

	/// Flags value marking palette index 0 as transparent
	pub const FLAG_TRANSPARENT: u8 = 0x3E;

	/// Flags value used by weapon overlay art
	pub const FLAG_WEAPON: u8 = 0x08;
}

/// A decoded BM texture bitmap.
#[derive(Debug, Clone)]
pub struct File {
	flags: u8,
	cell: Cell,
	warnings: Vec<Warning>,
}

impl File {
	/// Creates an opaque bitmap from a cell.
	pub fn new(cell: Cell) -> Self {
		Self::with_flags(cell, constants::FLAG_OPAQUE)
	}

	/// Creates a bitmap with an explicit flags byte.
	pub fn with_flags(cell: Cell, flags: u8) -> Self {
		Self {
			flags,
			cell,
			warnings: Vec::new(),
		}
	}

	/// Opens a BM file from the specified path.
	pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, JediFileError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(&data)
	}

	/// Loads a BM file from any reader.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, JediFileError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::from_bytes(&data)
	}

	/// Loads a BM file from a byte slice.
	///
	/// # Errors
	///
	/// Returns an error on bad magic, a header shorter than 32 bytes, an
	/// unknown compression discriminant, or a payload shorter than the
	/// declared data size. Mismatched mirror fields and trailing bytes are
	/// reported as warnings.
	pub fn from_bytes(data: &[u8]) -> Result<Self, JediFileError> {
		if data.len() < constants::HEADER_SIZE {
			return Err(JediFileError::insufficient_data(
				FileType::Bm,
				constants::HEADER_SIZE,
				data.len(),
			));
		}

		let magic: [u8; 4] = data[0..4].try_into()?;
		if magic != constants::MAGIC {
			return Err(JediFileError::invalid_magic(FileType::Bm, &constants::MAGIC, &magic));
		}

		let mut warnings = Vec::new();

		let width = u16::from_le_bytes(data[4..6].try_into()?) as u32;
		let height = u16::from_le_bytes(data[6..8].try_into()?) as u32;
		let idem_x = u16::from_le_bytes(data[8..10].try_into()?) as u32;
		let idem_y = u16::from_le_bytes(data[10..12].try_into()?) as u32;
		let flags = data[12];
		let log_size_y = data[13];
		let compression_raw = u16::from_le_bytes(data[14..16].try_into()?);
		let data_size = u32::from_le_bytes(data[16..20].try_into()?) as usize;

		if idem_x != width || idem_y != height {
			warning::push(
				&mut warnings,
				8,
				format!("size mirror {idem_x}x{idem_y} disagrees with {width}x{height}"),
			);
		}
		if height.is_power_of_two() && u32::from(log_size_y) != height.trailing_zeros() {
			warning::push(
				&mut warnings,
				13,
				format!("log2 height field {log_size_y} disagrees with height {height}"),
			);
		}

		let compression = Compression::from_u32(FileType::Bm, u32::from(compression_raw))?;

		let remaining = data.len() - constants::HEADER_SIZE;
		if data_size > remaining {
			return Err(JediFileError::insufficient_data(
				FileType::Bm,
				constants::HEADER_SIZE + data_size,
				data.len(),
			));
		}
		if data_size < remaining {
			warning::push(
				&mut warnings,
				(constants::HEADER_SIZE + data_size) as u64,
				format!("{} trailing bytes after the declared payload", remaining - data_size),
			);
		}

		let payload = &data[constants::HEADER_SIZE..constants::HEADER_SIZE + data_size];
		let cell = cell::decode(
			FileType::Bm,
			width,
			height,
			compression,
			payload,
			constants::HEADER_SIZE as u64,
			&mut warnings,
		)?;

		Ok(Self {
			flags,
			cell,
			warnings,
		})
	}

	/// Serializes with the cheapest compression strategy.
	pub fn to_bytes(&self) -> Result<Vec<u8>, JediFileError> {
		let (compression, payload) = cell::encode(&self.cell);
		self.assemble(compression, &payload)
	}

	/// Serializes with an explicitly chosen compression strategy.
	pub fn to_bytes_with(&self, compression: Compression) -> Result<Vec<u8>, JediFileError> {
		let payload = cell::encode_with(&self.cell, compression);
		self.assemble(compression, &payload)
	}

	fn assemble(&self, compression: Compression, payload: &[u8]) -> Result<Vec<u8>, JediFileError> {
		let width = self.check_dimension(self.cell.width())?;
		let height = self.check_dimension(self.cell.height())?;

		let log_size_y = if self.cell.height().is_power_of_two() {
			self.cell.height().trailing_zeros() as u8
		} else {
			0
		};

		let mut bytes = Vec::with_capacity(constants::HEADER_SIZE + payload.len());
		bytes.extend_from_slice(&constants::MAGIC);
		bytes.extend_from_slice(&width.to_le_bytes());
		bytes.extend_from_slice(&height.to_le_bytes());
		bytes.extend_from_slice(&width.to_le_bytes());
		bytes.extend_from_slice(&height.to_le_bytes());
		bytes.push(self.flags);
		bytes.push(log_size_y);
		bytes.extend_from_slice(&(compression as u16).to_le_bytes());
		bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
		bytes.extend_from_slice(&[0u8; 12]);
		bytes.extend_from_slice(payload);

		Ok(bytes)
	}

	fn check_dimension(&self, dimension: u32) -> Result<u16, JediFileError> {
		u16::try_from(dimension).map_err(|_| JediFileError::DimensionTooLarge {
			file_type: FileType::Bm,
			dimension,
			max: u32::from(u16::MAX),
		})
	}

	/// Saves the bitmap to disk.
	pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), JediFileError> {
		std::fs::write(path, self.to_bytes()?)?;
		Ok(())
	}

	/// The image cell.
	pub fn cell(&self) -> &Cell {
		&self.cell
	}

	/// Mutable access to the image cell.
	pub fn cell_mut(&mut self) -> &mut Cell {
		&mut self.cell
	}

	/// The raw flags byte.
	pub fn flags(&self) -> u8 {
		self.flags
	}

	/// Replaces the flags byte.
	pub fn set_flags(&mut self, flags: u8) {
		self.flags = flags;
	}

	/// Whether palette index 0 is treated as transparent.
	pub fn is_transparent(&self) -> bool {
		self.flags == constants::FLAG_TRANSPARENT
	}

	/// Bitmap width in pixels.
	pub fn width(&self) -> u32 {
		self.cell.width()
	}

	/// Bitmap height in pixels.
	pub fn height(&self) -> u32 {
		self.cell.height()
	}

	/// Warnings accumulated by the load that produced this value.
	pub fn warnings(&self) -> &[Warning] {
		&self.warnings
	}
}

impl TypedFile for File {
	const FILE_TYPE: FileType = FileType::Bm;

	fn from_bytes(data: &[u8]) -> Result<Self, JediFileError> {
		Self::from_bytes(data)
	}

	fn to_bytes(&self) -> Result<Vec<u8>, JediFileError> {
		self.to_bytes()
	}

	fn warnings(&self) -> &[Warning] {
		self.warnings()
	}
}

impl std::fmt::Display for File {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "BM {}x{}, flags {:#04X}", self.width(), self.height(), self.flags)
	}
}
