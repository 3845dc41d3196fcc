//! `.FME` single sprite frame support.
//!
//! An FME file is one sprite frame: an anchor point, a horizontal-flip flag,
//! and a pointer to a cell record. The pointer exists so that several frame
//! headers in one buffer can share a cell; the standalone file form holds
//! exactly one frame followed by its cell.
//!
//! ```text
//! Offset  Size  Field        Description
//! ------  ----  -----------  -----------------------------------------
//! 0x00    4     insert_x     Anchor X (signed, usually negative)
//! 0x04    4     insert_y     Anchor Y (signed, usually negative)
//! 0x08    4     flip         1 = mirrored horizontally
//! 0x0C    4     cell_offset  Absolute offset of the cell record
//! 0x10    16    pad
//! 0x20    -     cell record  See [`crate::file::cell`]
//! ```
//!
//! Frame cells never use plain RLE; saving picks RLE0 when it beats raw.

use std::io::Read;

use crate::file::cell::{self, Cell};
use crate::file::warning::{self, Warning};
use crate::file::{FileType, JediFileError, TypedFile};

/// FME file constants.
pub mod constants {
	/// Size of the frame header in bytes
	pub const HEADER_SIZE: usize = 32;
}

/// A decoded FME sprite frame.
#[derive(Debug, Clone)]
pub struct File {
	insert_x: i32,
	insert_y: i32,
	flipped: bool,
	cell: Cell,
	warnings: Vec<Warning>,
}

impl File {
	/// Creates a frame from an anchor point, flip flag and cell.
	pub fn new(insert_x: i32, insert_y: i32, flipped: bool, cell: Cell) -> Self {
		Self {
			insert_x,
			insert_y,
			flipped,
			cell,
			warnings: Vec::new(),
		}
	}

	/// Opens an FME file from the specified path.
	pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, JediFileError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(&data)
	}

	/// Loads an FME file from any reader.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, JediFileError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::from_bytes(&data)
	}

	/// Loads an FME file from a byte slice.
	pub fn from_bytes(data: &[u8]) -> Result<Self, JediFileError> {
		if data.len() < constants::HEADER_SIZE {
			return Err(JediFileError::insufficient_data(
				FileType::Fme,
				constants::HEADER_SIZE,
				data.len(),
			));
		}

		let mut warnings = Vec::new();

		let insert_x = i32::from_le_bytes(data[0..4].try_into()?);
		let insert_y = i32::from_le_bytes(data[4..8].try_into()?);
		let flip = u32::from_le_bytes(data[8..12].try_into()?);
		let cell_offset = u32::from_le_bytes(data[12..16].try_into()?) as usize;

		if flip > 1 {
			warning::push(&mut warnings, 8, format!("flip flag {flip} is not 0 or 1"));
		}

		let cell = cell::read_record(FileType::Fme, data, cell_offset, &mut warnings)?;

		Ok(Self {
			insert_x,
			insert_y,
			flipped: flip != 0,
			cell,
			warnings,
		})
	}

	/// Serializes the frame, cell record at offset 32.
	pub fn to_bytes(&self) -> Result<Vec<u8>, JediFileError> {
		let mut bytes = Vec::new();
		bytes.extend_from_slice(&self.insert_x.to_le_bytes());
		bytes.extend_from_slice(&self.insert_y.to_le_bytes());
		bytes.extend_from_slice(&u32::from(self.flipped).to_le_bytes());
		bytes.extend_from_slice(&(constants::HEADER_SIZE as u32).to_le_bytes());
		bytes.extend_from_slice(&[0u8; 16]);
		cell::write_record(&self.cell, &mut bytes);
		Ok(bytes)
	}

	/// Saves the frame to disk.
	pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), JediFileError> {
		std::fs::write(path, self.to_bytes()?)?;
		Ok(())
	}

	/// Anchor X coordinate.
	pub fn insert_x(&self) -> i32 {
		self.insert_x
	}

	/// Anchor Y coordinate.
	pub fn insert_y(&self) -> i32 {
		self.insert_y
	}

	/// Whether the frame is mirrored horizontally.
	pub fn flipped(&self) -> bool {
		self.flipped
	}

	/// The frame's cell.
	pub fn cell(&self) -> &Cell {
		&self.cell
	}

	/// Mutable access to the frame's cell.
	pub fn cell_mut(&mut self) -> &mut Cell {
		&mut self.cell
	}

	/// Warnings accumulated by the load that produced this value.
	pub fn warnings(&self) -> &[Warning] {
		&self.warnings
	}
}

impl TypedFile for File {
	const FILE_TYPE: FileType = FileType::Fme;

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
		write!(
			f,
			"FME {}x{} @ ({}, {}){}",
			self.cell.width(),
			self.cell.height(),
			self.insert_x,
			self.insert_y,
			if self.flipped {
				", flipped"
			} else {
				""
			}
		)
	}
}
