//! `PLTT` Landru palette resource support.
//!
//! PLTT resources live inside LFD archives and describe a contiguous range
//! of palette entries with full 8-bit components:
//!
//! ```text
//! Offset  Size  Field   Description
//! ------  ----  ------  ----------------------------------
//! 0x00    1     first   First palette index covered
//! 0x01    1     last    Last palette index covered
//! 0x02    3×N   colors  RGB triples, N = last - first + 1
//! ```

use std::io::Read;

use crate::file::warning::{self, Warning};
use crate::file::{FileType, JediFileError, TypedFile};

/// A decoded PLTT palette range.
#[derive(Debug, Clone)]
pub struct File {
	first: u8,
	colors: Vec<[u8; 3]>,
	warnings: Vec<Warning>,
}

impl File {
	/// Creates a palette range starting at `first`.
	///
	/// # Errors
	///
	/// Returns [`JediFileError::TooManySlots`] when the range would run
	/// past palette index 255.
	pub fn new(first: u8, colors: Vec<[u8; 3]>) -> Result<Self, JediFileError> {
		let available = 256 - first as usize;
		if colors.len() > available {
			return Err(JediFileError::TooManySlots {
				file_type: FileType::Pltt,
				count: colors.len(),
				max: available,
			});
		}
		Ok(Self {
			first,
			colors,
			warnings: Vec::new(),
		})
	}

	/// Loads a PLTT resource from any reader.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, JediFileError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::from_bytes(&data)
	}

	/// Loads a PLTT resource from a byte slice.
	///
	/// `last < first` is a warning and yields an empty range; a payload
	/// shorter than the declared range is a hard error.
	pub fn from_bytes(data: &[u8]) -> Result<Self, JediFileError> {
		if data.len() < 2 {
			return Err(JediFileError::insufficient_data(FileType::Pltt, 2, data.len()));
		}

		let mut warnings = Vec::new();
		let first = data[0];
		let last = data[1];

		let count = if last < first {
			warning::push(
				&mut warnings,
				0,
				format!("range {first}..{last} is inverted, treating as empty"),
			);
			0
		} else {
			last as usize - first as usize + 1
		};

		let needed = 2 + count * 3;
		if data.len() < needed {
			return Err(JediFileError::insufficient_data(FileType::Pltt, needed, data.len()));
		}
		if data.len() > needed {
			warning::push(
				&mut warnings,
				needed as u64,
				format!("{} trailing bytes after the color range", data.len() - needed),
			);
		}

		let colors = (0..count)
			.map(|i| {
				let offset = 2 + i * 3;
				[data[offset], data[offset + 1], data[offset + 2]]
			})
			.collect();

		Ok(Self {
			first,
			colors,
			warnings,
		})
	}

	/// Serializes the range, recomputing `last` from the live color list.
	pub fn to_bytes(&self) -> Result<Vec<u8>, JediFileError> {
		let available = 256 - self.first as usize;
		if self.colors.len() > available {
			return Err(JediFileError::TooManySlots {
				file_type: FileType::Pltt,
				count: self.colors.len(),
				max: available,
			});
		}

		let last = if self.colors.is_empty() {
			self.first
		} else {
			self.first + (self.colors.len() - 1) as u8
		};

		let mut bytes = Vec::with_capacity(2 + self.colors.len() * 3);
		bytes.push(self.first);
		bytes.push(last);
		for color in &self.colors {
			bytes.extend_from_slice(color);
		}
		Ok(bytes)
	}

	/// First palette index covered.
	pub fn first(&self) -> u8 {
		self.first
	}

	/// The RGB triples in range order.
	pub fn colors(&self) -> &[[u8; 3]] {
		&self.colors
	}

	/// Warnings accumulated by the load that produced this value.
	pub fn warnings(&self) -> &[Warning] {
		&self.warnings
	}
}

impl TypedFile for File {
	const FILE_TYPE: FileType = FileType::Pltt;

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
