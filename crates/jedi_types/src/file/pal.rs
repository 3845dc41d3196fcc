//! `.PAL` 256-color VGA palette support.
//!
//! A PAL file is exactly 768 bytes: 256 RGB triples with 6-bit VGA
//! components (0-63). Components are kept at their 6-bit values in memory
//! so a load/save cycle is byte-exact; [`Color::to_rgb8`] widens them for
//! display.

use std::io::Read;

use crate::file::warning::{self, Warning};
use crate::file::{FileType, JediFileError, TypedFile};

/// PAL file constants.
pub mod constants {
	/// Number of palette entries
	pub const COLOR_COUNT: usize = 256;

	/// Exact file size in bytes
	pub const FILE_SIZE: usize = COLOR_COUNT * 3;

	/// Largest valid 6-bit component value
	pub const COMPONENT_MAX: u8 = 63;
}

/// An RGB color with 6-bit VGA components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
	/// Red component (0-63)
	pub r: u8,
	/// Green component (0-63)
	pub g: u8,
	/// Blue component (0-63)
	pub b: u8,
}

impl Color {
	/// Creates a color, masking each component to 6 bits.
	pub const fn new(r: u8, g: u8, b: u8) -> Self {
		Self {
			r: r & constants::COMPONENT_MAX,
			g: g & constants::COMPONENT_MAX,
			b: b & constants::COMPONENT_MAX,
		}
	}

	/// Widens the 6-bit components to 8 bits.
	pub const fn to_rgb8(self) -> (u8, u8, u8) {
		((self.r << 2) | (self.r >> 4), (self.g << 2) | (self.g >> 4), (self.b << 2) | (self.b >> 4))
	}
}

impl std::fmt::Display for Color {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "RGB6({}, {}, {})", self.r, self.g, self.b)
	}
}

/// A decoded 256-color palette.
#[derive(Debug, Clone)]
pub struct File {
	colors: [Color; constants::COLOR_COUNT],
	warnings: Vec<Warning>,
}

impl File {
	/// Creates an all-black palette.
	pub fn new() -> Self {
		Self {
			colors: [Color::default(); constants::COLOR_COUNT],
			warnings: Vec::new(),
		}
	}

	/// Opens a PAL file from the specified path.
	pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, JediFileError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(&data)
	}

	/// Loads a PAL file from any reader.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, JediFileError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::from_bytes(&data)
	}

	/// Loads a PAL file from a byte slice.
	///
	/// A short file is a hard error; trailing bytes and out-of-range
	/// components are warnings (components are masked to 6 bits).
	pub fn from_bytes(data: &[u8]) -> Result<Self, JediFileError> {
		if data.len() < constants::FILE_SIZE {
			return Err(JediFileError::insufficient_data(
				FileType::Pal,
				constants::FILE_SIZE,
				data.len(),
			));
		}

		let mut warnings = Vec::new();
		if data.len() > constants::FILE_SIZE {
			warning::push(
				&mut warnings,
				constants::FILE_SIZE as u64,
				format!("{} trailing bytes after the palette", data.len() - constants::FILE_SIZE),
			);
		}

		let mut colors = [Color::default(); constants::COLOR_COUNT];
		let mut clipped = false;
		for (i, color) in colors.iter_mut().enumerate() {
			let offset = i * 3;
			let (r, g, b) = (data[offset], data[offset + 1], data[offset + 2]);
			if !clipped && (r | g | b) > constants::COMPONENT_MAX {
				warning::push(
					&mut warnings,
					offset as u64,
					format!("component above 63 at entry {i}, masking to 6 bits"),
				);
				clipped = true;
			}
			*color = Color::new(r, g, b);
		}

		Ok(Self {
			colors,
			warnings,
		})
	}

	/// Serializes the palette to its exact 768-byte form.
	pub fn to_bytes(&self) -> Result<Vec<u8>, JediFileError> {
		let mut bytes = Vec::with_capacity(constants::FILE_SIZE);
		for color in &self.colors {
			bytes.push(color.r);
			bytes.push(color.g);
			bytes.push(color.b);
		}
		Ok(bytes)
	}

	/// Saves the palette to disk.
	pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), JediFileError> {
		std::fs::write(path, self.to_bytes()?)?;
		Ok(())
	}

	/// All 256 colors.
	pub fn colors(&self) -> &[Color; constants::COLOR_COUNT] {
		&self.colors
	}

	/// Mutable access to the colors.
	pub fn colors_mut(&mut self) -> &mut [Color; constants::COLOR_COUNT] {
		&mut self.colors
	}

	/// A single color by palette index.
	pub fn color(&self, index: u8) -> Color {
		self.colors[index as usize]
	}

	/// Warnings accumulated by the load that produced this value.
	pub fn warnings(&self) -> &[Warning] {
		&self.warnings
	}
}

impl Default for File {
	fn default() -> Self {
		Self::new()
	}
}

impl TypedFile for File {
	const FILE_TYPE: FileType = FileType::Pal;

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
