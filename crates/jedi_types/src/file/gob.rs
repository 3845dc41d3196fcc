//! `.GOB` flat archive container support.
//!
//! GOB files bundle many named resources in one flat payload with a
//! trailing directory:
//!
//! ```text
//! Offset  Size  Field          Description
//! ------  ----  -------------  ----------------------------------------
//! 0x00    4     magic          "GOB\n" (0x0A424F47 little-endian)
//! 0x04    4     footer_offset  Absolute offset of the directory
//! 0x08    -     payload        Entry bytes, back to back
//! footer  4     count          Number of directory records
//!         21×N  records        u32 offset, u32 size, char[13] name
//! ```
//!
//! Names are NUL-padded to 13 bytes with at most 12 visible characters,
//! enforced when writing. Because the directory trails the payload, a
//! forward-only source cannot serve random access; two load modes cover
//! both situations:
//!
//! - **cached** ([`File`]): the whole archive is buffered and every entry
//!   owns its bytes,
//! - **streaming** ([`Reader`]): the directory is parsed eagerly, entry
//!   bytes are fetched on demand through a caller-supplied seekable
//!   stream. The reader borrows the stream for its lifetime and never
//!   closes it; callers must not reposition it between calls.
//!
//! Duplicate names are legal: `add` simply appends another record and
//! lookups return the first match in directory order.
//!
//! # Examples
//!
//! ```
//! use jedi_types::file::gob;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut archive = gob::File::new();
//! archive.add("WALL.BM", vec![1, 2, 3])?;
//!
//! let bytes = archive.to_bytes()?;
//! let loaded = gob::File::from_bytes(&bytes)?;
//! assert_eq!(loaded.get("wall.bm").unwrap().data(), &[1, 2, 3]);
//! # Ok(())
//! # }
//! ```

use std::io::{Read, Seek, SeekFrom};

use crate::file::warning::{self, Warning};
use crate::file::{FileType, JediFileError};

/// GOB file constants.
pub mod constants {
	/// Magic bytes, "GOB" followed by a line feed
	pub const MAGIC: [u8; 4] = *b"GOB\x0A";

	/// Size of the file header in bytes
	pub const HEADER_SIZE: usize = 8;

	/// Size of a directory record in bytes
	pub const RECORD_SIZE: usize = 21;

	/// Width of the NUL-padded name field
	pub const NAME_FIELD: usize = 13;

	/// Maximum visible characters in an entry name
	pub const NAME_MAX: usize = 12;
}

fn check_name(name: &str) -> Result<(), JediFileError> {
	if name.len() > constants::NAME_MAX {
		return Err(JediFileError::NameTooLong {
			file_type: FileType::Gob,
			name: name.to_string(),
			max: constants::NAME_MAX,
		});
	}
	Ok(())
}

fn parse_name(raw: &[u8], position: u64, warnings: &mut Vec<Warning>) -> String {
	let visible = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
	if visible > constants::NAME_MAX {
		warning::push(
			warnings,
			position,
			format!("entry name occupies all {} bytes, truncating", raw.len()),
		);
	}
	String::from_utf8_lossy(&raw[..visible.min(constants::NAME_MAX)]).into_owned()
}

/// A named entry owning its payload bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
	name: String,
	data: Vec<u8>,
}

impl Entry {
	/// Creates an entry, validating the name length.
	pub fn new(name: impl Into<String>, data: Vec<u8>) -> Result<Self, JediFileError> {
		let name = name.into();
		check_name(&name)?;
		Ok(Self {
			name,
			data,
		})
	}

	/// Entry name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Entry payload bytes.
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	/// Entry payload size in bytes.
	pub fn size(&self) -> usize {
		self.data.len()
	}
}

/// Directory record of a streamed archive: name plus payload location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct DirEntry {
	/// Entry name.
	pub name: String,
	/// Absolute payload offset within the archive.
	pub offset: u32,
	/// Payload size in bytes.
	pub size: u32,
}

/// A fully cached GOB archive.
#[derive(Debug, Clone)]
pub struct File {
	entries: Vec<Entry>,
	warnings: Vec<Warning>,
}

impl File {
	/// Creates an empty archive.
	pub fn new() -> Self {
		Self {
			entries: Vec::new(),
			warnings: Vec::new(),
		}
	}

	/// Opens a GOB file from the specified path.
	pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, JediFileError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(&data)
	}

	/// Loads a GOB file from any reader, buffering the whole payload.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, JediFileError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::from_bytes(&data)
	}

	/// Loads a GOB file from a byte slice.
	///
	/// Entries are cached in directory order regardless of their payload
	/// order. A directory that claims more records than fit in the file is
	/// a warning (the readable prefix is kept); a record whose payload
	/// lies outside the file is a hard error.
	pub fn from_bytes(data: &[u8]) -> Result<Self, JediFileError> {
		let mut warnings = Vec::new();
		let directory = parse_directory(data, &mut warnings)?;

		let mut entries = Vec::with_capacity(directory.len());
		for record in directory {
			let start = record.offset as usize;
			let end = start + record.size as usize;
			entries.push(Entry {
				name: record.name,
				data: data[start..end].to_vec(),
			});
		}

		Ok(Self {
			entries,
			warnings,
		})
	}

	/// Appends an entry.
	///
	/// A name already present is *not* replaced: the new entry is appended
	/// and lookups keep returning the earlier one.
	///
	/// # Errors
	///
	/// Returns [`JediFileError::NameTooLong`] for names over 12 characters.
	pub fn add(&mut self, name: impl Into<String>, data: Vec<u8>) -> Result<(), JediFileError> {
		self.entries.push(Entry::new(name, data)?);
		Ok(())
	}

	/// Finds an entry by name, case-insensitively. First match wins.
	pub fn get(&self, name: &str) -> Option<&Entry> {
		self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name))
	}

	/// All entries in directory order.
	pub fn entries(&self) -> &[Entry] {
		&self.entries
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the archive holds no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Serializes the archive.
	///
	/// The footer offset and every entry offset are recomputed from a
	/// running total of live entry sizes; nothing is carried over from a
	/// previous load.
	pub fn to_bytes(&self) -> Result<Vec<u8>, JediFileError> {
		for entry in &self.entries {
			check_name(&entry.name)?;
		}

		let payload_size: usize = self.entries.iter().map(Entry::size).sum();
		let footer_offset = constants::HEADER_SIZE + payload_size;
		let total = footer_offset + 4 + self.entries.len() * constants::RECORD_SIZE;

		let mut bytes = Vec::with_capacity(total);
		bytes.extend_from_slice(&constants::MAGIC);
		bytes.extend_from_slice(&(footer_offset as u32).to_le_bytes());

		for entry in &self.entries {
			bytes.extend_from_slice(&entry.data);
		}

		bytes.extend_from_slice(&(self.entries.len() as u32).to_le_bytes());
		let mut offset = constants::HEADER_SIZE as u32;
		for entry in &self.entries {
			bytes.extend_from_slice(&offset.to_le_bytes());
			bytes.extend_from_slice(&(entry.size() as u32).to_le_bytes());
			let mut name = [0u8; constants::NAME_FIELD];
			name[..entry.name.len()].copy_from_slice(entry.name.as_bytes());
			bytes.extend_from_slice(&name);
			offset += entry.size() as u32;
		}

		Ok(bytes)
	}

	/// Saves the archive to disk.
	pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), JediFileError> {
		std::fs::write(path, self.to_bytes()?)?;
		Ok(())
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

impl std::fmt::Display for File {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "GOB archive, {} entries", self.entries.len())
	}
}

fn parse_directory(data: &[u8], warnings: &mut Vec<Warning>) -> Result<Vec<DirEntry>, JediFileError> {
	if data.len() < constants::HEADER_SIZE {
		return Err(JediFileError::insufficient_data(
			FileType::Gob,
			constants::HEADER_SIZE,
			data.len(),
		));
	}

	let magic: [u8; 4] = data[0..4].try_into()?;
	if magic != constants::MAGIC {
		return Err(JediFileError::invalid_magic(FileType::Gob, &constants::MAGIC, &magic));
	}

	let footer_offset = u32::from_le_bytes(data[4..8].try_into()?) as usize;
	if footer_offset + 4 > data.len() {
		return Err(JediFileError::offset_out_of_bounds(
			FileType::Gob,
			footer_offset as u64,
			data.len() as u64,
		));
	}

	let declared = u32::from_le_bytes(data[footer_offset..footer_offset + 4].try_into()?) as usize;
	let available = (data.len() - footer_offset - 4) / constants::RECORD_SIZE;
	let count = if declared > available {
		warning::push(
			warnings,
			footer_offset as u64,
			format!("directory declares {declared} records, only {available} fit"),
		);
		available
	} else {
		declared
	};

	let mut directory = Vec::with_capacity(count);
	for i in 0..count {
		let record = footer_offset + 4 + i * constants::RECORD_SIZE;
		let offset = u32::from_le_bytes(data[record..record + 4].try_into()?);
		let size = u32::from_le_bytes(data[record + 4..record + 8].try_into()?);
		let name =
			parse_name(&data[record + 8..record + 8 + constants::NAME_FIELD], record as u64, warnings);

		let end = offset as u64 + u64::from(size);
		if end > data.len() as u64 {
			return Err(JediFileError::offset_out_of_bounds(
				FileType::Gob,
				end,
				data.len() as u64,
			));
		}

		directory.push(DirEntry {
			name,
			offset,
			size,
		});
	}

	Ok(directory)
}

/// A GOB archive served lazily from a caller-owned seekable stream.
///
/// The directory is parsed eagerly at open; entry bytes are fetched with a
/// seek and an exact-size read on demand. Offsets are resolved against the
/// stream position the archive started at, so a GOB embedded inside a
/// larger stream works as long as the stream is positioned at its start
/// when [`Reader::open`] is called.
#[derive(Debug)]
pub struct Reader<R> {
	reader: R,
	base: u64,
	directory: Vec<DirEntry>,
	warnings: Vec<Warning>,
}

impl<R: Read + Seek> Reader<R> {
	/// Opens an archive from a stream positioned at the GOB header.
	pub fn open(mut reader: R) -> Result<Self, JediFileError> {
		let base = reader.stream_position()?;
		let end = reader.seek(SeekFrom::End(0))?;
		let len = end - base;

		let mut warnings = Vec::new();

		let mut header = [0u8; constants::HEADER_SIZE];
		reader.seek(SeekFrom::Start(base))?;
		reader.read_exact(&mut header).map_err(|_| {
			JediFileError::insufficient_data(FileType::Gob, constants::HEADER_SIZE, len as usize)
		})?;

		let magic: [u8; 4] = header[0..4].try_into()?;
		if magic != constants::MAGIC {
			return Err(JediFileError::invalid_magic(FileType::Gob, &constants::MAGIC, &magic));
		}

		let footer_offset = u64::from(u32::from_le_bytes(header[4..8].try_into()?));
		if footer_offset + 4 > len {
			return Err(JediFileError::offset_out_of_bounds(FileType::Gob, footer_offset, len));
		}

		reader.seek(SeekFrom::Start(base + footer_offset))?;
		let mut count_bytes = [0u8; 4];
		reader.read_exact(&mut count_bytes)?;
		let declared = u32::from_le_bytes(count_bytes) as usize;
		let available = ((len - footer_offset - 4) / constants::RECORD_SIZE as u64) as usize;
		let count = if declared > available {
			warning::push(
				&mut warnings,
				footer_offset,
				format!("directory declares {declared} records, only {available} fit"),
			);
			available
		} else {
			declared
		};

		let mut records = vec![0u8; count * constants::RECORD_SIZE];
		reader.read_exact(&mut records)?;

		let mut directory = Vec::with_capacity(count);
		for i in 0..count {
			let record = &records[i * constants::RECORD_SIZE..(i + 1) * constants::RECORD_SIZE];
			let offset = u32::from_le_bytes(record[0..4].try_into()?);
			let size = u32::from_le_bytes(record[4..8].try_into()?);
			let position = footer_offset + 4 + (i * constants::RECORD_SIZE) as u64;
			let name = parse_name(&record[8..8 + constants::NAME_FIELD], position, &mut warnings);

			let entry_end = u64::from(offset) + u64::from(size);
			if entry_end > len {
				return Err(JediFileError::offset_out_of_bounds(FileType::Gob, entry_end, len));
			}

			directory.push(DirEntry {
				name,
				offset,
				size,
			});
		}

		Ok(Self {
			reader,
			base,
			directory,
			warnings,
		})
	}

	/// Reads an entry's bytes by name, case-insensitively. First match wins.
	pub fn read(&mut self, name: &str) -> Result<Option<Vec<u8>>, JediFileError> {
		let Some(index) = self.directory.iter().position(|e| e.name.eq_ignore_ascii_case(name))
		else {
			return Ok(None);
		};
		self.read_index(index).map(Some)
	}

	/// Reads an entry's bytes by directory index.
	///
	/// # Panics
	///
	/// Panics when `index` is past the directory.
	pub fn read_index(&mut self, index: usize) -> Result<Vec<u8>, JediFileError> {
		let entry = &self.directory[index];
		self.reader.seek(SeekFrom::Start(self.base + u64::from(entry.offset)))?;
		let mut data = vec![0u8; entry.size as usize];
		self.reader.read_exact(&mut data)?;
		Ok(data)
	}

	/// The parsed directory, in record order.
	pub fn directory(&self) -> &[DirEntry] {
		&self.directory
	}

	/// Warnings accumulated while parsing the directory.
	pub fn warnings(&self) -> &[Warning] {
		&self.warnings
	}

	/// Releases the underlying stream without closing it.
	pub fn into_inner(self) -> R {
		self.reader
	}
}
