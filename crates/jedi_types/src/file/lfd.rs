//! `.LFD` directory-first archive container support.
//!
//! LFD files are the Landru-era resource bundles. Unlike GOB, the
//! directory comes *first*, disguised as a pseudo-entry, and every payload
//! is re-prefixed by a duplicate of its own header:
//!
//! ```text
//! Offset  Size  Field     Description
//! ------  ----  --------  ------------------------------------------
//! 0x00    4     "RMAP"    Directory pseudo-entry type
//! 0x04    8     "resource" Directory pseudo-entry name
//! 0x0C    4     size      count * 16
//! 0x10    16×N  records   char[4] type, char[8] name, u32 size
//!         -     payload   Per entry: duplicate 16-byte header + bytes
//! ```
//!
//! The directory block carries no offsets; an entry's position is the
//! accumulated (header + payload) size of everything before it. That makes
//! the format naturally forward-only friendly: [`File::from_reader`] works
//! on any [`Read`] without seeking, and the lazy [`Reader`] walks entries
//! sequentially, skipping payloads by reading and discarding when the
//! source cannot seek.
//!
//! A duplicated payload header that disagrees with its directory record is
//! a warning; the payload copy decides how many bytes are consumed.
//!
//! # Examples
//!
//! ```
//! use jedi_types::file::lfd;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut archive = lfd::File::new();
//! archive.add("PLTT", "menu", vec![0, 0, 10, 20, 30])?;
//!
//! let bytes = archive.to_bytes()?;
//! let loaded = lfd::File::from_bytes(&bytes)?;
//! assert!(loaded.get("PLTT", "MENU").is_some());
//! # Ok(())
//! # }
//! ```

use std::io::{self, Read};

use crate::file::warning::{self, Warning};
use crate::file::{FileType, JediFileError};

/// LFD file constants.
pub mod constants {
	/// Size of a directory record and of every duplicated payload header
	pub const RECORD_SIZE: usize = 16;

	/// Width of the type tag field
	pub const TYPE_MAX: usize = 4;

	/// Width of the name field
	pub const NAME_MAX: usize = 8;

	/// Type tag of the directory pseudo-entry
	pub const RMAP_TYPE: [u8; 4] = *b"RMAP";

	/// Name of the directory pseudo-entry
	pub const RMAP_NAME: [u8; 8] = *b"resource";
}

fn check_field(value: &str, max: usize) -> Result<(), JediFileError> {
	if value.len() > max {
		return Err(JediFileError::NameTooLong {
			file_type: FileType::Lfd,
			name: value.to_string(),
			max,
		});
	}
	Ok(())
}

fn trim_field(raw: &[u8]) -> String {
	String::from_utf8_lossy(raw).trim_end_matches(['\0', ' ']).to_string()
}

fn pad_field<const N: usize>(value: &str) -> [u8; N] {
	let mut field = [0u8; N];
	field[..value.len()].copy_from_slice(value.as_bytes());
	field
}

/// Discards `count` bytes from a forward-only reader.
///
/// This is the degraded form of "skip to relative offset" for sources that
/// cannot seek; the bytes are read and dropped.
fn skip_forward<R: Read>(reader: &mut R, count: u64) -> Result<(), JediFileError> {
	let copied = io::copy(&mut reader.by_ref().take(count), &mut io::sink())?;
	if copied < count {
		return Err(JediFileError::insufficient_data(
			FileType::Lfd,
			count as usize,
			copied as usize,
		));
	}
	Ok(())
}

/// A 16-byte entry header: type tag, name and payload size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize)]
pub struct DirRecord {
	/// Four-character resource type tag.
	pub type_tag: String,
	/// Entry name, at most eight characters.
	pub name: String,
	/// Payload size in bytes.
	pub size: u32,
}

impl DirRecord {
	fn read<R: Read>(reader: &mut R) -> Result<Self, JediFileError> {
		let mut record = [0u8; constants::RECORD_SIZE];
		reader.read_exact(&mut record)?;
		Ok(Self {
			type_tag: trim_field(&record[0..4]),
			name: trim_field(&record[4..12]),
			size: u32::from_le_bytes(record[12..16].try_into()?),
		})
	}

	fn write(&self, out: &mut Vec<u8>) {
		out.extend_from_slice(&pad_field::<4>(&self.type_tag));
		out.extend_from_slice(&pad_field::<8>(&self.name));
		out.extend_from_slice(&self.size.to_le_bytes());
	}

	fn matches(&self, type_tag: &str, name: &str) -> bool {
		self.type_tag.eq_ignore_ascii_case(type_tag) && self.name.eq_ignore_ascii_case(name)
	}
}

/// A typed, named entry owning its payload bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
	type_tag: String,
	name: String,
	data: Vec<u8>,
}

impl Entry {
	/// Creates an entry, validating the field widths.
	pub fn new(
		type_tag: impl Into<String>,
		name: impl Into<String>,
		data: Vec<u8>,
	) -> Result<Self, JediFileError> {
		let type_tag = type_tag.into();
		let name = name.into();
		check_field(&type_tag, constants::TYPE_MAX)?;
		check_field(&name, constants::NAME_MAX)?;
		Ok(Self {
			type_tag,
			name,
			data,
		})
	}

	/// Resource type tag.
	pub fn type_tag(&self) -> &str {
		&self.type_tag
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

/// A fully cached LFD archive.
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

	/// Opens an LFD file from the specified path.
	pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, JediFileError> {
		let file = std::fs::File::open(path)?;
		let mut reader = std::io::BufReader::new(file);
		Self::from_reader(&mut reader)
	}

	/// Loads an LFD file from a byte slice.
	pub fn from_bytes(data: &[u8]) -> Result<Self, JediFileError> {
		let mut cursor = io::Cursor::new(data);
		Self::from_reader(&mut cursor)
	}

	/// Loads an LFD file from any reader, including forward-only ones.
	///
	/// The whole archive is consumed sequentially: directory first, then
	/// every payload with its duplicated header.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, JediFileError> {
		let mut stream = Reader::open(reader)?;

		let mut entries = Vec::with_capacity(stream.records().len());
		while let Some(entry) = stream.next_entry()? {
			entries.push(entry);
		}

		Ok(Self {
			entries,
			warnings: stream.warnings,
		})
	}

	/// Appends an entry.
	///
	/// # Errors
	///
	/// Returns [`JediFileError::NameTooLong`] when the type tag exceeds 4
	/// or the name exceeds 8 characters.
	pub fn add(
		&mut self,
		type_tag: impl Into<String>,
		name: impl Into<String>,
		data: Vec<u8>,
	) -> Result<(), JediFileError> {
		self.entries.push(Entry::new(type_tag, name, data)?);
		Ok(())
	}

	/// Finds an entry by type tag and name, case-insensitively.
	///
	/// A linear scan in directory order; the first match wins.
	pub fn get(&self, type_tag: &str, name: &str) -> Option<&Entry> {
		self.entries
			.iter()
			.find(|e| e.type_tag.eq_ignore_ascii_case(type_tag) && e.name.eq_ignore_ascii_case(name))
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

	/// Serializes the archive, recomputing the directory and every
	/// duplicated header from live entry data.
	pub fn to_bytes(&self) -> Result<Vec<u8>, JediFileError> {
		for entry in &self.entries {
			check_field(&entry.type_tag, constants::TYPE_MAX)?;
			check_field(&entry.name, constants::NAME_MAX)?;
		}

		let payload: usize =
			self.entries.iter().map(|e| constants::RECORD_SIZE + e.size()).sum();
		let directory = (1 + self.entries.len()) * constants::RECORD_SIZE;
		let mut bytes = Vec::with_capacity(directory + payload);

		bytes.extend_from_slice(&constants::RMAP_TYPE);
		bytes.extend_from_slice(&constants::RMAP_NAME);
		bytes.extend_from_slice(
			&((self.entries.len() * constants::RECORD_SIZE) as u32).to_le_bytes(),
		);

		for entry in &self.entries {
			self.record_for(entry).write(&mut bytes);
		}
		for entry in &self.entries {
			self.record_for(entry).write(&mut bytes);
			bytes.extend_from_slice(&entry.data);
		}

		Ok(bytes)
	}

	fn record_for(&self, entry: &Entry) -> DirRecord {
		DirRecord {
			type_tag: entry.type_tag.clone(),
			name: entry.name.clone(),
			size: entry.data.len() as u32,
		}
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
		write!(f, "LFD archive, {} entries", self.entries.len())
	}
}

/// A lazy, strictly forward LFD walker over a caller-owned stream.
///
/// The directory is parsed at open; payloads are visited in order with
/// [`Reader::next_entry`] and [`Reader::skip_entry`]. The stream is
/// borrowed for the walker's lifetime and never closed, and the caller
/// must not reposition it between calls.
#[derive(Debug)]
pub struct Reader<'r, R: Read> {
	reader: &'r mut R,
	records: Vec<DirRecord>,
	next: usize,
	cursor: u64,
	warnings: Vec<Warning>,
}

impl<'r, R: Read> Reader<'r, R> {
	/// Opens an archive from a stream positioned at the RMAP header.
	pub fn open(reader: &'r mut R) -> Result<Self, JediFileError> {
		let mut warnings = Vec::new();

		let rmap = DirRecord::read(reader).map_err(|_| {
			JediFileError::insufficient_data(FileType::Lfd, constants::RECORD_SIZE, 0)
		})?;
		if !rmap.type_tag.eq_ignore_ascii_case("RMAP") {
			let mut actual = [0u8; 4];
			let raw = pad_field::<4>(&rmap.type_tag);
			actual.copy_from_slice(&raw);
			return Err(JediFileError::invalid_magic(
				FileType::Lfd,
				&constants::RMAP_TYPE,
				&actual,
			));
		}
		if !rmap.name.eq_ignore_ascii_case("resource") {
			warning::push(&mut warnings, 4, format!("directory entry named '{}'", rmap.name));
		}
		if rmap.size as usize % constants::RECORD_SIZE != 0 {
			warning::push(
				&mut warnings,
				12,
				format!("directory size {} is not a multiple of {}", rmap.size, constants::RECORD_SIZE),
			);
		}
		let count = rmap.size as usize / constants::RECORD_SIZE;

		let mut records = Vec::with_capacity(count);
		for _ in 0..count {
			records.push(DirRecord::read(reader)?);
		}

		let cursor = ((1 + count) * constants::RECORD_SIZE) as u64;
		Ok(Self {
			reader,
			records,
			next: 0,
			cursor,
			warnings,
		})
	}

	/// The directory records, in order.
	pub fn records(&self) -> &[DirRecord] {
		&self.records
	}

	/// Reads the next entry, or `None` past the last one.
	///
	/// The duplicated payload header decides how many bytes are consumed;
	/// any disagreement with the directory record is a warning.
	pub fn next_entry(&mut self) -> Result<Option<Entry>, JediFileError> {
		let Some(expected) = self.records.get(self.next).cloned() else {
			return Ok(None);
		};

		let actual = DirRecord::read(self.reader)?;
		if actual != expected {
			warning::push(
				&mut self.warnings,
				self.cursor,
				format!(
					"payload header {} '{}' ({} bytes) disagrees with directory {} '{}' ({} bytes)",
					actual.type_tag, actual.name, actual.size, expected.type_tag, expected.name,
					expected.size
				),
			);
		}

		let mut data = vec![0u8; actual.size as usize];
		self.reader.read_exact(&mut data)?;

		self.cursor += (constants::RECORD_SIZE + data.len()) as u64;
		self.next += 1;

		Ok(Some(Entry {
			type_tag: actual.type_tag,
			name: actual.name,
			data,
		}))
	}

	/// Skips the next entry's payload without materializing it. Returns
	/// `false` past the last entry.
	pub fn skip_entry(&mut self) -> Result<bool, JediFileError> {
		if self.next >= self.records.len() {
			return Ok(false);
		}

		let actual = DirRecord::read(self.reader)?;
		skip_forward(self.reader, u64::from(actual.size))?;

		self.cursor += constants::RECORD_SIZE as u64 + u64::from(actual.size);
		self.next += 1;
		Ok(true)
	}

	/// Scans forward for an entry, skipping everything before it.
	///
	/// Entries already walked past cannot be found again; the stream only
	/// moves forward.
	pub fn find(&mut self, type_tag: &str, name: &str) -> Result<Option<Entry>, JediFileError> {
		while let Some(record) = self.records.get(self.next) {
			if record.matches(type_tag, name) {
				return self.next_entry();
			}
			self.skip_entry()?;
		}
		Ok(None)
	}

	/// Warnings accumulated so far.
	pub fn warnings(&self) -> &[Warning] {
		&self.warnings
	}
}
