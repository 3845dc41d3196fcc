//! Opaque raw resource support.
//!
//! Archive entries whose name or type tag matches no known decoder fall
//! back to this thin owned-bytes wrapper, so an archive can always be
//! walked, rewritten and round-tripped without understanding every
//! payload.

use std::io::Read;

use crate::file::warning::Warning;
use crate::file::{FileType, JediFileError, TypedFile};

/// An undecoded resource payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct File {
	data: Vec<u8>,
}

impl File {
	/// Creates an empty resource.
	pub fn new() -> Self {
		Self::default()
	}

	/// Loads a raw resource from a byte slice. Never fails.
	pub fn from_bytes(data: &[u8]) -> Result<Self, JediFileError> {
		Ok(Self {
			data: data.to_vec(),
		})
	}

	/// Loads a raw resource from any reader.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, JediFileError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Ok(Self {
			data,
		})
	}

	/// The payload bytes.
	pub fn as_bytes(&self) -> &[u8] {
		&self.data
	}

	/// Payload size in bytes.
	pub fn size(&self) -> usize {
		self.data.len()
	}
}

impl From<Vec<u8>> for File {
	fn from(data: Vec<u8>) -> Self {
		Self {
			data,
		}
	}
}

impl From<File> for Vec<u8> {
	fn from(file: File) -> Self {
		file.data
	}
}

impl TypedFile for File {
	const FILE_TYPE: FileType = FileType::Raw;

	fn from_bytes(data: &[u8]) -> Result<Self, JediFileError> {
		Self::from_bytes(data)
	}

	fn to_bytes(&self) -> Result<Vec<u8>, JediFileError> {
		Ok(self.data.clone())
	}

	fn warnings(&self) -> &[Warning] {
		&[]
	}
}
