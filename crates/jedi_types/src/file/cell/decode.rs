//! Cell payload decoding.
//!
//! Inverts the column-major-on-disk / row-major-in-memory transposition and
//! expands the two run-length schemes. Column offsets are validated against
//! the payload bounds before any column is read; a stored offset outside the
//! payload is a hard error, while a run that overruns its column is clipped
//! with a warning.

use crate::file::warning::{self, Warning};
use crate::file::{FileType, JediFileError};

use super::{Cell, Compression};

/// Decodes a cell payload into a row-major [`Cell`].
///
/// `base` is the absolute position of `payload` within the containing file;
/// it is only used to report meaningful positions in errors and warnings.
///
/// # Errors
///
/// Returns an error when the payload is shorter than a mandatory structure,
/// a column offset points outside the payload, or a run stream is corrupt.
pub fn decode(
	file_type: FileType,
	width: u32,
	height: u32,
	compression: Compression,
	payload: &[u8],
	base: u64,
	warnings: &mut Vec<Warning>,
) -> Result<Cell, JediFileError> {
	match compression {
		Compression::None => decode_raw(file_type, width, height, payload),
		Compression::Rle => decode_runs(file_type, width, height, payload, false, base, warnings),
		Compression::Rle0 => decode_runs(file_type, width, height, payload, true, base, warnings),
	}
}

fn decode_raw(
	file_type: FileType,
	width: u32,
	height: u32,
	payload: &[u8],
) -> Result<Cell, JediFileError> {
	let w = width as usize;
	let h = height as usize;
	let expected = w * h;
	if payload.len() < expected {
		return Err(JediFileError::insufficient_data(file_type, expected, payload.len()));
	}

	let mut pixels = vec![0u8; expected];
	for x in 0..w {
		for y in 0..h {
			pixels[y * w + x] = payload[x * h + y];
		}
	}

	Ok(Cell {
		width,
		height,
		pixels,
	})
}

fn decode_runs(
	file_type: FileType,
	width: u32,
	height: u32,
	payload: &[u8],
	zero_mode: bool,
	base: u64,
	warnings: &mut Vec<Warning>,
) -> Result<Cell, JediFileError> {
	let w = width as usize;
	let h = height as usize;
	let table_len = w * 4;
	if payload.len() < table_len {
		return Err(JediFileError::insufficient_data(file_type, table_len, payload.len()));
	}

	let mut pixels = vec![0u8; w * h];
	let mut column = Vec::with_capacity(h);

	for x in 0..w {
		let entry = x * 4;
		let offset = u32::from_le_bytes(payload[entry..entry + 4].try_into()?) as usize;
		if offset > payload.len() {
			return Err(JediFileError::offset_out_of_bounds(
				file_type,
				base + offset as u64,
				base + payload.len() as u64,
			));
		}

		column.clear();
		run_decode_into(file_type, payload, offset, h, zero_mode, base, warnings, &mut column)?;

		for (y, &value) in column.iter().enumerate() {
			pixels[y * w + x] = value;
		}
	}

	Ok(Cell {
		width,
		height,
		pixels,
	})
}

/// Expands run-encoded bytes from `payload[pos..]` until `count` pixels have
/// been produced, appending them to `out`. Returns the position just past
/// the consumed bytes.
#[allow(clippy::too_many_arguments)]
pub(crate) fn run_decode_into(
	file_type: FileType,
	payload: &[u8],
	mut pos: usize,
	count: usize,
	zero_mode: bool,
	base: u64,
	warnings: &mut Vec<Warning>,
	out: &mut Vec<u8>,
) -> Result<usize, JediFileError> {
	let mut produced = 0usize;

	while produced < count {
		let Some(&control) = payload.get(pos) else {
			return Err(JediFileError::insufficient_data(file_type, pos + 1, payload.len()));
		};
		pos += 1;

		let mut length = (control >> 1) as usize;
		let repeat = control & 1 == 1;
		if length == 0 {
			return Err(JediFileError::CorruptRunStream {
				file_type,
				position: base + (pos - 1) as u64,
			});
		}

		if produced + length > count {
			warning::push(
				warnings,
				base + (pos - 1) as u64,
				format!("run of {} overruns the remaining {} pixels", length, count - produced),
			);
			length = count - produced;
		}

		if repeat {
			let value = if zero_mode {
				0
			} else {
				let Some(&value) = payload.get(pos) else {
					return Err(JediFileError::insufficient_data(file_type, pos + 1, payload.len()));
				};
				pos += 1;
				value
			};
			out.extend(std::iter::repeat_n(value, length));
		} else {
			let end = pos + length;
			if end > payload.len() {
				return Err(JediFileError::insufficient_data(file_type, end, payload.len()));
			}
			out.extend_from_slice(&payload[pos..end]);
			pos = end;
		}

		produced += length;
	}

	Ok(pos)
}
