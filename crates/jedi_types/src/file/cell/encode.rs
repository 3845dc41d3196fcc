//! Cell payload encoding.
//!
//! Each cell can be serialized three ways; [`encode`] measures all of them
//! and keeps the cheapest. The cost of a compressed strategy is the offset
//! table (`4 * width`) plus the exact run stream produced for every column,
//! so the comparison reflects the bytes that would actually be written.

use super::{Cell, Compression, MAX_RUN};

/// Encodes a cell with the smallest of the three strategies.
///
/// Ties favor the uncompressed form; between the two run-length schemes a
/// tie favors `Rle0`.
pub fn encode(cell: &Cell) -> (Compression, Vec<u8>) {
	let raw_cost = cell.pixels.len();

	let rle_columns = encode_columns(cell, false);
	let rle0_columns = encode_columns(cell, true);

	let table_cost = cell.width as usize * 4;
	let rle_cost = table_cost + rle_columns.iter().map(Vec::len).sum::<usize>();
	let rle0_cost = table_cost + rle0_columns.iter().map(Vec::len).sum::<usize>();

	if raw_cost <= rle_cost && raw_cost <= rle0_cost {
		(Compression::None, raw_payload(cell))
	} else if rle0_cost <= rle_cost {
		(Compression::Rle0, assemble(&rle0_columns))
	} else {
		(Compression::Rle, assemble(&rle_columns))
	}
}

/// Encodes a cell with `Rle0` when that beats raw, the rule frame and
/// sprite cells follow (they never use plain `Rle`). Ties favor raw.
pub fn encode_rle0_or_raw(cell: &Cell) -> (Compression, Vec<u8>) {
	let raw_cost = cell.pixels.len();

	let columns = encode_columns(cell, true);
	let rle0_cost = cell.width as usize * 4 + columns.iter().map(Vec::len).sum::<usize>();

	if raw_cost <= rle0_cost {
		(Compression::None, raw_payload(cell))
	} else {
		(Compression::Rle0, assemble(&columns))
	}
}

/// Encodes a cell with an explicitly chosen strategy.
///
/// Compression is a parameter of the call, never state remembered from a
/// previous load.
pub fn encode_with(cell: &Cell, compression: Compression) -> Vec<u8> {
	match compression {
		Compression::None => raw_payload(cell),
		Compression::Rle => assemble(&encode_columns(cell, false)),
		Compression::Rle0 => assemble(&encode_columns(cell, true)),
	}
}

fn raw_payload(cell: &Cell) -> Vec<u8> {
	let w = cell.width as usize;
	let h = cell.height as usize;
	let mut payload = Vec::with_capacity(w * h);
	for x in 0..w {
		for y in 0..h {
			payload.push(cell.pixels[y * w + x]);
		}
	}
	payload
}

fn encode_columns(cell: &Cell, zero_mode: bool) -> Vec<Vec<u8>> {
	let mut columns = Vec::with_capacity(cell.width as usize);
	let mut scratch = Vec::new();
	for x in 0..cell.width {
		cell.column(x, &mut scratch);
		let mut encoded = Vec::new();
		run_encode_into(&scratch, zero_mode, &mut encoded);
		columns.push(encoded);
	}
	columns
}

fn assemble(columns: &[Vec<u8>]) -> Vec<u8> {
	let table_len = columns.len() * 4;
	let data_len: usize = columns.iter().map(Vec::len).sum();
	let mut payload = Vec::with_capacity(table_len + data_len);

	let mut offset = table_len as u32;
	for column in columns {
		payload.extend_from_slice(&offset.to_le_bytes());
		offset += column.len() as u32;
	}
	for column in columns {
		payload.extend_from_slice(column);
	}

	payload
}

/// Run-encodes `data` into `out`.
///
/// In `zero_mode` only zero runs compress (and carry no value byte), the
/// historical transparency-skip scheme; otherwise any run of three or more
/// equal bytes becomes a repeat run. Runs beyond [`MAX_RUN`] are closed and
/// restarted.
pub(crate) fn run_encode_into(data: &[u8], zero_mode: bool, out: &mut Vec<u8>) {
	let mut literal_start = 0usize;
	let mut i = 0usize;

	while i < data.len() {
		let value = data[i];
		let mut run = 1;
		while i + run < data.len() && data[i + run] == value {
			run += 1;
		}

		let compressible = if zero_mode {
			value == 0
		} else {
			run >= 3
		};

		if compressible {
			flush_literals(&data[literal_start..i], out);
			let mut remaining = run;
			while remaining > 0 {
				let chunk = remaining.min(MAX_RUN);
				out.push(((chunk as u8) << 1) | 1);
				if !zero_mode {
					out.push(value);
				}
				remaining -= chunk;
			}
			i += run;
			literal_start = i;
		} else {
			i += run;
		}
	}

	flush_literals(&data[literal_start..], out);
}

fn flush_literals(data: &[u8], out: &mut Vec<u8>) {
	for chunk in data.chunks(MAX_RUN) {
		out.push((chunk.len() as u8) << 1);
		out.extend_from_slice(chunk);
	}
}
