//! Unit tests for the cell codec.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::file::{FileType, JediFileError};

use super::{Cell, Compression, decode, encode, encode_with, run_decode_into, run_encode_into};

fn run_roundtrip(data: &[u8], zero_mode: bool) {
	let mut encoded = Vec::new();
	run_encode_into(data, zero_mode, &mut encoded);

	let mut decoded = Vec::new();
	let mut warnings = Vec::new();
	let pos = run_decode_into(
		FileType::Bm,
		&encoded,
		0,
		data.len(),
		zero_mode,
		0,
		&mut warnings,
		&mut decoded,
	)
	.unwrap();

	assert_eq!(decoded, data);
	assert_eq!(pos, encoded.len(), "stream fully consumed");
	assert!(warnings.is_empty());
}

#[test]
fn test_run_roundtrip_all_same() {
	for len in 0..=4096usize {
		run_roundtrip(&vec![7u8; len], false);
		run_roundtrip(&vec![0u8; len], false);
		run_roundtrip(&vec![0u8; len], true);
		run_roundtrip(&vec![7u8; len], true);
	}
}

#[test]
fn test_run_roundtrip_alternating() {
	for len in 0..=4096usize {
		let column: Vec<u8> = (0..len)
			.map(|i| {
				if i % 2 == 0 {
					0
				} else {
					9
				}
			})
			.collect();
		run_roundtrip(&column, false);
		run_roundtrip(&column, true);
	}
}

#[test]
fn test_run_roundtrip_random() {
	let mut rng = SmallRng::seed_from_u64(0x4A45_4449);
	for len in 0..=4096usize {
		let column: Vec<u8> = (0..len).map(|_| rng.random::<u8>()).collect();
		run_roundtrip(&column, false);
		run_roundtrip(&column, true);

		// Small alphabets produce long runs, the interesting case for RLE
		let column: Vec<u8> = (0..len).map(|_| rng.random_range(0..3u8)).collect();
		run_roundtrip(&column, false);
		run_roundtrip(&column, true);
	}
}

#[test]
fn test_raw_transposition() {
	// 3x2, row-major [1 2 3 / 4 5 6]
	let cell = Cell::new(3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
	let payload = encode_with(&cell, Compression::None);

	// Column-major on disk
	assert_eq!(payload, vec![1, 4, 2, 5, 3, 6]);

	let mut warnings = Vec::new();
	let back = decode(FileType::Bm, 3, 2, Compression::None, &payload, 0, &mut warnings).unwrap();
	assert_eq!(back, cell);
}

#[test]
fn test_cell_roundtrip_all_strategies() {
	let mut rng = SmallRng::seed_from_u64(0x57_41_58);
	let pixels: Vec<u8> = (0..64 * 48).map(|_| rng.random_range(0..5u8)).collect();
	let cell = Cell::new(64, 48, pixels).unwrap();

	for compression in [Compression::None, Compression::Rle, Compression::Rle0] {
		let payload = encode_with(&cell, compression);
		let mut warnings = Vec::new();
		let back = decode(FileType::Bm, 64, 48, compression, &payload, 0, &mut warnings).unwrap();
		assert_eq!(back, cell, "{compression} roundtrip");
		assert!(warnings.is_empty());
	}
}

#[test]
fn test_encode_picks_raw_for_noise() {
	let mut rng = SmallRng::seed_from_u64(1);
	let pixels: Vec<u8> = (0..16 * 16).map(|_| rng.random::<u8>()).collect();
	let cell = Cell::new(16, 16, pixels).unwrap();

	let (compression, payload) = encode(&cell);
	assert_eq!(compression, Compression::None);
	assert_eq!(payload.len(), 16 * 16);
}

#[test]
fn test_encode_picks_rle_for_flat_color() {
	let cell = Cell::new(32, 32, vec![5; 32 * 32]).unwrap();

	let (compression, payload) = encode(&cell);
	assert_eq!(compression, Compression::Rle);
	// Offset table + 9 run bytes per column (127+127+127+127+127+127+127+127+8... capped runs)
	assert!(payload.len() < 32 * 32);
}

#[test]
fn test_encode_picks_rle0_for_sparse_opaque() {
	// Vertical bands: 8 rows of zeros alternating with 8 rows of varying
	// values, so value runs never form but zero runs do.
	let width = 32u32;
	let height = 32u32;
	let mut pixels = vec![0u8; (width * height) as usize];
	for y in 0..height as usize {
		if (y / 8) % 2 == 1 {
			for x in 0..width as usize {
				pixels[y * width as usize + x] = ((x + y) % 200 + 1) as u8;
			}
		}
	}
	let cell = Cell::new(width, height, pixels).unwrap();

	let (compression, payload) = encode(&cell);
	assert_eq!(compression, Compression::Rle0);
	assert!(payload.len() < (width * height) as usize);
}

#[test]
fn test_tie_favors_uncompressed() {
	// A 1x1 cell: raw = 1 byte, either RLE form needs a table plus runs
	let cell = Cell::new(1, 1, vec![0]).unwrap();
	let (compression, payload) = encode(&cell);
	assert_eq!(compression, Compression::None);
	assert_eq!(payload, vec![0]);
}

#[test]
fn test_overrun_is_clipped_with_warning() {
	// Single column of 4 pixels, but the run claims 6
	let mut payload = Vec::new();
	payload.extend_from_slice(&4u32.to_le_bytes());
	payload.push((6 << 1) | 1);
	payload.push(9);

	let mut warnings = Vec::new();
	let cell = decode(FileType::Bm, 1, 4, Compression::Rle, &payload, 0, &mut warnings).unwrap();
	assert_eq!(cell.pixels(), &[9, 9, 9, 9]);
	assert_eq!(warnings.len(), 1);
}

#[test]
fn test_zero_length_control_is_corrupt() {
	let mut payload = Vec::new();
	payload.extend_from_slice(&4u32.to_le_bytes());
	payload.push(0);

	let mut warnings = Vec::new();
	let result = decode(FileType::Bm, 1, 4, Compression::Rle, &payload, 0, &mut warnings);
	assert!(matches!(result, Err(JediFileError::CorruptRunStream { .. })));
}

#[test]
fn test_column_offset_out_of_bounds() {
	let mut payload = Vec::new();
	payload.extend_from_slice(&999u32.to_le_bytes());

	let mut warnings = Vec::new();
	let result = decode(FileType::Bm, 1, 4, Compression::Rle0, &payload, 0, &mut warnings);
	assert!(matches!(result, Err(JediFileError::OffsetOutOfBounds { .. })));
}

#[test]
fn test_pixel_count_mismatch() {
	assert!(Cell::new(4, 4, vec![0; 15]).is_err());
	assert!(Cell::new(4, 4, vec![0; 16]).is_ok());
}
