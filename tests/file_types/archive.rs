//! Archive container tests: GOB and LFD end to end.

use std::io::Cursor;

use anyhow::Result;
use jedi_rs::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::init_logs;

fn small_bitmap(seed: u8) -> Result<Vec<u8>> {
	let mut rng = SmallRng::seed_from_u64(u64::from(seed));
	let pixels = (0..4 * 4).map(|_| rng.random::<u8>()).collect();
	let bm = BmFile::new(Cell::new(4, 4, pixels)?);
	Ok(bm.to_bytes()?)
}

#[test]
fn test_archive_containment_500_entries() -> Result<()> {
	init_logs();

	let mut archive = GobFile::new();
	for i in 0..500u32 {
		archive.add(format!("E{i:03}.BM"), small_bitmap(i as u8)?)?;
	}

	let loaded = GobFile::from_bytes(&archive.to_bytes()?)?;
	assert_eq!(loaded.len(), 500);

	for i in 0..500u32 {
		let name = format!("E{i:03}.BM");
		let entry = loaded.get(&name).expect("entry present");
		let asset = Asset::from_named_bytes(entry.name(), entry.data())?;
		let Asset::Bitmap(bm) = asset else {
			panic!("expected a bitmap for {name}");
		};
		let reference = BmFile::from_bytes(&small_bitmap(i as u8)?)?;
		assert_eq!(bm.cell(), reference.cell(), "{name} round-trips load-equal");
	}

	Ok(())
}

#[test]
fn test_duplicate_names_pinned_behavior() -> Result<()> {
	// Adding a repeated name appends another directory record; lookups
	// return the earliest record, later duplicates stay byte-exact.
	let mut archive = GobFile::new();
	archive.add("TEST.BM", small_bitmap(1)?)?;
	archive.add("TEST.BM", small_bitmap(2)?)?;

	let loaded = GobFile::from_bytes(&archive.to_bytes()?)?;
	assert_eq!(loaded.len(), 2);
	assert_eq!(loaded.get("TEST.BM").unwrap().data(), &small_bitmap(1)?);
	assert_eq!(loaded.entries()[1].data(), &small_bitmap(2)?);
	Ok(())
}

/// A 64x64 half-zero checkerboard must compress as RLE0 and beat the raw
/// form inside its archive entry.
#[test]
fn test_checkerboard_bitmap_stored_as_rle0() -> Result<()> {
	init_logs();

	let mut pixels = vec![0u8; 64 * 64];
	for y in 0..64 {
		for x in 0..64 {
			// 8x8 blocks, half transparent and half varied opaque; the
			// varied fill never repeats vertically, so zero runs are the
			// only compressible structure
			if (x / 8 + y / 8) % 2 == 1 {
				pixels[y * 64 + x] = ((x * 31 + y * 17) % 254 + 1) as u8;
			}
		}
	}

	let bm = BmFile::new(Cell::new(64, 64, pixels)?);
	let mut archive = GobFile::new();
	archive.add("TEST.BM", bm.to_bytes()?)?;
	let bytes = archive.to_bytes()?;

	let loaded = GobFile::from_bytes(&bytes)?;
	let entry = loaded.get("TEST.BM").unwrap();

	// Compression discriminant in the BM header is RLE0
	let compression = u16::from_le_bytes(entry.data()[14..16].try_into()?);
	assert_eq!(compression, Compression::Rle0 as u16);

	// Strictly smaller than the uncompressed form
	assert!(entry.data().len() < 64 * 64 + 32);

	// And still pixel-exact
	let back = BmFile::from_bytes(entry.data())?;
	assert_eq!(back.cell(), bm.cell());
	Ok(())
}

#[test]
fn test_gob_streaming_matches_cached() -> Result<()> {
	let mut archive = GobFile::new();
	for i in 0..20u8 {
		archive.add(format!("R{i:02}.DAT"), vec![i; 100 + i as usize])?;
	}
	let bytes = archive.to_bytes()?;

	let cached = GobFile::from_bytes(&bytes)?;
	let mut streamed = file::gob::Reader::open(Cursor::new(bytes))?;

	// Random access through the stream, against directory order
	let summary = serde_json::to_string(streamed.directory())?;
	assert!(summary.contains("R19.DAT"));

	for i in (0..20u8).rev() {
		let name = format!("R{i:02}.DAT");
		let lazy = streamed.read(&name)?.expect("entry present");
		assert_eq!(lazy, cached.get(&name).unwrap().data());
	}
	Ok(())
}

#[test]
fn test_lfd_end_to_end() -> Result<()> {
	init_logs();

	let mut pixels = vec![0u8; 32 * 4];
	for x in 5..25 {
		pixels[2 * 32 + x] = 9;
	}
	let delt = DeltFile::new(0, 0, 32, 4, pixels)?;
	let pltt = PlttFile::new(32, vec![[10, 20, 30]; 16])?;

	let mut archive = LfdFile::new();
	archive.add("PLTT", "menu", pltt.to_bytes()?)?;
	archive.add("DELT", "cursor", delt.to_bytes()?)?;
	let bytes = archive.to_bytes()?;

	// Cached load plus typed dispatch
	let loaded = LfdFile::from_bytes(&bytes)?;
	let entry = loaded.get("DELT", "cursor").unwrap();
	let asset = Asset::from_tagged_bytes(entry.type_tag(), entry.data())?;
	let Asset::Delta(back) = asset else {
		panic!("expected a delta image");
	};
	assert_eq!(back.pixels(), delt.pixels());

	// Forward-only scan from a plain reader
	let mut cursor = Cursor::new(bytes);
	let mut reader = file::lfd::Reader::open(&mut cursor)?;
	let found = reader.find("DELT", "cursor")?.expect("entry found");
	assert_eq!(found.size(), delt.to_bytes()?.len());
	Ok(())
}

#[test]
fn test_archive_errors_are_per_entry() -> Result<()> {
	// A corrupt entry fails to decode without poisoning its neighbors
	let mut archive = GobFile::new();
	archive.add("GOOD.BM", small_bitmap(7)?)?;
	archive.add("BAD.BM", vec![0xFF; 16])?;

	let loaded = GobFile::from_bytes(&archive.to_bytes()?)?;
	let mut decoded = 0;
	let mut failed = 0;
	for entry in loaded.entries() {
		match Asset::from_named_bytes(entry.name(), entry.data()) {
			Ok(_) => decoded += 1,
			Err(_) => failed += 1,
		}
	}
	assert_eq!(decoded, 1);
	assert_eq!(failed, 1);
	Ok(())
}
