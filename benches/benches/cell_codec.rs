//! Benchmark suite for the cell codec
//!
//! Measures run-length encoding, strategy selection and decoding across
//! data shaped like the real assets: sparse sprites, flat textures and
//! incompressible noise.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use jedi_benches::{flat_cell, noise_cell, sizes, sprite_cell};
use jedi_types::file::FileType;
use jedi_types::file::cell::{self, Cell, Compression};
use std::hint::black_box;

fn shaped_inputs() -> Vec<(&'static str, Cell)> {
	vec![
		("sprite", sprite_cell(sizes::LARGE.0, sizes::LARGE.1)),
		("flat", flat_cell(sizes::TEXTURE.0, sizes::TEXTURE.1, 23)),
		("noise", noise_cell(sizes::TEXTURE.0, sizes::TEXTURE.1, 0xDEAD)),
		("screen", sprite_cell(sizes::SCREEN.0, sizes::SCREEN.1)),
	]
}

/// Benchmark the exact smallest-strategy encode
fn bench_encode_auto(c: &mut Criterion) {
	let mut group = c.benchmark_group("cell_encode_auto");

	for (name, cell) in shaped_inputs() {
		let pixels = u64::from(cell.width()) * u64::from(cell.height());
		group.throughput(Throughput::Elements(pixels));
		group.bench_with_input(BenchmarkId::new("encode", name), &cell, |b, cell| {
			b.iter(|| black_box(cell::encode(black_box(cell))));
		});
	}

	group.finish();
}

/// Benchmark each strategy in isolation
fn bench_encode_fixed(c: &mut Criterion) {
	let mut group = c.benchmark_group("cell_encode_fixed");

	let cell = sprite_cell(sizes::LARGE.0, sizes::LARGE.1);
	for compression in [Compression::None, Compression::Rle, Compression::Rle0] {
		group.bench_with_input(
			BenchmarkId::new("strategy", compression),
			&compression,
			|b, &compression| {
				b.iter(|| black_box(cell::encode_with(black_box(&cell), compression)));
			},
		);
	}

	group.finish();
}

/// Benchmark decoding, including the column-major transposition
fn bench_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("cell_decode");

	for (name, cell) in shaped_inputs() {
		let (compression, payload) = cell::encode(&cell);
		let pixels = u64::from(cell.width()) * u64::from(cell.height());
		group.throughput(Throughput::Elements(pixels));
		group.bench_with_input(BenchmarkId::new("decode", name), &payload, |b, payload| {
			b.iter(|| {
				let mut warnings = Vec::new();
				let result = cell::decode(
					FileType::Bm,
					cell.width(),
					cell.height(),
					compression,
					black_box(payload),
					0,
					&mut warnings,
				);
				black_box(result)
			});
		});
	}

	group.finish();
}

criterion_group!(benches, bench_encode_auto, bench_encode_fixed, bench_decode);

criterion_main!(benches);
