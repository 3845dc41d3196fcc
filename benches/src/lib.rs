//! Benchmark helper utilities for jedi-rs
//!
//! This module provides deterministic synthetic image data for the codec
//! benchmarks: sprite-like cells with transparent padding, flat texture
//! fills and incompressible noise, so the three compression strategies all
//! get exercised on data shaped like the real assets.

use jedi_types::file::cell::Cell;

/// Generates a sprite-like cell: a solid diamond of varied opaque pixels
/// surrounded by transparent (index 0) padding.
pub fn sprite_cell(width: u32, height: u32) -> Cell {
	let w = width as usize;
	let h = height as usize;
	let mut pixels = vec![0u8; w * h];

	let cx = w as i32 / 2;
	let cy = h as i32 / 2;
	let radius = cx.min(cy) * 3 / 4;

	for y in 0..h {
		for x in 0..w {
			let dx = (x as i32 - cx).abs();
			let dy = (y as i32 - cy).abs();
			if dx + dy <= radius {
				pixels[y * w + x] = ((x * 7 + y * 13) % 200 + 16) as u8;
			}
		}
	}

	Cell::new(width, height, pixels).expect("dimensions match the buffer")
}

/// Generates a flat single-color cell, the best case for value runs.
pub fn flat_cell(width: u32, height: u32, value: u8) -> Cell {
	Cell::new(width, height, vec![value; width as usize * height as usize])
		.expect("dimensions match the buffer")
}

/// Generates an incompressible noise cell from a tiny xorshift stream.
pub fn noise_cell(width: u32, height: u32, seed: u32) -> Cell {
	let mut state = seed | 1;
	let pixels = (0..width as usize * height as usize)
		.map(|_| {
			state ^= state << 13;
			state ^= state >> 17;
			state ^= state << 5;
			(state & 0xFF) as u8
		})
		.collect();

	Cell::new(width, height, pixels).expect("dimensions match the buffer")
}

/// Common benchmark sizes for synthetic cells.
pub mod sizes {
	/// Small sprite frame: 32x48
	pub const FRAME: (u32, u32) = (32, 48);
	/// Wall texture: 64x64
	pub const TEXTURE: (u32, u32) = (64, 64);
	/// Large boss sprite: 128x160
	pub const LARGE: (u32, u32) = (128, 160);
	/// Full-screen backdrop: 320x200
	pub const SCREEN: (u32, u32) = (320, 200);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_sprite_cell_has_transparent_padding() {
		let cell = sprite_cell(32, 32);
		assert_eq!(cell.pixel(0, 0), Some(0));
		assert_ne!(cell.pixel(16, 16), Some(0));
	}

	#[test]
	fn test_noise_cell_is_deterministic() {
		assert_eq!(noise_cell(16, 16, 42), noise_cell(16, 16, 42));
		assert_ne!(noise_cell(16, 16, 42), noise_cell(16, 16, 43));
	}
}
