//! Sprite graph tests: WAX sharing, dedup and reduplication end to end.

use anyhow::Result;
use jedi_rs::prelude::*;

use crate::init_logs;

fn walker_cell(seed: u8) -> Result<Cell> {
	let mut pixels = vec![0u8; 12 * 16];
	for y in 4..16 {
		for x in 2..10 {
			pixels[y * 12 + x] = seed.wrapping_mul(3).wrapping_add((x * y) as u8) | 1;
		}
	}
	Ok(Cell::new(12, 16, pixels)?)
}

/// Two poses (stand, walk) sharing every view's mirrored frame pair.
fn walker() -> Result<WaxFile> {
	let mut wax = WaxFile::new();

	let cell = wax.add_cell(walker_cell(1)?);
	let front = wax.add_frame(Frame::new(-6, -16, false, cell));
	let mirrored = wax.add_frame(Frame::new(-6, -16, true, cell));
	let seq = wax.add_sequence(Sequence::from_frames(vec![front, mirrored])?);

	let mut stand = Pose::new(12, 16, 6);
	for view in 0..4 {
		stand.set_sequence(view, Some(seq))?;
	}
	let stand = wax.add_pose(stand);

	wax.set_pose_slot(0, Some(stand))?;
	wax.set_pose_slot(1, Some(stand))?;
	Ok(wax)
}

#[test]
fn test_shared_offsets_resolve_to_shared_nodes() -> Result<()> {
	init_logs();

	let bytes = walker()?.to_bytes()?;
	let loaded = WaxFile::from_bytes(&bytes)?;

	// Both pose slots point at one offset, hence one pose
	assert_eq!(loaded.pose_slot(0), loaded.pose_slot(1));

	// All four views resolve to the same sequence instance
	let pose = loaded.pose(loaded.pose_slot(0).unwrap());
	let first = pose.sequence(0).unwrap();
	for view in 1..4 {
		assert_eq!(pose.sequence(view), Some(first));
	}

	// The mirrored frame shares its cell with the front frame
	let seq = loaded.sequence(first);
	assert_eq!(loaded.frame(seq.frames()[0]).cell, loaded.frame(seq.frames()[1]).cell);
	assert_eq!(loaded.num_cells(), 1);
	Ok(())
}

#[test]
fn test_wax_roundtrip_in_archive() -> Result<()> {
	let wax = walker()?;
	let mut archive = GobFile::new();
	archive.add("WALKER.WAX", wax.to_bytes()?)?;

	let loaded = GobFile::from_bytes(&archive.to_bytes()?)?;
	let entry = loaded.get("walker.wax").unwrap();
	let Asset::Sprite(back) = Asset::from_named_bytes(entry.name(), entry.data())? else {
		panic!("expected a sprite");
	};

	assert_eq!(back.num_poses(), 1);
	assert_eq!(back.num_frames(), 2);
	let pose = back.pose(back.pose_slot(0).unwrap());
	let seq = back.sequence(pose.sequence(0).unwrap());
	let cell = back.cell(back.frame(seq.frames()[0]).cell);
	assert_eq!(cell, &walker_cell(1)?);
	Ok(())
}

#[test]
fn test_deduplicate_collapses_equal_builds() -> Result<()> {
	// Build the same frame twice from scratch, as an editor would
	let mut wax = WaxFile::new();
	let cell_a = wax.add_cell(walker_cell(5)?);
	let cell_b = wax.add_cell(walker_cell(5)?);
	let frame_a = wax.add_frame(Frame::new(-3, -9, false, cell_a));
	let frame_b = wax.add_frame(Frame::new(-3, -9, false, cell_b));
	let seq = wax.add_sequence(Sequence::from_frames(vec![frame_a, frame_b])?);
	let mut pose = Pose::new(12, 16, 10);
	pose.set_sequence(0, Some(seq))?;
	let pose = wax.add_pose(pose);
	wax.set_pose_slot(0, Some(pose))?;

	wax.deduplicate();

	assert_eq!(wax.num_cells(), 1);
	assert_eq!(wax.num_frames(), 1);
	let seq = wax.sequence(wax.pose(wax.pose_slot(0).unwrap()).sequence(0).unwrap());
	assert_eq!(seq.frames()[0], seq.frames()[1]);

	// The collapsed graph serializes the node once and survives a cycle
	let loaded = WaxFile::from_bytes(&wax.to_bytes()?)?;
	assert_eq!(loaded.num_frames(), 1);
	Ok(())
}

#[test]
fn test_reduplicate_isolates_pose_edits() -> Result<()> {
	init_logs();

	let mut wax = walker()?;
	wax.reduplicate();

	let pose_a = wax.pose_slot(0).unwrap();
	let pose_b = wax.pose_slot(1).unwrap();
	assert_ne!(pose_a, pose_b);

	// Paint over the first pose's first frame
	let seq_a = wax.pose(pose_a).sequence(0).unwrap();
	let frame_a = wax.sequence(seq_a).frames()[0];
	let cell_a = wax.frame(frame_a).cell;
	for pixel in wax.cell_mut(cell_a).pixels_mut() {
		*pixel = 0xC3;
	}

	// The second pose still shows the original art
	let seq_b = wax.pose(pose_b).sequence(0).unwrap();
	let frame_b = wax.sequence(seq_b).frames()[0];
	let cell_b = wax.frame(frame_b).cell;
	assert_eq!(wax.cell(cell_b), &walker_cell(1)?);
	Ok(())
}

#[test]
fn test_fme_roundtrip_in_archive() -> Result<()> {
	let fme = FmeFile::new(-6, -16, false, walker_cell(2)?);

	let mut archive = GobFile::new();
	archive.add("WALK0.FME", fme.to_bytes()?)?;

	let loaded = GobFile::from_bytes(&archive.to_bytes()?)?;
	let entry = loaded.get("WALK0.FME").unwrap();
	let Asset::Frame(back) = Asset::from_named_bytes(entry.name(), entry.data())? else {
		panic!("expected a frame");
	};
	assert_eq!(back.cell(), fme.cell());
	assert_eq!(back.insert_x(), -6);
	Ok(())
}

#[test]
fn test_save_is_idempotent_after_graph_surgery() -> Result<()> {
	let mut wax = walker()?;
	wax.reduplicate();
	wax.deduplicate();

	// Dedup after redup restores the shared shape
	assert_eq!(wax.num_poses(), 1);
	assert_eq!(wax.num_cells(), 1);

	let bytes = wax.to_bytes()?;
	let again = WaxFile::from_bytes(&bytes)?.to_bytes()?;
	assert_eq!(bytes, again);
	Ok(())
}
