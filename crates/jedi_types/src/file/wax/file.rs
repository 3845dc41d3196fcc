//! WAX file structure, I/O and graph maintenance operations.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::io::Read;

use crate::file::cell::{self, Cell};
use crate::file::warning::{self, Warning};
use crate::file::{FileType, JediFileError, TypedFile};

use super::constants;
use super::graph::{CellId, Frame, FrameId, Pose, PoseId, Sequence, SequenceId};

/// A decoded WAX composite sprite.
///
/// Nodes live in per-level arenas; slots and nodes reference one another by
/// typed index. Equal indices express the sharing the on-disk format can
/// only express through equal offsets. Ids are only meaningful for the file
/// that issued them; accessors panic on an id from another file.
#[derive(Debug, Clone)]
pub struct File {
	pose_slots: [Option<PoseId>; constants::SLOT_COUNT],
	poses: Vec<Pose>,
	sequences: Vec<Sequence>,
	frames: Vec<Frame>,
	cells: Vec<Cell>,
	warnings: Vec<Warning>,
}

#[derive(Debug, Default)]
struct Reachable {
	poses: Vec<PoseId>,
	sequences: Vec<SequenceId>,
	frames: Vec<FrameId>,
	cells: Vec<CellId>,
}

impl File {
	/// Creates an empty sprite with all pose slots unset.
	pub fn new() -> Self {
		Self {
			pose_slots: [None; constants::SLOT_COUNT],
			poses: Vec::new(),
			sequences: Vec::new(),
			frames: Vec::new(),
			cells: Vec::new(),
			warnings: Vec::new(),
		}
	}

	/// Opens a WAX file from the specified path.
	pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, JediFileError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(&data)
	}

	/// Loads a WAX file from any reader.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, JediFileError> {
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;
		Self::from_bytes(&data)
	}

	/// Loads a WAX file from a byte slice.
	///
	/// Records reached through equal offsets resolve to equal arena ids,
	/// reconstructing the sharing graph. Header counts that disagree with
	/// the discovered records are warnings; offsets outside the data are
	/// hard errors.
	pub fn from_bytes(data: &[u8]) -> Result<Self, JediFileError> {
		if data.len() < constants::RECORDS_OFFSET {
			return Err(JediFileError::insufficient_data(
				FileType::Wax,
				constants::RECORDS_OFFSET,
				data.len(),
			));
		}

		let version = u32::from_le_bytes(data[0..4].try_into()?);
		if version != constants::VERSION {
			return Err(JediFileError::invalid_magic(
				FileType::Wax,
				&constants::VERSION.to_le_bytes(),
				&data[0..4].try_into()?,
			));
		}

		let declared_poses = u32::from_le_bytes(data[4..8].try_into()?);
		let declared_sequences = u32::from_le_bytes(data[8..12].try_into()?);
		let declared_frames = u32::from_le_bytes(data[12..16].try_into()?);

		let mut loader = Loader::new(data);
		let mut pose_slots = [None; constants::SLOT_COUNT];
		for (slot, entry) in pose_slots.iter_mut().enumerate() {
			let pos = constants::POSE_TABLE_OFFSET + slot * 4;
			let offset = u32::from_le_bytes(data[pos..pos + 4].try_into()?);
			if offset != 0 {
				*entry = Some(loader.pose(offset)?);
			}
		}

		if declared_poses as usize != loader.poses.len() {
			warning::push(
				&mut loader.warnings,
				4,
				format!("header declares {} poses, found {}", declared_poses, loader.poses.len()),
			);
		}
		if declared_sequences as usize != loader.sequences.len() {
			warning::push(
				&mut loader.warnings,
				8,
				format!(
					"header declares {} sequences, found {}",
					declared_sequences,
					loader.sequences.len()
				),
			);
		}
		if declared_frames as usize != loader.frames.len() {
			warning::push(
				&mut loader.warnings,
				12,
				format!("header declares {} frames, found {}", declared_frames, loader.frames.len()),
			);
		}

		Ok(Self {
			pose_slots,
			poses: loader.poses,
			sequences: loader.sequences,
			frames: loader.frames,
			cells: loader.cells,
			warnings: loader.warnings,
		})
	}

	/// Serializes the sprite.
	///
	/// Every derived quantity is recomputed from live data: header counts,
	/// record offsets and cell payload sizes. Each distinct reachable node
	/// is written exactly once and referenced by its single offset; unset
	/// slots are written as 0. Arena nodes not reachable from a pose slot
	/// are not written.
	pub fn to_bytes(&self) -> Result<Vec<u8>, JediFileError> {
		let reach = self.reachable();

		// Encode reachable cells once so both sizing and writing agree
		let encoded: Vec<(cell::Compression, Vec<u8>)> =
			reach.cells.iter().map(|id| cell::encode_rle0_or_raw(&self.cells[id.0])).collect();

		let mut pose_offsets = HashMap::new();
		let mut sequence_offsets = HashMap::new();
		let mut frame_offsets = HashMap::new();
		let mut cell_offsets = HashMap::new();

		let sequence_base = constants::RECORDS_OFFSET + reach.poses.len() * constants::POSE_RECORD_SIZE;
		let frame_base = sequence_base + reach.sequences.len() * constants::SEQUENCE_RECORD_SIZE;
		let cell_base = frame_base + reach.frames.len() * constants::FRAME_RECORD_SIZE;

		for (i, id) in reach.poses.iter().enumerate() {
			pose_offsets
				.insert(*id, (constants::RECORDS_OFFSET + i * constants::POSE_RECORD_SIZE) as u32);
		}
		for (i, id) in reach.sequences.iter().enumerate() {
			sequence_offsets.insert(*id, (sequence_base + i * constants::SEQUENCE_RECORD_SIZE) as u32);
		}
		for (i, id) in reach.frames.iter().enumerate() {
			frame_offsets.insert(*id, (frame_base + i * constants::FRAME_RECORD_SIZE) as u32);
		}
		let mut running = cell_base;
		for (id, (_, payload)) in reach.cells.iter().zip(&encoded) {
			cell_offsets.insert(*id, running as u32);
			running += cell::RECORD_SIZE + payload.len();
		}

		let mut bytes = Vec::with_capacity(running);
		bytes.extend_from_slice(&constants::VERSION.to_le_bytes());
		bytes.extend_from_slice(&(reach.poses.len() as u32).to_le_bytes());
		bytes.extend_from_slice(&(reach.sequences.len() as u32).to_le_bytes());
		bytes.extend_from_slice(&(reach.frames.len() as u32).to_le_bytes());
		bytes.extend_from_slice(&[0u8; 16]);

		for slot in &self.pose_slots {
			let offset = slot.map_or(0, |id| pose_offsets[&id]);
			bytes.extend_from_slice(&offset.to_le_bytes());
		}

		for id in &reach.poses {
			let pose = &self.poses[id.0];
			bytes.extend_from_slice(&pose.world_width.to_le_bytes());
			bytes.extend_from_slice(&pose.world_height.to_le_bytes());
			bytes.extend_from_slice(&pose.frame_rate.to_le_bytes());
			bytes.extend_from_slice(&[0u8; 20]);
			for view in pose.sequences() {
				let offset = view.map_or(0, |id| sequence_offsets[&id]);
				bytes.extend_from_slice(&offset.to_le_bytes());
			}
		}

		for id in &reach.sequences {
			let sequence = &self.sequences[id.0];
			bytes.extend_from_slice(&[0u8; 16]);
			for slot in 0..constants::SLOT_COUNT {
				let offset =
					sequence.frames().get(slot).map_or(0, |id| frame_offsets[id]);
				bytes.extend_from_slice(&offset.to_le_bytes());
			}
		}

		for id in &reach.frames {
			let frame = &self.frames[id.0];
			bytes.extend_from_slice(&frame.insert_x.to_le_bytes());
			bytes.extend_from_slice(&frame.insert_y.to_le_bytes());
			bytes.extend_from_slice(&u32::from(frame.flipped).to_le_bytes());
			bytes.extend_from_slice(&cell_offsets[&frame.cell].to_le_bytes());
			bytes.extend_from_slice(&[0u8; 16]);
		}

		for (id, (compression, payload)) in reach.cells.iter().zip(&encoded) {
			let cell = &self.cells[id.0];
			bytes.extend_from_slice(&cell.width().to_le_bytes());
			bytes.extend_from_slice(&cell.height().to_le_bytes());
			bytes.extend_from_slice(&(*compression as u32).to_le_bytes());
			bytes.extend_from_slice(&(payload.len() as u32).to_le_bytes());
			bytes.extend_from_slice(&[0u8; 16]);
			bytes.extend_from_slice(payload);
		}

		debug_assert_eq!(bytes.len(), running);
		Ok(bytes)
	}

	/// Saves the sprite to disk.
	pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), JediFileError> {
		std::fs::write(path, self.to_bytes()?)?;
		Ok(())
	}

	/// Adds a cell to the arena.
	pub fn add_cell(&mut self, cell: Cell) -> CellId {
		let id = CellId(self.cells.len());
		self.cells.push(cell);
		id
	}

	/// Adds a frame to the arena.
	///
	/// # Panics
	///
	/// Panics when the frame references a cell id this file did not issue.
	pub fn add_frame(&mut self, frame: Frame) -> FrameId {
		assert!(frame.cell.0 < self.cells.len(), "frame references an unknown cell");
		let id = FrameId(self.frames.len());
		self.frames.push(frame);
		id
	}

	/// Adds a sequence to the arena.
	///
	/// # Panics
	///
	/// Panics when the sequence references a frame id this file did not issue.
	pub fn add_sequence(&mut self, sequence: Sequence) -> SequenceId {
		for frame in sequence.frames() {
			assert!(frame.0 < self.frames.len(), "sequence references an unknown frame");
		}
		let id = SequenceId(self.sequences.len());
		self.sequences.push(sequence);
		id
	}

	/// Adds a pose to the arena.
	///
	/// # Panics
	///
	/// Panics when the pose references a sequence id this file did not issue.
	pub fn add_pose(&mut self, pose: Pose) -> PoseId {
		for view in pose.sequences().iter().flatten() {
			assert!(view.0 < self.sequences.len(), "pose references an unknown sequence");
		}
		let id = PoseId(self.poses.len());
		self.poses.push(pose);
		id
	}

	/// The pose in a top-level slot, if set.
	pub fn pose_slot(&self, slot: usize) -> Option<PoseId> {
		self.pose_slots.get(slot).copied().flatten()
	}

	/// Sets or clears a top-level pose slot.
	///
	/// # Errors
	///
	/// Returns [`JediFileError::SlotOutOfRange`] for slots past 31.
	pub fn set_pose_slot(&mut self, slot: usize, pose: Option<PoseId>) -> Result<(), JediFileError> {
		if slot >= constants::SLOT_COUNT {
			return Err(JediFileError::SlotOutOfRange {
				file_type: FileType::Wax,
				slot,
				max: constants::SLOT_COUNT,
			});
		}
		if let Some(id) = pose {
			assert!(id.0 < self.poses.len(), "slot references an unknown pose");
		}
		self.pose_slots[slot] = pose;
		Ok(())
	}

	/// All 32 top-level pose slots in order.
	pub fn pose_slots(&self) -> &[Option<PoseId>; constants::SLOT_COUNT] {
		&self.pose_slots
	}

	/// A pose by id.
	pub fn pose(&self, id: PoseId) -> &Pose {
		&self.poses[id.0]
	}

	/// Mutable access to a pose.
	pub fn pose_mut(&mut self, id: PoseId) -> &mut Pose {
		&mut self.poses[id.0]
	}

	/// A sequence by id.
	pub fn sequence(&self, id: SequenceId) -> &Sequence {
		&self.sequences[id.0]
	}

	/// A frame by id.
	pub fn frame(&self, id: FrameId) -> &Frame {
		&self.frames[id.0]
	}

	/// Mutable access to a frame.
	pub fn frame_mut(&mut self, id: FrameId) -> &mut Frame {
		&mut self.frames[id.0]
	}

	/// A cell by id.
	pub fn cell(&self, id: CellId) -> &Cell {
		&self.cells[id.0]
	}

	/// Mutable access to a cell.
	pub fn cell_mut(&mut self, id: CellId) -> &mut Cell {
		&mut self.cells[id.0]
	}

	/// Number of poses in the arena.
	pub fn num_poses(&self) -> usize {
		self.poses.len()
	}

	/// Number of sequences in the arena.
	pub fn num_sequences(&self) -> usize {
		self.sequences.len()
	}

	/// Number of frames in the arena.
	pub fn num_frames(&self) -> usize {
		self.frames.len()
	}

	/// Number of cells in the arena.
	pub fn num_cells(&self) -> usize {
		self.cells.len()
	}

	/// Warnings accumulated by the load that produced this value.
	pub fn warnings(&self) -> &[Warning] {
		&self.warnings
	}

	/// Merges value-equal nodes into shared instances, bottom-up: cells,
	/// then frames, sequences and poses, so that a merge at one level can
	/// expose merges at the next. Finishes with [`File::compact`] and
	/// returns the number of arena nodes dropped.
	pub fn deduplicate(&mut self) -> usize {
		let cell_remap = value_remap(&self.cells);
		for frame in &mut self.frames {
			frame.cell = CellId(cell_remap[frame.cell.0]);
		}

		let frame_remap = value_remap(&self.frames);
		for sequence in &mut self.sequences {
			for frame in sequence.frames_mut() {
				*frame = FrameId(frame_remap[frame.0]);
			}
		}

		let sequence_remap = value_remap(&self.sequences);
		for pose in &mut self.poses {
			for slot in pose.sequences_mut() {
				if let Some(id) = slot {
					*slot = Some(SequenceId(sequence_remap[id.0]));
				}
			}
		}

		let pose_remap = value_remap(&self.poses);
		for slot in &mut self.pose_slots {
			if let Some(id) = slot {
				*slot = Some(PoseId(pose_remap[id.0]));
			}
		}

		self.compact()
	}

	/// Deep-clones every node referenced more than once, top-down, so that
	/// each reference becomes the sole owner of its node and editing one
	/// occurrence can no longer silently mutate an alias. Returns the
	/// number of clones made.
	pub fn reduplicate(&mut self) -> usize {
		let mut cloned = 0;

		let mut seen = HashSet::new();
		for slot in 0..constants::SLOT_COUNT {
			if let Some(id) = self.pose_slots[slot] {
				if !seen.insert(id) {
					let copy = self.poses[id.0].clone();
					let fresh = PoseId(self.poses.len());
					self.poses.push(copy);
					self.pose_slots[slot] = Some(fresh);
					seen.insert(fresh);
					cloned += 1;
				}
			}
		}

		let pose_ids: Vec<PoseId> = self.pose_slots.iter().flatten().copied().collect();
		let mut seen = HashSet::new();
		for pid in &pose_ids {
			for view in 0..constants::SLOT_COUNT {
				if let Some(id) = self.poses[pid.0].sequence(view) {
					if !seen.insert(id) {
						let copy = self.sequences[id.0].clone();
						let fresh = SequenceId(self.sequences.len());
						self.sequences.push(copy);
						self.poses[pid.0].sequences_mut()[view] = Some(fresh);
						seen.insert(fresh);
						cloned += 1;
					}
				}
			}
		}

		let sequence_ids: Vec<SequenceId> = pose_ids
			.iter()
			.flat_map(|pid| self.poses[pid.0].sequences().iter().flatten().copied())
			.collect();
		let mut seen = HashSet::new();
		for sid in &sequence_ids {
			for slot in 0..self.sequences[sid.0].len() {
				let id = self.sequences[sid.0].frames()[slot];
				if !seen.insert(id) {
					let copy = self.frames[id.0];
					let fresh = FrameId(self.frames.len());
					self.frames.push(copy);
					self.sequences[sid.0].frames_mut()[slot] = fresh;
					seen.insert(fresh);
					cloned += 1;
				}
			}
		}

		let frame_ids: Vec<FrameId> = sequence_ids
			.iter()
			.flat_map(|sid| self.sequences[sid.0].frames().iter().copied())
			.collect();
		let mut seen = HashSet::new();
		for fid in &frame_ids {
			let id = self.frames[fid.0].cell;
			if !seen.insert(id) {
				let copy = self.cells[id.0].clone();
				let fresh = CellId(self.cells.len());
				self.cells.push(copy);
				self.frames[fid.0].cell = fresh;
				seen.insert(fresh);
				cloned += 1;
			}
		}

		cloned
	}

	/// Drops arena nodes not reachable from any pose slot and reindexes the
	/// survivors. Returns the number of nodes dropped.
	pub fn compact(&mut self) -> usize {
		let reach = self.reachable();
		let dropped = self.poses.len() - reach.poses.len()
			+ self.sequences.len() - reach.sequences.len()
			+ self.frames.len() - reach.frames.len()
			+ self.cells.len() - reach.cells.len();

		let pose_remap: HashMap<PoseId, PoseId> =
			reach.poses.iter().enumerate().map(|(i, id)| (*id, PoseId(i))).collect();
		let sequence_remap: HashMap<SequenceId, SequenceId> =
			reach.sequences.iter().enumerate().map(|(i, id)| (*id, SequenceId(i))).collect();
		let frame_remap: HashMap<FrameId, FrameId> =
			reach.frames.iter().enumerate().map(|(i, id)| (*id, FrameId(i))).collect();
		let cell_remap: HashMap<CellId, CellId> =
			reach.cells.iter().enumerate().map(|(i, id)| (*id, CellId(i))).collect();

		self.poses = reach.poses.iter().map(|id| self.poses[id.0].clone()).collect();
		self.sequences = reach.sequences.iter().map(|id| self.sequences[id.0].clone()).collect();
		self.frames = reach.frames.iter().map(|id| self.frames[id.0]).collect();
		self.cells = reach.cells.iter().map(|id| self.cells[id.0].clone()).collect();

		for slot in &mut self.pose_slots {
			if let Some(id) = slot {
				*slot = Some(pose_remap[id]);
			}
		}
		for pose in &mut self.poses {
			for slot in pose.sequences_mut() {
				if let Some(id) = slot {
					*slot = Some(sequence_remap[id]);
				}
			}
		}
		for sequence in &mut self.sequences {
			for frame in sequence.frames_mut() {
				*frame = frame_remap[frame];
			}
		}
		for frame in &mut self.frames {
			frame.cell = cell_remap[&frame.cell];
		}

		dropped
	}

	/// Distinct nodes reachable from the pose slots, in slot order.
	fn reachable(&self) -> Reachable {
		let mut reach = Reachable::default();

		let mut seen = HashSet::new();
		for id in self.pose_slots.iter().flatten() {
			if seen.insert(*id) {
				reach.poses.push(*id);
			}
		}

		let mut seen = HashSet::new();
		for pid in &reach.poses {
			for id in self.poses[pid.0].sequences().iter().flatten() {
				if seen.insert(*id) {
					reach.sequences.push(*id);
				}
			}
		}

		let mut seen = HashSet::new();
		for sid in &reach.sequences {
			for id in self.sequences[sid.0].frames() {
				if seen.insert(*id) {
					reach.frames.push(*id);
				}
			}
		}

		let mut seen = HashSet::new();
		for fid in &reach.frames {
			let id = self.frames[fid.0].cell;
			if seen.insert(id) {
				reach.cells.push(id);
			}
		}

		reach
	}
}

/// For each item, the index of the first value-equal item.
fn value_remap<T: Eq + Hash>(items: &[T]) -> Vec<usize> {
	let mut canonical: HashMap<&T, usize> = HashMap::new();
	let mut remap = Vec::with_capacity(items.len());
	for (i, item) in items.iter().enumerate() {
		remap.push(*canonical.entry(item).or_insert(i));
	}
	remap
}

impl Default for File {
	fn default() -> Self {
		Self::new()
	}
}

impl TypedFile for File {
	const FILE_TYPE: FileType = FileType::Wax;

	fn from_bytes(data: &[u8]) -> Result<Self, JediFileError> {
		Self::from_bytes(data)
	}

	fn to_bytes(&self) -> Result<Vec<u8>, JediFileError> {
		self.to_bytes()
	}

	fn warnings(&self) -> &[Warning] {
		self.warnings()
	}
}

impl std::fmt::Display for File {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"WAX {} poses, {} sequences, {} frames, {} cells",
			self.poses.len(),
			self.sequences.len(),
			self.frames.len(),
			self.cells.len()
		)
	}
}

/// Offset-keyed record loader.
///
/// Each record kind is memoized by absolute offset so aliased references
/// resolve to the same arena index.
struct Loader<'a> {
	data: &'a [u8],
	warnings: Vec<Warning>,
	poses: Vec<Pose>,
	sequences: Vec<Sequence>,
	frames: Vec<Frame>,
	cells: Vec<Cell>,
	pose_map: HashMap<u32, PoseId>,
	sequence_map: HashMap<u32, SequenceId>,
	frame_map: HashMap<u32, FrameId>,
	cell_map: HashMap<u32, CellId>,
}

impl<'a> Loader<'a> {
	fn new(data: &'a [u8]) -> Self {
		Self {
			data,
			warnings: Vec::new(),
			poses: Vec::new(),
			sequences: Vec::new(),
			frames: Vec::new(),
			cells: Vec::new(),
			pose_map: HashMap::new(),
			sequence_map: HashMap::new(),
			frame_map: HashMap::new(),
			cell_map: HashMap::new(),
		}
	}

	fn check_bounds(&self, offset: u32, size: usize) -> Result<usize, JediFileError> {
		let start = offset as usize;
		if start + size > self.data.len() {
			return Err(JediFileError::offset_out_of_bounds(
				FileType::Wax,
				u64::from(offset),
				self.data.len() as u64,
			));
		}
		Ok(start)
	}

	fn read_u32(&self, pos: usize) -> Result<u32, JediFileError> {
		Ok(u32::from_le_bytes(self.data[pos..pos + 4].try_into()?))
	}

	fn read_i32(&self, pos: usize) -> Result<i32, JediFileError> {
		Ok(i32::from_le_bytes(self.data[pos..pos + 4].try_into()?))
	}

	fn pose(&mut self, offset: u32) -> Result<PoseId, JediFileError> {
		if let Some(&id) = self.pose_map.get(&offset) {
			return Ok(id);
		}
		let start = self.check_bounds(offset, constants::POSE_RECORD_SIZE)?;

		let mut pose = Pose::new(
			self.read_u32(start)?,
			self.read_u32(start + 4)?,
			self.read_u32(start + 8)?,
		);
		for view in 0..constants::SLOT_COUNT {
			let slot_offset = self.read_u32(start + 32 + view * 4)?;
			if slot_offset != 0 {
				let id = self.sequence(slot_offset)?;
				pose.set_sequence(view, Some(id))?;
			}
		}

		let id = PoseId(self.poses.len());
		self.poses.push(pose);
		self.pose_map.insert(offset, id);
		Ok(id)
	}

	fn sequence(&mut self, offset: u32) -> Result<SequenceId, JediFileError> {
		if let Some(&id) = self.sequence_map.get(&offset) {
			return Ok(id);
		}
		let start = self.check_bounds(offset, constants::SEQUENCE_RECORD_SIZE)?;

		let mut frames = Vec::new();
		let mut gap = false;
		for slot in 0..constants::SLOT_COUNT {
			let pos = start + 16 + slot * 4;
			let slot_offset = self.read_u32(pos)?;
			if slot_offset == 0 {
				gap = true;
				continue;
			}
			if gap {
				warning::push(
					&mut self.warnings,
					pos as u64,
					"frame slots are sparse, dropping the gaps",
				);
				gap = false;
			}
			frames.push(self.frame(slot_offset)?);
		}

		let id = SequenceId(self.sequences.len());
		self.sequences.push(Sequence::from_frames(frames)?);
		self.sequence_map.insert(offset, id);
		Ok(id)
	}

	fn frame(&mut self, offset: u32) -> Result<FrameId, JediFileError> {
		if let Some(&id) = self.frame_map.get(&offset) {
			return Ok(id);
		}
		let start = self.check_bounds(offset, constants::FRAME_RECORD_SIZE)?;

		let insert_x = self.read_i32(start)?;
		let insert_y = self.read_i32(start + 4)?;
		let flip = self.read_u32(start + 8)?;
		if flip > 1 {
			warning::push(
				&mut self.warnings,
				(start + 8) as u64,
				format!("flip flag {flip} is not 0 or 1"),
			);
		}
		let cell_offset = self.read_u32(start + 12)?;
		let cell = self.cell(cell_offset)?;

		let id = FrameId(self.frames.len());
		self.frames.push(Frame::new(insert_x, insert_y, flip != 0, cell));
		self.frame_map.insert(offset, id);
		Ok(id)
	}

	fn cell(&mut self, offset: u32) -> Result<CellId, JediFileError> {
		if let Some(&id) = self.cell_map.get(&offset) {
			return Ok(id);
		}
		let cell = cell::read_record(FileType::Wax, self.data, offset as usize, &mut self.warnings)?;

		let id = CellId(self.cells.len());
		self.cells.push(cell);
		self.cell_map.insert(offset, id);
		Ok(id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn patterned_cell(seed: u8) -> Cell {
		let mut pixels = vec![0u8; 8 * 8];
		for y in 0..4 {
			for x in 0..8 {
				pixels[y * 8 + x] = seed.wrapping_add((x + y) as u8) | 1;
			}
		}
		Cell::new(8, 8, pixels).unwrap()
	}

	/// One pose, one sequence of two frames sharing a cell, in slots 0 and 1.
	fn shared_sprite() -> File {
		let mut wax = File::new();
		let cell = wax.add_cell(patterned_cell(3));
		let a = wax.add_frame(Frame::new(-4, -8, false, cell));
		let b = wax.add_frame(Frame::new(-4, -8, true, cell));
		let seq = wax.add_sequence(Sequence::from_frames(vec![a, b]).unwrap());
		let mut pose = Pose::new(8, 8, 10);
		pose.set_sequence(0, Some(seq)).unwrap();
		pose.set_sequence(1, Some(seq)).unwrap();
		let pose = wax.add_pose(pose);
		wax.set_pose_slot(0, Some(pose)).unwrap();
		wax.set_pose_slot(1, Some(pose)).unwrap();
		wax
	}

	#[test_log::test]
	fn test_roundtrip_preserves_sharing() {
		let wax = shared_sprite();
		let bytes = wax.to_bytes().unwrap();

		let loaded = File::from_bytes(&bytes).unwrap();
		assert!(loaded.warnings().is_empty());

		// Two slots pointing at one offset resolve to the same pose
		assert_eq!(loaded.pose_slot(0), loaded.pose_slot(1));
		assert_eq!(loaded.num_poses(), 1);

		// Both view angles share the sequence, both frames share the cell
		let pose = loaded.pose(loaded.pose_slot(0).unwrap());
		assert_eq!(pose.sequence(0), pose.sequence(1));
		let seq = loaded.sequence(pose.sequence(0).unwrap());
		assert_eq!(seq.len(), 2);
		let first = loaded.frame(seq.frames()[0]);
		let second = loaded.frame(seq.frames()[1]);
		assert_eq!(first.cell, second.cell);
		assert!(!first.flipped);
		assert!(second.flipped);

		assert_eq!(loaded.cell(first.cell), wax.cell(CellId(0)));
	}

	#[test]
	fn test_idempotent_save() {
		let bytes = shared_sprite().to_bytes().unwrap();
		let again = File::from_bytes(&bytes).unwrap().to_bytes().unwrap();
		assert_eq!(bytes, again);
	}

	#[test]
	fn test_shared_nodes_written_once() {
		let shared = shared_sprite().to_bytes().unwrap();

		// The same sprite with an independent copy of the cell per frame
		// must serialize strictly larger.
		let mut split = shared_sprite();
		let cloned = split.reduplicate();
		assert!(cloned > 0);
		let split_bytes = split.to_bytes().unwrap();
		assert!(split_bytes.len() > shared.len());
	}

	#[test]
	fn test_deduplicate_merges_value_equal_nodes() {
		let mut wax = File::new();
		let cell_a = wax.add_cell(patterned_cell(3));
		let cell_b = wax.add_cell(patterned_cell(3));
		let a = wax.add_frame(Frame::new(-1, -1, false, cell_a));
		let b = wax.add_frame(Frame::new(-1, -1, false, cell_b));
		let seq = wax.add_sequence(Sequence::from_frames(vec![a, b]).unwrap());
		let mut pose = Pose::new(8, 8, 10);
		pose.set_sequence(0, Some(seq)).unwrap();
		let pose = wax.add_pose(pose);
		wax.set_pose_slot(0, Some(pose)).unwrap();

		assert_eq!(wax.num_cells(), 2);
		assert_eq!(wax.num_frames(), 2);

		let dropped = wax.deduplicate();
		assert!(dropped >= 2);

		// The equal cells collapse, which exposes the equal frames
		assert_eq!(wax.num_cells(), 1);
		assert_eq!(wax.num_frames(), 1);
		let seq = wax.sequence(wax.pose(wax.pose_slot(0).unwrap()).sequence(0).unwrap());
		assert_eq!(seq.frames()[0], seq.frames()[1]);
	}

	#[test]
	fn test_reduplicate_isolates_edits() {
		let mut wax = shared_sprite();
		wax.reduplicate();

		// Editing slot 0's pixels must leave slot 1 untouched
		let pose_a = wax.pose_slot(0).unwrap();
		let pose_b = wax.pose_slot(1).unwrap();
		assert_ne!(pose_a, pose_b);

		let seq_a = wax.pose(pose_a).sequence(0).unwrap();
		let frame_a = wax.sequence(seq_a).frames()[0];
		let cell_a = wax.frame(frame_a).cell;
		wax.cell_mut(cell_a).pixels_mut()[0] = 0xEE;

		let seq_b = wax.pose(pose_b).sequence(0).unwrap();
		let frame_b = wax.sequence(seq_b).frames()[0];
		let cell_b = wax.frame(frame_b).cell;
		assert_ne!(cell_a, cell_b);
		assert_ne!(wax.cell(cell_b).pixels()[0], 0xEE);
	}

	#[test]
	fn test_orphans_dropped_on_save() {
		let mut wax = shared_sprite();
		wax.add_cell(patterned_cell(99));
		let bytes = wax.to_bytes().unwrap();

		let loaded = File::from_bytes(&bytes).unwrap();
		assert_eq!(loaded.num_cells(), 1);
	}

	#[test]
	fn test_compact_drops_orphans() {
		let mut wax = shared_sprite();
		wax.add_cell(patterned_cell(99));
		assert_eq!(wax.compact(), 1);
		assert_eq!(wax.num_cells(), 1);
	}

	#[test_log::test]
	fn test_count_mismatch_warns() {
		let mut bytes = shared_sprite().to_bytes().unwrap();
		bytes[4..8].copy_from_slice(&9u32.to_le_bytes());

		let loaded = File::from_bytes(&bytes).unwrap();
		assert_eq!(loaded.num_poses(), 1);
		assert!(!loaded.warnings().is_empty());
	}

	#[test]
	fn test_pose_offset_out_of_bounds() {
		let mut bytes = shared_sprite().to_bytes().unwrap();
		let table = constants::POSE_TABLE_OFFSET;
		bytes[table..table + 4].copy_from_slice(&0x00FF_FFFFu32.to_le_bytes());

		assert!(matches!(
			File::from_bytes(&bytes),
			Err(JediFileError::OffsetOutOfBounds { .. })
		));
	}

	#[test]
	fn test_unset_slots_serialize_as_zero() {
		let bytes = shared_sprite().to_bytes().unwrap();
		for slot in 2..constants::SLOT_COUNT {
			let pos = constants::POSE_TABLE_OFFSET + slot * 4;
			assert_eq!(&bytes[pos..pos + 4], &[0, 0, 0, 0]);
		}
	}

	#[test]
	fn test_bad_version() {
		let mut bytes = shared_sprite().to_bytes().unwrap();
		bytes[0] = 0xFF;
		assert!(matches!(File::from_bytes(&bytes), Err(JediFileError::InvalidMagic { .. })));
	}

	#[test]
	fn test_sequence_slot_limit() {
		let mut wax = File::new();
		let cell = wax.add_cell(patterned_cell(1));
		let frame = wax.add_frame(Frame::new(0, 0, false, cell));

		let mut seq = Sequence::new();
		for _ in 0..constants::SLOT_COUNT {
			seq.push_frame(frame).unwrap();
		}
		assert!(matches!(seq.push_frame(frame), Err(JediFileError::TooManySlots { .. })));
	}
}
