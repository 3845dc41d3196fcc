//! Node types and typed arena indices for the WAX sprite hierarchy.

use crate::file::{FileType, JediFileError};

use super::constants;

/// Index of a pose in its file's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoseId(pub(crate) usize);

/// Index of a sequence in its file's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SequenceId(pub(crate) usize);

/// Index of a frame in its file's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub(crate) usize);

/// Index of a cell in its file's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(pub(crate) usize);

impl PoseId {
	/// Position in the arena.
	pub fn index(self) -> usize {
		self.0
	}
}

impl SequenceId {
	/// Position in the arena.
	pub fn index(self) -> usize {
		self.0
	}
}

impl FrameId {
	/// Position in the arena.
	pub fn index(self) -> usize {
		self.0
	}
}

impl CellId {
	/// Position in the arena.
	pub fn index(self) -> usize {
		self.0
	}
}

/// One animation frame: an anchor point, a flip flag and a cell reference.
///
/// The same frame may appear in any number of sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame {
	/// Anchor X coordinate (usually negative).
	pub insert_x: i32,
	/// Anchor Y coordinate (usually negative).
	pub insert_y: i32,
	/// Whether the cell is mirrored horizontally.
	pub flipped: bool,
	/// The cell holding this frame's pixels.
	pub cell: CellId,
}

impl Frame {
	/// Creates a frame.
	pub fn new(insert_x: i32, insert_y: i32, flipped: bool, cell: CellId) -> Self {
		Self {
			insert_x,
			insert_y,
			flipped,
			cell,
		}
	}
}

/// An ordered list of frames, one view angle's animation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Sequence {
	frames: Vec<FrameId>,
}

impl Sequence {
	/// Creates an empty sequence.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a sequence from a frame list.
	///
	/// # Errors
	///
	/// Returns [`JediFileError::TooManySlots`] when more than 32 frames are
	/// given; the on-disk slot table cannot hold more.
	pub fn from_frames(frames: Vec<FrameId>) -> Result<Self, JediFileError> {
		if frames.len() > constants::SLOT_COUNT {
			return Err(JediFileError::TooManySlots {
				file_type: FileType::Wax,
				count: frames.len(),
				max: constants::SLOT_COUNT,
			});
		}
		Ok(Self {
			frames,
		})
	}

	/// Appends a frame.
	///
	/// # Errors
	///
	/// Returns [`JediFileError::TooManySlots`] when the sequence already
	/// holds 32 frames.
	pub fn push_frame(&mut self, frame: FrameId) -> Result<(), JediFileError> {
		if self.frames.len() >= constants::SLOT_COUNT {
			return Err(JediFileError::TooManySlots {
				file_type: FileType::Wax,
				count: self.frames.len() + 1,
				max: constants::SLOT_COUNT,
			});
		}
		self.frames.push(frame);
		Ok(())
	}

	/// The frame list.
	pub fn frames(&self) -> &[FrameId] {
		&self.frames
	}

	/// Mutable access to the frame list, for in-place edits.
	pub(crate) fn frames_mut(&mut self) -> &mut Vec<FrameId> {
		&mut self.frames
	}

	/// Number of frames.
	pub fn len(&self) -> usize {
		self.frames.len()
	}

	/// Whether the sequence holds no frames.
	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}
}

/// A displayable sprite state with one sequence slot per view angle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pose {
	/// World-space width the sprite is rendered at.
	pub world_width: u32,
	/// World-space height the sprite is rendered at.
	pub world_height: u32,
	/// Playback rate in frames per second.
	pub frame_rate: u32,
	sequences: [Option<SequenceId>; constants::SLOT_COUNT],
}

impl Pose {
	/// Creates a pose with all view slots empty.
	pub fn new(world_width: u32, world_height: u32, frame_rate: u32) -> Self {
		Self {
			world_width,
			world_height,
			frame_rate,
			sequences: [None; constants::SLOT_COUNT],
		}
	}

	/// The sequence for a view angle, if set.
	pub fn sequence(&self, view: usize) -> Option<SequenceId> {
		self.sequences.get(view).copied().flatten()
	}

	/// Sets or clears the sequence for a view angle.
	///
	/// # Errors
	///
	/// Returns [`JediFileError::SlotOutOfRange`] for views past 31.
	pub fn set_sequence(
		&mut self,
		view: usize,
		sequence: Option<SequenceId>,
	) -> Result<(), JediFileError> {
		if view >= constants::SLOT_COUNT {
			return Err(JediFileError::SlotOutOfRange {
				file_type: FileType::Wax,
				slot: view,
				max: constants::SLOT_COUNT,
			});
		}
		self.sequences[view] = sequence;
		Ok(())
	}

	/// All 32 view slots in order.
	pub fn sequences(&self) -> &[Option<SequenceId>; constants::SLOT_COUNT] {
		&self.sequences
	}

	pub(crate) fn sequences_mut(&mut self) -> &mut [Option<SequenceId>; constants::SLOT_COUNT] {
		&mut self.sequences
	}
}
