//! `.WAX` composite sprite support.
//!
//! A WAX file describes a fully animated world sprite as a hierarchy:
//!
//! - up to 32 **pose** slots (a displayable state, e.g. walking, dying),
//! - each pose holds up to 32 **sequence** slots (one per view angle),
//! - each sequence is an ordered list of up to 32 **frames**,
//! - each frame anchors and optionally mirrors a **cell** (the pixels).
//!
//! # File Structure
//!
//! ```text
//! Offset  Size  Field            Description
//! ------  ----  ---------------  -----------------------------------
//! 0x00    4     version          Format version (see constants)
//! 0x04    4     num_poses        Distinct pose records
//! 0x08    4     num_sequences    Distinct sequence records
//! 0x0C    4     num_frames       Distinct frame records
//! 0x10    16    pad
//! 0x20    128   pose_offsets     32 u32 offsets, 0 = empty slot
//! 0xA0    -     records          Pose, sequence, frame, cell records
//! ```
//!
//! Pose record (160 bytes): u32 `world_width`, `world_height`,
//! `frame_rate`, 20 pad bytes, then 32 u32 sequence offsets.
//! Sequence record (144 bytes): 16 pad bytes, then 32 u32 frame offsets.
//! Frame record (32 bytes): i32 `insert_x`, `insert_y`, u32 flip,
//! u32 cell offset, 16 pad bytes. Cell records are shared with FME
//! (see [`crate::file::cell`]).
//!
//! # Sharing
//!
//! The format has no reference-counting of any kind: the only identity
//! signal on disk is an *equal offset*. Two pose slots pointing at the same
//! record are one pose; two frames pointing at the same cell record share
//! their pixels. Loading therefore resolves every offset through an
//! offset-to-index map so aliased records land on the same arena index, and
//! saving deduplicates by index so each distinct node is written exactly
//! once. Unused slots are written as offset 0, never as shared records.
//!
//! In memory the hierarchy lives in per-level arenas indexed by typed ids
//! ([`PoseId`], [`SequenceId`], [`FrameId`], [`CellId`]); aliasing is
//! expressed by equal ids, and the graph is acyclic by construction since
//! ids only ever point one level down.
//!
//! # Examples
//!
//! ```
//! use jedi_types::file::cell::Cell;
//! use jedi_types::file::wax::{File, Frame, Pose, Sequence};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut wax = File::new();
//!
//! let cell = wax.add_cell(Cell::blank(16, 24));
//! let frame = wax.add_frame(Frame::new(-8, -24, false, cell));
//! let seq = wax.add_sequence(Sequence::from_frames(vec![frame])?);
//!
//! let mut pose = Pose::new(16, 24, 12);
//! pose.set_sequence(0, Some(seq))?;
//! let pose = wax.add_pose(pose);
//! wax.set_pose_slot(0, Some(pose))?;
//!
//! let bytes = wax.to_bytes()?;
//! let loaded = File::from_bytes(&bytes)?;
//! assert_eq!(loaded.num_poses(), 1);
//! # Ok(())
//! # }
//! ```

mod file;
mod graph;

pub use self::file::File;
pub use self::graph::{CellId, Frame, FrameId, Pose, PoseId, Sequence, SequenceId};

/// WAX file constants.
pub mod constants {
	/// Format version, doubling as the magic number
	pub const VERSION: u32 = 0x0010_0100;

	/// Size of the file header in bytes
	pub const HEADER_SIZE: usize = 32;

	/// Number of slots in every slot table (poses, views, frames)
	pub const SLOT_COUNT: usize = 32;

	/// Size of a slot table in bytes
	pub const SLOT_TABLE_SIZE: usize = SLOT_COUNT * 4;

	/// Offset of the pose slot table
	pub const POSE_TABLE_OFFSET: usize = HEADER_SIZE;

	/// Offset of the first record
	pub const RECORDS_OFFSET: usize = HEADER_SIZE + SLOT_TABLE_SIZE;

	/// Size of a pose record (fixed part plus sequence slot table)
	pub const POSE_RECORD_SIZE: usize = 32 + SLOT_TABLE_SIZE;

	/// Size of a sequence record (pad plus frame slot table)
	pub const SEQUENCE_RECORD_SIZE: usize = 16 + SLOT_TABLE_SIZE;

	/// Size of a frame record
	pub const FRAME_RECORD_SIZE: usize = 32;
}
