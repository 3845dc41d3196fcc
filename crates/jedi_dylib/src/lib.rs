//! Forces dynamic linking of `jedi-rs` when the root crate's
//! `dynamic_linking` feature is enabled. Not for direct use.

pub use jedi_internal::*;
