//! Prelude module for `jedi_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use jedi_internal::prelude::*;
//!
//! // Now you can use all common types directly
//! let archive = GobFile::new();
//! let cell = Cell::blank(8, 8);
//! let sprite = WaxFile::new();
//! ```

// Re-export everything from jedi_types::prelude
#[doc(inline)]
pub use jedi_types::prelude::*;

// Re-export the entire jedi_types module for advanced usage
#[doc(inline)]
pub use jedi_types;
