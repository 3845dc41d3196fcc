#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `jedi-rs` reimplements the asset formats of the Jedi engine, the 1995
//! technology behind a certain well-known first-person shooter, so its
//! archives and sprites can be read, edited and rebuilt on modern
//! platforms.

pub use jedi_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use jedi_dylib;
