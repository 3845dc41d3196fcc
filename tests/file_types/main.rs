//! Integration tests for the `jedi-rs` file formats.

mod archive;
mod sprite;

/// Makes library log output visible when a test fails.
pub fn init_logs() {
	let _ = env_logger::builder().is_test(true).try_init();
}
