//! Load-time warnings for recoverable format anomalies.
//!
//! A warning records an anomaly that still permits a best-effort result,
//! such as a count mismatch between a header and the data that follows, or
//! a duplicated header whose copies disagree. Warnings are accumulated per
//! load call and surfaced as an ordered list; they are never raised as
//! errors. Every load constructs a fresh file value, so a warning list can
//! never carry over from a previous call.

use serde::{Deserialize, Serialize};

/// A single recoverable anomaly encountered while loading a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Warning {
	/// Byte position in the source data the anomaly was detected at.
	pub position: u64,
	/// Human-readable description of the anomaly.
	pub message: String,
}

impl Warning {
	/// Creates a new warning.
	pub fn new(position: u64, message: impl Into<String>) -> Self {
		Self {
			position,
			message: message.into(),
		}
	}
}

impl std::fmt::Display for Warning {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "@{:#X}: {}", self.position, self.message)
	}
}

/// Appends a warning to `list` and mirrors it on the `log` facade.
pub(crate) fn push(list: &mut Vec<Warning>, position: u64, message: impl Into<String>) {
	let warning = Warning::new(position, message);
	log::warn!("{warning}");
	list.push(warning);
}
