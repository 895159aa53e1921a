use serde::Serialize;

use crate::cly::bytes::{Cursor, hex_pairs};
use crate::cly::scanner::is_printable;

/// Raw view of a byte window for manual reverse engineering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Probe {
	/// First probed byte.
	pub offset: usize,
	/// Space-separated lowercase hex pairs.
	pub hex: String,
	/// Printable bytes as-is, everything else as `.`.
	pub ascii: String,
	/// Every complete 4-byte group from `offset` decoded as `f32`.
	pub floats: Vec<f32>,
	/// The same groups decoded as `u32`.
	pub ints: Vec<u32>,
}

/// Probe `len` bytes at `offset`, clamped to the buffer.
pub fn probe(bytes: &[u8], offset: usize, len: usize) -> Probe {
	let start = offset.min(bytes.len());
	let end = start.saturating_add(len).min(bytes.len());
	let window = &bytes[start..end];

	let mut floats = Vec::with_capacity(window.len() / 4);
	let mut ints = Vec::with_capacity(window.len() / 4);
	let mut cursor = Cursor::at(window, 0);
	while let Ok(raw) = cursor.read_exact(4) {
		let group = [raw[0], raw[1], raw[2], raw[3]];
		floats.push(f32::from_le_bytes(group));
		ints.push(u32::from_le_bytes(group));
	}

	Probe {
		offset: start,
		hex: hex_pairs(window, " "),
		ascii: window.iter().map(|byte| if is_printable(*byte) { char::from(*byte) } else { '.' }).collect(),
		floats,
		ints,
	}
}
