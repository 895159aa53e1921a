//! Byte-level scanning primitives.
//!
//! Every `find_*` function is a thin wrapper over a resumable scanner. Scanners report only matches
//! whose first byte lies inside the requested start range, but may read past the end of that range
//! while a match continues, so walking a buffer window by window yields exactly the same output as a
//! single pass over the whole buffer.

use std::ops::Range;

use serde::Serialize;

use crate::cly::bytes::serialize_hex;
use crate::cly::signature::Signature;
use crate::cly::{ClyError, Result};

/// Maximum number of bytes of an ASCII run kept as preview text.
pub const ASCII_PREVIEW_LIMIT: usize = 96;
/// Default window size used to walk large buffers.
pub const DEFAULT_WINDOW: usize = 1 << 20;

/// One signature occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MagicMatch {
	/// Byte offset of the first matched byte.
	pub offset: usize,
	/// Signature label from the table.
	pub name: String,
	/// Matched literal bytes.
	#[serde(serialize_with = "serialize_hex")]
	pub bytes: Vec<u8>,
}

/// Maximal run of printable ASCII bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AsciiRun {
	/// Byte offset of the run start.
	pub offset: usize,
	/// Full run length in bytes.
	pub length: usize,
	/// Run text, truncated to [`ASCII_PREVIEW_LIMIT`] bytes.
	pub text: String,
}

/// Consecutive repetitions of one fixed-length byte pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepeatRun {
	/// Byte offset of the first repetition.
	pub offset: usize,
	/// Repeated bytes.
	#[serde(serialize_with = "serialize_hex")]
	pub pattern: Vec<u8>,
	/// Number of contiguous repetitions.
	pub repeat_count: usize,
}

impl RepeatRun {
	/// Exclusive end offset of the run.
	pub fn end(&self) -> usize {
		self.offset + self.pattern.len() * self.repeat_count
	}
}

/// Whether `byte` is printable ASCII (`0x20..=0x7E`).
pub fn is_printable(byte: u8) -> bool {
	(0x20..=0x7E).contains(&byte)
}

/// Split `0..len` into consecutive start ranges of at most `size` bytes.
pub fn windows(len: usize, size: usize) -> impl Iterator<Item = Range<usize>> {
	assert!(size > 0, "window size must be non-zero");
	(0..len).step_by(size).map(move |start| start..start.saturating_add(size).min(len))
}

/// Decode a little-endian `f32` at `offset`.
pub fn read_f32_le(buffer: &[u8], offset: usize) -> Result<f32> {
	read4(buffer, offset).map(f32::from_le_bytes)
}

/// Decode a little-endian `u32` at `offset`.
pub fn read_u32_le(buffer: &[u8], offset: usize) -> Result<u32> {
	read4(buffer, offset).map(u32::from_le_bytes)
}

fn read4(buffer: &[u8], offset: usize) -> Result<[u8; 4]> {
	let raw = offset
		.checked_add(4)
		.and_then(|end| buffer.get(offset..end))
		.ok_or(ClyError::OutOfRange {
			at: offset,
			need: 4,
			len: buffer.len(),
		})?;
	let mut buf = [0_u8; 4];
	buf.copy_from_slice(raw);
	Ok(buf)
}

/// Find every non-overlapping occurrence of each signature, in offset order.
pub fn find_magic_numbers(buffer: &[u8], signatures: &[Signature]) -> Vec<MagicMatch> {
	let mut out = Vec::new();
	MagicScanner::new(signatures).scan(buffer, 0..buffer.len(), &mut out);
	out
}

/// Find maximal printable-ASCII runs of at least `min_length` bytes.
pub fn find_ascii_runs(buffer: &[u8], min_length: usize) -> Vec<AsciiRun> {
	let mut out = Vec::new();
	AsciiRunScanner::new(min_length).scan(buffer, 0..buffer.len(), &mut out);
	out
}

/// Find runs of a `pattern_length`-byte pattern repeated at least `min_repeats` times.
///
/// # Panics
///
/// Panics when `pattern_length` or `min_repeats` is zero.
pub fn find_repeating_patterns(buffer: &[u8], pattern_length: usize, min_repeats: usize) -> Vec<RepeatRun> {
	let mut out = Vec::new();
	RepeatScanner::new(pattern_length, min_repeats).scan(buffer, 0..buffer.len(), &mut out);
	out
}

/// Resumable signature scanner.
pub struct MagicScanner<'s> {
	signatures: &'s [Signature],
	next: Vec<usize>,
}

impl<'s> MagicScanner<'s> {
	/// Create a scanner over a signature table.
	pub fn new(signatures: &'s [Signature]) -> Self {
		Self {
			signatures,
			next: vec![0; signatures.len()],
		}
	}

	/// Append matches starting inside `starts`, ordered by offset then table order.
	pub fn scan(&mut self, buffer: &[u8], starts: Range<usize>, out: &mut Vec<MagicMatch>) {
		let first = out.len();

		for (idx, signature) in self.signatures.iter().enumerate() {
			let needle = signature.bytes.as_slice();
			if needle.is_empty() {
				continue;
			}

			let mut pos = starts.start.max(self.next[idx]);
			while pos < starts.end {
				let hay_end = starts.end.saturating_add(needle.len() - 1).min(buffer.len());
				let Some(hay) = buffer.get(pos..hay_end) else {
					break;
				};
				let Some(rel) = hay.windows(needle.len()).position(|window| window == needle) else {
					break;
				};

				let offset = pos + rel;
				out.push(MagicMatch {
					offset,
					name: signature.name.clone(),
					bytes: needle.to_vec(),
				});
				pos = offset + needle.len();
			}
			self.next[idx] = self.next[idx].max(pos);
		}

		out[first..].sort_by_key(|item| item.offset);
	}
}

/// Maximal printable-run scanner.
pub struct AsciiRunScanner {
	min_length: usize,
}

impl AsciiRunScanner {
	/// Create a scanner reporting runs of at least `min_length` bytes.
	pub fn new(min_length: usize) -> Self {
		Self { min_length }
	}

	/// Append runs starting inside `starts`.
	pub fn scan(&self, buffer: &[u8], starts: Range<usize>, out: &mut Vec<AsciiRun>) {
		let mut pos = starts.start;
		let stop = starts.end.min(buffer.len());

		while pos < stop {
			if !is_printable(buffer[pos]) {
				pos += 1;
				continue;
			}

			let end = printable_run_end(buffer, pos);
			// A run entered mid-way belongs to the window holding its first byte.
			let continues_earlier = pos > 0 && is_printable(buffer[pos - 1]);
			if !continues_earlier && end - pos >= self.min_length {
				let preview = &buffer[pos..end.min(pos + ASCII_PREVIEW_LIMIT)];
				out.push(AsciiRun {
					offset: pos,
					length: end - pos,
					text: preview.iter().copied().map(char::from).collect(),
				});
			}
			pos = end;
		}
	}
}

fn printable_run_end(buffer: &[u8], start: usize) -> usize {
	buffer[start..]
		.iter()
		.position(|byte| !is_printable(*byte))
		.map_or(buffer.len(), |rel| start + rel)
}

/// Greedy repeated-pattern scanner for one pattern length.
pub struct RepeatScanner {
	pattern_length: usize,
	min_repeats: usize,
	next: usize,
}

impl RepeatScanner {
	/// Create a scanner.
	///
	/// # Panics
	///
	/// Panics when `pattern_length` or `min_repeats` is zero.
	pub fn new(pattern_length: usize, min_repeats: usize) -> Self {
		assert!(pattern_length > 0, "pattern_length must be non-zero");
		assert!(min_repeats > 0, "min_repeats must be non-zero");
		Self {
			pattern_length,
			min_repeats,
			next: 0,
		}
	}

	/// Configured pattern length.
	pub fn pattern_length(&self) -> usize {
		self.pattern_length
	}

	/// Append runs starting inside `starts`; a reported run suppresses candidates it covers.
	pub fn scan(&mut self, buffer: &[u8], starts: Range<usize>, out: &mut Vec<RepeatRun>) {
		let len = self.pattern_length;
		let mut pos = starts.start.max(self.next);

		while pos < starts.end {
			let Some(pattern) = buffer.get(pos..pos + len) else {
				break;
			};

			let mut count = 1;
			while buffer.get(pos + count * len..pos + (count + 1) * len) == Some(pattern) {
				count += 1;
			}

			if count >= self.min_repeats {
				out.push(RepeatRun {
					offset: pos,
					pattern: pattern.to_vec(),
					repeat_count: count,
				});
				pos += count * len;
			} else {
				pos += 1;
			}
		}

		self.next = self.next.max(pos);
	}
}
