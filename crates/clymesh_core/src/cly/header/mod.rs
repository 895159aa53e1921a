use serde::Serialize;
use tracing::{debug, warn};

use crate::cly::bytes::Cursor;

/// Parsed textual header fields of a FreeForm file.
///
/// Every field is optional: the header is free text and files in the wild omit or reorder lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClyHeader {
	/// Offset of the first header line.
	pub start: usize,
	/// Offset just past the last consumed header line.
	pub end: usize,
	/// Number of lines consumed.
	pub line_count: usize,
	/// Whether an `endHeader` line was reached.
	pub terminated: bool,
	/// `format` line payload.
	pub format: Option<String>,
	/// `version` line payload.
	pub version: Option<String>,
	/// Model units (`mm`, `in`, ...).
	pub units: Option<String>,
	/// Declared model bounding-box size.
	pub model_dimensions: Option<[f32; 3]>,
	/// Declared voxel count.
	pub num_voxels: Option<u64>,
	/// Declared triangle count.
	pub num_tris: Option<u64>,
	/// `bitmap` line pair.
	pub bitmap: Option<[i64; 2]>,
	/// Declared file version.
	pub file_version: Option<i64>,
	/// `coarseTerm` value.
	pub coarse_term: Option<i64>,
	/// Unrecognized `key value` lines in file order.
	pub extra: Vec<(String, String)>,
}

impl ClyHeader {
	/// Maximum number of lines read before giving up on `endHeader`.
	pub const MAX_LINES: usize = 100;
	/// Lines longer than this are treated as binary payload, not header text.
	pub const MAX_LINE_LEN: usize = 4096;

	/// Parse header lines starting at `start`.
	pub fn parse(bytes: &[u8], start: usize) -> Self {
		let mut header = Self {
			start,
			end: start.min(bytes.len()),
			..Self::default()
		};
		let mut cursor = Cursor::at(bytes, start);

		while header.line_count < Self::MAX_LINES {
			let line_start = cursor.pos();
			let Some(line) = cursor.read_line() else {
				break;
			};
			if line.len() > Self::MAX_LINE_LEN {
				header.end = line_start;
				break;
			}

			header.line_count += 1;
			header.end = cursor.pos();

			let text = String::from_utf8_lossy(line);
			let text = text.trim();
			if text == "endHeader" {
				header.terminated = true;
				break;
			}
			header.apply_line(text);
		}

		if header.terminated {
			debug!(start, end = header.end, lines = header.line_count, "parsed header");
		} else {
			warn!(start, lines = header.line_count, "header has no endHeader line");
		}

		header
	}

	/// Fill a missing `numVoxels`/`numTris` count from a `key value` marker found elsewhere in the file.
	///
	/// Returns `true` when a field was filled.
	pub fn fill_count(&mut self, text: &str) -> bool {
		let Some((key, rest)) = split_key(text.trim()) else {
			return false;
		};
		let slot = match key {
			"numVoxels" => &mut self.num_voxels,
			"numTris" => &mut self.num_tris,
			_ => return false,
		};
		if slot.is_some() {
			return false;
		}

		*slot = first_token(rest).and_then(|token| token.parse().ok());
		slot.is_some()
	}

	fn apply_line(&mut self, text: &str) {
		let Some((key, rest)) = split_key(text) else {
			return;
		};

		match key {
			"format" => self.format = Some(rest.to_owned()),
			"version" => self.version = Some(rest.to_owned()),
			"units" => self.units = first_token(rest).map(str::to_owned),
			"modelDimensions" => {
				self.model_dimensions = parse_array::<f32, 3>(rest);
				if self.model_dimensions.is_none() {
					warn!(value = rest, "unparseable modelDimensions");
				}
			}
			"numVoxels" => self.num_voxels = first_token(rest).and_then(|token| token.parse().ok()),
			"numTris" => self.num_tris = first_token(rest).and_then(|token| token.parse().ok()),
			"bitmap" => self.bitmap = parse_array::<i64, 2>(rest),
			"fileVersion" => self.file_version = first_token(rest).and_then(|token| token.parse().ok()),
			"coarseTerm" => self.coarse_term = first_token(rest).and_then(|token| token.parse().ok()),
			_ => self.extra.push((key.to_owned(), rest.to_owned())),
		}
	}
}

fn split_key(text: &str) -> Option<(&str, &str)> {
	if text.is_empty() {
		return None;
	}
	match text.split_once(char::is_whitespace) {
		Some((key, rest)) => Some((key, rest.trim())),
		None => Some((text, "")),
	}
}

fn first_token(text: &str) -> Option<&str> {
	text.split_whitespace().next()
}

fn parse_array<T: std::str::FromStr + Copy + Default, const N: usize>(text: &str) -> Option<[T; N]> {
	let mut out = [T::default(); N];
	let mut tokens = text.split_whitespace();
	for slot in &mut out {
		*slot = tokens.next()?.parse().ok()?;
	}
	Some(out)
}

#[cfg(test)]
mod tests;
