use crate::cly::{ClyError, Result};

/// Simple bounded cursor over an immutable byte slice.
pub struct Cursor<'a> {
	bytes: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	/// Create a cursor at `pos`, clamped to the slice length.
	pub fn at(bytes: &'a [u8], pos: usize) -> Self {
		Self {
			bytes,
			pos: pos.min(bytes.len()),
		}
	}

	/// Return current byte offset.
	pub fn pos(&self) -> usize {
		self.pos
	}

	/// Return remaining unread bytes.
	pub fn remaining(&self) -> usize {
		self.bytes.len().saturating_sub(self.pos)
	}

	/// Read exactly `n` bytes and advance cursor.
	pub fn read_exact(&mut self, n: usize) -> Result<&'a [u8]> {
		if n > self.remaining() {
			return Err(ClyError::OutOfRange {
				at: self.pos,
				need: n,
				len: self.bytes.len(),
			});
		}

		let start = self.pos;
		self.pos += n;
		Ok(&self.bytes[start..self.pos])
	}

	/// Read one `\n`-terminated line without the terminator (and without a trailing `\r`).
	///
	/// Returns `None` once the cursor is exhausted. A final line without a terminator is returned as-is.
	pub fn read_line(&mut self) -> Option<&'a [u8]> {
		if self.remaining() == 0 {
			return None;
		}

		let rem = &self.bytes[self.pos..];
		let (line, consumed) = match rem.iter().position(|byte| *byte == b'\n') {
			Some(rel_end) => (&rem[..rel_end], rel_end + 1),
			None => (rem, rem.len()),
		};
		self.pos += consumed;

		Some(line.strip_suffix(b"\r").unwrap_or(line))
	}
}

/// Render bytes as lowercase hex pairs joined by `sep`.
pub fn hex_pairs(bytes: &[u8], sep: &str) -> String {
	let mut out = String::with_capacity(bytes.len() * (2 + sep.len()));
	for (idx, byte) in bytes.iter().enumerate() {
		if idx > 0 {
			out.push_str(sep);
		}
		out.push_str(&format!("{byte:02x}"));
	}
	out
}

pub(crate) fn serialize_hex<S: serde::Serializer>(bytes: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error> {
	serializer.serialize_str(&hex_pairs(bytes, ""))
}
