use std::io::Read;

use serde::Serialize;
use tracing::debug;

use crate::cly::signature::ZSTD_MAGIC;
use crate::cly::{ClyError, Result};

/// Upper bound on an unwrapped upload.
const UNWRAP_LIMIT: usize = 512 * 1024 * 1024;

/// How an uploaded workspace reached us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Compression {
	/// Bytes as saved by the modeling tool.
	None,
	/// Archived as a zstd frame before upload.
	Zstd,
}

impl Compression {
	/// Label used in reports.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Zstd => "zstd",
		}
	}
}

/// Unwrap an upload that arrived as a zstd archive.
///
/// Workspace files carry no magic of their own, so anything that is not a zstd frame is handed on
/// as-is and the format detector decides what it is.
pub fn decode_bytes(raw: Vec<u8>) -> Result<(Compression, Vec<u8>)> {
	if !raw.starts_with(&ZSTD_MAGIC) {
		return Ok((Compression::None, raw));
	}

	let unwrapped = unwrap_zstd(&raw)?;
	debug!(archived = raw.len(), unwrapped = unwrapped.len(), "unwrapped zstd upload");
	Ok((Compression::Zstd, unwrapped))
}

fn unwrap_zstd(raw: &[u8]) -> Result<Vec<u8>> {
	let decoder = zstd::stream::read::Decoder::new(raw)?;
	let mut out = Vec::new();
	// One byte past the limit tells an exact fit apart from an overflow.
	decoder.take(UNWRAP_LIMIT as u64 + 1).read_to_end(&mut out)?;
	if out.len() > UNWRAP_LIMIT {
		return Err(ClyError::DecompressedTooLarge { limit: UNWRAP_LIMIT });
	}
	Ok(out)
}
