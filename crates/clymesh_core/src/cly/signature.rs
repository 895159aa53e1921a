use serde::{Deserialize, Serialize};

/// zstd frame magic used by compressed uploads.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Named byte sequence searched for by the magic-number scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
	/// Stable lowercase label reported in findings.
	pub name: String,
	/// Literal bytes to match.
	pub bytes: Vec<u8>,
}

impl Signature {
	/// Build a signature from a static name and byte literal.
	pub fn new(name: &str, bytes: &[u8]) -> Self {
		Self {
			name: name.to_owned(),
			bytes: bytes.to_vec(),
		}
	}
}

/// Built-in known-signature table.
///
/// Text markers seen in FreeForm workspace files come first, followed by container families that
/// show up embedded in uploads (thumbnails, archives, compressed payloads).
pub fn default_signatures() -> Vec<Signature> {
	vec![
		Signature::new("fwp_format", b"format FreeStyle Workspace"),
		Signature::new("freeform_version", b"FreeForm Modeling"),
		Signature::new("end_header", b"endHeader"),
		Signature::new("ffdynpkt", b"FFDYNPKT"),
		Signature::new("zstd", &ZSTD_MAGIC),
		Signature::new("gzip", &[0x1F, 0x8B, 0x08]),
		Signature::new("zip", b"PK\x03\x04"),
		Signature::new("png", b"\x89PNG\r\n\x1a\n"),
		Signature::new("jpeg", &[0xFF, 0xD8, 0xFF]),
		Signature::new("ole2", &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]),
		Signature::new("stl_ascii", b"solid "),
	]
}
