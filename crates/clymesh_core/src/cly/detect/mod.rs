use serde::Serialize;
use tracing::debug;

use crate::cly::bytes::serialize_hex;

/// Closed set of recognized container variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormatKind {
	/// FreeForm Modeling `.cly` model.
	#[serde(rename = "freeform_cly")]
	FreeFormCly,
	/// FreeStyle Workspace (FWP) container.
	#[serde(rename = "freestyle_fwp")]
	FreeStyleFwp,
	/// No known header signature matched.
	#[serde(rename = "unknown")]
	Unknown,
}

impl FormatKind {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::FreeFormCly => "freeform_cly",
			Self::FreeStyleFwp => "freestyle_fwp",
			Self::Unknown => "unknown",
		}
	}
}

/// Detected variant plus the evidence that justified it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatVariant {
	/// Variant tag.
	pub kind: FormatKind,
	/// Offset of the matched header signature (`0` for unknown).
	pub offset: usize,
	/// Matched signature bytes (empty for unknown).
	#[serde(serialize_with = "serialize_hex")]
	pub signature: Vec<u8>,
}

impl FormatVariant {
	/// Variant reported when nothing matched.
	pub fn unknown() -> Self {
		Self {
			kind: FormatKind::Unknown,
			offset: 0,
			signature: Vec::new(),
		}
	}

	/// Whether a header signature was located.
	pub fn is_known(&self) -> bool {
		self.kind != FormatKind::Unknown
	}
}

/// Header rules in priority order.
const HEADER_RULES: &[(FormatKind, &[u8])] = &[
	(FormatKind::FreeStyleFwp, b"format FreeStyle Workspace"),
	(FormatKind::FreeFormCly, b"format FreeForm"),
	(FormatKind::FreeFormCly, b"version FreeForm Modeling"),
];

/// Offsets probed for each rule: file start, after a UTF-8 BOM, and after common wrapper prologues.
pub const HEADER_OFFSETS: &[usize] = &[0, 3, 16, 128, 512];

/// Classify `bytes` by header signature; first rule/offset pair to match wins.
pub fn detect(bytes: &[u8]) -> FormatVariant {
	if bytes.len() < 4 {
		return FormatVariant::unknown();
	}

	for (kind, signature) in HEADER_RULES {
		for offset in HEADER_OFFSETS {
			let matched = bytes.get(*offset..).is_some_and(|tail| tail.starts_with(signature));
			if matched {
				debug!(kind = kind.as_str(), offset, "header signature matched");
				return FormatVariant {
					kind: *kind,
					offset: *offset,
					signature: signature.to_vec(),
				};
			}
		}
	}

	debug!(len = bytes.len(), "no header signature matched");
	FormatVariant::unknown()
}
