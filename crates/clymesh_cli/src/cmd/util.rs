use std::fs;
use std::path::Path;

use clymesh::cly::{ClyError, Result, ScanConfig, Vertex};

/// Print `payload` as pretty JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) {
	match serde_json::to_string_pretty(payload) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: failed to serialize json output: {err}"),
	}
}

/// Load scan thresholds from an optional JSON file; missing keys keep defaults.
pub(crate) fn load_config(path: Option<&Path>) -> Result<ScanConfig> {
	let Some(path) = path else {
		return Ok(ScanConfig::default());
	};

	let raw = fs::read(path)?;
	let config: ScanConfig = serde_json::from_slice(&raw).map_err(|err| ClyError::InvalidConfig {
		reason: format!("{}: {err}", path.display()),
	})?;
	config.validate()?;
	Ok(config)
}

/// Parse decimal or `0x`-prefixed hex byte offset literal.
pub(crate) fn parse_offset(value: &str) -> Result<usize> {
	let parsed = if let Some(stripped) = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
		usize::from_str_radix(stripped, 16)
	} else {
		value.parse::<usize>()
	};

	parsed.map_err(|_| ClyError::InvalidOffset { value: value.to_owned() })
}

/// Axis-aligned bounds of `vertices` as `(min, max)`.
pub(crate) fn bounds(vertices: &[Vertex]) -> Option<([f32; 3], [f32; 3])> {
	let first = vertices.first()?.coords();
	Some(vertices.iter().fold((first, first), |(mut min, mut max), vertex| {
		for (axis, value) in vertex.coords().into_iter().enumerate() {
			min[axis] = min[axis].min(value);
			max[axis] = max[axis].max(value);
		}
		(min, max)
	}))
}

/// Render optional value or `-`.
pub(crate) fn or_dash<T: std::fmt::Display>(value: Option<T>) -> String {
	value.map(|item| item.to_string()).unwrap_or_else(|| "-".to_owned())
}
