use serde::Deserialize;

use crate::cly::signature::{Signature, default_signatures};
use crate::cly::{ClyError, Result};

/// Tunable thresholds for analysis and extraction.
///
/// Defaults are stable so identical input always yields identical output. Any subset can be
/// overridden from JSON; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
	/// Largest coordinate magnitude accepted as plausible geometry.
	pub max_coordinate_magnitude: f32,
	/// Pattern lengths used by the repeating-pattern scan (Strategy-2 anchor granularity).
	pub pattern_lengths: Vec<usize>,
	/// Minimum consecutive copies for a repeating-pattern finding.
	pub min_repeats: usize,
	/// Fractional slack added to declared model dimensions during bounds refinement.
	pub bounds_tolerance_fraction: f64,
	/// Minimum printable run length reported as an ASCII marker.
	pub min_ascii_run: usize,
	/// Smallest vertex block accepted by any strategy.
	pub min_vertices: usize,
	/// Largest declared vertex count the section scan will follow.
	pub max_vertex_count: usize,
	/// Bytes searched after a vertex block for its face-count field.
	pub face_search_window: usize,
	/// Half-width of the window searched around each proximity anchor.
	pub proximity_window: usize,
	/// Maximum number of report findings used as proximity anchors.
	pub max_anchors: usize,
	/// Maximum number of findings kept in one report.
	pub max_findings: usize,
	/// Known-signature table for the magic-number scan.
	pub signatures: Vec<Signature>,
}

impl Default for ScanConfig {
	fn default() -> Self {
		Self {
			max_coordinate_magnitude: 1.0e5,
			pattern_lengths: vec![4, 8],
			min_repeats: 4,
			bounds_tolerance_fraction: 0.1,
			min_ascii_run: 4,
			min_vertices: 3,
			max_vertex_count: 10_000_000,
			face_search_window: 4096,
			proximity_window: 4096,
			max_anchors: 256,
			max_findings: 100_000,
			signatures: default_signatures(),
		}
	}
}

impl ScanConfig {
	/// Reject settings that would violate scanner preconditions or make plausibility meaningless.
	pub fn validate(&self) -> Result<()> {
		if self.pattern_lengths.is_empty() {
			return invalid("pattern_lengths must not be empty");
		}
		if self.pattern_lengths.contains(&0) {
			return invalid("pattern_lengths entries must be non-zero");
		}
		if self.min_repeats == 0 {
			return invalid("min_repeats must be non-zero");
		}
		if self.min_ascii_run == 0 {
			return invalid("min_ascii_run must be non-zero");
		}
		if self.min_vertices == 0 {
			return invalid("min_vertices must be non-zero");
		}
		if !(self.max_coordinate_magnitude.is_finite() && self.max_coordinate_magnitude > 0.0) {
			return invalid("max_coordinate_magnitude must be positive and finite");
		}
		if !(self.bounds_tolerance_fraction.is_finite() && self.bounds_tolerance_fraction >= 0.0) {
			return invalid("bounds_tolerance_fraction must be non-negative and finite");
		}
		if self.signatures.iter().any(|item| item.bytes.is_empty()) {
			return invalid("signatures must not contain empty byte sequences");
		}
		Ok(())
	}
}

fn invalid(reason: &str) -> Result<()> {
	Err(ClyError::InvalidConfig { reason: reason.to_owned() })
}
