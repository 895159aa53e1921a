use std::collections::BTreeSet;

use tracing::debug;

use crate::cly::mesh::RECORD_SIZE;
use crate::cly::{CandidateMesh, Face, Finding, Plausibility, StrategyId, Vertex};

use super::section::counted_faces;
use super::{ExtractContext, Strategy};

/// Float-run search around structural anchors (repeating patterns and ASCII markers).
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternProximity;

impl Strategy for PatternProximity {
	fn id(&self) -> StrategyId {
		StrategyId::PatternProximity
	}

	fn generate(&self, ctx: &ExtractContext<'_>) -> Vec<CandidateMesh> {
		let bytes = ctx.bytes;
		let config = ctx.config;
		let plausibility = ctx.plausibility();

		let anchors: Vec<usize> = ctx
			.report
			.findings
			.iter()
			.filter(|finding| matches!(finding, Finding::RepeatingPattern(_) | Finding::AsciiRun(_)))
			.map(Finding::offset)
			.take(config.max_anchors)
			.collect();

		let mut seen = BTreeSet::new();
		let mut out = Vec::new();
		for anchor in anchors {
			let lo = anchor.saturating_sub(config.proximity_window);
			let hi = anchor.saturating_add(config.proximity_window).min(bytes.len());
			let Some((start, vertices)) = longest_run(bytes, lo..hi, plausibility, config.min_vertices) else {
				continue;
			};
			if !seen.insert((start, vertices.len())) {
				continue;
			}

			let run_end = start + vertices.len() * RECORD_SIZE;
			let faces = trailing_faces(bytes, run_end, vertices.len(), config.proximity_window);
			debug!(anchor, start, vertices = vertices.len(), faces = faces.len(), "float run near anchor");
			out.push(CandidateMesh::new(StrategyId::PatternProximity, start, vertices, faces));
		}

		out
	}
}

/// Longest chain of consecutive plausible triples starting and ending inside `window`.
///
/// Only chains forming a plausible block count; ties go to the earliest start.
fn longest_run(bytes: &[u8], window: std::ops::Range<usize>, plausibility: Plausibility, min_vertices: usize) -> Option<(usize, Vec<Vertex>)> {
	let lo = window.start;
	let span = window.end.saturating_sub(lo);

	// chain[i]: plausible triples starting at lo + i, stepping by RECORD_SIZE.
	let mut chain = vec![0_usize; span];
	for idx in (0..span).rev() {
		let offset = lo + idx;
		if offset + RECORD_SIZE > window.end {
			continue;
		}
		if Vertex::read(bytes, offset).is_some_and(|vertex| plausibility.vertex(vertex)) {
			chain[idx] = 1 + chain.get(idx + RECORD_SIZE).copied().unwrap_or(0);
		}
	}

	let mut best: Option<(usize, Vec<Vertex>)> = None;
	for idx in 0..span {
		let len = chain[idx];
		let continues_earlier = idx >= RECORD_SIZE && chain[idx - RECORD_SIZE] > 0;
		if len < min_vertices || continues_earlier {
			continue;
		}
		if best.as_ref().is_some_and(|(_, found)| found.len() >= len) {
			continue;
		}

		let start = lo + idx;
		let vertices: Vec<Vertex> = (0..len).filter_map(|k| Vertex::read(bytes, start + k * RECORD_SIZE)).collect();
		if plausibility.block(&vertices) {
			best = Some((start, vertices));
		}
	}

	best
}

/// Faces directly after a vertex run: a counted block when one fits, otherwise the run of valid,
/// non-degenerate index triples, at most `limit` bytes long.
fn trailing_faces(bytes: &[u8], start: usize, vertex_count: usize, limit: usize) -> Vec<Face> {
	if let Some((faces, _)) = counted_faces(bytes, start, vertex_count) {
		return faces;
	}

	let stop = start.saturating_add(limit);
	let mut faces = Vec::new();
	let mut offset = start;
	while offset + RECORD_SIZE <= stop {
		let Some(face) = Face::read(bytes, offset) else {
			break;
		};
		if face.invalid_index(vertex_count).is_some() || face.is_degenerate() {
			break;
		}
		faces.push(face);
		offset += RECORD_SIZE;
	}
	faces
}
