use crate::cly::mesh::RECORD_SIZE;
use crate::cly::scanner::read_u32_le;
use crate::cly::{CandidateMesh, Face, StrategyId, Vertex};

use super::{ExtractContext, Strategy};

/// Counted-section scan: a `u32` vertex count followed by that many float triples, then an optional
/// counted face block nearby.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionScan;

impl Strategy for SectionScan {
	fn id(&self) -> StrategyId {
		StrategyId::SectionScan
	}

	fn generate(&self, ctx: &ExtractContext<'_>) -> Vec<CandidateMesh> {
		let bytes = ctx.bytes;
		let mut out = Vec::new();
		let mut offset = ctx.report.body_start();

		while offset < bytes.len() {
			let Some(vertices) = vertex_block(ctx, offset) else {
				offset += 1;
				continue;
			};

			let vertex_end = offset + 4 + vertices.len() * RECORD_SIZE;
			let (faces, end) = find_face_block(bytes, vertex_end, vertices.len(), ctx.config.face_search_window).unwrap_or((Vec::new(), vertex_end));
			out.push(CandidateMesh::new(StrategyId::SectionScan, offset, vertices, faces));
			offset = end;
		}

		out
	}
}

fn vertex_block(ctx: &ExtractContext<'_>, offset: usize) -> Option<Vec<Vertex>> {
	let config = ctx.config;
	let count = read_u32_le(ctx.bytes, offset).ok()? as usize;
	if count < config.min_vertices || count > config.max_vertex_count {
		return None;
	}

	let start = offset + 4;
	let end = count.checked_mul(RECORD_SIZE)?.checked_add(start)?;
	if end > ctx.bytes.len() {
		return None;
	}

	let plausibility = ctx.plausibility();
	let vertices = (0..count)
		.map(|idx| Vertex::read(ctx.bytes, start + idx * RECORD_SIZE).filter(|vertex| plausibility.vertex(*vertex)))
		.collect::<Option<Vec<_>>>()?;
	plausibility.block(&vertices).then_some(vertices)
}

/// First counted face block whose count field starts within `window` bytes of `start`.
///
/// Returns the faces and the offset just past the block.
pub(super) fn find_face_block(bytes: &[u8], start: usize, vertex_count: usize, window: usize) -> Option<(Vec<Face>, usize)> {
	let stop = start.saturating_add(window).min(bytes.len());
	(start..stop).find_map(|pos| counted_faces(bytes, pos, vertex_count))
}

/// Counted face block exactly at `pos`: `m >= 1` followed by `m` index triples below `vertex_count`.
pub(super) fn counted_faces(bytes: &[u8], pos: usize, vertex_count: usize) -> Option<(Vec<Face>, usize)> {
	let count = read_u32_le(bytes, pos).ok()? as usize;
	if count == 0 {
		return None;
	}

	let start = pos + 4;
	let end = count.checked_mul(RECORD_SIZE)?.checked_add(start)?;
	if end > bytes.len() {
		return None;
	}

	let faces = (0..count)
		.map(|idx| Face::read(bytes, start + idx * RECORD_SIZE).filter(|face| face.invalid_index(vertex_count).is_none()))
		.collect::<Option<Vec<_>>>()?;
	Some((faces, end))
}
