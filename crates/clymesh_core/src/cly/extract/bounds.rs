use tracing::debug;

use crate::cly::{CandidateMesh, StrategyId, Vertex};

use super::{ExtractContext, Refinement};

/// Inside fraction at or above which a candidate is boosted.
const INSIDE_BOOST_FRACTION: f64 = 0.9;
/// Inside fraction below which a candidate is penalized.
const INSIDE_PENALTY_FRACTION: f64 = 0.5;

/// Re-scores candidates against the header's declared model dimensions.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundsRefinement;

impl Refinement for BoundsRefinement {
	fn id(&self) -> StrategyId {
		StrategyId::BoundsRefinement
	}

	fn refine(&self, ctx: &ExtractContext<'_>, candidates: Vec<CandidateMesh>) -> Vec<CandidateMesh> {
		let Some(dimensions) = ctx.report.declared_dimensions() else {
			return candidates;
		};
		let declared_tris = ctx.report.declared_triangles();
		let tolerance = ctx.config.bounds_tolerance_fraction;

		candidates
			.into_iter()
			.map(|candidate| {
				let inside = inside_fraction(&candidate.vertices, dimensions, tolerance);
				let mut factor = if inside >= INSIDE_BOOST_FRACTION {
					1.25
				} else if inside < INSIDE_PENALTY_FRACTION {
					0.5
				} else {
					1.0
				};
				if declared_tris.is_some_and(|tris| tris == candidate.faces.len() as u64) {
					factor *= 1.1;
				}

				debug!(origin = candidate.origin, inside, factor, "bounds factor");
				candidate.refined(StrategyId::BoundsRefinement, factor)
			})
			.collect()
	}
}

/// Share of `vertices` within the declared box on every axis.
pub(super) fn inside_fraction(vertices: &[Vertex], dimensions: [f32; 3], tolerance: f64) -> f64 {
	if vertices.is_empty() {
		return 0.0;
	}

	let limits = dimensions.map(|extent| f64::from(extent).abs() * (1.0 + tolerance));
	let inside = vertices
		.iter()
		.filter(|vertex| vertex.coords().iter().zip(limits).all(|(coord, limit)| f64::from(*coord).abs() <= limit))
		.count();
	inside as f64 / vertices.len() as f64
}
