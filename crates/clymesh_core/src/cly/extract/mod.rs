//! Multi-strategy mesh extraction.
//!
//! Strategies propose [`CandidateMesh`] values without side effects, refinements re-issue them, and
//! selection scores the survivors. Nothing is chosen until every strategy has run.

use std::cmp::Ordering;

use tracing::{debug, info};

use crate::cly::{AnalysisReport, CandidateMesh, ClyError, FinalMesh, Plausibility, Result, ScanConfig, StrategyId};

mod bounds;
mod proximity;
mod section;

pub use bounds::BoundsRefinement;
pub use proximity::PatternProximity;
pub use section::SectionScan;

/// Inputs shared by every strategy.
#[derive(Debug, Clone, Copy)]
pub struct ExtractContext<'a> {
	/// Decoded file contents.
	pub bytes: &'a [u8],
	/// Structural report for `bytes`.
	pub report: &'a AnalysisReport,
	/// Active thresholds.
	pub config: &'a ScanConfig,
}

impl<'a> ExtractContext<'a> {
	/// Bundle extraction inputs.
	pub fn new(bytes: &'a [u8], report: &'a AnalysisReport, config: &'a ScanConfig) -> Self {
		Self { bytes, report, config }
	}

	/// Plausibility test derived from the active config.
	pub fn plausibility(&self) -> Plausibility {
		Plausibility::from_config(self.config)
	}
}

/// Candidate generator. Finding nothing is an empty vector, never an error.
pub trait Strategy {
	/// Identifier stamped on produced candidates.
	fn id(&self) -> StrategyId;

	/// Propose candidates for `ctx`.
	fn generate(&self, ctx: &ExtractContext<'_>) -> Vec<CandidateMesh>;
}

/// Post-pass that re-issues the pooled candidates of every strategy.
pub trait Refinement {
	/// Identifier stamped on re-issued candidates.
	fn id(&self) -> StrategyId;

	/// Return the replacement candidate pool.
	fn refine(&self, ctx: &ExtractContext<'_>, candidates: Vec<CandidateMesh>) -> Vec<CandidateMesh>;
}

/// Candidate with its selection score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
	/// Scored geometry.
	pub candidate: CandidateMesh,
	/// Selection score; higher wins.
	pub score: f64,
}

/// Ordered strategy pipeline.
pub struct MeshExtractor {
	strategies: Vec<Box<dyn Strategy>>,
	refinements: Vec<Box<dyn Refinement>>,
}

impl Default for MeshExtractor {
	fn default() -> Self {
		Self::empty()
			.with_strategy(SectionScan)
			.with_strategy(PatternProximity)
			.with_refinement(BoundsRefinement)
	}
}

impl MeshExtractor {
	/// Pipeline without strategies.
	pub fn empty() -> Self {
		Self {
			strategies: Vec::new(),
			refinements: Vec::new(),
		}
	}

	/// Append a generating strategy.
	pub fn with_strategy(mut self, strategy: impl Strategy + 'static) -> Self {
		self.strategies.push(Box::new(strategy));
		self
	}

	/// Append a refinement pass.
	pub fn with_refinement(mut self, refinement: impl Refinement + 'static) -> Self {
		self.refinements.push(Box::new(refinement));
		self
	}

	/// Run every strategy and refinement, returning the unscored pool.
	pub fn candidates(&self, ctx: &ExtractContext<'_>) -> Vec<CandidateMesh> {
		let mut pool = Vec::new();
		for strategy in &self.strategies {
			let produced = strategy.generate(ctx);
			debug!(strategy = strategy.id().as_str(), candidates = produced.len(), "strategy finished");
			pool.extend(produced);
		}

		for refinement in &self.refinements {
			pool = refinement.refine(ctx, pool);
			debug!(refinement = refinement.id().as_str(), candidates = pool.len(), "refinement finished");
		}

		pool
	}

	/// Score every usable candidate, best first. Triangulated candidates rank ahead of faceless ones.
	pub fn score_all(&self, ctx: &ExtractContext<'_>) -> Vec<ScoredCandidate> {
		let plausibility = ctx.plausibility();
		let mut scored: Vec<ScoredCandidate> = self
			.candidates(ctx)
			.into_iter()
			.filter_map(|candidate| score(&candidate, plausibility).map(|score| ScoredCandidate { candidate, score }))
			.collect();
		scored.sort_by(rank);
		scored
	}

	/// Select the best candidate.
	pub fn extract(&self, ctx: &ExtractContext<'_>) -> Result<FinalMesh> {
		let best = self.score_all(ctx).into_iter().next().ok_or(ClyError::NoGeometryFound)?;

		info!(
			strategy = best.candidate.strategy.as_str(),
			origin = best.candidate.origin,
			vertices = best.candidate.vertices.len(),
			faces = best.candidate.faces.len(),
			score = best.score,
			"selected mesh candidate"
		);
		Ok(FinalMesh::selected(best.candidate, best.score))
	}
}

/// Score a candidate; `None` when it is empty or references missing vertices.
pub fn score(candidate: &CandidateMesh, plausibility: Plausibility) -> Option<f64> {
	let vertex_count = candidate.vertices.len();
	if vertex_count == 0 || candidate.first_invalid_face().is_some() {
		return None;
	}

	let plausible = candidate.vertices.iter().filter(|vertex| plausibility.vertex(**vertex)).count();
	let p = plausible as f64 / vertex_count as f64;
	let f = if candidate.faces.is_empty() { 0.0 } else { 1.0 };
	let v = ((1.0 + vertex_count as f64).log10() / 6.0).min(1.0);

	Some((0.45 * p + 0.45 * f + 0.10 * v) * candidate.bounds_factor)
}

/// Candidates with faces precede faceless ones regardless of score.
fn rank(left: &ScoredCandidate, right: &ScoredCandidate) -> Ordering {
	left.candidate
		.faces
		.is_empty()
		.cmp(&right.candidate.faces.is_empty())
		.then_with(|| right.score.total_cmp(&left.score))
		.then_with(|| left.candidate.origin.cmp(&right.candidate.origin))
		.then_with(|| left.candidate.discovered_by.cmp(&right.candidate.discovered_by))
		.then_with(|| left.candidate.strategy.cmp(&right.candidate.strategy))
}

/// Extract the best mesh from `bytes` using the default pipeline.
pub fn extract(bytes: &[u8], report: &AnalysisReport, config: &ScanConfig) -> Result<FinalMesh> {
	config.validate()?;
	MeshExtractor::default().extract(&ExtractContext::new(bytes, report, config))
}

/// Like [`extract`], but a winner without faces has nothing to triangulate and is reported as
/// [`ClyError::NoGeometryFound`].
pub fn extract_triangulated(bytes: &[u8], report: &AnalysisReport, config: &ScanConfig) -> Result<FinalMesh> {
	let mesh = extract(bytes, report, config)?;
	if mesh.faces().is_empty() {
		return Err(ClyError::NoGeometryFound);
	}
	Ok(mesh)
}

#[cfg(test)]
mod tests;
