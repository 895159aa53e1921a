use clymesh_testkit::{ClyBuilder, box_mesh};

use super::bounds::inside_fraction;
use crate::cly::{
	AnalysisReport, BoundsRefinement, CandidateMesh, ClyError, ExtractContext, Face, MeshExtractor, PatternProximity, Plausibility, Refinement, ScanConfig, SectionScan,
	Strategy, StrategyId, Vertex, analyze, extract, score,
};

struct Fixed(Vec<CandidateMesh>);

impl Strategy for Fixed {
	fn id(&self) -> StrategyId {
		StrategyId::SectionScan
	}

	fn generate(&self, _ctx: &ExtractContext<'_>) -> Vec<CandidateMesh> {
		self.0.clone()
	}
}

fn report_for(bytes: &[u8], config: &ScanConfig) -> AnalysisReport {
	analyze(bytes, config).expect("default config is valid")
}

fn vertices(raw: &[[f32; 3]]) -> Vec<Vertex> {
	raw.iter().copied().map(Vertex::from).collect()
}

fn faces(raw: &[[u32; 3]]) -> Vec<Face> {
	raw.iter().copied().map(Face::from).collect()
}

const TRIANGLE: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

#[test]
fn section_scan_reads_three_vertex_block_with_faces() {
	let bytes = ClyBuilder::new().vertex_section(&TRIANGLE).face_section(&[[0, 1, 2]]).build();
	let config = ScanConfig::default();
	let report = report_for(&bytes, &config);

	let candidates = SectionScan.generate(&ExtractContext::new(&bytes, &report, &config));

	assert_eq!(candidates.len(), 1);
	let candidate = &candidates[0];
	assert_eq!(candidate.origin, 0);
	assert_eq!(candidate.vertices, vertices(&TRIANGLE));
	assert_eq!(candidate.faces, vec![Face::new(0, 1, 2)]);

	let mesh = extract(&bytes, &report, &config).expect("triangle is recoverable");
	assert_eq!(mesh.strategy(), Some(StrategyId::SectionScan));
	assert_eq!(mesh.origin(), 0);
	assert_eq!(mesh.faces().len(), 1);
}

#[test]
fn section_scan_keeps_vertex_block_without_faces() {
	let bytes = ClyBuilder::new().vertex_section(&TRIANGLE).filler(64).build();
	let config = ScanConfig::default();
	let report = report_for(&bytes, &config);

	let candidates = SectionScan.generate(&ExtractContext::new(&bytes, &report, &config));

	assert_eq!(candidates.len(), 1);
	assert!(candidates[0].faces.is_empty());
}

#[test]
fn section_scan_ignores_counts_that_do_not_fit() {
	let bytes = ClyBuilder::new().u32(1000).raw_vertices(&TRIANGLE).build();
	let config = ScanConfig::default();
	let report = report_for(&bytes, &config);

	assert!(SectionScan.generate(&ExtractContext::new(&bytes, &report, &config)).is_empty());
}

#[test]
fn all_zero_buffer_has_no_geometry() {
	let bytes = vec![0_u8; 1024];
	let config = ScanConfig::default();
	let report = report_for(&bytes, &config);

	let err = extract(&bytes, &report, &config).expect_err("zero fill is not a mesh");
	assert!(matches!(err, ClyError::NoGeometryFound));
}

#[test]
fn malformed_candidate_is_never_selected() {
	let config = ScanConfig::default();
	let report = report_for(&[], &config);
	let ctx = ExtractContext::new(&[], &report, &config);

	let many: Vec<[f32; 3]> = (0..1000).map(|idx| [idx as f32, 1.0, 2.0]).collect();
	let malformed = CandidateMesh::new(StrategyId::SectionScan, 0, vertices(&many), faces(&[[0, 1, 5000]]));
	let valid = CandidateMesh::new(StrategyId::PatternProximity, 100, vertices(&TRIANGLE), Vec::new());

	let extractor = MeshExtractor::empty().with_strategy(Fixed(vec![malformed.clone(), valid.clone()]));
	let ranked = extractor.score_all(&ctx);
	assert_eq!(ranked.len(), 1);
	assert_eq!(ranked[0].candidate, valid);

	let mesh = extractor.extract(&ctx).expect("valid candidate wins");
	assert_eq!(mesh.origin(), 100);

	let only_malformed = MeshExtractor::empty().with_strategy(Fixed(vec![malformed]));
	assert!(matches!(only_malformed.extract(&ctx), Err(ClyError::NoGeometryFound)));
}

#[test]
fn ranking_breaks_ties_by_origin_then_strategy() {
	let config = ScanConfig::default();
	let report = report_for(&[], &config);
	let ctx = ExtractContext::new(&[], &report, &config);

	let later = CandidateMesh::new(StrategyId::SectionScan, 40, vertices(&TRIANGLE), Vec::new());
	let proximity = CandidateMesh::new(StrategyId::PatternProximity, 8, vertices(&TRIANGLE), Vec::new());
	let section = CandidateMesh::new(StrategyId::SectionScan, 8, vertices(&TRIANGLE), Vec::new());

	let ranked = MeshExtractor::empty().with_strategy(Fixed(vec![later, proximity, section])).score_all(&ctx);

	let order: Vec<_> = ranked.iter().map(|item| (item.candidate.origin, item.candidate.strategy)).collect();
	assert_eq!(
		order,
		vec![(8, StrategyId::SectionScan), (8, StrategyId::PatternProximity), (40, StrategyId::SectionScan)]
	);
}

#[test]
fn faced_candidate_outranks_boosted_faceless_one() {
	let bytes = ClyBuilder::sample().build();
	let config = ScanConfig::default();
	let report = report_for(&bytes, &config);
	let ctx = ExtractContext::new(&bytes, &report, &config);

	let inside = CandidateMesh::new(StrategyId::SectionScan, 10, vertices(&TRIANGLE), Vec::new());
	let outside = CandidateMesh::new(
		StrategyId::SectionScan,
		50,
		vertices(&[[500.0, 0.0, 0.0], [0.0, 500.0, 0.0], [0.0, 0.0, 500.0]]),
		faces(&[[0, 1, 2]]),
	);

	let extractor = MeshExtractor::empty()
		.with_strategy(Fixed(vec![inside, outside]))
		.with_refinement(BoundsRefinement);
	let ranked = extractor.score_all(&ctx);

	assert_eq!(ranked.len(), 2);
	assert!(ranked[1].score > ranked[0].score, "bounds boost lifts the faceless score: {ranked:?}");
	assert_eq!(ranked[0].candidate.origin, 50);

	let mesh = extractor.extract(&ctx).expect("faced candidate wins");
	assert_eq!(mesh.faces().len(), 1);
}

#[test]
fn score_weights_plausibility_faces_and_size() {
	let plausibility = Plausibility::new(1.0e5);
	let (box_vertices, box_faces) = box_mesh([10.0, 10.0, 10.0]);

	let with_faces = CandidateMesh::new(StrategyId::SectionScan, 0, vertices(&box_vertices), faces(&box_faces));
	let expected = 0.45 + 0.45 + 0.10 * (9.0_f64.log10() / 6.0);
	let actual = score(&with_faces, plausibility).expect("valid candidate scores");
	assert!((actual - expected).abs() < 1e-12);

	let without_faces = CandidateMesh::new(StrategyId::SectionScan, 0, vertices(&box_vertices), Vec::new());
	assert!(score(&without_faces, plausibility).is_some_and(|value| value < actual));

	let empty = CandidateMesh::new(StrategyId::SectionScan, 0, Vec::new(), Vec::new());
	assert_eq!(score(&empty, plausibility), None);
}

#[test]
fn proximity_finds_uncounted_run_after_marker() {
	let (box_vertices, box_faces) = box_mesh([2.0, 3.0, 4.0]);
	let bytes = ClyBuilder::new().text("VERTEX_BLOCK").filler(4).raw_vertices(&box_vertices).raw_faces(&box_faces).build();
	let config = ScanConfig::default();
	let report = report_for(&bytes, &config);

	let candidates = PatternProximity.generate(&ExtractContext::new(&bytes, &report, &config));

	assert_eq!(candidates.len(), 1, "anchors sharing one run yield one candidate");
	let candidate = &candidates[0];
	assert_eq!(candidate.origin, 16);
	assert_eq!(candidate.vertices, vertices(&box_vertices));
	assert_eq!(candidate.faces, faces(&box_faces));
}

#[test]
fn proximity_face_run_stops_at_zero_padding() {
	let (box_vertices, box_faces) = box_mesh([2.0, 3.0, 4.0]);
	let bytes = ClyBuilder::new()
		.text("VERTEX_BLOCK")
		.filler(4)
		.raw_vertices(&box_vertices)
		.raw_faces(&box_faces)
		.fill(0, 240)
		.build();
	let config = ScanConfig::default();
	let report = report_for(&bytes, &config);

	let candidates = PatternProximity.generate(&ExtractContext::new(&bytes, &report, &config));

	let candidate = candidates.iter().find(|item| item.origin == 16).expect("run after marker is found");
	assert_eq!(candidate.vertices, vertices(&box_vertices));
	assert_eq!(candidate.faces, faces(&box_faces));
	assert!(candidates.iter().flat_map(|item| &item.faces).all(|face| !face.is_degenerate()));
}

#[test]
fn proximity_face_run_is_capped_by_window() {
	let (box_vertices, box_faces) = box_mesh([2.0, 3.0, 4.0]);
	let bytes = ClyBuilder::new().text("VERTEX_BLOCK").filler(4).raw_vertices(&box_vertices).raw_faces(&box_faces).build();
	let config = ScanConfig {
		proximity_window: 112,
		..ScanConfig::default()
	};
	let report = report_for(&bytes, &config);

	let candidates = PatternProximity.generate(&ExtractContext::new(&bytes, &report, &config));

	let candidate = candidates.iter().find(|item| item.origin == 16).expect("run fits the window");
	assert_eq!(candidate.vertices.len(), 8);
	assert_eq!(candidate.faces, faces(&box_faces[..9]));
}

#[test]
fn proximity_without_anchors_finds_nothing() {
	let bytes = ClyBuilder::new().raw_vertices(&[[1.5, 2.5, 3.5], [4.5, 5.5, 6.5], [7.5, 8.5, 9.5]]).build();
	let config = ScanConfig::default();
	let report = report_for(&bytes, &config);

	assert!(report.findings.is_empty());
	assert!(PatternProximity.generate(&ExtractContext::new(&bytes, &report, &config)).is_empty());
}

#[test]
fn bounds_refinement_rewards_geometry_matching_header() {
	let bytes = ClyBuilder::sample().build();
	let config = ScanConfig::default();
	let report = report_for(&bytes, &config);
	let ctx = ExtractContext::new(&bytes, &report, &config);

	let (box_vertices, box_faces) = box_mesh([10.0, 10.0, 10.0]);
	let fitting = CandidateMesh::new(StrategyId::SectionScan, 0, vertices(&box_vertices), faces(&box_faces));
	let far = CandidateMesh::new(StrategyId::SectionScan, 1, vertices(&[[500.0, 0.0, 0.0], [0.0, 500.0, 0.0], [0.0, 0.0, 500.0]]), Vec::new());
	let mixed = CandidateMesh::new(
		StrategyId::PatternProximity,
		2,
		vertices(&[[1.0, 1.0, 1.0], [2.0, 2.0, 2.0], [500.0, 0.0, 0.0], [0.0, 500.0, 0.0]]),
		Vec::new(),
	);

	let refined = BoundsRefinement.refine(&ctx, vec![fitting, far, mixed]);

	let factors: Vec<f64> = refined.iter().map(|item| item.bounds_factor).collect();
	assert!((factors[0] - 1.25 * 1.1).abs() < 1e-12, "inside and numTris match: {factors:?}");
	assert!((factors[1] - 0.5).abs() < 1e-12);
	assert!((factors[2] - 1.0).abs() < 1e-12);
	assert!(refined.iter().all(|item| item.strategy == StrategyId::BoundsRefinement));
	assert_eq!(refined[2].discovered_by, StrategyId::PatternProximity);
}

#[test]
fn bounds_refinement_without_dimensions_is_identity() {
	let config = ScanConfig::default();
	let report = report_for(&[], &config);
	let ctx = ExtractContext::new(&[], &report, &config);
	let candidate = CandidateMesh::new(StrategyId::SectionScan, 0, vertices(&TRIANGLE), Vec::new());

	assert_eq!(BoundsRefinement.refine(&ctx, vec![candidate.clone()]), vec![candidate]);
}

#[test]
fn inside_test_is_symmetric_with_tolerance() {
	let inside = vertices(&[[-10.9, 10.9, 0.0], [5.0, -5.0, 5.0]]);
	let outside = vertices(&[[11.5, 0.0, 0.0], [0.0, 0.0, -11.5]]);

	assert!((inside_fraction(&inside, [10.0, 10.0, 10.0], 0.1) - 1.0).abs() < 1e-12);
	assert_eq!(inside_fraction(&outside, [10.0, 10.0, 10.0], 0.1), 0.0);
	assert_eq!(inside_fraction(&[], [10.0, 10.0, 10.0], 0.1), 0.0);
}

#[test]
fn sample_file_box_is_recovered_and_boosted() {
	let (box_vertices, box_faces) = box_mesh([10.0, 10.0, 10.0]);
	let bytes = ClyBuilder::sample().vertex_section(&box_vertices).face_section(&box_faces).build();
	let config = ScanConfig::default();
	let report = report_for(&bytes, &config);

	let mesh = extract(&bytes, &report, &config).expect("box is recoverable");

	assert_eq!(mesh.vertices(), vertices(&box_vertices).as_slice());
	assert_eq!(mesh.faces(), faces(&box_faces).as_slice());
	assert_eq!(mesh.strategy(), Some(StrategyId::BoundsRefinement));
	assert_eq!(mesh.origin(), ClyBuilder::sample().len());
	let expected = (0.9 + 0.10 * (9.0_f64.log10() / 6.0)) * 1.25 * 1.1;
	assert!((mesh.score() - expected).abs() < 1e-9);
}

#[test]
fn extract_rejects_invalid_config() {
	let config = ScanConfig {
		min_vertices: 0,
		..ScanConfig::default()
	};
	let report = report_for(&[], &ScanConfig::default());

	assert!(matches!(extract(&[], &report, &config), Err(ClyError::InvalidConfig { .. })));
}
