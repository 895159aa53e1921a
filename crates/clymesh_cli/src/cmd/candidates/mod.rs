use std::path::PathBuf;

use clymesh::cly::{ClyFile, ExtractContext, MeshExtractor, Result, ScoredCandidate};

use crate::cmd::util::{bounds, emit_json, load_config};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub config: Option<PathBuf>,
	/// Maximum candidates printed
	#[arg(long, default_value_t = 10)]
	pub limit: usize,
	#[arg(long)]
	pub json: bool,
}

/// Print every scored mesh candidate, best first.
pub fn run(args: Args) -> Result<()> {
	let Args { path, config, limit, json } = args;

	let config = load_config(config.as_deref())?;
	let file = ClyFile::open(&path)?;
	let report = file.analyze(&config)?;
	let ranked = MeshExtractor::default().score_all(&ExtractContext::new(file.bytes(), &report, &config));
	let rows: Vec<CandidateJson> = ranked.iter().take(limit).enumerate().map(|(rank, item)| candidate_json(rank + 1, item)).collect();

	if json {
		let payload = CandidatesJson {
			path: path.display().to_string(),
			candidate_count: ranked.len(),
			candidates: rows,
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("candidates: {}", ranked.len());
	for row in &rows {
		println!(
			"  #{:<3} score={:.4} strategy={} via={} origin={} vertices={} faces={} bounds_factor={:.3}",
			row.rank, row.score, row.strategy, row.discovered_by, row.origin, row.vertex_count, row.face_count, row.bounds_factor
		);
		if let (Some(min), Some(max)) = (row.bbox_min, row.bbox_max) {
			println!("        bbox=[{} {} {}]..[{} {} {}]", min[0], min[1], min[2], max[0], max[1], max[2]);
		}
	}

	Ok(())
}

fn candidate_json(rank: usize, item: &ScoredCandidate) -> CandidateJson {
	let candidate = &item.candidate;
	let bbox = bounds(&candidate.vertices);
	CandidateJson {
		rank,
		score: item.score,
		strategy: candidate.strategy.as_str(),
		discovered_by: candidate.discovered_by.as_str(),
		origin: candidate.origin,
		vertex_count: candidate.vertices.len(),
		face_count: candidate.faces.len(),
		bounds_factor: candidate.bounds_factor,
		bbox_min: bbox.map(|(min, _)| min),
		bbox_max: bbox.map(|(_, max)| max),
	}
}

#[derive(serde::Serialize)]
struct CandidateJson {
	rank: usize,
	score: f64,
	strategy: &'static str,
	discovered_by: &'static str,
	origin: usize,
	vertex_count: usize,
	face_count: usize,
	bounds_factor: f64,
	bbox_min: Option<[f32; 3]>,
	bbox_max: Option<[f32; 3]>,
}

#[derive(serde::Serialize)]
struct CandidatesJson {
	path: String,
	candidate_count: usize,
	candidates: Vec<CandidateJson>,
}
