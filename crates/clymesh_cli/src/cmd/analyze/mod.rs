use std::path::PathBuf;

use clymesh::cly::{AnalysisReport, ChunkKind, ClyFile, Finding, Result, hex_pairs};

use crate::cmd::util::{emit_json, load_config};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub config: Option<PathBuf>,
	/// Maximum findings printed in text mode
	#[arg(long, default_value_t = 40)]
	pub limit: usize,
	#[arg(long)]
	pub json: bool,
}

/// Print the structural report: findings and chunk hypotheses.
pub fn run(args: Args) -> Result<()> {
	let Args { path, config, limit, json } = args;

	let config = load_config(config.as_deref())?;
	let file = ClyFile::open(&path)?;
	let report = file.analyze(&config)?;

	if json {
		let payload = AnalyzeJson {
			path: path.display().to_string(),
			compression: file.compression.as_str(),
			report: &report,
		};
		emit_json(&payload);
		return Ok(());
	}

	print_report(&path, &report, limit);
	Ok(())
}

fn print_report(path: &std::path::Path, report: &AnalysisReport, limit: usize) {
	println!("path: {}", path.display());
	println!("len: {}", report.len);
	println!("format: {}", report.variant.kind.as_str());
	println!("body_start: {}", report.body_start());
	println!("findings: {}{}", report.findings.len(), if report.truncated { " (truncated)" } else { "" });

	for finding in report.findings.iter().take(limit) {
		match finding {
			Finding::MagicNumber(item) => println!("  {:>10}  magic   {}", item.offset, item.name),
			Finding::AsciiRun(item) => println!("  {:>10}  ascii   {:?} ({} bytes)", item.offset, item.text, item.length),
			Finding::RepeatingPattern(item) => println!(
				"  {:>10}  repeat  {} x{}",
				item.offset,
				hex_pairs(&item.pattern, ""),
				item.repeat_count
			),
		}
	}
	if report.findings.len() > limit {
		println!("  ... {} more", report.findings.len() - limit);
	}

	println!("chunks: {}", report.chunks.len());
	for chunk in &report.chunks {
		let label = match &chunk.kind {
			ChunkKind::Header => "header".to_owned(),
			ChunkKind::Packet { name } => format!("packet {name}"),
			ChunkKind::Repeat => "repeat".to_owned(),
		};
		println!("  [{}, {})  {label}", chunk.start, chunk.end);
	}
}

#[derive(serde::Serialize)]
struct AnalyzeJson<'a> {
	path: String,
	compression: &'static str,
	report: &'a AnalysisReport,
}

#[cfg(test)]
mod tests;
