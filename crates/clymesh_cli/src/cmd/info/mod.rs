use std::path::PathBuf;

use clymesh::cly::{AnalysisReport, ClyFile, ClyHeader, Result, ScanConfig};

use crate::cmd::util::{emit_json, or_dash};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
}

/// Print detection, compression, and header fields.
pub fn run(args: Args) -> Result<()> {
	let Args { path, json } = args;

	let file = ClyFile::open(&path)?;
	let AnalysisReport { variant, header, .. } = file.analyze(&ScanConfig::default())?;

	if json {
		let payload = InfoJson {
			path: path.display().to_string(),
			compression: file.compression.as_str(),
			len: file.bytes().len(),
			format: variant.kind.as_str(),
			header_offset: variant.offset,
			signature: (!variant.signature.is_empty()).then(|| String::from_utf8_lossy(&variant.signature).into_owned()),
			header,
		};
		emit_json(&payload);
		return Ok(());
	}

	println!("path: {}", path.display());
	println!("compression: {}", file.compression.as_str());
	println!("len: {}", file.bytes().len());
	println!("format: {}", variant.kind.as_str());
	println!("header_offset: {}", variant.offset);

	let Some(header) = header else {
		return Ok(());
	};
	println!("header_end: {}", header.end);
	println!("header_terminated: {}", header.terminated);
	println!("header_format: {}", or_dash(header.format.as_deref()));
	println!("version: {}", or_dash(header.version.as_deref()));
	println!("units: {}", or_dash(header.units.as_deref()));
	println!(
		"model_dimensions: {}",
		or_dash(header.model_dimensions.map(|[x, y, z]| format!("{x} {y} {z}")))
	);
	println!("num_voxels: {}", or_dash(header.num_voxels));
	println!("num_tris: {}", or_dash(header.num_tris));
	println!("file_version: {}", or_dash(header.file_version));
	for (key, value) in &header.extra {
		println!("  {key}: {value}");
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct InfoJson {
	path: String,
	compression: &'static str,
	len: usize,
	format: &'static str,
	header_offset: usize,
	signature: Option<String>,
	header: Option<ClyHeader>,
}
