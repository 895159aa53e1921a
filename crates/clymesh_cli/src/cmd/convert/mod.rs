use std::fs;
use std::path::PathBuf;

use clymesh::cly::{ClyError, ClyFile, Face, FinalMesh, Result, StlFormat, Vertex, export};
use tracing::warn;

use crate::cmd::util::{emit_json, load_config};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Output path (defaults to the input path with an `.stl` extension)
	#[arg(short, long)]
	pub output: Option<PathBuf>,
	/// STL encoding: ascii or binary
	#[arg(long, default_value = "ascii")]
	pub format: String,
	#[arg(long)]
	pub config: Option<PathBuf>,
	/// Emit a box sized from the header when no geometry is recovered
	#[arg(long)]
	pub placeholder: bool,
	#[arg(long)]
	pub json: bool,
}

/// Extract the best mesh and write it as STL.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		output,
		format,
		config,
		placeholder,
		json,
	} = args;

	let format: StlFormat = format.parse()?;
	let config = load_config(config.as_deref())?;
	let file = ClyFile::open(&path)?;

	let (mesh, source) = match file.extract_triangulated(&config) {
		Ok(mesh) => (mesh, "extracted"),
		Err(ClyError::NoGeometryFound) if placeholder => {
			let dimensions = file.analyze(&config)?.declared_dimensions();
			warn!(?dimensions, "no geometry recovered, writing placeholder box");
			(placeholder_box(dimensions.unwrap_or([1.0; 3]))?, "placeholder")
		}
		Err(err) => return Err(err),
	};

	let bytes = export(&mesh, format)?;
	let output = output.unwrap_or_else(|| path.with_extension("stl"));
	fs::write(&output, &bytes)?;

	if json {
		let payload = ConvertJson {
			input: path.display().to_string(),
			output: output.display().to_string(),
			format: format.as_str(),
			source,
			strategy: mesh.strategy().map(|item| item.as_str()),
			score: mesh.score(),
			vertex_count: mesh.vertices().len(),
			triangle_count: mesh.faces().len(),
			bytes: bytes.len(),
		};
		emit_json(&payload);
		return Ok(());
	}

	println!(
		"wrote {} ({} triangles, {format}, {source})",
		output.display(),
		mesh.faces().len()
	);
	Ok(())
}

/// Corner-anchored box spanning `[0, size]` on each axis.
fn placeholder_box(size: [f32; 3]) -> Result<FinalMesh> {
	let [x, y, z] = size;
	let vertices: [[f32; 3]; 8] = [
		[0.0, 0.0, 0.0],
		[x, 0.0, 0.0],
		[x, y, 0.0],
		[0.0, y, 0.0],
		[0.0, 0.0, z],
		[x, 0.0, z],
		[x, y, z],
		[0.0, y, z],
	];
	let faces: [[u32; 3]; 12] = [
		[0, 2, 1],
		[0, 3, 2],
		[4, 5, 6],
		[4, 6, 7],
		[0, 1, 5],
		[0, 5, 4],
		[2, 3, 7],
		[2, 7, 6],
		[1, 2, 6],
		[1, 6, 5],
		[0, 7, 3],
		[0, 4, 7],
	];

	FinalMesh::new(vertices.into_iter().map(Vertex::from).collect(), faces.into_iter().map(Face::from).collect())
}

#[derive(serde::Serialize)]
struct ConvertJson {
	input: String,
	output: String,
	format: &'static str,
	source: &'static str,
	strategy: Option<&'static str>,
	score: f64,
	vertex_count: usize,
	triangle_count: usize,
	bytes: usize,
}
