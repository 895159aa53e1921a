//! Shared test helpers for workspace crates.

use std::path::{Path, PathBuf};

/// Header text of a real FreeStyle workspace file.
pub const SAMPLE_HEADER: &str = "format FreeStyle Workspace (FWP)
version FreeForm Modeling/135/Tue Dec 29 10:12:32 2009/V10.0
units mm
modelDimensions 10.0 10.0 10.0
bitmap 0 1000
fileVersion 4
coarseTerm -1
endHeader

";

/// Packet markers that follow the sample header.
pub const SAMPLE_PACKETS: &str = "FFDYNPKTObjectListMain
FFDYNPKTModelInfo
numVoxels 1000
numTris 12
";

/// Four bytes that decode as `NaN` and as a huge count: never plausible geometry.
pub const FILLER: [u8; 4] = [0xFF, 0xFF, 0xFF, 0x7F];

/// Resolve the workspace root path.
pub fn workspace_root() -> PathBuf {
	let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
	manifest_dir
		.join("..")
		.join("..")
		.canonicalize()
		.unwrap_or_else(|_| manifest_dir.join("..").join(".."))
}

/// Resolve the workspace target directory.
pub fn target_dir() -> PathBuf {
	std::env::var_os("CARGO_TARGET_DIR")
		.map(PathBuf::from)
		.unwrap_or_else(|| workspace_root().join("target"))
}

/// Write `bytes` to a uniquely named scratch file under the target directory and return its path.
pub fn write_scratch(name: &str, bytes: &[u8]) -> PathBuf {
	let dir = target_dir().join("clymesh-scratch").join(std::process::id().to_string());
	std::fs::create_dir_all(&dir).expect("scratch dir is creatable");
	let path = dir.join(name);
	std::fs::write(&path, bytes).expect("scratch file is writable");
	path
}

/// Incremental builder for synthetic `.cly` buffers.
#[derive(Debug, Clone, Default)]
pub struct ClyBuilder {
	bytes: Vec<u8>,
}

impl ClyBuilder {
	/// Start an empty buffer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Start with [`SAMPLE_HEADER`] followed by [`SAMPLE_PACKETS`].
	pub fn sample() -> Self {
		Self::new().text(SAMPLE_HEADER).text(SAMPLE_PACKETS)
	}

	/// Append text bytes.
	pub fn text(self, text: &str) -> Self {
		self.bytes(text.as_bytes())
	}

	/// Append raw bytes.
	pub fn bytes(mut self, bytes: &[u8]) -> Self {
		self.bytes.extend_from_slice(bytes);
		self
	}

	/// Append `len` bytes of [`FILLER`].
	pub fn filler(mut self, len: usize) -> Self {
		self.bytes.extend(FILLER.iter().copied().cycle().take(len));
		self
	}

	/// Append `len` copies of `byte`.
	pub fn fill(mut self, byte: u8, len: usize) -> Self {
		self.bytes.extend(std::iter::repeat_n(byte, len));
		self
	}

	/// Append a little-endian `u32`.
	pub fn u32(mut self, value: u32) -> Self {
		self.bytes.extend_from_slice(&value.to_le_bytes());
		self
	}

	/// Append float triples without a count prefix.
	pub fn raw_vertices(mut self, vertices: &[[f32; 3]]) -> Self {
		for vertex in vertices {
			for coord in vertex {
				self.bytes.extend_from_slice(&coord.to_le_bytes());
			}
		}
		self
	}

	/// Append index triples without a count prefix.
	pub fn raw_faces(mut self, faces: &[[u32; 3]]) -> Self {
		for face in faces {
			for index in face {
				self.bytes.extend_from_slice(&index.to_le_bytes());
			}
		}
		self
	}

	/// Append a counted vertex section.
	pub fn vertex_section(self, vertices: &[[f32; 3]]) -> Self {
		self.u32(count(vertices.len())).raw_vertices(vertices)
	}

	/// Append a counted face section.
	pub fn face_section(self, faces: &[[u32; 3]]) -> Self {
		self.u32(count(faces.len())).raw_faces(faces)
	}

	/// Current buffer length.
	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	/// Whether nothing was appended yet.
	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	/// Finish the buffer.
	pub fn build(self) -> Vec<u8> {
		self.bytes
	}
}

fn count(len: usize) -> u32 {
	u32::try_from(len).expect("test section fits u32")
}

/// Closed box spanning `[0, size]` on each axis: 8 vertices, 12 outward-wound triangles.
pub fn box_mesh(size: [f32; 3]) -> (Vec<[f32; 3]>, Vec<[u32; 3]>) {
	let [x, y, z] = size;
	let vertices = vec![
		[0.0, 0.0, 0.0],
		[x, 0.0, 0.0],
		[x, y, 0.0],
		[0.0, y, 0.0],
		[0.0, 0.0, z],
		[x, 0.0, z],
		[x, y, z],
		[0.0, y, z],
	];
	let faces = vec![
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
	(vertices, faces)
}

/// One decoded STL facet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StlTriangle {
	/// Facet normal.
	pub normal: [f32; 3],
	/// Corner positions in file order.
	pub vertices: [[f32; 3]; 3],
	/// Binary attribute byte count (`0` for ASCII input).
	pub attribute: u16,
}

/// Decode a binary STL; `None` when the layout is inconsistent.
pub fn decode_binary_stl(bytes: &[u8]) -> Option<Vec<StlTriangle>> {
	let count = u32::from_le_bytes(bytes.get(80..84)?.try_into().ok()?) as usize;
	if bytes.len() != 84 + count * 50 {
		return None;
	}

	let mut out = Vec::with_capacity(count);
	for record in bytes[84..].chunks_exact(50) {
		let floats: Vec<f32> = record[..48]
			.chunks_exact(4)
			.map(|raw| f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
			.collect();
		out.push(StlTriangle {
			normal: [floats[0], floats[1], floats[2]],
			vertices: [
				[floats[3], floats[4], floats[5]],
				[floats[6], floats[7], floats[8]],
				[floats[9], floats[10], floats[11]],
			],
			attribute: u16::from_le_bytes([record[48], record[49]]),
		});
	}
	Some(out)
}

/// Decode an ASCII STL; `None` when the keyword structure is broken.
pub fn decode_ascii_stl(text: &str) -> Option<Vec<StlTriangle>> {
	let mut lines = text.lines().map(str::trim);
	if !lines.next()?.starts_with("solid") {
		return None;
	}

	let mut out = Vec::new();
	loop {
		let line = lines.next()?;
		if line.starts_with("endsolid") {
			return Some(out);
		}

		let normal = parse_triple(line.strip_prefix("facet normal")?)?;
		if lines.next()? != "outer loop" {
			return None;
		}
		let mut vertices = [[0.0_f32; 3]; 3];
		for vertex in &mut vertices {
			*vertex = parse_triple(lines.next()?.strip_prefix("vertex")?)?;
		}
		if lines.next()? != "endloop" || lines.next()? != "endfacet" {
			return None;
		}

		out.push(StlTriangle {
			normal,
			vertices,
			attribute: 0,
		});
	}
}

fn parse_triple(text: &str) -> Option<[f32; 3]> {
	let mut tokens = text.split_whitespace().map(|token| token.parse::<f32>());
	let triple = [tokens.next()?.ok()?, tokens.next()?.ok()?, tokens.next()?.ok()?];
	tokens.next().is_none().then_some(triple)
}
