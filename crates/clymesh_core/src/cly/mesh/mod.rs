use crate::cly::scanner::{read_f32_le, read_u32_le};
use crate::cly::{ClyError, Result, ScanConfig};

/// Size of one encoded vertex or face record (three 4-byte values).
pub const RECORD_SIZE: usize = 12;

/// Single-precision vertex position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
	/// X coordinate.
	pub x: f32,
	/// Y coordinate.
	pub y: f32,
	/// Z coordinate.
	pub z: f32,
}

impl Vertex {
	/// Build a vertex from coordinates.
	pub fn new(x: f32, y: f32, z: f32) -> Self {
		Self { x, y, z }
	}

	/// Coordinates as an array.
	pub fn coords(self) -> [f32; 3] {
		[self.x, self.y, self.z]
	}

	/// Decode three little-endian `f32` values at `offset`.
	pub fn read(bytes: &[u8], offset: usize) -> Option<Self> {
		Some(Self {
			x: read_f32_le(bytes, offset).ok()?,
			y: read_f32_le(bytes, offset.checked_add(4)?).ok()?,
			z: read_f32_le(bytes, offset.checked_add(8)?).ok()?,
		})
	}
}

impl From<[f32; 3]> for Vertex {
	fn from([x, y, z]: [f32; 3]) -> Self {
		Self { x, y, z }
	}
}

/// Triangle as three vertex indices; winding is kept as extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
	/// Vertex indices in winding order.
	pub indices: [u32; 3],
}

impl Face {
	/// Build a face from indices.
	pub fn new(a: u32, b: u32, c: u32) -> Self {
		Self { indices: [a, b, c] }
	}

	/// Decode three little-endian `u32` values at `offset`.
	pub fn read(bytes: &[u8], offset: usize) -> Option<Self> {
		Some(Self::new(
			read_u32_le(bytes, offset).ok()?,
			read_u32_le(bytes, offset.checked_add(4)?).ok()?,
			read_u32_le(bytes, offset.checked_add(8)?).ok()?,
		))
	}

	/// First index not below `vertex_count`.
	pub fn invalid_index(self, vertex_count: usize) -> Option<u32> {
		self.indices.into_iter().find(|index| *index as usize >= vertex_count)
	}

	/// Whether all three indices name the same vertex, as zero padding does.
	pub fn is_degenerate(self) -> bool {
		let [a, b, c] = self.indices;
		a == b && b == c
	}
}

impl From<[u32; 3]> for Face {
	fn from(indices: [u32; 3]) -> Self {
		Self { indices }
	}
}

/// Bounds/finiteness test applied to decoded floats.
#[derive(Debug, Clone, Copy)]
pub struct Plausibility {
	max_magnitude: f32,
}

impl Plausibility {
	/// Smallest non-zero magnitude accepted; below this a value is treated as denormal noise.
	pub const MIN_NONZERO: f32 = 1.0e-12;

	/// Plausibility with an explicit magnitude bound.
	pub fn new(max_magnitude: f32) -> Self {
		Self { max_magnitude }
	}

	/// Plausibility using the configured magnitude bound.
	pub fn from_config(config: &ScanConfig) -> Self {
		Self::new(config.max_coordinate_magnitude)
	}

	/// Whether one coordinate is plausible.
	pub fn value(self, value: f32) -> bool {
		let magnitude = value.abs();
		value.is_finite() && magnitude <= self.max_magnitude && (value == 0.0 || magnitude >= Self::MIN_NONZERO)
	}

	/// Whether every coordinate of `vertex` is plausible.
	pub fn vertex(self, vertex: Vertex) -> bool {
		vertex.coords().into_iter().all(|value| self.value(value))
	}

	/// Whether `vertices` is a plausible block: non-empty, all plausible, not all identical.
	pub fn block(self, vertices: &[Vertex]) -> bool {
		let Some(first) = vertices.first() else {
			return false;
		};
		vertices.iter().all(|vertex| self.vertex(*vertex)) && vertices.iter().any(|vertex| vertex != first)
	}
}

/// Extraction heuristic identifiers, in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StrategyId {
	/// Counted vertex/face section scan.
	SectionScan,
	/// Float-run search around report anchors.
	PatternProximity,
	/// Header-bounds re-scoring of earlier candidates.
	BoundsRefinement,
}

impl StrategyId {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::SectionScan => "section_scan",
			Self::PatternProximity => "pattern_proximity",
			Self::BoundsRefinement => "bounds_refinement",
		}
	}
}

/// One strategy's proposed geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateMesh {
	/// Extracted vertices in file order.
	pub vertices: Vec<Vertex>,
	/// Extracted faces in file order.
	pub faces: Vec<Face>,
	/// Strategy that produced this value.
	pub strategy: StrategyId,
	/// Strategy that first discovered the geometry.
	pub discovered_by: StrategyId,
	/// Byte offset where the geometry was discovered.
	pub origin: usize,
	/// Multiplier from bounds refinement (`1.0` when neutral).
	pub bounds_factor: f64,
}

impl CandidateMesh {
	/// Freshly discovered candidate with a neutral bounds factor.
	pub fn new(strategy: StrategyId, origin: usize, vertices: Vec<Vertex>, faces: Vec<Face>) -> Self {
		Self {
			vertices,
			faces,
			strategy,
			discovered_by: strategy,
			origin,
			bounds_factor: 1.0,
		}
	}

	/// Re-issue this candidate under `strategy` with a new bounds factor.
	pub fn refined(self, strategy: StrategyId, bounds_factor: f64) -> Self {
		Self {
			strategy,
			bounds_factor,
			..self
		}
	}

	/// First face referencing a missing vertex, as `(face_position, index)`.
	pub fn first_invalid_face(&self) -> Option<(usize, u32)> {
		let vertex_count = self.vertices.len();
		self.faces
			.iter()
			.enumerate()
			.find_map(|(pos, face)| face.invalid_index(vertex_count).map(|index| (pos, index)))
	}
}

/// Geometry selected for export.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalMesh {
	vertices: Vec<Vertex>,
	faces: Vec<Face>,
	strategy: Option<StrategyId>,
	origin: usize,
	score: f64,
}

impl FinalMesh {
	/// Build a mesh from caller-supplied geometry, rejecting out-of-range face indices.
	pub fn new(vertices: Vec<Vertex>, faces: Vec<Face>) -> Result<Self> {
		let candidate = CandidateMesh::new(StrategyId::SectionScan, 0, vertices, faces);
		if let Some((face, index)) = candidate.first_invalid_face() {
			return Err(ClyError::MalformedCandidate {
				face,
				index,
				vertex_count: candidate.vertices.len(),
			});
		}

		Ok(Self {
			vertices: candidate.vertices,
			faces: candidate.faces,
			strategy: None,
			origin: 0,
			score: 0.0,
		})
	}

	/// Promote a scored, already validated candidate.
	pub(crate) fn selected(candidate: CandidateMesh, score: f64) -> Self {
		Self {
			strategy: Some(candidate.strategy),
			origin: candidate.origin,
			vertices: candidate.vertices,
			faces: candidate.faces,
			score,
		}
	}

	/// Vertex positions.
	pub fn vertices(&self) -> &[Vertex] {
		&self.vertices
	}

	/// Triangles.
	pub fn faces(&self) -> &[Face] {
		&self.faces
	}

	/// Producing strategy; `None` for caller-built meshes.
	pub fn strategy(&self) -> Option<StrategyId> {
		self.strategy
	}

	/// Discovery offset of the selected candidate.
	pub fn origin(&self) -> usize {
		self.origin
	}

	/// Selection score.
	pub fn score(&self) -> f64 {
		self.score
	}

	/// Corner positions of `face`; indices were validated at construction.
	pub fn triangle(&self, face: Face) -> [Vertex; 3] {
		face.indices.map(|index| self.vertices[index as usize])
	}
}
