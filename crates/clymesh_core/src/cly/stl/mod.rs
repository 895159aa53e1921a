use std::fmt;
use std::io::Write;
use std::str::FromStr;

use crate::cly::{ClyError, FinalMesh, Result, Vertex};

/// Fixed solid name used by the ASCII encoding.
const SOLID_NAME: &str = "mesh";
/// Binary header length.
const BINARY_HEADER_LEN: usize = 80;
/// Binary record length per triangle.
const BINARY_RECORD_LEN: usize = 50;

/// STL encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StlFormat {
	/// Text STL.
	#[default]
	Ascii,
	/// Little-endian binary STL.
	Binary,
}

impl StlFormat {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Ascii => "ascii",
			Self::Binary => "binary",
		}
	}
}

impl fmt::Display for StlFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for StlFormat {
	type Err = ClyError;

	fn from_str(value: &str) -> Result<Self> {
		if value.eq_ignore_ascii_case("ascii") {
			Ok(Self::Ascii)
		} else if value.eq_ignore_ascii_case("binary") {
			Ok(Self::Binary)
		} else {
			Err(ClyError::UnsupportedExportFormat { format: value.to_owned() })
		}
	}
}

/// Encode `mesh` into an in-memory STL document.
pub fn export(mesh: &FinalMesh, format: StlFormat) -> Result<Vec<u8>> {
	let capacity = match format {
		StlFormat::Ascii => 32 + mesh.faces().len() * 256,
		StlFormat::Binary => BINARY_HEADER_LEN + 4 + mesh.faces().len() * BINARY_RECORD_LEN,
	};
	let mut out = Vec::with_capacity(capacity);
	write_stl(mesh, format, &mut out)?;
	Ok(out)
}

/// Stream `mesh` as STL into `writer`.
pub fn write_stl<W: Write>(mesh: &FinalMesh, format: StlFormat, writer: &mut W) -> Result<()> {
	match format {
		StlFormat::Ascii => write_ascii(mesh, writer),
		StlFormat::Binary => write_binary(mesh, writer),
	}
}

fn write_ascii<W: Write>(mesh: &FinalMesh, writer: &mut W) -> Result<()> {
	writeln!(writer, "solid {SOLID_NAME}")?;
	for face in mesh.faces() {
		let corners = mesh.triangle(*face);
		let [nx, ny, nz] = facet_normal(corners);
		writeln!(writer, "  facet normal {nx:.6} {ny:.6} {nz:.6}")?;
		writeln!(writer, "    outer loop")?;
		for corner in corners {
			writeln!(writer, "      vertex {:.6} {:.6} {:.6}", corner.x, corner.y, corner.z)?;
		}
		writeln!(writer, "    endloop")?;
		writeln!(writer, "  endfacet")?;
	}
	writeln!(writer, "endsolid {SOLID_NAME}")?;
	Ok(())
}

fn write_binary<W: Write>(mesh: &FinalMesh, writer: &mut W) -> Result<()> {
	let count = u32::try_from(mesh.faces().len()).map_err(|_| ClyError::UnsupportedExportFormat {
		format: "binary (more than u32::MAX triangles)".to_owned(),
	})?;

	writer.write_all(&[0_u8; BINARY_HEADER_LEN])?;
	writer.write_all(&count.to_le_bytes())?;

	let mut record = [0_u8; BINARY_RECORD_LEN];
	for face in mesh.faces() {
		let corners = mesh.triangle(*face);
		let normal = facet_normal(corners);
		let values = normal.into_iter().chain(corners.into_iter().flat_map(Vertex::coords));
		for (slot, value) in record[..48].chunks_exact_mut(4).zip(values) {
			slot.copy_from_slice(&value.to_le_bytes());
		}
		// Attribute byte count stays zero.
		writer.write_all(&record)?;
	}
	Ok(())
}

/// Unit normal of the triangle `(v0, v1, v2)`; degenerate triangles get a zero vector.
pub fn facet_normal(corners: [Vertex; 3]) -> [f32; 3] {
	let [a, b, c] = corners.map(|vertex| vertex.coords().map(f64::from));
	let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
	let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
	let cross = [u[1] * v[2] - u[2] * v[1], u[2] * v[0] - u[0] * v[2], u[0] * v[1] - u[1] * v[0]];

	let length = cross.iter().map(|item| item * item).sum::<f64>().sqrt();
	if length == 0.0 || !length.is_finite() {
		return [0.0; 3];
	}
	cross.map(|item| (item / length) as f32)
}
