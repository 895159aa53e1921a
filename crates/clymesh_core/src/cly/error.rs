use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, ClyError>;

/// Errors produced while reading, analyzing, extracting, and exporting `.cly` data.
#[derive(Debug, Error)]
pub enum ClyError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Not enough bytes remained for a requested read.
	#[error("read out of range at offset {at}, need {need} bytes, buffer length {len}")]
	OutOfRange {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Total buffer length.
		len: usize,
	},
	/// Mesh face references a vertex that does not exist.
	#[error("malformed mesh: face {face} references vertex {index}, vertex count {vertex_count}")]
	MalformedCandidate {
		/// Offending face position.
		face: usize,
		/// Offending vertex index.
		index: u32,
		/// Number of vertices available.
		vertex_count: usize,
	},
	/// No extraction strategy produced usable geometry.
	#[error("no geometry found")]
	NoGeometryFound,
	/// Requested STL encoding is not supported.
	#[error("unsupported export format: {format} (expected ascii or binary)")]
	UnsupportedExportFormat {
		/// User-provided format name.
		format: String,
	},
	/// Decompression output exceeded configured safety limit.
	#[error("decompressed output exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
	/// Byte offset literal could not be parsed.
	#[error("invalid offset literal: {value}")]
	InvalidOffset {
		/// User-provided literal.
		value: String,
	},
	/// Scan configuration failed validation.
	#[error("invalid config: {reason}")]
	InvalidConfig {
		/// Human-readable validation failure.
		reason: String,
	},
}
