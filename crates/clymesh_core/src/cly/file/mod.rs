use std::fs;
use std::path::Path;

use tracing::info;

use crate::cly::compression::decode_bytes;
use crate::cly::{AnalysisReport, Compression, FinalMesh, FormatVariant, Result, ScanConfig, StlFormat, analyze, detect, export, extract, extract_triangulated};

/// Opened `.cly` container with decoded bytes.
pub struct ClyFile {
	/// Compression mode detected for source bytes.
	pub compression: Compression,
	bytes: Vec<u8>,
}

impl ClyFile {
	/// Read and decode a file from disk.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let raw = fs::read(path)?;
		info!(path = %path.display(), len = raw.len(), "read input file");
		Self::from_bytes(raw)
	}

	/// Decode an in-memory upload.
	pub fn from_bytes(raw: Vec<u8>) -> Result<Self> {
		let (compression, bytes) = decode_bytes(raw)?;
		Ok(Self { compression, bytes })
	}

	/// Return decoded raw bytes backing this file.
	pub fn bytes(&self) -> &[u8] {
		&self.bytes
	}

	/// Detect the format variant.
	pub fn detect(&self) -> FormatVariant {
		detect(&self.bytes)
	}

	/// Build the structural report.
	pub fn analyze(&self, config: &ScanConfig) -> Result<AnalysisReport> {
		analyze(&self.bytes, config)
	}

	/// Analyze and select the best mesh.
	pub fn extract(&self, config: &ScanConfig) -> Result<FinalMesh> {
		let report = self.analyze(config)?;
		extract(&self.bytes, &report, config)
	}

	/// Analyze and select the best mesh, requiring at least one face.
	pub fn extract_triangulated(&self, config: &ScanConfig) -> Result<FinalMesh> {
		let report = self.analyze(config)?;
		extract_triangulated(&self.bytes, &report, config)
	}

	/// Run the whole pipeline into an STL document.
	pub fn convert(&self, format: StlFormat, config: &ScanConfig) -> Result<Vec<u8>> {
		convert(&self.bytes, format, config)
	}
}

/// Analyze, extract, and export `bytes` as STL.
///
/// A selected mesh without faces has nothing to triangulate and is reported as [`NoGeometryFound`](crate::cly::ClyError::NoGeometryFound).
pub fn convert(bytes: &[u8], format: StlFormat, config: &ScanConfig) -> Result<Vec<u8>> {
	let report = analyze(bytes, config)?;
	let mesh = extract_triangulated(bytes, &report, config)?;
	export(&mesh, format)
}

#[cfg(test)]
mod tests;
