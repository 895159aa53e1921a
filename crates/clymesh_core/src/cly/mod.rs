mod analyze;
mod bytes;
mod compression;
mod config;
mod detect;
mod error;
mod extract;
mod file;
mod header;
mod mesh;
mod probe;
mod scanner;
mod signature;
mod stl;

/// Structural report types and entry points.
pub use analyze::{AnalysisReport, Chunk, ChunkKind, Finding, PACKET_PREFIX, StructuralAnalyzer, analyze};
/// Hex rendering helper.
pub use bytes::hex_pairs;
/// Compression detection result.
pub use compression::Compression;
/// Scan and extraction thresholds.
pub use config::ScanConfig;
/// Format detection types and entry points.
pub use detect::{FormatKind, FormatVariant, HEADER_OFFSETS, detect};
/// Error and result aliases.
pub use error::{ClyError, Result};
/// Extraction pipeline, strategies, and scoring.
pub use extract::{BoundsRefinement, ExtractContext, MeshExtractor, PatternProximity, Refinement, ScoredCandidate, SectionScan, Strategy, extract, extract_triangulated, score};
/// File abstraction and whole-pipeline conversion.
pub use file::{ClyFile, convert};
/// Textual header representation.
pub use header::ClyHeader;
/// Mesh geometry and candidate types.
pub use mesh::{CandidateMesh, Face, FinalMesh, Plausibility, StrategyId, Vertex};
/// Raw byte-window inspection.
pub use probe::{Probe, probe};
/// Byte-level scanners and their findings.
pub use scanner::{
	AsciiRun, AsciiRunScanner, MagicMatch, MagicScanner, RepeatRun, RepeatScanner, find_ascii_runs, find_magic_numbers, find_repeating_patterns, read_f32_le, read_u32_le,
};
/// Known-signature table.
pub use signature::{Signature, ZSTD_MAGIC, default_signatures};
/// STL encodings and writers.
pub use stl::{StlFormat, export, facet_normal, write_stl};
