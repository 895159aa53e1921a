use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cly::scanner::{AsciiRun, AsciiRunScanner, DEFAULT_WINDOW, MagicMatch, MagicScanner, RepeatRun, RepeatScanner, windows};
use crate::cly::{ClyHeader, FormatVariant, Result, ScanConfig, detect};

/// Marker prefix of packet sections following the header.
pub const PACKET_PREFIX: &str = "FFDYNPKT";

/// One structural observation about the buffer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
	/// Known signature occurrence.
	MagicNumber(MagicMatch),
	/// Printable text marker.
	AsciiRun(AsciiRun),
	/// Repeated fixed-length byte pattern.
	RepeatingPattern(RepeatRun),
}

impl Finding {
	/// Byte offset the finding starts at.
	pub fn offset(&self) -> usize {
		match self {
			Self::MagicNumber(item) => item.offset,
			Self::AsciiRun(item) => item.offset,
			Self::RepeatingPattern(item) => item.offset,
		}
	}

	fn sort_key(&self) -> (usize, u8, usize) {
		match self {
			Self::MagicNumber(item) => (item.offset, 0, 0),
			Self::AsciiRun(item) => (item.offset, 1, 0),
			Self::RepeatingPattern(item) => (item.offset, 2, item.pattern.len()),
		}
	}
}

/// Hypothesized role of a chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChunkKind {
	/// Textual file header.
	Header,
	/// Region introduced by an `FFDYNPKT*` marker.
	Packet {
		/// Full marker text.
		name: String,
	},
	/// Repeated-pattern fill.
	Repeat,
}

/// Hypothesized contiguous region `[start, end)`; chunks may overlap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
	/// Inclusive start offset.
	pub start: usize,
	/// Exclusive end offset.
	pub end: usize,
	/// Hypothesized role.
	#[serde(flatten)]
	pub kind: ChunkKind,
}

/// Descriptive summary of a buffer, independent of mesh extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
	/// Analyzed buffer length.
	pub len: usize,
	/// Detected format variant.
	pub variant: FormatVariant,
	/// Parsed header when a header signature was found.
	pub header: Option<ClyHeader>,
	/// Findings ordered by offset.
	pub findings: Vec<Finding>,
	/// Region hypotheses ordered by start.
	pub chunks: Vec<Chunk>,
	/// Whether the findings cap stopped the scan early.
	pub truncated: bool,
}

impl AnalysisReport {
	/// Offset where binary payload is expected to begin (after the header, or `0`).
	pub fn body_start(&self) -> usize {
		self.header.as_ref().map_or(0, |header| header.end)
	}

	/// Header-declared model dimensions.
	pub fn declared_dimensions(&self) -> Option<[f32; 3]> {
		self.header.as_ref().and_then(|header| header.model_dimensions)
	}

	/// Header-declared triangle count.
	pub fn declared_triangles(&self) -> Option<u64> {
		self.header.as_ref().and_then(|header| header.num_tris)
	}

	/// Iterate magic-number findings.
	pub fn magic_numbers(&self) -> impl Iterator<Item = &MagicMatch> {
		self.findings.iter().filter_map(|item| match item {
			Finding::MagicNumber(found) => Some(found),
			_ => None,
		})
	}

	/// Iterate ASCII-run findings.
	pub fn ascii_runs(&self) -> impl Iterator<Item = &AsciiRun> {
		self.findings.iter().filter_map(|item| match item {
			Finding::AsciiRun(found) => Some(found),
			_ => None,
		})
	}

	/// Iterate repeating-pattern findings.
	pub fn repeating_patterns(&self) -> impl Iterator<Item = &RepeatRun> {
		self.findings.iter().filter_map(|item| match item {
			Finding::RepeatingPattern(found) => Some(found),
			_ => None,
		})
	}
}

/// Windowed structural analyzer.
pub struct StructuralAnalyzer<'c> {
	config: &'c ScanConfig,
	window: usize,
}

impl<'c> StructuralAnalyzer<'c> {
	/// Create an analyzer after validating `config`.
	pub fn new(config: &'c ScanConfig) -> Result<Self> {
		config.validate()?;
		Ok(Self {
			config,
			window: DEFAULT_WINDOW,
		})
	}

	/// Override the traversal window size; output does not depend on it.
	pub fn with_window(mut self, window: usize) -> Self {
		self.window = window.max(1);
		self
	}

	/// Build the report for `bytes`.
	pub fn analyze(&self, bytes: &[u8]) -> AnalysisReport {
		let config = self.config;
		let variant = detect(bytes);
		let mut header = variant.is_known().then(|| ClyHeader::parse(bytes, variant.offset));

		let mut lengths = config.pattern_lengths.clone();
		lengths.sort_unstable();
		lengths.dedup();

		let mut magic_scanner = MagicScanner::new(&config.signatures);
		let ascii_scanner = AsciiRunScanner::new(config.min_ascii_run);
		let mut repeat_scanners: Vec<_> = lengths.iter().map(|len| RepeatScanner::new(*len, config.min_repeats)).collect();

		let mut magic = Vec::new();
		let mut ascii = Vec::new();
		let mut repeats = Vec::new();
		let mut truncated = false;

		for window in windows(bytes.len(), self.window) {
			magic_scanner.scan(bytes, window.clone(), &mut magic);
			ascii_scanner.scan(bytes, window.clone(), &mut ascii);
			for scanner in &mut repeat_scanners {
				scanner.scan(bytes, window.clone(), &mut repeats);
			}

			if magic.len() + ascii.len() + repeats.len() >= config.max_findings {
				warn!(at = window.end, limit = config.max_findings, "findings cap reached, stopping scan");
				truncated = true;
				break;
			}
		}

		let repeats: Vec<RepeatRun> = repeats.into_iter().filter(|run| !has_shorter_period(&run.pattern, &lengths)).collect();

		if let Some(header) = header.as_mut() {
			let header_end = header.end;
			for run in ascii.iter().filter(|run| run.offset >= header_end) {
				if header.fill_count(&run.text) {
					debug!(offset = run.offset, text = %run.text, "filled header count from marker");
				}
			}
		}

		let chunks = build_chunks(bytes.len(), header.as_ref(), &ascii, &repeats);

		let mut findings: Vec<Finding> = magic
			.into_iter()
			.map(Finding::MagicNumber)
			.chain(ascii.into_iter().map(Finding::AsciiRun))
			.chain(repeats.into_iter().map(Finding::RepeatingPattern))
			.collect();
		findings.sort_by_key(Finding::sort_key);
		findings.truncate(config.max_findings);

		info!(
			len = bytes.len(),
			variant = variant.kind.as_str(),
			findings = findings.len(),
			chunks = chunks.len(),
			truncated,
			"analysis complete"
		);

		AnalysisReport {
			len: bytes.len(),
			variant,
			header,
			findings,
			chunks,
			truncated,
		}
	}
}

/// Analyze `bytes` with `config`.
pub fn analyze(bytes: &[u8], config: &ScanConfig) -> Result<AnalysisReport> {
	Ok(StructuralAnalyzer::new(config)?.analyze(bytes))
}

fn has_shorter_period(pattern: &[u8], lengths: &[usize]) -> bool {
	lengths
		.iter()
		.filter(|period| **period < pattern.len() && pattern.len() % **period == 0)
		.any(|period| pattern.iter().enumerate().all(|(idx, byte)| *byte == pattern[idx % period]))
}

fn build_chunks(len: usize, header: Option<&ClyHeader>, ascii: &[AsciiRun], repeats: &[RepeatRun]) -> Vec<Chunk> {
	let mut chunks = Vec::new();

	if let Some(header) = header {
		chunks.push(Chunk {
			start: header.start,
			end: header.end,
			kind: ChunkKind::Header,
		});
	}

	let packets: Vec<&AsciiRun> = ascii.iter().filter(|run| run.text.starts_with(PACKET_PREFIX)).collect();
	for (idx, run) in packets.iter().enumerate() {
		let end = packets.get(idx + 1).map_or(len, |next| next.offset);
		chunks.push(Chunk {
			start: run.offset,
			end,
			kind: ChunkKind::Packet { name: run.text.clone() },
		});
	}

	for run in repeats {
		chunks.push(Chunk {
			start: run.offset,
			end: run.end(),
			kind: ChunkKind::Repeat,
		});
	}

	chunks.sort_by_key(|chunk| (chunk.start, chunk.end));
	chunks
}
