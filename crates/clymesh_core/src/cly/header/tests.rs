use crate::cly::ClyHeader;

const SAMPLE: &[u8] = b"format FreeStyle Workspace (FWP)
version FreeForm Modeling/135/Tue Dec 29 10:12:32 2009/V10.0
units mm 
modelDimensions 10.0 10.0 10.0
bitmap 0 1000 
fileVersion 4
coarseTerm -1
endHeader

FFDYNPKTObjectListMain
FFDYNPKTModelInfo
numVoxels 1000
numTris 100
";

#[test]
fn parses_sample_header_fields() {
	let header = ClyHeader::parse(SAMPLE, 0);

	assert!(header.terminated);
	assert_eq!(header.line_count, 8);
	assert_eq!(header.format.as_deref(), Some("FreeStyle Workspace (FWP)"));
	assert_eq!(header.version.as_deref(), Some("FreeForm Modeling/135/Tue Dec 29 10:12:32 2009/V10.0"));
	assert_eq!(header.units.as_deref(), Some("mm"));
	assert_eq!(header.model_dimensions, Some([10.0, 10.0, 10.0]));
	assert_eq!(header.bitmap, Some([0, 1000]));
	assert_eq!(header.file_version, Some(4));
	assert_eq!(header.coarse_term, Some(-1));
	assert_eq!(header.num_voxels, None, "counts live after endHeader");
	assert!(header.extra.is_empty());

	let end_marker = b"endHeader\n";
	let pos = SAMPLE.windows(end_marker.len()).position(|item| item == end_marker).expect("marker present");
	assert_eq!(header.end, pos + end_marker.len());
}

#[test]
fn fills_counts_only_when_missing() {
	let mut header = ClyHeader::parse(SAMPLE, 0);

	assert!(header.fill_count("numVoxels 1000"));
	assert!(header.fill_count("numTris 100"));
	assert!(!header.fill_count("numTris 7"), "first count wins");
	assert!(!header.fill_count("bitmap 1 2"));
	assert_eq!(header.num_voxels, Some(1000));
	assert_eq!(header.num_tris, Some(100));
}

#[test]
fn unterminated_header_stops_at_line_limit() {
	let text = "noise line\n".repeat(ClyHeader::MAX_LINES + 5);
	let header = ClyHeader::parse(text.as_bytes(), 0);

	assert!(!header.terminated);
	assert_eq!(header.line_count, ClyHeader::MAX_LINES);
	assert_eq!(header.extra.len(), ClyHeader::MAX_LINES);
}

#[test]
fn binary_run_ends_header_without_consuming_it() {
	let mut bytes = b"units in\r\n".to_vec();
	let binary_start = bytes.len();
	bytes.extend(std::iter::repeat_n(0x7F_u8, ClyHeader::MAX_LINE_LEN + 1));

	let header = ClyHeader::parse(&bytes, 0);
	assert_eq!(header.units.as_deref(), Some("in"));
	assert_eq!(header.end, binary_start);
	assert!(!header.terminated);
}

#[test]
fn bad_dimensions_are_left_unset() {
	let header = ClyHeader::parse(b"modelDimensions 1.0 two 3.0\nendHeader\n", 0);

	assert_eq!(header.model_dimensions, None);
	assert!(header.terminated);
}

#[test]
fn parses_from_nonzero_start() {
	let mut bytes = b"\xEF\xBB\xBF".to_vec();
	bytes.extend_from_slice(b"format FreeForm CLY\nendHeader\n");
	let header = ClyHeader::parse(&bytes, 3);

	assert_eq!(header.start, 3);
	assert_eq!(header.format.as_deref(), Some("FreeForm CLY"));
	assert_eq!(header.end, bytes.len());
}
