use clymesh_testkit::{ClyBuilder, box_mesh, decode_binary_stl, write_scratch};

use crate::cly::{ClyError, ClyFile, Compression, FormatKind, ScanConfig, StlFormat, convert};

fn sample_box_file() -> Vec<u8> {
	let (vertices, faces) = box_mesh([10.0, 10.0, 10.0]);
	ClyBuilder::sample().vertex_section(&vertices).face_section(&faces).build()
}

#[test]
fn zstd_wrapped_input_analyzes_identically() {
	let raw = sample_box_file();
	let packed = zstd::encode_all(raw.as_slice(), 3).expect("zstd encodes");
	let raw_path = write_scratch("file_raw.cly", &raw);
	let packed_path = write_scratch("file_packed.cly", &packed);

	let plain = ClyFile::open(&raw_path).expect("raw file opens");
	let unwrapped = ClyFile::open(&packed_path).expect("zstd file opens");
	let config = ScanConfig::default();

	assert_eq!(plain.compression, Compression::None);
	assert_eq!(unwrapped.compression, Compression::Zstd);
	assert_eq!(plain.bytes(), unwrapped.bytes());
	assert_eq!(unwrapped.detect().kind, FormatKind::FreeStyleFwp);
	assert_eq!(
		plain.analyze(&config).expect("analysis"),
		unwrapped.analyze(&config).expect("analysis")
	);
}

#[test]
fn convert_writes_binary_box() {
	let file = ClyFile::from_bytes(sample_box_file()).expect("raw bytes decode");

	let stl = file.convert(StlFormat::Binary, &ScanConfig::default()).expect("box converts");

	let triangles = decode_binary_stl(&stl).expect("valid binary stl");
	assert_eq!(triangles.len(), 12);
	assert!(triangles.iter().all(|item| item.vertices.iter().flatten().all(|coord| (0.0..=10.0).contains(coord))));
}

#[test]
fn convert_requires_faces() {
	let bytes = ClyBuilder::new().vertex_section(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]).build();

	let err = convert(&bytes, StlFormat::Ascii, &ScanConfig::default()).expect_err("vertex-only data has no triangles");
	assert!(matches!(err, ClyError::NoGeometryFound));
}

#[test]
fn triangulated_extraction_rejects_vertex_only_winner() {
	let bytes = ClyBuilder::new().vertex_section(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]).build();
	let file = ClyFile::from_bytes(bytes).expect("raw bytes pass through");
	let config = ScanConfig::default();

	let mesh = file.extract(&config).expect("vertex block is still a candidate");
	assert!(mesh.faces().is_empty());
	assert!(matches!(file.extract_triangulated(&config), Err(ClyError::NoGeometryFound)));

	let boxed = ClyFile::from_bytes(sample_box_file()).expect("raw bytes pass through");
	assert_eq!(boxed.extract_triangulated(&config).expect("box has faces").faces().len(), 12);
}

#[test]
fn extract_through_file_matches_sample_box() {
	let file = ClyFile::from_bytes(sample_box_file()).expect("raw bytes decode");

	let mesh = file.extract(&ScanConfig::default()).expect("box is recoverable");

	assert_eq!(mesh.vertices().len(), 8);
	assert_eq!(mesh.faces().len(), 12);
}

#[test]
fn open_missing_file_is_io_error() {
	let err = ClyFile::open("/nonexistent/clymesh/input.cly").err().expect("missing file fails");
	assert!(matches!(err, ClyError::Io(_)));
}
