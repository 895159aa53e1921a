use clymesh_testkit::write_scratch;

use crate::cmd::test_support::{run_clymesh, run_clymesh_json, sample_box_path};

#[test]
fn analyze_json_contains_findings_and_chunks() {
	let path = sample_box_path("analyze_json.cly");
	let json = run_clymesh_json(&["analyze", &path, "--json"]);

	let report = &json["report"];
	assert_eq!(report["variant"]["kind"], "freestyle_fwp");
	assert_eq!(report["truncated"], false);

	let findings = report["findings"].as_array().expect("findings array");
	assert!(findings.iter().any(|item| item["kind"] == "ascii_run" && item["text"] == "FFDYNPKTModelInfo"));
	assert!(findings.iter().any(|item| item["kind"] == "magic_number" && item["name"] == "end_header"));

	let chunks = report["chunks"].as_array().expect("chunks array");
	assert_eq!(chunks[0]["kind"], "header");
	assert!(chunks.iter().any(|item| item["kind"] == "packet" && item["name"] == "FFDYNPKTObjectListMain"));
}

#[test]
fn analyze_applies_config_file() {
	let path = sample_box_path("analyze_config.cly");
	let config = write_scratch("analyze_config.json", br#"{ "max_findings": 3 }"#);
	let config = config.to_string_lossy().into_owned();

	let json = run_clymesh_json(&["analyze", &path, "--config", &config, "--json"]);

	assert_eq!(json["report"]["truncated"], true);
	assert!(json["report"]["findings"].as_array().is_some_and(|items| items.len() <= 3));
}

#[test]
fn analyze_rejects_unknown_config_keys() {
	let path = sample_box_path("analyze_bad_config.cly");
	let config = write_scratch("analyze_bad_config.json", br#"{ "max_vertices": 3 }"#);
	let config = config.to_string_lossy().into_owned();

	let output = run_clymesh(&["analyze", &path, "--config", &config]);

	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("invalid config"));
}
