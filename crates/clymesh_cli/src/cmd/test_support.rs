use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::OnceLock;

use clymesh_testkit::{ClyBuilder, box_mesh, target_dir as workspace_target_dir, write_scratch};

static CLYMESH_BIN: OnceLock<PathBuf> = OnceLock::new();

/// Sample header and packets followed by a counted 10mm box.
pub(crate) fn sample_box_path(name: &str) -> String {
	let (vertices, faces) = box_mesh([10.0, 10.0, 10.0]);
	let bytes = ClyBuilder::sample().vertex_section(&vertices).face_section(&faces).build();
	write_scratch(name, &bytes).to_string_lossy().into_owned()
}

/// Sample header and packets followed by filler only.
pub(crate) fn sample_empty_path(name: &str) -> String {
	let bytes = ClyBuilder::sample().filler(256).build();
	write_scratch(name, &bytes).to_string_lossy().into_owned()
}

pub(crate) fn run_clymesh(args: &[&str]) -> Output {
	Command::new(clymesh_bin()).args(args).output().expect("clymesh command executes")
}

pub(crate) fn run_clymesh_json(args: &[&str]) -> serde_json::Value {
	let output = run_clymesh(args);
	assert!(
		output.status.success(),
		"clymesh command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

fn clymesh_bin() -> &'static PathBuf {
	CLYMESH_BIN.get_or_init(resolve_clymesh_bin)
}

fn resolve_clymesh_bin() -> PathBuf {
	if let Ok(path) = std::env::var("CARGO_BIN_EXE_clymesh") {
		return PathBuf::from(path);
	}

	let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
	let target_dir = workspace_target_dir();

	let mut bin = target_dir.join("debug");
	bin.push(if cfg!(windows) { "clymesh.exe" } else { "clymesh" });

	let status = Command::new("cargo")
		.current_dir(&manifest_dir)
		.args(["build", "--quiet", "--bin", "clymesh"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build clymesh binary at {}", bin.display());

	bin
}
