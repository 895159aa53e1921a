use std::path::PathBuf;

use clymesh::cly::{ClyFile, Result, probe};

use crate::cmd::util::{emit_json, parse_offset};

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	/// Start offset, decimal or 0x-prefixed hex
	#[arg(long, default_value = "0", value_parser = parse_offset)]
	pub offset: usize,
	#[arg(long, default_value_t = 64)]
	pub len: usize,
	#[arg(long)]
	pub json: bool,
}

/// Dump a byte window as hex, ASCII, and 4-byte numeric groups.
pub fn run(args: Args) -> Result<()> {
	let Args { path, offset, len, json } = args;

	let file = ClyFile::open(&path)?;
	let view = probe(file.bytes(), offset, len);

	if json {
		emit_json(&view);
		return Ok(());
	}

	println!("offset: {} (0x{:x})", view.offset, view.offset);
	println!("hex: {}", view.hex);
	println!("ascii: {}", view.ascii);
	for (idx, (float, int)) in view.floats.iter().zip(&view.ints).enumerate() {
		println!("  +{:<4} f32={float:<14e} u32={int}", idx * 4);
	}

	Ok(())
}
