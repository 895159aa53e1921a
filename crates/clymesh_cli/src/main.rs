#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cmd;

#[derive(Parser)]
#[command(name = "clymesh", about = "FreeForm .cly analysis and STL recovery tools")]
struct Cli {
	/// Raise log verbosity (-v info, -vv debug); otherwise RUST_LOG applies
	#[arg(long, short, global = true, action = clap::ArgAction::Count)]
	verbose: u8,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Detection, compression, and header summary
	Info(cmd::info::Args),
	/// Full structural report
	Analyze(cmd::analyze::Args),
	/// Ranked mesh candidates from every strategy
	Candidates(cmd::candidates::Args),
	/// Extract the best mesh and write it as STL
	Convert(cmd::convert::Args),
	/// Hex/ASCII/number view of a byte window
	Probe(cmd::probe::Args),
}

fn main() {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	if let Err(err) = run(cli.command) {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn run(command: Commands) -> clymesh::cly::Result<()> {
	match command {
		Commands::Info(args) => cmd::info::run(args),
		Commands::Analyze(args) => cmd::analyze::run(args),
		Commands::Candidates(args) => cmd::candidates::run(args),
		Commands::Convert(args) => cmd::convert::run(args),
		Commands::Probe(args) => cmd::probe::run(args),
	}
}

fn init_tracing(verbose: u8) {
	let filter = match verbose {
		0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
		1 => EnvFilter::new("clymesh=info"),
		_ => EnvFilter::new("clymesh=debug"),
	};

	tracing_subscriber::registry()
		.with(fmt::layer().with_writer(std::io::stderr).compact())
		.with(filter)
		.init();
}
