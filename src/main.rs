#![allow(missing_docs)]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "structjson", about = "Table-driven JSON record decoding tools")]
struct Cli {
	/// Increase log verbosity (-v info, -vv debug, -vvv trace).
	#[arg(short, long, action = clap::ArgAction::Count, global = true)]
	verbose: u8,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Decode a playlist document and print the populated record.
	Decode(cmd::decode::Args),
	/// Decode a playlist document and encode it back to JSON.
	Encode(cmd::encode::Args),
	/// Print the built-in playlist tables.
	Schema(cmd::schema::Args),
}

fn main() {
	let cli = Cli::parse();
	init_logging(cli.verbose);

	if let Err(err) = run(cli.command) {
		eprintln!("error: {err}");
		std::process::exit(1);
	}
}

fn init_logging(verbose: u8) {
	let filter = match verbose {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
		.with_writer(std::io::stderr)
		.init();
}

fn run(command: Commands) -> structjson::reflect::Result<()> {
	match command {
		Commands::Decode(args) => cmd::decode::run(args),
		Commands::Encode(args) => cmd::encode::run(args),
		Commands::Schema(args) => cmd::schema::run(args),
	}
}
