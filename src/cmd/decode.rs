use std::path::PathBuf;

use structjson::reflect::{DecodeOptions, PrintOptions, Record, Result, StructValue, read_document};
use tracing::info;

use crate::cmd::playlist::PLAY_LIST;
use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub json: bool,
	/// Release only top-level blocks and report what stays allocated.
	#[arg(long)]
	pub shallow: bool,
	/// Apply the tighter limits meant for untrusted documents.
	#[arg(long)]
	pub untrusted: bool,
	#[arg(long = "max-depth")]
	pub max_depth: Option<u32>,
	#[arg(long = "max-array")]
	pub max_array: Option<usize>,
	/// Largest document accepted, in bytes after decompression.
	#[arg(long = "max-bytes")]
	pub max_bytes: Option<usize>,
}

/// Decode a playlist document and print the populated record.
pub fn run(args: Args) -> Result<()> {
	let Args {
		path,
		json,
		shallow,
		untrusted,
		max_depth,
		max_array,
		max_bytes,
	} = args;

	let mut decode = if untrusted { DecodeOptions::for_untrusted_input() } else { DecodeOptions::default() };
	if let Some(max_depth) = max_depth {
		decode.max_depth = max_depth;
	}
	if let Some(max_array) = max_array {
		decode.max_array_elems = max_array;
	}
	if let Some(max_bytes) = max_bytes {
		decode.max_document_bytes = max_bytes;
	}

	let (compression, bytes) = read_document(&path, &decode)?;
	let mut record = Record::new(&PLAY_LIST);
	record.decode_slice(&bytes, &decode)?;
	let live_blocks = record.heap().live_blocks();
	info!(path = %path.display(), live_blocks, "document decoded");

	let value = record.snapshot()?;
	let text = (!json).then(|| record.render(&PrintOptions::default()));
	let retained_blocks = if shallow {
		record.release_shallow();
		Some(record.heap().live_blocks())
	} else {
		None
	};

	if json {
		return emit_json(&DecodeJson {
			path: path.display().to_string(),
			compression: compression.as_str(),
			table: PLAY_LIST.name,
			live_blocks,
			retained_blocks,
			value,
		});
	}

	println!("path: {}", path.display());
	println!("compression: {}", compression.as_str());
	println!("table: {}", PLAY_LIST.name);
	println!("live_blocks: {live_blocks}");
	if let Some(retained) = retained_blocks {
		println!("retained_after_shallow_release: {retained}");
	}
	println!("decoded:");
	print!("{}", text.unwrap_or_default());
	Ok(())
}

#[derive(serde::Serialize)]
struct DecodeJson {
	path: String,
	compression: &'static str,
	table: &'static str,
	live_blocks: usize,
	#[serde(skip_serializing_if = "Option::is_none")]
	retained_blocks: Option<usize>,
	value: StructValue,
}
