use std::path::PathBuf;

use structjson::reflect::{DecodeOptions, Record, Result, read_document};

use crate::cmd::playlist::PLAY_LIST;

#[derive(clap::Args)]
pub struct Args {
	pub path: PathBuf,
	#[arg(long)]
	pub pretty: bool,
}

/// Decode a playlist document and write it back as JSON in table order.
pub fn run(args: Args) -> Result<()> {
	let Args { path, pretty } = args;

	let opt = DecodeOptions::default();
	let (_, bytes) = read_document(&path, &opt)?;
	let mut record = Record::new(&PLAY_LIST);
	record.decode_slice(&bytes, &opt)?;

	let text = if pretty { record.encode_pretty()? } else { record.encode()? };
	println!("{text}");
	Ok(())
}
