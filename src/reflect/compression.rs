use std::io::Read;
use std::path::Path;

use crate::reflect::{DecodeOptions, ReflectError, Result};

/// zstd frame magic marking a compressed document.
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Compression mode detected for a source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
	/// Plain JSON text.
	None,
	/// zstd-compressed JSON text.
	Zstd,
}

impl Compression {
	/// Render compression mode as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Zstd => "zstd",
		}
	}
}

/// Read a document from disk and undo any compression.
///
/// The inflated text may not exceed `opt.max_document_bytes`.
pub fn read_document(path: &Path, opt: &DecodeOptions) -> Result<(Compression, Vec<u8>)> {
	decode_bytes(std::fs::read(path)?, opt.max_document_bytes)
}

/// Detect and undo compression, returning `(mode, json_bytes)`.
///
/// Anything not starting with the zstd magic is plain text and left for the
/// JSON parser to judge. Either way the result is capped at `limit` bytes.
pub fn decode_bytes(raw: Vec<u8>, limit: usize) -> Result<(Compression, Vec<u8>)> {
	let (mode, text) = if raw.starts_with(&ZSTD_MAGIC) {
		(Compression::Zstd, inflate(&raw, limit)?)
	} else {
		(Compression::None, raw)
	};
	if text.len() > limit {
		return Err(ReflectError::DocumentTooLarge { limit });
	}
	Ok((mode, text))
}

/// Inflate at most `limit + 1` bytes so oversized frames stop early.
fn inflate(raw: &[u8], limit: usize) -> Result<Vec<u8>> {
	let decoder = zstd::stream::read::Decoder::new(raw)?;
	let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
	let mut text = Vec::new();
	decoder.take(cap).read_to_end(&mut text)?;
	Ok(text)
}
