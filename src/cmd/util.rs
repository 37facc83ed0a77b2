use serde::Serialize;
use structjson::reflect::Result;

/// Print `payload` as indented JSON on stdout.
pub(crate) fn emit_json<T: Serialize>(payload: &T) -> Result<()> {
	println!("{}", serde_json::to_string_pretty(payload)?);
	Ok(())
}
