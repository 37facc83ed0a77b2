use serde_json::{Map, Number, Value};
use tracing::{debug, warn};

use crate::reflect::bytes::{read_handle, read_int, read_real, slot};
use crate::reflect::{FieldDesc, FieldKind, Heap, MAX_TABLE_DEPTH, ReflectError, Result, Table};

/// Encode `buf` as compact JSON text.
pub fn encode(buf: &[u8], heap: &Heap, table: &Table) -> Result<String> {
	Ok(serde_json::to_string(&encode_value(buf, heap, table)?)?)
}

/// Encode `buf` as indented JSON text.
pub fn encode_pretty(buf: &[u8], heap: &Heap, table: &Table) -> Result<String> {
	Ok(serde_json::to_string_pretty(&encode_value(buf, heap, table)?)?)
}

/// Encode `buf` as a JSON value tree with keys in table order.
///
/// Mirrors the decoder's policy: a failing nullable field is left out, a
/// failing required field aborts, array elements that fail are skipped and an
/// array where every element fails is a missing field.
pub fn encode_value(buf: &[u8], heap: &Heap, table: &Table) -> Result<Value> {
	if buf.len() < table.size {
		return Err(ReflectError::BufferTooSmall {
			owner: table.name,
			need: table.size,
			have: buf.len(),
		});
	}
	encode_object(buf, heap, table, 0)
}

fn encode_object(buf: &[u8], heap: &Heap, table: &Table, depth: u32) -> Result<Value> {
	if depth >= MAX_TABLE_DEPTH {
		return Err(ReflectError::DepthExceeded { max_depth: MAX_TABLE_DEPTH });
	}

	let mut out = Map::new();
	for field in table.fields() {
		match encode_field(buf, heap, table, field, depth) {
			Ok(value) => {
				out.insert(field.name.to_owned(), value);
			}
			Err(err) if field.nullable => {
				debug!(table = table.name, field = field.name, error = %err, "nullable field omitted");
			}
			Err(err) => {
				warn!(table = table.name, field = field.name, code = err.kind().code(), error = %err, "field encode failed");
				return Err(err);
			}
		}
	}
	Ok(Value::Object(out))
}

fn encode_field(buf: &[u8], heap: &Heap, table: &Table, field: &FieldDesc, depth: u32) -> Result<Value> {
	match field.kind {
		FieldKind::Object(nested) => encode_object(slot(buf, field, nested.size)?, heap, nested, depth + 1),
		FieldKind::Array { elem, elem_size, .. } => encode_array(buf, heap, table, field, elem, elem_size, depth),
		FieldKind::String | FieldKind::Integer | FieldKind::Real | FieldKind::Bool => encode_scalar(buf, heap, field),
	}
}

fn encode_array(buf: &[u8], heap: &Heap, table: &Table, field: &FieldDesc, elem: &Table, elem_size: usize, depth: u32) -> Result<Value> {
	let count = read_int(buf, table.count_desc(field)?)?;
	if count == 0 {
		return Ok(Value::Array(Vec::new()));
	}

	let block = heap
		.get(read_handle(buf, field)?)
		.ok_or(ReflectError::MissingField { field: field.name })?;
	let expected = usize::try_from(count).ok().and_then(|count| count.checked_mul(elem_size));
	if elem_size == 0 || expected != Some(block.len()) {
		return Err(ReflectError::LengthMismatch {
			field: field.name,
			count,
			bytes: block.len(),
		});
	}

	let mut items = Vec::with_capacity(block.len() / elem_size);
	for (index, chunk) in block.chunks_exact(elem_size).enumerate() {
		let item = match elem.scalar_field() {
			Some(scalar) => encode_scalar(chunk, heap, scalar),
			None => encode_object(chunk, heap, elem, depth + 1),
		};
		match item {
			Ok(item) => items.push(item),
			Err(err) => debug!(field = field.name, index, error = %err, "array element skipped"),
		}
	}

	if items.is_empty() {
		return Err(ReflectError::MissingField { field: field.name });
	}
	Ok(Value::Array(items))
}

fn encode_scalar(buf: &[u8], heap: &Heap, field: &FieldDesc) -> Result<Value> {
	match field.kind {
		FieldKind::String => {
			let block = heap
				.get(read_handle(buf, field)?)
				.ok_or(ReflectError::MissingField { field: field.name })?;
			let text = block.strip_suffix(&[0]).unwrap_or(block);
			Ok(Value::String(String::from_utf8_lossy(text).into_owned()))
		}
		FieldKind::Integer => Ok(Value::from(read_int(buf, field)?)),
		FieldKind::Bool => Ok(Value::Bool(read_int(buf, field)? != 0)),
		FieldKind::Real => {
			let real = read_real(buf, field)?;
			Number::from_f64(real).map(Value::Number).ok_or(ReflectError::Overflow {
				field: field.name,
				size: field.size,
				value: real.to_string(),
			})
		}
		FieldKind::Object(_) | FieldKind::Array { .. } => Err(ReflectError::InvalidTable {
			table: field.name,
			reason: format!("{} is not a scalar kind", field.kind_tag()),
		}),
	}
}
