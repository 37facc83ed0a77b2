use tracing::{debug, trace, warn};

use crate::reflect::bytes::{slot_mut, write_handle, write_int, write_real};
use crate::reflect::fill::{fill_default, fill_table};
use crate::reflect::node::{parse_slice, parse_str};
use crate::reflect::visit::release;
use crate::reflect::{FieldDesc, FieldKind, Heap, IntWidth, Kind, Node, NodeKind, PTR_SIZE, ReflectError, Result, Table};

/// First real at or above the signed 64-bit range (`2^63`).
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Runtime limits for table-driven decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Maximum nested table depth.
	pub max_depth: u32,
	/// Maximum element count accepted for one array field.
	pub max_array_elems: usize,
	/// Maximum size of a document read from disk, after decompression.
	pub max_document_bytes: usize,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self {
			max_depth: 32,
			max_array_elems: 1 << 20,
			max_document_bytes: 64 << 20,
		}
	}
}

impl DecodeOptions {
	/// Preset for documents from untrusted sources.
	pub fn for_untrusted_input() -> Self {
		Self {
			max_depth: 16,
			max_array_elems: 4096,
			max_document_bytes: 4 << 20,
		}
	}
}

/// Parse `text` and decode it into `buf`.
pub fn decode_str(text: &str, buf: &mut [u8], heap: &mut Heap, table: &Table) -> Result<()> {
	let tree = parse_str(text)?;
	decode(&tree, buf, heap, table)
}

/// Parse `bytes` and decode them into `buf`.
pub fn decode_slice(bytes: &[u8], buf: &mut [u8], heap: &mut Heap, table: &Table) -> Result<()> {
	let tree = parse_slice(bytes)?;
	decode(&tree, buf, heap, table)
}

/// Decode a value tree into `buf` with default options.
pub fn decode<N: Node>(node: &N, buf: &mut [u8], heap: &mut Heap, table: &Table) -> Result<()> {
	decode_with(node, buf, heap, table, &DecodeOptions::default())
}

/// Decode a value tree into `buf`, laid out by `table`.
///
/// Fields are attempted in table order. A failing field is default-filled;
/// nullable fields then let decoding continue, required fields abort it with
/// that field's error and leave later fields unvisited.
pub fn decode_with<N: Node>(node: &N, buf: &mut [u8], heap: &mut Heap, table: &Table, opt: &DecodeOptions) -> Result<()> {
	if buf.len() < table.size {
		return Err(ReflectError::BufferTooSmall {
			owner: table.name,
			need: table.size,
			have: buf.len(),
		});
	}
	decode_object(node, buf, heap, table, opt, 0)
}

fn decode_object<N: Node>(node: &N, buf: &mut [u8], heap: &mut Heap, table: &Table, opt: &DecodeOptions, depth: u32) -> Result<()> {
	if depth >= opt.max_depth {
		return Err(ReflectError::DepthExceeded { max_depth: opt.max_depth });
	}
	if node.kind() != NodeKind::Object {
		return Err(ReflectError::WrongType {
			field: table.name,
			expected: Kind::Object,
			got: node.kind().as_str(),
		});
	}
	trace!(table = table.name, depth, "decode object");

	for (position, field) in table.fields().enumerate() {
		// count fields are written by the array they describe; until then they hold the default
		if table.is_count_field(field.name) {
			if counts_later_array(table, position, field.name) {
				fill_default(buf, table, field);
			}
			continue;
		}

		let Err(err) = decode_field(node, buf, heap, table, field, opt, depth) else {
			continue;
		};

		fill_default(buf, table, field);
		if field.nullable {
			debug!(table = table.name, field = field.name, error = %err, "nullable field defaulted");
			continue;
		}
		warn!(table = table.name, field = field.name, code = err.kind().code(), error = %err, "field decode failed");
		return Err(err);
	}

	Ok(())
}

fn counts_later_array(table: &Table, position: usize, count_name: &str) -> bool {
	table
		.fields()
		.skip(position + 1)
		.any(|field| matches!(field.kind, FieldKind::Array { count_field, .. } if count_field == count_name))
}

fn decode_field<N: Node>(node: &N, buf: &mut [u8], heap: &mut Heap, table: &Table, field: &FieldDesc, opt: &DecodeOptions, depth: u32) -> Result<()> {
	let value = node
		.get(field.name)
		.filter(|value| value.kind() != NodeKind::Null)
		.ok_or(ReflectError::MissingField { field: field.name })?;
	check_kind(field, value)?;

	match field.kind {
		FieldKind::Object(nested) => {
			let sub = slot_mut(buf, field, nested.size)?;
			// start from defaults so a failure releases exactly what was decoded
			fill_table(sub, nested);
			let outcome = decode_object(value, sub, heap, nested, opt, depth + 1);
			if outcome.is_err() {
				release(sub, heap, nested);
			}
			outcome
		}
		FieldKind::Array { elem, elem_size, .. } => decode_array(value, buf, heap, table, field, elem, elem_size, opt, depth),
		FieldKind::String | FieldKind::Integer | FieldKind::Real | FieldKind::Bool => decode_scalar(value, buf, heap, field),
	}
}

/// Integers and reals cross-accept each other; integer slots also take booleans as 0/1.
fn check_kind<N: Node>(field: &FieldDesc, value: &N) -> Result<()> {
	let got = value.kind();
	let compatible = match field.kind_tag() {
		Kind::Object => got == NodeKind::Object,
		Kind::Array => got == NodeKind::Array,
		Kind::String => got == NodeKind::String,
		Kind::Integer => matches!(got, NodeKind::Integer | NodeKind::Real | NodeKind::Bool),
		Kind::Real => matches!(got, NodeKind::Integer | NodeKind::Real),
		Kind::Bool => got == NodeKind::Bool,
	};
	if !compatible {
		return Err(ReflectError::WrongType {
			field: field.name,
			expected: field.kind_tag(),
			got: got.as_str(),
		});
	}
	Ok(())
}

#[allow(clippy::too_many_arguments)]
fn decode_array<N: Node>(
	value: &N,
	buf: &mut [u8],
	heap: &mut Heap,
	table: &Table,
	field: &FieldDesc,
	elem: &Table,
	elem_size: usize,
	opt: &DecodeOptions,
	depth: u32,
) -> Result<()> {
	if elem_size == 0 {
		return Err(ReflectError::InvalidTable {
			table: elem.name,
			reason: format!("zero-size element table for array {}", field.name),
		});
	}
	let count_field = table.count_desc(field)?;
	let len = value.array_len();
	if len == 0 {
		write_int(buf, count_field, 0)?;
		return write_handle(buf, field, 0);
	}

	if len > opt.max_array_elems {
		return Err(ReflectError::ArrayTooLarge {
			field: field.name,
			count: len,
			max: opt.max_array_elems,
		});
	}
	let bytes = len.checked_mul(elem_size).ok_or(ReflectError::ArrayTooLarge {
		field: field.name,
		count: len,
		max: opt.max_array_elems,
	})?;
	let mut block = Heap::try_alloc(bytes).ok_or(ReflectError::Memory { field: field.name, bytes })?;

	let mut decoded = 0_usize;
	for index in 0..len {
		let Some(item) = value.at(index) else {
			continue;
		};

		let start = decoded * elem_size;
		let slot = &mut block[start..start + elem_size];
		match decode_element(item, slot, heap, elem, opt, depth + 1) {
			Ok(()) => decoded += 1,
			Err(err) => {
				debug!(field = field.name, index, error = %err, "array element skipped");
				// the slot is reused by the next element
				release(slot, heap, elem);
				fill_table(slot, elem);
			}
		}
	}

	if decoded == 0 {
		write_int(buf, count_field, 0)?;
		write_handle(buf, field, 0)?;
		return Err(ReflectError::MissingField { field: field.name });
	}

	let count = i64::try_from(decoded).unwrap_or(i64::MAX);
	let count_fits = IntWidth::from_size(count_field.size).is_some_and(|width| width.fits(count));
	if !count_fits {
		for chunk in block.chunks_exact_mut(elem_size).take(decoded) {
			release(chunk, heap, elem);
		}
		return Err(ReflectError::Overflow {
			field: count_field.name,
			size: count_field.size,
			value: count.to_string(),
		});
	}

	block.truncate(decoded * elem_size);
	let handle = heap.insert(block);
	write_int(buf, count_field, count)?;
	write_handle(buf, field, handle)
}

fn decode_element<N: Node>(item: &N, slot: &mut [u8], heap: &mut Heap, elem: &Table, opt: &DecodeOptions, depth: u32) -> Result<()> {
	match elem.scalar_field() {
		Some(scalar) => {
			check_kind(scalar, item)?;
			decode_scalar(item, slot, heap, scalar)
		}
		None => decode_object(item, slot, heap, elem, opt, depth),
	}
}

fn decode_scalar<N: Node>(value: &N, buf: &mut [u8], heap: &mut Heap, field: &FieldDesc) -> Result<()> {
	match field.kind {
		FieldKind::String => {
			let text = value.as_str().ok_or(ReflectError::MissingField { field: field.name })?;
			// claim the slot before allocating so a bad layout cannot leak a block
			slot_mut(buf, field, PTR_SIZE)?;
			let bytes = text.len() + 1;
			let mut block = Heap::try_alloc(bytes).ok_or(ReflectError::Memory { field: field.name, bytes })?;
			block[..text.len()].copy_from_slice(text.as_bytes());
			let handle = heap.insert(block);
			write_handle(buf, field, handle)
		}
		FieldKind::Integer | FieldKind::Bool => {
			let integral = integral_value(field, value)?;
			write_int(buf, field, integral)
		}
		FieldKind::Real => {
			let real = match value.kind() {
				NodeKind::Integer => value.as_i64().map(|integer| integer as f64),
				_ => value.as_f64(),
			};
			let real = real.ok_or(ReflectError::WrongType {
				field: field.name,
				expected: Kind::Real,
				got: value.kind().as_str(),
			})?;
			write_real(buf, field, real)
		}
		FieldKind::Object(_) | FieldKind::Array { .. } => Err(ReflectError::WrongType {
			field: field.name,
			expected: field.kind_tag(),
			got: value.kind().as_str(),
		}),
	}
}

fn integral_value<N: Node>(field: &FieldDesc, value: &N) -> Result<i64> {
	let integral = match value.kind() {
		NodeKind::Integer => value.as_i64(),
		NodeKind::Bool => value.as_bool().map(i64::from),
		NodeKind::Real => match value.as_f64() {
			Some(real) => Some(truncate_real(field, real)?),
			None => None,
		},
		_ => None,
	};
	integral.ok_or(ReflectError::WrongType {
		field: field.name,
		expected: field.kind_tag(),
		got: value.kind().as_str(),
	})
}

/// Truncate toward zero after checking the signed 64-bit range.
fn truncate_real(field: &FieldDesc, real: f64) -> Result<i64> {
	if !(-I64_LIMIT..I64_LIMIT).contains(&real) {
		return Err(ReflectError::Overflow {
			field: field.name,
			size: field.size,
			value: real.to_string(),
		});
	}
	Ok(real.trunc() as i64)
}
