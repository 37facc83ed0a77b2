use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::reflect::bytes::{read_handle, read_int, read_real};
use crate::reflect::{FieldDesc, FieldKind, Heap, MAX_TABLE_DEPTH, ReflectError, Result, Table, visit};

/// Owned read-out of one field slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Null string handle.
	Null,
	/// Boolean slot.
	Bool(bool),
	/// Integer slot, sign-extended.
	I64(i64),
	/// Real slot.
	F64(f64),
	/// String block without its terminator.
	String(Box<str>),
	/// Array elements, in block order.
	Array(Vec<Value>),
	/// Embedded object or object array element.
	Struct(StructValue),
}

/// Owned read-out of one record.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
	/// Table name.
	pub type_name: Box<str>,
	/// Fields in table order.
	pub fields: Vec<FieldValue>,
}

/// Named field of a [`StructValue`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
	/// Field name.
	pub name: Box<str>,
	/// Field contents.
	pub value: Value,
}

impl StructValue {
	/// Look up a field value by name.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.fields.iter().find(|field| field.name.as_ref() == name).map(|field| &field.value)
	}
}

impl Value {
	/// Integer payload.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::I64(value) => Some(*value),
			_ => None,
		}
	}

	/// Real payload.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::F64(value) => Some(*value),
			_ => None,
		}
	}

	/// Boolean payload.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(value) => Some(*value),
			_ => None,
		}
	}

	/// String payload.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(value) => Some(value),
			_ => None,
		}
	}

	/// Array elements.
	pub fn as_array(&self) -> Option<&[Value]> {
		match self {
			Self::Array(items) => Some(items),
			_ => None,
		}
	}

	/// Embedded record.
	pub fn as_struct(&self) -> Option<&StructValue> {
		match self {
			Self::Struct(item) => Some(item),
			_ => None,
		}
	}
}

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		match self {
			Self::Null => serializer.serialize_unit(),
			Self::Bool(value) => serializer.serialize_bool(*value),
			Self::I64(value) => serializer.serialize_i64(*value),
			Self::F64(value) => serializer.serialize_f64(*value),
			Self::String(value) => serializer.serialize_str(value),
			Self::Array(items) => items.serialize(serializer),
			Self::Struct(item) => item.serialize(serializer),
		}
	}
}

impl Serialize for StructValue {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.fields.len()))?;
		for field in &self.fields {
			map.serialize_entry(field.name.as_ref(), &field.value)?;
		}
		map.end()
	}
}

/// Read every field of `buf` into an owned value tree.
///
/// Unlike the encoder this never skips: null strings become [`Value::Null`]
/// and a broken slot is an error.
pub fn snapshot(buf: &[u8], heap: &Heap, table: &Table) -> Result<StructValue> {
	snapshot_at(buf, heap, table, 0)
}

fn snapshot_at(buf: &[u8], heap: &Heap, table: &Table, depth: u32) -> Result<StructValue> {
	if depth >= MAX_TABLE_DEPTH {
		return Err(ReflectError::DepthExceeded { max_depth: MAX_TABLE_DEPTH });
	}

	let mut fields = Vec::new();
	let mut failure = None;
	visit(buf, table, |slot_bytes, field| {
		if failure.is_some() {
			return;
		}
		let value = match field.kind {
			FieldKind::Object(nested) => snapshot_at(slot_bytes, heap, nested, depth + 1).map(Value::Struct),
			FieldKind::Array { elem, elem_size, .. } => read_array(buf, heap, table, field, elem, elem_size, depth),
			_ => read_scalar(slot_bytes, heap, &FieldDesc { offset: 0, ..*field }),
		};
		match value {
			Ok(value) => fields.push(FieldValue {
				name: field.name.into(),
				value,
			}),
			Err(err) => failure = Some(err),
		}
	});

	if let Some(err) = failure {
		return Err(err);
	}
	Ok(StructValue {
		type_name: table.name.into(),
		fields,
	})
}

/// Read one scalar field; null string handles read as [`Value::Null`].
pub(crate) fn read_scalar(buf: &[u8], heap: &Heap, field: &FieldDesc) -> Result<Value> {
	match field.kind {
		FieldKind::Integer => Ok(Value::I64(read_int(buf, field)?)),
		FieldKind::Bool => Ok(Value::Bool(read_int(buf, field)? != 0)),
		FieldKind::Real => Ok(Value::F64(read_real(buf, field)?)),
		FieldKind::String => {
			let handle = read_handle(buf, field)?;
			if handle == 0 {
				return Ok(Value::Null);
			}
			let block = heap.get(handle).ok_or(ReflectError::MissingField { field: field.name })?;
			let text = block.strip_suffix(&[0]).unwrap_or(block);
			Ok(Value::String(String::from_utf8_lossy(text).into()))
		}
		FieldKind::Object(_) | FieldKind::Array { .. } => Err(ReflectError::InvalidTable {
			table: field.name,
			reason: format!("{} is not a scalar kind", field.kind_tag()),
		}),
	}
}

fn read_array(buf: &[u8], heap: &Heap, table: &Table, field: &FieldDesc, elem: &Table, elem_size: usize, depth: u32) -> Result<Value> {
	let Some(block) = array_block(buf, heap, table, field)? else {
		return Ok(Value::Array(Vec::new()));
	};

	let items = block
		.chunks_exact(elem_size)
		.map(|chunk| match elem.scalar_field() {
			Some(scalar) => read_scalar(chunk, heap, scalar),
			None => snapshot_at(chunk, heap, elem, depth + 1).map(Value::Struct),
		})
		.collect::<Result<Vec<_>>>()?;
	Ok(Value::Array(items))
}

/// Element block of an array field after checking it against the count field.
///
/// Returns `None` for the empty array (zero count, null handle).
pub(crate) fn array_block<'h>(buf: &[u8], heap: &'h Heap, table: &Table, field: &FieldDesc) -> Result<Option<&'h [u8]>> {
	let count = read_int(buf, table.count_desc(field)?)?;
	let handle = read_handle(buf, field)?;
	if count == 0 && handle == 0 {
		return Ok(None);
	}

	let block = heap.get(handle).ok_or(ReflectError::MissingField { field: field.name })?;
	let elem_size = match field.kind {
		FieldKind::Array { elem_size, .. } => elem_size,
		_ => 0,
	};
	let expected = usize::try_from(count).ok().and_then(|count| count.checked_mul(elem_size));
	if elem_size == 0 || expected != Some(block.len()) {
		return Err(ReflectError::LengthMismatch {
			field: field.name,
			count,
			bytes: block.len(),
		});
	}
	Ok(Some(block))
}
