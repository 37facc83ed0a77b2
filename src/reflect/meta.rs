use std::fmt;

use crate::reflect::{IntWidth, ReflectError, Result};

/// Width of a string or array slot; slots hold a heap handle.
pub const PTR_SIZE: usize = 8;
/// Width of a real slot.
pub const REAL_SIZE: usize = size_of::<f64>();
/// Leading character of the field name in a scalar element table.
pub const SCALAR_MARKER: char = '0';
/// Nesting ceiling enforced by [`Table::validate`].
pub const MAX_TABLE_DEPTH: u32 = 64;

/// Logical value kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
	/// Embedded sub-record.
	Object,
	/// Owned block of elements plus a sibling count field.
	Array,
	/// Owned UTF-8 text.
	String,
	/// Signed integer of 1, 2, 4 or 8 bytes.
	Integer,
	/// `f64`.
	Real,
	/// Integer slot holding 0 or 1.
	Bool,
}

impl Kind {
	/// Render the kind as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Object => "object",
			Self::Array => "array",
			Self::String => "string",
			Self::Integer => "integer",
			Self::Real => "real",
			Self::Bool => "bool",
		}
	}
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Kind plus the layout data only some kinds carry.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
	/// Sub-record embedded by value at the field offset.
	Object(&'static Table),
	/// Heap block of `count * elem_size` bytes.
	Array {
		/// Element layout; a scalar table when its field name starts with [`SCALAR_MARKER`].
		elem: &'static Table,
		/// Sibling integer field receiving the element count.
		count_field: &'static str,
		/// Bytes per element.
		elem_size: usize,
	},
	/// Heap handle to NUL-terminated text.
	String,
	/// Signed integer slot.
	Integer,
	/// `f64` slot.
	Real,
	/// Integer slot decoded from booleans.
	Bool,
}

/// One record field: lookup key, kind and byte layout.
#[derive(Debug, Clone, Copy)]
pub struct FieldDesc {
	/// Key looked up in the value tree; empty marks the sentinel.
	pub name: &'static str,
	/// Kind and kind-specific layout.
	pub kind: FieldKind,
	/// Byte offset inside the owning buffer.
	pub offset: usize,
	/// Slot width in bytes.
	pub size: usize,
	/// Whether a failure on this field is recoverable.
	pub nullable: bool,
}

impl FieldDesc {
	/// Sentinel descriptor terminating a table early.
	pub const END: FieldDesc = FieldDesc {
		name: "",
		kind: FieldKind::Integer,
		offset: 0,
		size: 0,
		nullable: true,
	};

	/// Signed integer field of `size` bytes.
	pub const fn int(name: &'static str, offset: usize, size: usize) -> Self {
		Self::scalar(name, FieldKind::Integer, offset, size)
	}

	/// Boolean field stored as a `size`-byte integer.
	pub const fn bool(name: &'static str, offset: usize, size: usize) -> Self {
		Self::scalar(name, FieldKind::Bool, offset, size)
	}

	/// `f64` field.
	pub const fn real(name: &'static str, offset: usize) -> Self {
		Self::scalar(name, FieldKind::Real, offset, REAL_SIZE)
	}

	/// Owned string field.
	pub const fn string(name: &'static str, offset: usize) -> Self {
		Self::scalar(name, FieldKind::String, offset, PTR_SIZE)
	}

	/// Embedded sub-record described by `table`.
	pub const fn object(name: &'static str, offset: usize, table: &'static Table) -> Self {
		Self {
			name,
			kind: FieldKind::Object(table),
			offset,
			size: table.size,
			nullable: false,
		}
	}

	/// Owned array of `elem` records whose length lands in `count_field`.
	pub const fn array(name: &'static str, offset: usize, elem: &'static Table, count_field: &'static str) -> Self {
		Self {
			name,
			kind: FieldKind::Array {
				elem,
				count_field,
				elem_size: elem.size,
			},
			offset,
			size: PTR_SIZE,
			nullable: false,
		}
	}

	/// Mark the field as soft-failing.
	pub const fn nullable(mut self) -> Self {
		self.nullable = true;
		self
	}

	/// Mark the field as hard-failing.
	pub const fn required(mut self) -> Self {
		self.nullable = false;
		self
	}

	const fn scalar(name: &'static str, kind: FieldKind, offset: usize, size: usize) -> Self {
		Self {
			name,
			kind,
			offset,
			size,
			nullable: false,
		}
	}

	/// Plain kind tag without layout payload.
	pub fn kind_tag(&self) -> Kind {
		match self.kind {
			FieldKind::Object(_) => Kind::Object,
			FieldKind::Array { .. } => Kind::Array,
			FieldKind::String => Kind::String,
			FieldKind::Integer => Kind::Integer,
			FieldKind::Real => Kind::Real,
			FieldKind::Bool => Kind::Bool,
		}
	}

	/// Whether this is the empty-name sentinel.
	pub fn is_sentinel(&self) -> bool {
		self.name.is_empty()
	}

	/// Byte range of the slot inside the owning buffer.
	pub fn range(&self) -> std::ops::Range<usize> {
		self.offset..self.offset.saturating_add(self.size)
	}
}

/// Ordered field descriptors for one record type.
#[derive(Debug)]
pub struct Table {
	/// Record type name, used in diagnostics.
	pub name: &'static str,
	/// Bytes occupied by one record instance.
	pub size: usize,
	/// Descriptors in decode order, optionally ending with [`FieldDesc::END`].
	pub fields: &'static [FieldDesc],
}

/// Scalar element table for 1-byte integers.
pub static ELEM_I8: Table = Table {
	name: "0i8",
	size: 1,
	fields: &[FieldDesc::int("0", 0, 1)],
};
/// Scalar element table for 2-byte integers.
pub static ELEM_I16: Table = Table {
	name: "0i16",
	size: 2,
	fields: &[FieldDesc::int("0", 0, 2)],
};
/// Scalar element table for 4-byte integers.
pub static ELEM_I32: Table = Table {
	name: "0i32",
	size: 4,
	fields: &[FieldDesc::int("0", 0, 4)],
};
/// Scalar element table for 8-byte integers.
pub static ELEM_I64: Table = Table {
	name: "0i64",
	size: 8,
	fields: &[FieldDesc::int("0", 0, 8)],
};
/// Scalar element table for reals.
pub static ELEM_F64: Table = Table {
	name: "0f64",
	size: REAL_SIZE,
	fields: &[FieldDesc::real("0", 0)],
};
/// Scalar element table for 1-byte booleans.
pub static ELEM_BOOL: Table = Table {
	name: "0bool",
	size: 1,
	fields: &[FieldDesc::bool("0", 0, 1)],
};
/// Scalar element table for strings.
pub static ELEM_STRING: Table = Table {
	name: "0string",
	size: PTR_SIZE,
	fields: &[FieldDesc::string("0", 0)],
};

impl Table {
	/// Descriptors up to the end of the slice or the first sentinel.
	pub fn fields(&self) -> impl Iterator<Item = &FieldDesc> {
		self.fields.iter().take_while(|field| !field.is_sentinel())
	}

	/// Look up a descriptor by name.
	pub fn field(&self, name: &str) -> Option<&FieldDesc> {
		self.fields().find(|field| field.name == name)
	}

	/// Scalar descriptor when this table describes scalar array elements.
	pub fn scalar_field(&self) -> Option<&FieldDesc> {
		self.fields().next().filter(|field| field.name.starts_with(SCALAR_MARKER))
	}

	/// Whether this table describes scalar array elements.
	pub fn is_scalar(&self) -> bool {
		self.scalar_field().is_some()
	}

	/// Whether `name` is the count field of some array in this table.
	pub fn is_count_field(&self, name: &str) -> bool {
		self.fields().any(|field| matches!(field.kind, FieldKind::Array { count_field, .. } if count_field == name))
	}

	/// Integer descriptor backing the count of `array`.
	pub(crate) fn count_desc(&self, array: &FieldDesc) -> Result<&FieldDesc> {
		let FieldKind::Array { count_field, .. } = array.kind else {
			return Err(self.invalid(format!("{} is not an array", array.name)));
		};
		self.field(count_field)
			.filter(|field| matches!(field.kind, FieldKind::Integer))
			.ok_or_else(|| self.invalid(format!("array {} names missing integer count field {count_field}", array.name)))
	}

	/// Whether decoded instances can own heap blocks.
	pub fn owns_memory(&self) -> bool {
		self.fields().any(|field| match field.kind {
			FieldKind::String | FieldKind::Array { .. } => true,
			FieldKind::Object(nested) => nested.owns_memory(),
			_ => false,
		})
	}

	/// Check layout invariants of this table and every nested table.
	pub fn validate(&self) -> Result<()> {
		self.validate_at(0)
	}

	fn validate_at(&self, depth: u32) -> Result<()> {
		if depth >= MAX_TABLE_DEPTH {
			return Err(ReflectError::DepthExceeded { max_depth: MAX_TABLE_DEPTH });
		}

		for field in self.fields() {
			if field.range().end > self.size {
				return Err(self.invalid(format!("field {} ends at {} past record size {}", field.name, field.range().end, self.size)));
			}

			match field.kind {
				FieldKind::Integer | FieldKind::Bool => {
					if IntWidth::from_size(field.size).is_none() {
						return Err(ReflectError::UnsupportedWidth {
							field: field.name,
							kind: field.kind_tag(),
							size: field.size,
						});
					}
				}
				FieldKind::Real | FieldKind::String => {
					let expected = if matches!(field.kind, FieldKind::Real) { REAL_SIZE } else { PTR_SIZE };
					if field.size != expected {
						return Err(ReflectError::UnsupportedWidth {
							field: field.name,
							kind: field.kind_tag(),
							size: field.size,
						});
					}
				}
				FieldKind::Object(nested) => {
					if field.size != nested.size {
						return Err(self.invalid(format!("object {} slot is {} bytes but {} is {}", field.name, field.size, nested.name, nested.size)));
					}
					nested.validate_at(depth + 1)?;
				}
				FieldKind::Array { elem, elem_size, .. } => {
					if field.size != PTR_SIZE {
						return Err(ReflectError::UnsupportedWidth {
							field: field.name,
							kind: Kind::Array,
							size: field.size,
						});
					}
					self.count_desc(field)?;
					if elem_size == 0 || elem_size != elem.size {
						return Err(self.invalid(format!("array {} element size {elem_size} disagrees with {} ({})", field.name, elem.name, elem.size)));
					}
					if let Some(scalar) = elem.scalar_field()
						&& matches!(scalar.kind, FieldKind::Object(_) | FieldKind::Array { .. })
					{
						return Err(elem.invalid(format!("scalar element {} must be a scalar kind", scalar.name)));
					}
					elem.validate_at(depth + 1)?;
				}
			}
		}

		Ok(())
	}

	fn invalid(&self, reason: String) -> ReflectError {
		ReflectError::InvalidTable { table: self.name, reason }
	}
}
