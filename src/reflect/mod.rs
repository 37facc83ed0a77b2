mod bytes;
mod compression;
mod decode;
mod encode;
mod error;
mod fill;
mod heap;
mod meta;
mod node;
mod print;
mod record;
#[cfg(test)]
mod test_support;
mod value;
mod visit;

/// Integer slot width tags.
pub use bytes::IntWidth;
/// Compression detection and document loading.
pub use compression::{Compression, ZSTD_MAGIC, decode_bytes, read_document};
/// Table-driven decoding entry points and options.
pub use decode::{DecodeOptions, decode, decode_slice, decode_str, decode_with};
/// Table-driven encoding entry points.
pub use encode::{encode, encode_pretty, encode_value};
/// Error and result aliases.
pub use error::{ErrorKind, ReflectError, Result};
/// Default-value filler.
pub use fill::{fill_default, fill_table};
/// Owned block arena for strings and arrays.
pub use heap::{Handle, Heap};
/// Field descriptors, tables and shipped scalar element tables.
pub use meta::{
	ELEM_BOOL, ELEM_F64, ELEM_I8, ELEM_I16, ELEM_I32, ELEM_I64, ELEM_STRING, FieldDesc, FieldKind, Kind, MAX_TABLE_DEPTH, PTR_SIZE, REAL_SIZE, SCALAR_MARKER,
	Table,
};
/// Generic value-tree abstraction.
pub use node::{Node, NodeKind, parse_slice, parse_str};
/// Text rendering of populated records.
pub use print::{PrintOptions, render, render_string};
/// Buffer-plus-heap convenience owner.
pub use record::Record;
/// Owned snapshot value types.
pub use value::{FieldValue, StructValue, Value, snapshot};
/// Shallow field visitor and release helpers.
pub use visit::{release, release_shallow, visit, visit_mut};
