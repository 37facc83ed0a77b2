use std::fmt::{self, Write};

use crate::reflect::value::{array_block, read_scalar};
use crate::reflect::{FieldDesc, FieldKind, Heap, Table, Value, visit};

/// Output truncation limits for rendered records.
#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
	/// Maximum nested object/array depth rendered in full.
	pub max_depth: u32,
	/// Maximum number of elements printed for arrays.
	pub max_array_items: usize,
	/// Maximum number of Unicode scalar values printed for strings.
	pub max_string_len: usize,
}

impl Default for PrintOptions {
	fn default() -> Self {
		Self {
			max_depth: 6,
			max_array_items: 16,
			max_string_len: 200,
		}
	}
}

impl PrintOptions {
	/// Preset for a one-screen overview of large records.
	pub fn brief() -> Self {
		Self {
			max_depth: 3,
			max_array_items: 4,
			max_string_len: 60,
		}
	}
}

/// Render `buf` as indented `name = value` lines.
///
/// Slots that cannot be read are rendered as `<error>` markers instead of
/// aborting the whole record.
pub fn render<W: Write>(out: &mut W, buf: &[u8], heap: &Heap, table: &Table, options: &PrintOptions) -> fmt::Result {
	Printer { out, heap, options }.record(buf, table, 0, 0)
}

/// [`render`] into a fresh `String`.
pub fn render_string(buf: &[u8], heap: &Heap, table: &Table, options: &PrintOptions) -> String {
	let mut out = String::new();
	// writing into a String cannot fail
	let _ = render(&mut out, buf, heap, table, options);
	out
}

struct Printer<'a, W> {
	out: &'a mut W,
	heap: &'a Heap,
	options: &'a PrintOptions,
}

impl<W: Write> Printer<'_, W> {
	fn record(&mut self, buf: &[u8], table: &Table, indent: usize, depth: u32) -> fmt::Result {
		let pad = " ".repeat(indent);
		if depth >= self.options.max_depth {
			return writeln!(self.out, "{pad}{} {{ ... }}", table.name);
		}

		writeln!(self.out, "{pad}{} {{", table.name)?;
		let mut status = Ok(());
		visit(buf, table, |slot, field| {
			if status.is_ok() {
				status = self.field(buf, slot, table, field, indent + 2, depth);
			}
		});
		status?;
		writeln!(self.out, "{pad}}}")
	}

	fn field(&mut self, buf: &[u8], slot: &[u8], table: &Table, field: &FieldDesc, indent: usize, depth: u32) -> fmt::Result {
		let pad = " ".repeat(indent);
		match field.kind {
			FieldKind::Object(nested) => {
				writeln!(self.out, "{pad}{} =", field.name)?;
				self.record(slot, nested, indent + 2, depth + 1)
			}
			FieldKind::Array { elem, elem_size, .. } => {
				write!(self.out, "{pad}{} = ", field.name)?;
				let block = match array_block(buf, self.heap, table, field) {
					Ok(Some(block)) => block,
					Ok(None) => return writeln!(self.out, "[]"),
					Err(err) => return writeln!(self.out, "<{err}>"),
				};
				self.array(block, elem, elem_size, indent, depth + 1)
			}
			FieldKind::String | FieldKind::Integer | FieldKind::Real | FieldKind::Bool => {
				write!(self.out, "{pad}{} = ", field.name)?;
				self.scalar(slot, &FieldDesc { offset: 0, ..*field })
			}
		}
	}

	fn array(&mut self, block: &[u8], elem: &Table, elem_size: usize, indent: usize, depth: u32) -> fmt::Result {
		let count = block.len() / elem_size;
		if depth >= self.options.max_depth {
			return writeln!(self.out, "[... {count} items]");
		}

		writeln!(self.out, "[")?;
		let pad = " ".repeat(indent + 2);
		for chunk in block.chunks_exact(elem_size).take(self.options.max_array_items) {
			match elem.scalar_field() {
				Some(scalar) => {
					write!(self.out, "{pad}")?;
					self.scalar(chunk, scalar)?;
				}
				None => self.record(chunk, elem, indent + 2, depth + 1)?,
			}
		}
		if count > self.options.max_array_items {
			writeln!(self.out, "{pad}... {} more", count - self.options.max_array_items)?;
		}
		writeln!(self.out, "{}]", " ".repeat(indent))
	}

	fn scalar(&mut self, slot: &[u8], field: &FieldDesc) -> fmt::Result {
		match read_scalar(slot, self.heap, field) {
			Ok(Value::String(text)) => writeln!(self.out, "\"{}\"", truncate(&text, self.options.max_string_len)),
			Ok(Value::Null) => writeln!(self.out, "null"),
			Ok(Value::Bool(value)) => writeln!(self.out, "{value}"),
			Ok(Value::I64(value)) => writeln!(self.out, "{value}"),
			Ok(Value::F64(value)) => writeln!(self.out, "{value}"),
			Ok(other) => writeln!(self.out, "{other:?}"),
			Err(err) => writeln!(self.out, "<{err}>"),
		}
	}
}

fn truncate(input: &str, max_len: usize) -> String {
	if input.chars().count() <= max_len {
		return input.to_owned();
	}
	let out: String = input.chars().take(max_len).collect();
	format!("{out}...")
}

#[cfg(test)]
mod tests {
	use super::{PrintOptions, render_string};
	use crate::reflect::test_support::SAMPLE;
	use crate::reflect::{Heap, decode_str};

	fn decoded(text: &str) -> (Vec<u8>, Heap) {
		let mut buf = vec![0_u8; SAMPLE.size];
		let mut heap = Heap::new();
		decode_str(text, &mut buf, &mut heap, &SAMPLE).expect("decode succeeds");
		(buf, heap)
	}

	#[test]
	fn renders_nested_records_and_arrays() {
		let (buf, heap) = decoded(r#"{"id":4,"name":"box","point":{"x":1,"y":2},"tags":["a"],"points":[{"x":5,"y":6}]}"#);
		let text = render_string(&buf, &heap, &SAMPLE, &PrintOptions::default());

		assert!(text.starts_with("Sample {\n  id = 4\n"));
		assert!(text.contains("  name = \"box\"\n"));
		assert!(text.contains("  point =\n    Point {\n      x = 1\n"));
		assert!(text.contains("  tags = [\n    \"a\"\n  ]\n"));
		assert!(text.contains("    Point {\n      x = 5\n"));
		assert!(text.ends_with("}\n"));
	}

	#[test]
	fn null_string_and_empty_array_render_plainly() {
		let (buf, heap) = decoded(r#"{"id":1}"#);
		let text = render_string(&buf, &heap, &SAMPLE, &PrintOptions::default());
		assert!(text.contains("  name = null\n"));
		assert!(text.contains("  tags = []\n"));
	}

	#[test]
	fn limits_truncate_output() {
		let (buf, heap) = decoded(r#"{"id":1,"name":"abcdefgh","tags":["a","b","c"]}"#);
		let options = PrintOptions {
			max_depth: 1,
			max_array_items: 2,
			max_string_len: 3,
		};
		let text = render_string(&buf, &heap, &SAMPLE, &options);

		assert!(text.contains("name = \"abc...\""));
		assert!(text.contains("tags = [... 3 items]"));
		assert!(text.contains("point =\n    Point { ... }"));

		let options = PrintOptions {
			max_array_items: 2,
			..PrintOptions::default()
		};
		let text = render_string(&buf, &heap, &SAMPLE, &options);
		assert!(text.contains("    ... 1 more\n"));
	}
}
