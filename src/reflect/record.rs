use crate::reflect::{
	DecodeOptions, Heap, Node, PrintOptions, Result, StructValue, Table, decode_with, encode, encode_pretty, encode_value, parse_slice, parse_str, release,
	release_shallow, render_string, snapshot,
};

/// Buffer and heap for one instance of a table, released on drop.
#[derive(Debug)]
pub struct Record {
	table: &'static Table,
	buf: Vec<u8>,
	heap: Heap,
}

impl Record {
	/// Allocate a zeroed instance of `table`.
	pub fn new(table: &'static Table) -> Self {
		Self {
			table,
			buf: vec![0; table.size],
			heap: Heap::new(),
		}
	}

	/// Table describing this record.
	pub fn table(&self) -> &'static Table {
		self.table
	}

	/// Raw record bytes.
	pub fn bytes(&self) -> &[u8] {
		&self.buf
	}

	/// Heap owning the record's strings and arrays.
	pub fn heap(&self) -> &Heap {
		&self.heap
	}

	/// Replace the contents with `text` decoded under default options.
	pub fn decode_str(&mut self, text: &str) -> Result<()> {
		let tree = parse_str(text)?;
		self.decode_with(&tree, &DecodeOptions::default())
	}

	/// Replace the contents with JSON `bytes`.
	pub fn decode_slice(&mut self, bytes: &[u8], opt: &DecodeOptions) -> Result<()> {
		let tree = parse_slice(bytes)?;
		self.decode_with(&tree, opt)
	}

	/// Replace the contents with an already parsed value tree.
	pub fn decode_value<N: Node>(&mut self, node: &N) -> Result<()> {
		self.decode_with(node, &DecodeOptions::default())
	}

	/// Replace the contents with `node` decoded under `opt`.
	///
	/// Blocks held by the previous contents are released first.
	pub fn decode_with<N: Node>(&mut self, node: &N, opt: &DecodeOptions) -> Result<()> {
		self.release();
		decode_with(node, &mut self.buf, &mut self.heap, self.table, opt)
	}

	/// Compact JSON text.
	pub fn encode(&self) -> Result<String> {
		encode(&self.buf, &self.heap, self.table)
	}

	/// Indented JSON text.
	pub fn encode_pretty(&self) -> Result<String> {
		encode_pretty(&self.buf, &self.heap, self.table)
	}

	/// JSON value tree.
	pub fn encode_value(&self) -> Result<serde_json::Value> {
		encode_value(&self.buf, &self.heap, self.table)
	}

	/// Owned value tree of every field.
	pub fn snapshot(&self) -> Result<StructValue> {
		snapshot(&self.buf, &self.heap, self.table)
	}

	/// Indented `name = value` rendering.
	pub fn render(&self, options: &PrintOptions) -> String {
		render_string(&self.buf, &self.heap, self.table, options)
	}

	/// Free every owned block and reset counts and handles.
	pub fn release(&mut self) {
		release(&mut self.buf, &mut self.heap, self.table);
	}

	/// Free only the blocks held directly by the root record.
	///
	/// Strings inside embedded objects and array elements stay in the heap
	/// until it is dropped.
	pub fn release_shallow(&mut self) {
		release_shallow(&mut self.buf, &mut self.heap, self.table);
	}
}

impl Drop for Record {
	fn drop(&mut self) {
		self.release();
	}
}
