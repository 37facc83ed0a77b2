use thiserror::Error;

use crate::reflect::Kind;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, ReflectError>;

/// Coarse failure taxonomy shared by decode, encode and table validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// Unusable buffer, table or options passed in by the caller.
	InvalidArguments,
	/// Source text did not parse into a value tree.
	Format,
	/// Required key absent, or a required scalar was null.
	MissingField,
	/// Value tree node kind incompatible with the declared field kind.
	WrongType,
	/// Numeric value does not fit its slot, or the slot width is unsupported.
	Overflow,
	/// Allocation failed or was refused.
	Memory,
	/// Reading a source document failed.
	Io,
}

impl ErrorKind {
	/// Stable numeric code, `0` being reserved for success.
	pub fn code(self) -> i32 {
		match self {
			Self::InvalidArguments => 1,
			Self::Format => 2,
			Self::MissingField => 3,
			Self::WrongType => 4,
			Self::Overflow => 5,
			Self::Memory => 6,
			Self::Io => 7,
		}
	}

	/// Render the kind as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::InvalidArguments => "invalid_arguments",
			Self::Format => "format",
			Self::MissingField => "missing_field",
			Self::WrongType => "wrong_type",
			Self::Overflow => "overflow",
			Self::Memory => "memory",
			Self::Io => "io",
		}
	}
}

/// Errors produced while validating tables, decoding and encoding records.
#[derive(Debug, Error)]
pub enum ReflectError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Source text is not valid JSON.
	#[error("format: {0}")]
	Format(#[from] serde_json::Error),
	/// Document text, after any decompression, exceeded the configured limit.
	#[error("document exceeded limit {limit} bytes")]
	DocumentTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
	/// Target buffer cannot hold one instance of the table.
	#[error("buffer too small for {owner}: need={need}, have={have}")]
	BufferTooSmall {
		/// Table or field whose slot did not fit.
		owner: &'static str,
		/// Bytes required by the table.
		need: usize,
		/// Bytes available in the buffer.
		have: usize,
	},
	/// Table breaks a layout invariant.
	#[error("invalid table {table}: {reason}")]
	InvalidTable {
		/// Offending table name.
		table: &'static str,
		/// Human-readable description of the broken invariant.
		reason: String,
	},
	/// Nested table recursion exceeded the configured limit.
	#[error("table nesting exceeded (max={max_depth})")]
	DepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Required key absent, null, or not a usable scalar.
	#[error("missing field {field}")]
	MissingField {
		/// Field name.
		field: &'static str,
	},
	/// Node kind does not match the declared field kind.
	#[error("field {field}: expected {expected}, got {got}")]
	WrongType {
		/// Field name.
		field: &'static str,
		/// Declared field kind.
		expected: Kind,
		/// Kind label of the source node.
		got: &'static str,
	},
	/// Array count field and owned block disagree.
	#[error("field {field}: count {count} does not match block of {bytes} bytes")]
	LengthMismatch {
		/// Array field name.
		field: &'static str,
		/// Count read from the count field.
		count: i64,
		/// Length of the owned block.
		bytes: usize,
	},
	/// Numeric value does not fit the declared slot.
	#[error("field {field}: value {value} overflows {size}-byte slot")]
	Overflow {
		/// Field name.
		field: &'static str,
		/// Declared slot width.
		size: usize,
		/// Rendered source value.
		value: String,
	},
	/// Declared slot width is not one the field kind supports.
	#[error("field {field}: unsupported width {size} for {kind}")]
	UnsupportedWidth {
		/// Field name.
		field: &'static str,
		/// Declared field kind.
		kind: Kind,
		/// Declared slot width.
		size: usize,
	},
	/// Array longer than the configured element ceiling.
	#[error("field {field}: array too large: count={count}, max={max}")]
	ArrayTooLarge {
		/// Array field name.
		field: &'static str,
		/// Source element count.
		count: usize,
		/// Maximum permitted element count.
		max: usize,
	},
	/// Allocation of an owned child block failed.
	#[error("field {field}: allocation of {bytes} bytes failed")]
	Memory {
		/// Field name.
		field: &'static str,
		/// Requested allocation size.
		bytes: usize,
	},
}

impl ReflectError {
	/// Map the error onto the shared failure taxonomy.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Io(_) => ErrorKind::Io,
			Self::Format(_) | Self::DocumentTooLarge { .. } => ErrorKind::Format,
			Self::BufferTooSmall { .. } | Self::InvalidTable { .. } | Self::DepthExceeded { .. } => ErrorKind::InvalidArguments,
			Self::MissingField { .. } => ErrorKind::MissingField,
			Self::WrongType { .. } | Self::LengthMismatch { .. } => ErrorKind::WrongType,
			Self::Overflow { .. } | Self::UnsupportedWidth { .. } => ErrorKind::Overflow,
			Self::ArrayTooLarge { .. } | Self::Memory { .. } => ErrorKind::Memory,
		}
	}

	/// Field the error is attached to, when there is one.
	pub fn field(&self) -> Option<&'static str> {
		match self {
			Self::MissingField { field }
			| Self::WrongType { field, .. }
			| Self::LengthMismatch { field, .. }
			| Self::Overflow { field, .. }
			| Self::UnsupportedWidth { field, .. }
			| Self::ArrayTooLarge { field, .. }
			| Self::Memory { field, .. } => Some(*field),
			_ => None,
		}
	}
}
