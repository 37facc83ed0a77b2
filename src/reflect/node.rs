use crate::reflect::Result;

/// Dynamic kind of a value tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
	/// Explicit null.
	Null,
	/// Keyed children.
	Object,
	/// Indexed children.
	Array,
	/// Text scalar.
	String,
	/// Integer representable as `i64`.
	Integer,
	/// Any other number.
	Real,
	/// `true` or `false`.
	Bool,
}

impl NodeKind {
	/// Render the kind as a stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Object => "object",
			Self::Array => "array",
			Self::String => "string",
			Self::Integer => "integer",
			Self::Real => "real",
			Self::Bool => "bool",
		}
	}
}

/// Read-only navigation over a parsed value tree.
///
/// The decoder only borrows the tree; dropping it is the owner's business.
pub trait Node {
	/// Kind of this node.
	fn kind(&self) -> NodeKind;
	/// Child under `key` when this node is an object.
	fn get(&self, key: &str) -> Option<&Self>;
	/// Element count when this node is an array, `0` otherwise.
	fn array_len(&self) -> usize;
	/// Element at `index` when this node is an array.
	fn at(&self, index: usize) -> Option<&Self>;
	/// Text of a string node.
	fn as_str(&self) -> Option<&str>;
	/// Value of an integer node.
	fn as_i64(&self) -> Option<i64>;
	/// Value of any number node.
	fn as_f64(&self) -> Option<f64>;
	/// Value of a boolean node.
	fn as_bool(&self) -> Option<bool>;
}

impl Node for serde_json::Value {
	fn kind(&self) -> NodeKind {
		match self {
			Self::Null => NodeKind::Null,
			Self::Bool(_) => NodeKind::Bool,
			Self::Number(number) if number.is_i64() => NodeKind::Integer,
			Self::Number(_) => NodeKind::Real,
			Self::String(_) => NodeKind::String,
			Self::Array(_) => NodeKind::Array,
			Self::Object(_) => NodeKind::Object,
		}
	}

	fn get(&self, key: &str) -> Option<&Self> {
		self.as_object()?.get(key)
	}

	fn array_len(&self) -> usize {
		self.as_array().map_or(0, Vec::len)
	}

	fn at(&self, index: usize) -> Option<&Self> {
		self.as_array()?.get(index)
	}

	fn as_str(&self) -> Option<&str> {
		serde_json::Value::as_str(self)
	}

	fn as_i64(&self) -> Option<i64> {
		serde_json::Value::as_i64(self)
	}

	fn as_f64(&self) -> Option<f64> {
		serde_json::Value::as_f64(self)
	}

	fn as_bool(&self) -> Option<bool> {
		serde_json::Value::as_bool(self)
	}
}

/// Parse JSON text into a value tree.
pub fn parse_str(text: &str) -> Result<serde_json::Value> {
	Ok(serde_json::from_str(text)?)
}

/// Parse JSON bytes into a value tree.
pub fn parse_slice(bytes: &[u8]) -> Result<serde_json::Value> {
	Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::{Node, NodeKind, parse_str};
	use crate::reflect::ErrorKind;

	#[test]
	fn numbers_split_into_integer_and_real() {
		assert_eq!(Node::kind(&json!(7)), NodeKind::Integer);
		assert_eq!(Node::kind(&json!(-7)), NodeKind::Integer);
		assert_eq!(Node::kind(&json!(7.5)), NodeKind::Real);
		assert_eq!(Node::kind(&json!(u64::MAX)), NodeKind::Real);
	}

	#[test]
	fn navigation_follows_keys_and_indices() {
		let tree = json!({"list": [1, "two"], "flag": true});
		let list = Node::get(&tree, "list").expect("list present");
		assert_eq!(list.array_len(), 2);
		assert_eq!(Node::as_str(list.at(1).expect("second element")), Some("two"));
		assert_eq!(Node::as_bool(Node::get(&tree, "flag").expect("flag present")), Some(true));
		assert!(Node::get(&tree, "absent").is_none());
		assert_eq!(tree.array_len(), 0);
	}

	#[test]
	fn malformed_text_is_format_error() {
		let err = parse_str("{\"a\":").expect_err("truncated json");
		assert_eq!(err.kind(), ErrorKind::Format);
	}
}
