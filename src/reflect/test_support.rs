//! Tables shared by unit tests across the reflect modules.

use crate::reflect::{ELEM_STRING, FieldDesc, Table};

/// `{ x: i32, y: i32 }`
pub(crate) static POINT: Table = Table {
	name: "Point",
	size: 8,
	fields: &[FieldDesc::int("x", 0, 4), FieldDesc::int("y", 4, 4)],
};

/// One field of every kind.
pub(crate) static SAMPLE: Table = Table {
	name: "Sample",
	size: 80,
	fields: &[
		FieldDesc::int("id", 0, 8),
		FieldDesc::int("small", 8, 1).nullable(),
		FieldDesc::int("mid", 10, 2).nullable(),
		FieldDesc::int("word", 12, 4).nullable(),
		FieldDesc::real("ratio", 16).nullable(),
		FieldDesc::bool("flag", 24, 1).nullable(),
		FieldDesc::string("name", 32).nullable(),
		FieldDesc::object("point", 40, &POINT).nullable(),
		FieldDesc::int("tag_count", 48, 4),
		FieldDesc::array("tags", 56, &ELEM_STRING, "tag_count").nullable(),
		FieldDesc::int("point_count", 64, 8),
		FieldDesc::array("points", 72, &POINT, "point_count").nullable(),
	],
};

/// Required scalars only.
pub(crate) static PLAIN: Table = Table {
	name: "Plain",
	size: 24,
	fields: &[
		FieldDesc::int("first", 0, 4),
		FieldDesc::string("second", 8),
		FieldDesc::real("third", 16),
	],
};

/// Array element owning a string.
pub(crate) static LABEL: Table = Table {
	name: "Label",
	size: 16,
	fields: &[FieldDesc::string("text", 0), FieldDesc::int("rank", 8, 4)],
};

/// Required array of [`LABEL`] elements.
pub(crate) static HOLDER: Table = Table {
	name: "Holder",
	size: 16,
	fields: &[FieldDesc::int("labels_len", 0, 4), FieldDesc::array("labels", 8, &LABEL, "labels_len")],
};

/// Buffer of `table.size` bytes filled with a recognisable non-zero pattern.
pub(crate) fn garbage_buffer(table: &Table) -> Vec<u8> {
	vec![0xAA; table.size]
}
