use crate::reflect::bytes::{write_handle, write_int, write_real};
use crate::reflect::{FieldDesc, FieldKind, Table};

/// Write the deterministic default for one field of `table`.
///
/// Integers and booleans get 0, reals 0.0, strings null, arrays null with a
/// zero count, objects recurse over their nested table. Slot bytes past the
/// end of `buf` are left alone.
pub fn fill_default(buf: &mut [u8], table: &Table, field: &FieldDesc) {
	match field.kind {
		FieldKind::Integer | FieldKind::Bool => {
			if write_int(buf, field, 0).is_err() {
				zero_slot(buf, field);
			}
		}
		FieldKind::Real => {
			if write_real(buf, field, 0.0).is_err() {
				zero_slot(buf, field);
			}
		}
		FieldKind::String => {
			if write_handle(buf, field, 0).is_err() {
				zero_slot(buf, field);
			}
		}
		FieldKind::Array { count_field, .. } => {
			if write_handle(buf, field, 0).is_err() {
				zero_slot(buf, field);
			}
			if let Some(count) = table.field(count_field) {
				fill_default(buf, table, count);
			}
		}
		FieldKind::Object(nested) => {
			if let Some(sub) = buf.get_mut(field.offset..) {
				fill_table(sub, nested);
			}
		}
	}
}

/// Fill every field of `table` with its default.
pub fn fill_table(buf: &mut [u8], table: &Table) {
	for field in table.fields() {
		fill_default(buf, table, field);
	}
}

fn zero_slot(buf: &mut [u8], field: &FieldDesc) {
	let end = field.range().end.min(buf.len());
	if let Some(slot) = buf.get_mut(field.offset..end) {
		slot.fill(0);
	}
}
