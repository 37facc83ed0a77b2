use crate::reflect::bytes::read_handle;
use crate::reflect::fill::fill_default;
use crate::reflect::{FieldDesc, FieldKind, Heap, Table};

/// Call `f` with the slot bytes of every field of `table`, in table order.
///
/// Object and array descriptors are passed like any other field; the visitor
/// never descends into nested tables. A callback that wants nested fields calls
/// `visit` again on the slot (objects) or on the heap block (arrays).
pub fn visit<F>(buf: &[u8], table: &Table, mut f: F)
where
	F: FnMut(&[u8], &FieldDesc),
{
	for field in table.fields() {
		if let Some(slot) = buf.get(field.range()) {
			f(slot, field);
		}
	}
}

/// Mutable counterpart of [`visit`].
pub fn visit_mut<F>(buf: &mut [u8], table: &Table, mut f: F)
where
	F: FnMut(&mut [u8], &FieldDesc),
{
	for field in table.fields() {
		if let Some(slot) = buf.get_mut(field.range()) {
			f(slot, field);
		}
	}
}

/// Free the string and array blocks held directly by `buf`.
///
/// One visitor pass, no recursion: strings inside embedded objects and inside
/// array elements stay allocated. Use [`release`] to free everything.
pub fn release_shallow(buf: &mut [u8], heap: &mut Heap, table: &Table) {
	visit_mut(buf, table, |slot, field| {
		if matches!(field.kind, FieldKind::String | FieldKind::Array { .. }) {
			free_slot(slot, heap, field);
		}
	});
	clear_counts(buf, table);
}

/// Free every block reachable from `buf`, descending through embedded objects
/// and array elements, and null the slots that held them.
pub fn release(buf: &mut [u8], heap: &mut Heap, table: &Table) {
	visit_mut(buf, table, |slot, field| match field.kind {
		FieldKind::Object(nested) => release(slot, heap, nested),
		FieldKind::Array { elem, elem_size, .. } => {
			let handle = slot_handle(slot, field);
			if let Some(mut block) = heap.free(handle)
				&& elem.owns_memory()
				&& elem_size > 0
			{
				for chunk in block.chunks_exact_mut(elem_size) {
					release(chunk, heap, elem);
				}
			}
			slot.fill(0);
		}
		FieldKind::String => free_slot(slot, heap, field),
		FieldKind::Integer | FieldKind::Real | FieldKind::Bool => {}
	});
	clear_counts(buf, table);
}

fn free_slot(slot: &mut [u8], heap: &mut Heap, field: &FieldDesc) {
	heap.free(slot_handle(slot, field));
	slot.fill(0);
}

fn slot_handle(slot: &[u8], field: &FieldDesc) -> u64 {
	let local = FieldDesc { offset: 0, ..*field };
	read_handle(slot, &local).unwrap_or(0)
}

/// Keep the null-iff-zero invariant for arrays whose blocks were just freed.
fn clear_counts(buf: &mut [u8], table: &Table) {
	for field in table.fields() {
		if let FieldKind::Array { count_field, .. } = field.kind
			&& let Some(count) = table.field(count_field)
		{
			fill_default(buf, table, count);
		}
	}
}
