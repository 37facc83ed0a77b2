use crate::reflect::{FieldDesc, Handle, PTR_SIZE, REAL_SIZE, ReflectError, Result};

/// Supported integer slot widths.
///
/// Values are narrowed to the width before being written so exactly the
/// low-order bytes land in the slot, in native byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
	/// `i8`
	W8,
	/// `i16`
	W16,
	/// `i32`
	W32,
	/// `i64`
	W64,
}

impl IntWidth {
	/// Map a slot width in bytes to a tag.
	pub fn from_size(size: usize) -> Option<Self> {
		match size {
			1 => Some(Self::W8),
			2 => Some(Self::W16),
			4 => Some(Self::W32),
			8 => Some(Self::W64),
			_ => None,
		}
	}

	/// Slot width in bytes.
	pub fn size(self) -> usize {
		match self {
			Self::W8 => 1,
			Self::W16 => 2,
			Self::W32 => 4,
			Self::W64 => 8,
		}
	}

	/// Inclusive signed range representable at this width.
	pub fn range(self) -> (i64, i64) {
		match self {
			Self::W8 => (i64::from(i8::MIN), i64::from(i8::MAX)),
			Self::W16 => (i64::from(i16::MIN), i64::from(i16::MAX)),
			Self::W32 => (i64::from(i32::MIN), i64::from(i32::MAX)),
			Self::W64 => (i64::MIN, i64::MAX),
		}
	}

	/// Whether `value` is representable at this width.
	pub fn fits(self, value: i64) -> bool {
		let (min, max) = self.range();
		(min..=max).contains(&value)
	}

	/// Write `value` into a slot of exactly [`Self::size`] bytes.
	///
	/// The caller range-checks first; out-of-range values are truncated.
	pub fn write(self, slot: &mut [u8], value: i64) {
		match self {
			Self::W8 => slot.copy_from_slice(&(value as i8).to_ne_bytes()),
			Self::W16 => slot.copy_from_slice(&(value as i16).to_ne_bytes()),
			Self::W32 => slot.copy_from_slice(&(value as i32).to_ne_bytes()),
			Self::W64 => slot.copy_from_slice(&value.to_ne_bytes()),
		}
	}

	/// Read a sign-extended value from a slot of exactly [`Self::size`] bytes.
	pub fn read(self, slot: &[u8]) -> i64 {
		match self {
			Self::W8 => i64::from(i8::from_ne_bytes([slot[0]])),
			Self::W16 => i64::from(i16::from_ne_bytes([slot[0], slot[1]])),
			Self::W32 => i64::from(i32::from_ne_bytes([slot[0], slot[1], slot[2], slot[3]])),
			Self::W64 => {
				let mut buf = [0_u8; 8];
				buf.copy_from_slice(slot);
				i64::from_ne_bytes(buf)
			}
		}
	}
}

/// Borrow `width` bytes at the field offset.
pub(crate) fn slot<'a>(buf: &'a [u8], field: &FieldDesc, width: usize) -> Result<&'a [u8]> {
	let end = field.offset.checked_add(width);
	end.and_then(|end| buf.get(field.offset..end)).ok_or(ReflectError::BufferTooSmall {
		owner: field.name,
		need: end.unwrap_or(usize::MAX),
		have: buf.len(),
	})
}

/// Mutably borrow `width` bytes at the field offset.
pub(crate) fn slot_mut<'a>(buf: &'a mut [u8], field: &FieldDesc, width: usize) -> Result<&'a mut [u8]> {
	let have = buf.len();
	let end = field.offset.checked_add(width);
	end.and_then(|end| buf.get_mut(field.offset..end)).ok_or(ReflectError::BufferTooSmall {
		owner: field.name,
		need: end.unwrap_or(usize::MAX),
		have,
	})
}

/// Integer width declared by an integer or boolean field.
pub(crate) fn int_width(field: &FieldDesc) -> Result<IntWidth> {
	IntWidth::from_size(field.size).ok_or(ReflectError::UnsupportedWidth {
		field: field.name,
		kind: field.kind_tag(),
		size: field.size,
	})
}

/// Range-check `value` against the field width and store it.
pub(crate) fn write_int(buf: &mut [u8], field: &FieldDesc, value: i64) -> Result<()> {
	let width = int_width(field)?;
	if !width.fits(value) {
		return Err(ReflectError::Overflow {
			field: field.name,
			size: field.size,
			value: value.to_string(),
		});
	}
	width.write(slot_mut(buf, field, width.size())?, value);
	Ok(())
}

/// Read an integer or boolean field.
pub(crate) fn read_int(buf: &[u8], field: &FieldDesc) -> Result<i64> {
	let width = int_width(field)?;
	Ok(width.read(slot(buf, field, width.size())?))
}

/// Store an `f64` into a real field.
pub(crate) fn write_real(buf: &mut [u8], field: &FieldDesc, value: f64) -> Result<()> {
	check_width(field, REAL_SIZE)?;
	slot_mut(buf, field, REAL_SIZE)?.copy_from_slice(&value.to_ne_bytes());
	Ok(())
}

/// Read an `f64` from a real field.
pub(crate) fn read_real(buf: &[u8], field: &FieldDesc) -> Result<f64> {
	check_width(field, REAL_SIZE)?;
	let mut raw = [0_u8; REAL_SIZE];
	raw.copy_from_slice(slot(buf, field, REAL_SIZE)?);
	Ok(f64::from_ne_bytes(raw))
}

/// Store a heap handle into a string or array field.
pub(crate) fn write_handle(buf: &mut [u8], field: &FieldDesc, handle: Handle) -> Result<()> {
	check_width(field, PTR_SIZE)?;
	slot_mut(buf, field, PTR_SIZE)?.copy_from_slice(&handle.to_ne_bytes());
	Ok(())
}

/// Read a heap handle from a string or array field.
pub(crate) fn read_handle(buf: &[u8], field: &FieldDesc) -> Result<Handle> {
	check_width(field, PTR_SIZE)?;
	let mut raw = [0_u8; PTR_SIZE];
	raw.copy_from_slice(slot(buf, field, PTR_SIZE)?);
	Ok(Handle::from_ne_bytes(raw))
}

fn check_width(field: &FieldDesc, expected: usize) -> Result<()> {
	if field.size != expected {
		return Err(ReflectError::UnsupportedWidth {
			field: field.name,
			kind: field.kind_tag(),
			size: field.size,
		});
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::{IntWidth, read_handle, read_int, read_real, write_handle, write_int, write_real};
	use crate::reflect::{ErrorKind, FieldDesc};

	#[test]
	fn widths_round_trip_extremes() {
		for width in [IntWidth::W8, IntWidth::W16, IntWidth::W32, IntWidth::W64] {
			let (min, max) = width.range();
			let mut slot = vec![0_u8; width.size()];
			width.write(&mut slot, min);
			assert_eq!(width.read(&slot), min);
			width.write(&mut slot, max);
			assert_eq!(width.read(&slot), max);
		}
	}

	#[test]
	fn narrow_write_touches_only_its_slot() {
		let field = FieldDesc::int("mid", 2, 2);
		let mut buf = [0xAA_u8; 6];
		write_int(&mut buf, &field, -2).expect("fits");
		assert_eq!(&buf[..2], &[0xAA, 0xAA]);
		assert_eq!(&buf[2..4], &(-2_i16).to_ne_bytes());
		assert_eq!(&buf[4..], &[0xAA, 0xAA]);
		assert_eq!(read_int(&buf, &field).expect("reads"), -2);
	}

	#[test]
	fn out_of_range_write_is_overflow() {
		let field = FieldDesc::int("small", 0, 1);
		let mut buf = [0_u8; 1];
		let err = write_int(&mut buf, &field, 128).expect_err("128 does not fit i8");
		assert_eq!(err.kind(), ErrorKind::Overflow);
		assert_eq!(buf, [0]);
	}

	#[test]
	fn unsupported_width_is_overflow() {
		let field = FieldDesc::int("odd", 0, 3);
		let mut buf = [0_u8; 4];
		let err = write_int(&mut buf, &field, 1).expect_err("width 3 unsupported");
		assert_eq!(err.kind(), ErrorKind::Overflow);
	}

	#[test]
	fn real_and_handle_slots_round_trip() {
		let real = FieldDesc::real("ratio", 0);
		let text = FieldDesc::string("name", 8);
		let mut buf = [0_u8; 16];
		write_real(&mut buf, &real, 6.66).expect("real write");
		write_handle(&mut buf, &text, 42).expect("handle write");
		assert_eq!(read_real(&buf, &real).expect("real read"), 6.66);
		assert_eq!(read_handle(&buf, &text).expect("handle read"), 42);
	}

	#[test]
	fn short_buffer_is_reported() {
		let field = FieldDesc::int("id", 4, 8);
		let buf = [0_u8; 8];
		let err = read_int(&buf, &field).expect_err("slot past end");
		assert_eq!(err.kind(), ErrorKind::InvalidArguments);
	}
}
