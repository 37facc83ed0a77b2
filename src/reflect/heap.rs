/// Opaque key stored in string and array slots; `0` is null.
///
/// The low 32 bits name a slot (1-based), the high 32 bits the generation the
/// slot had when the block was inserted.
pub type Handle = u64;

/// Owner of every string and array block reachable from decoded buffers.
///
/// Freed slots are recycled under a new generation, so a stale handle resolves
/// to nothing instead of aliasing a newer block.
#[derive(Debug, Default)]
pub struct Heap {
	slots: Vec<Slot>,
	vacant: Vec<u32>,
	live: usize,
	live_bytes: usize,
}

#[derive(Debug, Default)]
struct Slot {
	generation: u32,
	block: Option<Box<[u8]>>,
}

impl Heap {
	/// Create an empty heap.
	pub fn new() -> Self {
		Self::default()
	}

	/// Allocate a zeroed block of `len` bytes, reporting failure instead of aborting.
	pub fn try_alloc(len: usize) -> Option<Vec<u8>> {
		let mut block = Vec::new();
		block.try_reserve_exact(len).ok()?;
		block.resize(len, 0);
		Some(block)
	}

	/// Take ownership of `block` and return its handle.
	pub fn insert(&mut self, block: Vec<u8>) -> Handle {
		self.live += 1;
		self.live_bytes += block.len();
		let index = match self.vacant.pop() {
			Some(index) => index,
			None => {
				self.slots.push(Slot::default());
				(self.slots.len() - 1) as u32
			}
		};
		let slot = &mut self.slots[index as usize];
		slot.block = Some(block.into_boxed_slice());
		(u64::from(slot.generation) << 32) | u64::from(index + 1)
	}

	/// Borrow the block behind `handle`.
	pub fn get(&self, handle: Handle) -> Option<&[u8]> {
		let (index, generation) = split(handle)?;
		let slot = self.slots.get(index)?;
		if slot.generation != generation {
			return None;
		}
		slot.block.as_deref()
	}

	/// Mutably borrow the block behind `handle`.
	pub fn get_mut(&mut self, handle: Handle) -> Option<&mut [u8]> {
		let (index, generation) = split(handle)?;
		let slot = self.slots.get_mut(index)?;
		if slot.generation != generation {
			return None;
		}
		slot.block.as_deref_mut()
	}

	/// Release the block behind `handle`, returning it when it was live.
	pub fn free(&mut self, handle: Handle) -> Option<Box<[u8]>> {
		let (index, generation) = split(handle)?;
		let slot = self.slots.get_mut(index)?;
		if slot.generation != generation {
			return None;
		}
		let block = slot.block.take()?;
		slot.generation = slot.generation.wrapping_add(1);
		self.vacant.push(index as u32);
		self.live -= 1;
		self.live_bytes -= block.len();
		Some(block)
	}

	/// Number of blocks not yet freed.
	pub fn live_blocks(&self) -> usize {
		self.live
	}

	/// Bytes held by blocks not yet freed.
	pub fn live_bytes(&self) -> usize {
		self.live_bytes
	}

	/// Slots ever created, live or vacant.
	pub fn slot_count(&self) -> usize {
		self.slots.len()
	}
}

fn split(handle: Handle) -> Option<(usize, u32)> {
	let index = (handle as u32).checked_sub(1)?;
	Some((index as usize, (handle >> 32) as u32))
}

#[cfg(test)]
mod tests {
	use super::Heap;

	#[test]
	fn handles_are_non_zero_and_freed_once() {
		let mut heap = Heap::new();
		let handle = heap.insert(vec![1, 2, 3]);
		assert_ne!(handle, 0);
		assert_eq!(heap.get(handle), Some(&[1_u8, 2, 3][..]));
		assert_eq!(heap.live_bytes(), 3);

		assert!(heap.free(handle).is_some());
		assert!(heap.free(handle).is_none());
		assert!(heap.get(handle).is_none());
		assert_eq!(heap.live_blocks(), 0);
		assert_eq!(heap.live_bytes(), 0);
	}

	#[test]
	fn null_and_unknown_handles_resolve_to_nothing() {
		let mut heap = Heap::new();
		assert!(heap.get(0).is_none());
		assert!(heap.free(0).is_none());
		assert!(heap.get_mut(99).is_none());
	}

	#[test]
	fn handles_are_not_reused() {
		let mut heap = Heap::new();
		let first = heap.insert(vec![0]);
		heap.free(first);
		let second = heap.insert(vec![0]);
		assert_ne!(first, second);
	}

	#[test]
	fn freed_slots_are_recycled_and_stale_handles_miss() {
		let mut heap = Heap::new();
		let stale = heap.insert(vec![1]);
		heap.free(stale);
		let fresh = heap.insert(vec![2]);

		assert_eq!(heap.slot_count(), 1);
		assert!(heap.get(stale).is_none());
		assert!(heap.free(stale).is_none());
		assert_eq!(heap.get(fresh), Some(&[2_u8][..]));
		assert_eq!(heap.live_blocks(), 1);
	}

	#[test]
	fn try_alloc_zeroes() {
		let block = Heap::try_alloc(5).expect("small allocation succeeds");
		assert_eq!(block, vec![0; 5]);
	}
}
