//! Generation-checked handle table for sessions crossing the C boundary.
//!
//! A handle packs a slot index (upper 32 bits) with the slot's generation
//! (lower 32 bits). Removing an entry bumps the generation, so stale
//! handles resolve to nothing instead of to whichever session reused the
//! slot. Destroying twice is a no-op.

const fn pack(index: u32, generation: u32) -> u64 {
    ((index as u64) << 32) | generation as u64
}

const fn unpack(handle: u64) -> (usize, u32) {
    ((handle >> 32) as usize, handle as u32)
}

struct Entry<T> {
    generation: u32,
    value: Option<T>,
}

pub(crate) struct HandleTable<T> {
    entries: Vec<Entry<T>>,
    vacant: Vec<u32>,
}

impl<T> HandleTable<T> {
    pub(crate) const fn new() -> Self {
        Self {
            entries: Vec::new(),
            vacant: Vec::new(),
        }
    }

    /// Stores `value` and returns its handle.
    pub(crate) fn insert(&mut self, value: T) -> u64 {
        match self.vacant.pop() {
            Some(index) => {
                let entry = &mut self.entries[index as usize];
                entry.value = Some(value);
                pack(index, entry.generation)
            }
            None => {
                let index = self.entries.len() as u32;
                self.entries.push(Entry {
                    generation: 0,
                    value: Some(value),
                });
                pack(index, 0)
            }
        }
    }

    fn live(&self, handle: u64) -> Option<&Entry<T>> {
        let (index, generation) = unpack(handle);
        self.entries
            .get(index)
            .filter(|e| e.generation == generation)
    }

    pub(crate) fn get(&self, handle: u64) -> Option<&T> {
        self.live(handle)?.value.as_ref()
    }

    /// Takes the value out and invalidates `handle`.
    ///
    /// A slot whose generation wraps to zero is retired rather than reused,
    /// so handles from its first generation can never resolve again.
    pub(crate) fn remove(&mut self, handle: u64) -> Option<T> {
        let (index, generation) = unpack(handle);
        let entry = self.entries.get_mut(index)?;
        if entry.generation != generation {
            return None;
        }
        let value = entry.value.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        if entry.generation != 0 {
            self.vacant.push(index as u32);
        }
        Some(value)
    }

    /// Number of live entries.
    pub(crate) fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.value.is_some()).count()
    }
}
