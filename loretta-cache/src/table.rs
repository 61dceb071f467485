//! Generic open-addressed, size-bounded interning table.
//!
//! Keys are `(hash, length, kind)` rather than the text itself: the
//! lexer already has the hash in hand from its quick-scan pass, and
//! comparing lengths first filters almost every collision before a text
//! comparison is needed.

use loretta_syntax::SyntaxKind;

#[derive(Clone)]
struct Entry<V> {
    hash: u64,
    len: u32,
    kind: SyntaxKind,
    value: V,
}

/// A fixed-capacity, power-of-two-sized open-addressed cache with
/// linear probing and robin-hood-style eviction: an incoming entry that
/// has probed further than the one occupying its slot displaces it,
/// keeping average probe length low under sustained use.
pub struct Table<V> {
    slots: Vec<Option<Entry<V>>>,
    mask: usize,
}

impl<V: Clone> Table<V> {
    /// `capacity` is rounded up to the next power of two.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1).next_power_of_two();
        Table { slots: vec![None; capacity], mask: capacity - 1 }
    }

    fn probe_start(&self, hash: u64) -> usize {
        (hash as usize) & self.mask
    }

    /// Returns the cached value for `(hash, len, kind)` if present.
    pub fn get(&self, hash: u64, len: u32, kind: SyntaxKind) -> Option<&V> {
        let mut index = self.probe_start(hash);
        for _ in 0..self.slots.len() {
            match &self.slots[index] {
                None => return None,
                Some(entry) if entry.hash == hash && entry.len == len && entry.kind == kind => {
                    return Some(&entry.value);
                }
                Some(_) => index = (index + 1) & self.mask,
            }
        }
        None
    }

    /// Inserts `value` for `(hash, len, kind)`, evicting whichever
    /// existing entry has probed less far than the new one as it walks
    /// the probe sequence.
    pub fn insert(&mut self, hash: u64, len: u32, kind: SyntaxKind, value: V) {
        let mut index = self.probe_start(hash);
        let mut incoming = Entry { hash, len, kind, value };
        let mut incoming_distance = 0usize;
        loop {
            match &self.slots[index] {
                None => {
                    self.slots[index] = Some(incoming);
                    return;
                }
                Some(existing) if existing.hash == hash && existing.len == len && existing.kind == kind => {
                    self.slots[index] = Some(incoming);
                    return;
                }
                Some(existing) => {
                    let existing_distance = index.wrapping_sub(self.probe_start(existing.hash)) & self.mask;
                    if existing_distance < incoming_distance {
                        let evicted = self.slots[index].replace(incoming).expect("slot occupied");
                        incoming = evicted;
                        incoming_distance = existing_distance;
                    }
                }
            }
            index = (index + 1) & self.mask;
            incoming_distance += 1;
            if incoming_distance >= self.slots.len() {
                // Table is full or pathologically clustered; drop the
                // incoming entry rather than loop forever. A cache miss
                // just means the caller re-derives the value.
                return;
            }
        }
    }

    /// Looks up `(hash, len, kind)`, calling `factory` to build and
    /// insert a fresh value on miss.
    pub fn get_or_insert_with(&mut self, hash: u64, len: u32, kind: SyntaxKind, factory: impl FnOnce() -> V) -> V {
        if let Some(value) = self.get(hash, len, kind) {
            return value.clone();
        }
        let value = factory();
        self.insert(hash, len, kind, value.clone());
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserts_and_finds() {
        let mut table: Table<u32> = Table::with_capacity(8);
        table.insert(42, 3, SyntaxKind::IdentifierToken, 100);
        assert_eq!(table.get(42, 3, SyntaxKind::IdentifierToken), Some(&100));
        assert_eq!(table.get(42, 3, SyntaxKind::StringToken), None);
    }

    #[test]
    fn get_or_insert_calls_factory_once() {
        let mut table: Table<u32> = Table::with_capacity(8);
        let mut calls = 0;
        let mut fetch = |t: &mut Table<u32>| {
            t.get_or_insert_with(7, 1, SyntaxKind::IdentifierToken, || {
                calls += 1;
                9
            })
        };
        assert_eq!(fetch(&mut table), 9);
        assert_eq!(fetch(&mut table), 9);
        assert_eq!(calls, 1);
    }

    #[test]
    fn survives_heavy_collision_load_without_panicking() {
        let mut table: Table<u64> = Table::with_capacity(16);
        for i in 0..64u64 {
            // Force every key into the same initial bucket.
            table.insert(i * 32, 1, SyntaxKind::IdentifierToken, i);
        }
    }
}
