//! HashIndex implementation
//!
//! Open-addressing table with linear probing over `String` keys.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::iter;
use std::mem;

use super::{DEFAULT_CAPACITY, DEFAULT_MAX_LOAD_FACTOR};

/// A single slot of the table
#[derive(Debug)]
enum Slot {
    Empty,
    Occupied { key: String, value: String },
}

/// Outcome of walking the probe sequence for a key
enum Probe {
    /// Slot holding an equal key
    Match(usize),

    /// First empty slot on the sequence
    Vacant(usize),

    /// Wrapped back to the home slot without finding either
    Full,
}

/// In-memory key → value index
///
/// ## Invariant
/// After every public operation `len() / capacity() <= max_load_factor`,
/// which leaves at least one `Empty` slot for every probe to stop on.
#[derive(Debug)]
pub struct HashIndex {
    slots: Vec<Slot>,
    occupied: usize,
    max_load_factor: f64,
}

impl HashIndex {
    /// Create an empty index with the default capacity and load factor
    pub fn new() -> Self {
        Self::with_load_factor(DEFAULT_CAPACITY, DEFAULT_MAX_LOAD_FACTOR)
    }

    /// Create an empty index with at least `capacity` slots
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_load_factor(capacity, DEFAULT_MAX_LOAD_FACTOR)
    }

    /// Create an empty index with at least `capacity` slots that grows once
    /// `len / capacity` exceeds `max_load_factor`.
    ///
    /// Capacity is rounded up to a power of two. A load factor outside
    /// `(0, 1)` (or NaN) is replaced by the default of 0.7.
    pub fn with_load_factor(capacity: usize, max_load_factor: f64) -> Self {
        let capacity = capacity.max(1).next_power_of_two();
        let max_load_factor = if max_load_factor > 0.0 && max_load_factor < 1.0 {
            max_load_factor
        } else {
            tracing::warn!(
                requested = max_load_factor,
                fallback = DEFAULT_MAX_LOAD_FACTOR,
                "load factor out of range, using default"
            );
            DEFAULT_MAX_LOAD_FACTOR
        };
        Self {
            slots: empty_slots(capacity),
            occupied: 0,
            max_load_factor,
        }
    }

    /// Insert or overwrite a key (last write wins)
    ///
    /// Returns the previous value if the key was already present.
    pub fn put(&mut self, key: String, value: String) -> Option<String> {
        loop {
            match probe(&self.slots, &key) {
                Probe::Match(idx) => {
                    return match &mut self.slots[idx] {
                        Slot::Occupied { value: current, .. } => Some(mem::replace(current, value)),
                        Slot::Empty => None,
                    };
                }
                Probe::Vacant(idx) => {
                    self.slots[idx] = Slot::Occupied { key, value };
                    self.occupied += 1;
                    if self.over_load_factor() {
                        self.grow();
                    }
                    return None;
                }
                // Unreachable while the load factor bound holds; growing keeps put infallible.
                Probe::Full => self.grow(),
            }
        }
    }

    /// Look up a key
    pub fn get(&self, key: &str) -> Option<&str> {
        match probe(&self.slots, key) {
            Probe::Match(idx) => match &self.slots[idx] {
                Slot::Occupied { value, .. } => Some(value.as_str()),
                Slot::Empty => None,
            },
            Probe::Vacant(_) | Probe::Full => None,
        }
    }

    /// Check whether a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Reallocate into a larger slot array and re-insert every entry
    ///
    /// Capacity doubles until the current entries fit under the load factor.
    /// This is the only operation that replaces the slot array.
    pub fn grow(&mut self) {
        let mut new_capacity = self.slots.len().saturating_mul(2);
        while exceeds(self.occupied, new_capacity, self.max_load_factor) {
            match new_capacity.checked_mul(2) {
                Some(doubled) => new_capacity = doubled,
                None => break,
            }
        }

        let old_slots = mem::replace(&mut self.slots, empty_slots(new_capacity));
        for slot in old_slots {
            if let Slot::Occupied { key, value } = slot {
                // Keys are unique and the new array is larger than the entry count.
                match probe(&self.slots, &key) {
                    Probe::Vacant(idx) => self.slots[idx] = Slot::Occupied { key, value },
                    Probe::Match(_) => unreachable!("duplicate key {:?} while growing", key),
                    Probe::Full => unreachable!("grown table has no empty slot"),
                }
            }
        }

        tracing::trace!(
            capacity = new_capacity,
            entries = self.occupied,
            "index grown"
        );
    }

    /// Iterate over all entries in slot order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Occupied { key, value } => Some((key.as_str(), value.as_str())),
            Slot::Empty => None,
        })
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.occupied
    }

    /// Check if the index holds no keys
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Current slot count
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Current `len / capacity`
    pub fn load_factor(&self) -> f64 {
        self.occupied as f64 / self.slots.len() as f64
    }

    /// Configured growth threshold
    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    fn over_load_factor(&self) -> bool {
        exceeds(self.occupied, self.slots.len(), self.max_load_factor)
    }
}

impl Default for HashIndex {
    fn default() -> Self {
        Self::new()
    }
}

fn empty_slots(capacity: usize) -> Vec<Slot> {
    iter::repeat_with(|| Slot::Empty).take(capacity).collect()
}

fn exceeds(occupied: usize, capacity: usize, max_load_factor: f64) -> bool {
    occupied as f64 > capacity as f64 * max_load_factor
}

fn hash_key(key: &str) -> u64 {
    // DefaultHasher::new() uses fixed keys, so slot positions are stable across runs.
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

/// Probe start for `key` in a table of `capacity` slots (a power of two)
fn home_slot(key: &str, capacity: usize) -> usize {
    (hash_key(key) as usize) & (capacity - 1)
}

/// Walk the linear probe sequence for `key`, wrapping at the end of the array
fn probe(slots: &[Slot], key: &str) -> Probe {
    let capacity = slots.len();
    let mask = capacity - 1;
    let mut idx = home_slot(key, capacity);

    for _ in 0..capacity {
        match &slots[idx] {
            Slot::Empty => return Probe::Vacant(idx),
            Slot::Occupied { key: existing, .. } if existing == key => return Probe::Match(idx),
            Slot::Occupied { .. } => idx = (idx + 1) & mask,
        }
    }

    Probe::Full
}
