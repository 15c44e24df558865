//! QuadMap: the open-addressed table with quadratic probing and tombstones.

use crate::hashers::KeyHasher;
use crate::prime;
use crate::reentrancy::DebugReentrancy;
use core::fmt;
use core::mem;

/// One cell of the backing array.
///
/// `Dead` is a tombstone: the slot stays occupied for probe-chain purposes
/// and keeps its key (a later `put` of the same key resurrects it), but the
/// value is released the moment the entry is removed.
#[derive(Debug)]
enum Slot<V> {
    Empty,
    Live { key: String, value: V },
    Dead { key: String },
}

/// A string-keyed hash map using quadratic open addressing.
///
/// Collisions are resolved by probing `(base + j²) mod capacity` for
/// `j = 0, 1, 2, …`. Capacity is always an odd prime, and every `put`
/// guarantees `len() / capacity() < 0.5` on return by doubling first when
/// needed. Removal tombstones the slot rather than emptying it, so probe
/// chains through the removed slot stay intact.
///
/// The hash function is a collaborator chosen at construction: any
/// deterministic `&str -> u64` works, and two maps built from different
/// hash functions behave identically apart from slot placement. See
/// [`crate::hashers`] for the built-ins.
pub struct QuadMap<V, H> {
    buckets: Vec<Slot<V>>,
    size: usize,
    hasher: H,
    reentrancy: DebugReentrancy,
}

impl<V, H> QuadMap<V, H>
where
    H: KeyHasher,
{
    /// Create a table with at least `initial_capacity` slots, rounded up to
    /// the next prime by the scan in [`crate::prime`]. Even requests step to
    /// the next odd candidate first, so `new(2, _)` yields capacity 3 and
    /// `new(20, _)` yields 23.
    pub fn new(initial_capacity: usize, hasher: H) -> Self {
        let capacity = prime::next_prime(initial_capacity);
        let mut buckets = Vec::with_capacity(capacity);
        buckets.resize_with(capacity, || Slot::Empty);
        Self {
            buckets,
            size: 0,
            hasher,
            reentrancy: DebugReentrancy::new(),
        }
    }

    /// Number of live entries. Tombstones are not counted.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of slots in the bucket array. Always an odd prime.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Exact live-entry count divided by capacity. Not cached.
    pub fn table_load(&self) -> f64 {
        self.size as f64 / self.buckets.len() as f64
    }

    /// Slots holding no live entry. Tombstoned slots count as empty here
    /// even though a probe walk still has to step through them, so this is
    /// always `capacity() - len()`.
    pub fn empty_buckets(&self) -> usize {
        self.buckets
            .iter()
            .filter(|slot| !matches!(slot, Slot::Live { .. }))
            .count()
    }

    /// Insert or update `key`. Grows (capacity doubled as often as it
    /// takes, then rounded to the next prime) before probing whenever
    /// inserting one more entry would push the load factor to 0.5 or
    /// above; growth must precede the walk since it changes every slot
    /// index. Load stays strictly below 0.5 after every `put` (capacity
    /// is odd, so exactly 0.5 cannot occur).
    pub fn put(&mut self, key: &str, value: V) {
        let _g = self.reentrancy.enter();
        if (self.size + 1) * 2 > self.buckets.len() {
            // A single doubling is not always enough: a deep
            // non-cascading shrink may have left load at or above 0.5.
            let mut target = self.buckets.len() * 2;
            while (self.size + 1) * 2 > target {
                target *= 2;
            }
            Self::rebuild(&mut self.buckets, &mut self.size, &self.hasher, target);
        }

        let idx = match self.find_slot(key) {
            Some(idx) => idx,
            None => {
                // Probe ring saturated by tombstones. Rebuilding at the
                // current capacity purges them; the growth check above
                // left live load strictly below 0.5, so the re-walk must
                // reach a free slot within the probe bound.
                let capacity = self.buckets.len();
                Self::rebuild(&mut self.buckets, &mut self.size, &self.hasher, capacity);
                debug_assert!(self.size * 2 < self.buckets.len());
                self.find_slot(key).expect("free slot after tombstone purge")
            }
        };

        let slot = &mut self.buckets[idx];
        match slot {
            Slot::Empty => {
                *slot = Slot::Live {
                    key: key.to_owned(),
                    value,
                };
                self.size += 1;
            }
            Slot::Live { value: occupied, .. } => {
                *occupied = value;
            }
            Slot::Dead { key: shell } => {
                // Resurrect: the shell already owns the key allocation.
                let key = mem::take(shell);
                *slot = Slot::Live { key, value };
                self.size += 1;
            }
        }
    }

    /// Look up `key`, `None` when absent or tombstoned. Does not mutate.
    pub fn get(&self, key: &str) -> Option<&V> {
        let _g = self.reentrancy.enter();
        match self.find_slot(key) {
            Some(idx) => match &self.buckets[idx] {
                Slot::Live { value, .. } => Some(value),
                _ => None,
            },
            None => None,
        }
    }

    /// Mutable lookup; entries are mutable in place while live.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let _g = self.reentrancy.enter();
        match self.find_slot(key) {
            Some(idx) => match &mut self.buckets[idx] {
                Slot::Live { value, .. } => Some(value),
                _ => None,
            },
            None => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        let _g = self.reentrancy.enter();
        match self.find_slot(key) {
            Some(idx) => matches!(self.buckets[idx], Slot::Live { .. }),
            None => false,
        }
    }

    /// Tombstone `key`'s slot and return its value. Removing an absent or
    /// already-removed key is a silent no-op returning `None`.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let _g = self.reentrancy.enter();
        let idx = self.find_slot(key)?;
        let slot = &mut self.buckets[idx];
        match mem::replace(slot, Slot::Empty) {
            Slot::Live { key, value } => {
                *slot = Slot::Dead { key };
                self.size -= 1;
                Some(value)
            }
            other => {
                *slot = other;
                None
            }
        }
    }

    /// Rebuild the table at `new_capacity` (advanced to the next odd prime
    /// when not already one; a request of 2 adopts 3, keeping capacity
    /// odd). Refuses to shrink below the live-entry count: such a request
    /// leaves the table completely untouched.
    ///
    /// Every live entry is re-inserted into the fresh bucket array, which
    /// drops all tombstones and re-derives probe positions. The 0.5 load
    /// threshold is not enforced here; a resize that lands at load ≥ 0.5
    /// stays there until the next `put` grows the table. The one exception
    /// is a shrink so deep that quadratic probing cannot place every entry
    /// (possible above load 0.5): the capacity is then advanced further
    /// rather than dropping data.
    pub fn resize(&mut self, new_capacity: usize) {
        let _g = self.reentrancy.enter();
        if new_capacity < self.size {
            return;
        }
        Self::rebuild(&mut self.buckets, &mut self.size, &self.hasher, new_capacity);
    }

    /// Reset every slot to empty. Capacity is unchanged.
    pub fn clear(&mut self) {
        let _g = self.reentrancy.enter();
        for slot in &mut self.buckets {
            *slot = Slot::Empty;
        }
        self.size = 0;
    }

    /// All live `(key, value)` pairs in ascending bucket order (not
    /// insertion order), skipping empty and tombstoned slots.
    pub fn keys_and_values(&self) -> Vec<(&str, &V)> {
        self.iter().collect()
    }

    /// Iterate live entries in ascending bucket order. Each call returns an
    /// independent cursor starting at bucket 0; simultaneous iterations do
    /// not interfere.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            inner: self.buckets.iter(),
        }
    }

    /// Like [`QuadMap::iter`], with mutable access to each value.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            inner: self.buckets.iter_mut(),
        }
    }

    /// Walk the probe sequence for `key`: slot index of the first empty
    /// slot or the first slot (live or dead) whose key matches. The walk is
    /// bounded at `capacity` probes; `None` means the ring held neither a
    /// match nor an empty slot within the bound.
    ///
    /// Offsets are the squares 0, 1, 4, 9, … built incrementally from the
    /// gap between consecutive squares (`2j - 1`), keeping every
    /// intermediate value below `3 * capacity`.
    fn find_slot(&self, key: &str) -> Option<usize> {
        let capacity = self.buckets.len();
        let mut idx = (self.hasher.hash_key(key) % capacity as u64) as usize;
        let mut step = 1;
        for _ in 0..capacity {
            match &self.buckets[idx] {
                Slot::Empty => return Some(idx),
                Slot::Live { key: k, .. } | Slot::Dead { key: k } if k == key => {
                    return Some(idx)
                }
                _ => {}
            }
            idx = (idx + step) % capacity;
            step += 2;
        }
        None
    }

    /// Replace the bucket array with fresh empty slots of the (odd prime)
    /// target capacity and re-insert every live entry, in bucket order of
    /// the old array. Tombstones are dropped on the floor. A request of 2
    /// goes through the next-prime scan like any composite, so adopted
    /// capacities are never even.
    ///
    /// Takes the table fields separately rather than `&mut self` so the
    /// reentrancy guard held by the calling operation stays armed across
    /// the rebuild.
    ///
    /// Placement walks the same probe sequence a later lookup will, so it
    /// is a dry run over an occupancy bitmap: indices for all entries are
    /// derived first and the slots filled only once every entry has a home.
    /// Quadratic probing reaches only `(capacity + 1) / 2` distinct slots,
    /// so a shrink deep enough to pass live load 0.5 can leave an entry
    /// unplaceable; rather than losing it, the capacity is advanced to the
    /// next prime and the dry run restarted. Growth from `put` and
    /// tombstone purges never take that branch.
    fn rebuild(buckets: &mut Vec<Slot<V>>, size: &mut usize, hasher: &H, new_capacity: usize) {
        let mut capacity = if new_capacity > 2 && prime::is_prime(new_capacity) {
            new_capacity
        } else {
            prime::next_prime(new_capacity)
        };

        let live: Vec<(String, V)> = mem::take(buckets)
            .into_iter()
            .filter_map(|slot| match slot {
                Slot::Live { key, value } => Some((key, value)),
                _ => None,
            })
            .collect();
        *size = live.len();

        let placements = loop {
            match Self::try_place(hasher, &live, capacity) {
                Some(placements) => break placements,
                None => capacity = prime::next_prime(capacity + 1),
            }
        };

        let mut fresh = Vec::with_capacity(capacity);
        fresh.resize_with(capacity, || Slot::Empty);
        for ((key, value), idx) in live.into_iter().zip(placements) {
            fresh[idx] = Slot::Live { key, value };
        }
        *buckets = fresh;
    }

    /// Dry-run placement of `live` entries into an empty table of
    /// `capacity` slots: the probe walk for each key stops at the first
    /// unclaimed slot, exactly where a sequential re-insert would land it.
    /// `None` when some entry exhausts its probe ring.
    fn try_place(hasher: &H, live: &[(String, V)], capacity: usize) -> Option<Vec<usize>> {
        let mut claimed = vec![false; capacity];
        let mut placements = Vec::with_capacity(live.len());
        for (key, _) in live {
            let mut idx = (hasher.hash_key(key) % capacity as u64) as usize;
            let mut step = 1;
            let mut found = None;
            for _ in 0..capacity {
                if !claimed[idx] {
                    found = Some(idx);
                    break;
                }
                idx = (idx + step) % capacity;
                step += 2;
            }
            let idx = found?;
            claimed[idx] = true;
            placements.push(idx);
        }
        Some(placements)
    }
}

impl<V: fmt::Debug, H: KeyHasher> fmt::Debug for QuadMap<V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Iterator over live entries in bucket order.
pub struct Iter<'a, V> {
    inner: core::slice::Iter<'a, Slot<V>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.inner.by_ref() {
            if let Slot::Live { key, value } = slot {
                return Some((key.as_str(), value));
            }
        }
        None
    }
}

/// Iterator over live entries in bucket order, values mutable.
pub struct IterMut<'a, V> {
    inner: core::slice::IterMut<'a, Slot<V>>,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = (&'a str, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.inner.by_ref() {
            if let Slot::Live { key, value } = slot {
                return Some((key.as_str(), value));
            }
        }
        None
    }
}

impl<'a, V, H: KeyHasher> IntoIterator for &'a QuadMap<V, H> {
    type Item = (&'a str, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, V, H: KeyHasher> IntoIterator for &'a mut QuadMap<V, H> {
    type Item = (&'a str, &'a mut V);
    type IntoIter = IterMut<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
