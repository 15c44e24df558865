//! quadmap: a single-threaded, string-keyed hash map backed by one
//! contiguous bucket array, with quadratic open addressing, tombstone
//! deletion and automatic growth.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: keep the entire collision story inside one small component so
//!   every invariant of the probe walk can be stated and tested directly.
//! - Pieces:
//!   - QuadMap<V, H>: the table. One `Vec` of three-state slots
//!     (`Empty | Live | Dead`), a live-entry count, and a caller-chosen
//!     hash collaborator. Probing, growth and tombstone bookkeeping all
//!     live here.
//!   - hashers: the collaborator surface. `KeyHasher` is any
//!     deterministic `&str -> u64`; the table only ever reduces the
//!     result modulo its capacity, so distinct hash functions are
//!     interchangeable without touching table logic.
//!   - prime: trial-division primality and the next-prime scan that
//!     every adopted capacity passes through.
//!
//! Constraints
//! - Single-threaded: `!Send`/`!Sync` by design (no atomics, no locks).
//! - Capacity is always an odd prime; `len / capacity < 0.5` holds after
//!   every `put` (growth doubles, repeatedly if a deep shrink demands it,
//!   and re-primes before probing).
//! - Quadratic probe sequence `(base + j²) mod capacity`, shared verbatim
//!   by `put`, `get`, `get_mut`, `contains_key` and `remove`; the
//!   operations differ only in what they do at the terminal slot.
//! - Removal tombstones the slot so probe chains through it survive; a
//!   `put` of the same key resurrects the slot in place. Tombstones are
//!   only reclaimed wholesale, by rebuild.
//! - Resize rebuilds from scratch into a fresh bucket array (transient
//!   ~2x footprint) and refuses, silently, to shrink below the live
//!   count.
//!
//! Reentrancy policy
//! - The hash function is the only user code the table invokes, and it
//!   runs while internals may be transiently inconsistent. A debug-only
//!   guard panics if a hash function calls back into its own table;
//!   release builds carry no check.
//!
//! Notes and non-goals
//! - Keys are `String` only; no generic key types.
//! - No persistence, no iteration-order guarantee beyond ascending bucket
//!   index, no shrinking on removal.
//! - Misses are `Option::None`/`false`, never errors; removing an absent
//!   key is a no-op.
//! - Iteration hands out independent cursor values, so simultaneous
//!   iterations over one table cannot interfere.

mod hashers;
mod prime;
mod quad_map;
mod quad_map_proptest;
mod reentrancy;

// Public surface
pub use hashers::{additive, fnv1a, weighted, KeyHasher};
pub use quad_map::{Iter, IterMut, QuadMap};
