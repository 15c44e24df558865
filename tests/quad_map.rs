// QuadMap integration test suite.
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Prime capacity: construction and every resize land on a prime at
//   least as large as requested.
// - Load factor: strictly below 0.5 after every put.
// - Tombstones: removal keeps probe chains intact, counts the slot as
//   empty for empty_buckets(), and allows resurrection by a later put.
// - Shrink guard: resizing below the live count is a silent no-op.
// - Rebuild: resizing preserves every live entry and forgets every
//   removed one.
use quadmap::{additive, weighted, QuadMap};

// Test: capacity rounding through construction and resize.
// Verifies: 20 rounds to 23, 30 rounds to 31, and the entry survives the
// rebuild.
#[test]
fn resize_rounds_to_next_prime_and_preserves() {
    let mut m = QuadMap::new(20, additive);
    m.put("key1", 10);
    assert_eq!(m.len(), 1);
    assert_eq!(m.capacity(), 23);
    assert_eq!(m.get("key1"), Some(&10));
    assert!(m.contains_key("key1"));

    m.resize(30);
    assert_eq!(m.len(), 1);
    assert_eq!(m.capacity(), 31);
    assert_eq!(m.get("key1"), Some(&10));
    assert!(m.contains_key("key1"));
}

// Test: contains_key across insertion and removal at capacity 11.
// Verifies: removal affects only the removed key.
#[test]
fn contains_key_tracks_removal() {
    let mut m = QuadMap::new(11, additive);
    assert!(!m.contains_key("key1"));
    m.put("key1", 10);
    m.put("key2", 20);
    m.put("key3", 30);
    assert!(m.contains_key("key1"));
    assert!(!m.contains_key("key4"));
    assert!(m.contains_key("key2"));
    assert!(m.contains_key("key3"));

    m.remove("key3");
    assert!(!m.contains_key("key3"));
    assert!(m.contains_key("key1"));
    assert!(m.contains_key("key2"));
}

// Test: 150 sequential inserts from capacity 53 with doubling growth.
// Verifies: final load factor is below 0.5 and every key retains its
// inserted value; empty_buckets() stays consistent with len() throughout.
#[test]
fn growth_under_sequential_inserts() {
    let mut m = QuadMap::new(53, additive);
    for i in 0..150 {
        m.put(&format!("str{i}"), i * 100);
        assert_eq!(m.empty_buckets() + m.len(), m.capacity());
    }
    assert!(m.table_load() <= 0.5);
    assert_eq!(m.len(), 150);
    for i in 0..150 {
        assert_eq!(m.get(&format!("str{i}")), Some(&(i * 100)));
    }
}

// Test: repeated puts on a small key set only update values.
// Assumes: 50 puts of str(i / 3) touch 17 distinct keys; the last write
// for key k is at i = 3k + 2 (i = 49 for k = 16).
#[test]
fn repeated_puts_update_in_place() {
    let mut m = QuadMap::new(41, weighted);
    for i in 0..50u64 {
        m.put(&format!("str{}", i / 3), i * 100);
    }
    assert_eq!(m.len(), 17);
    assert_eq!(m.capacity(), 41);
    for k in 0..16u64 {
        assert_eq!(m.get(&format!("str{k}")), Some(&((3 * k + 2) * 100)));
    }
    assert_eq!(m.get("str16"), Some(&4900));
}

// Test: table_load is the exact live-count-to-capacity ratio.
// Verifies: overwrites do not change it.
#[test]
fn table_load_is_exact() {
    let mut m = QuadMap::new(101, additive);
    assert_eq!(m.table_load(), 0.0);
    m.put("key1", 10);
    assert_eq!(m.table_load(), 1.0 / 101.0);
    m.put("key2", 20);
    assert_eq!(m.table_load(), 2.0 / 101.0);
    m.put("key1", 30);
    assert_eq!(m.table_load(), 2.0 / 101.0);
}

// Test: empty_buckets counts everything that holds no live entry.
// Verifies: overwrites leave it unchanged; distinct inserts decrement it.
#[test]
fn empty_buckets_per_operation() {
    let mut m = QuadMap::new(101, additive);
    assert_eq!(m.empty_buckets(), 101);
    m.put("key1", 10);
    assert_eq!(m.empty_buckets(), 100);
    m.put("key2", 20);
    assert_eq!(m.empty_buckets(), 99);
    m.put("key1", 30);
    assert_eq!(m.empty_buckets(), 99);
    m.put("key4", 40);
    assert_eq!(m.empty_buckets(), 98);
}

// Test: hits return the stored value, misses return None, with keys that
// share arithmetic structure (multiples of 7 in a narrow range).
#[test]
fn get_hits_and_misses() {
    let mut m = QuadMap::new(151, weighted);
    for i in (200..300).step_by(7) {
        m.put(&i.to_string(), i * 10);
    }
    assert_eq!(m.len(), 15);
    assert_eq!(m.capacity(), 151);
    for i in (200..300).step_by(7) {
        assert_eq!(m.get(&i.to_string()), Some(&(i * 10)));
        assert_eq!(m.get(&(i + 1).to_string()), None);
    }
}

// Test: remove returns the value once, then the key reads as absent;
// removing an absent key is a silent no-op.
#[test]
fn remove_lifecycle() {
    let mut m = QuadMap::new(53, additive);
    assert_eq!(m.get("key1"), None);
    m.put("key1", 10);
    assert_eq!(m.get("key1"), Some(&10));
    assert_eq!(m.remove("key1"), Some(10));
    assert_eq!(m.get("key1"), None);
    assert_eq!(m.remove("key1"), None);
    assert_eq!(m.remove("key4"), None);

    // Removed keys stay absent across a rebuild, then accept new values.
    m.put("key1", 11);
    assert_eq!(m.get("key1"), Some(&11));
}

// Test: keys_and_values reflects live entries only, across a refused
// shrink, a growth-triggering put, a removal and a rebuild.
#[test]
fn keys_and_values_across_resizes() {
    let mut m = QuadMap::new(11, weighted);
    for i in 1..6u64 {
        m.put(&i.to_string(), i * 10);
    }
    assert_eq!(m.keys_and_values().len(), 5);

    // 2 < live count: the shrink guard leaves the table untouched.
    m.resize(2);
    assert_eq!(m.capacity(), 11);
    assert_eq!(m.keys_and_values().len(), 5);

    m.put("20", 200);
    m.remove("1");
    m.resize(12);
    assert_eq!(m.capacity(), 13);

    let mut pairs: Vec<(String, u64)> = m
        .keys_and_values()
        .into_iter()
        .map(|(k, v)| (k.to_owned(), *v))
        .collect();
    pairs.sort();
    assert_eq!(
        pairs,
        [
            ("2".to_owned(), 20),
            ("20".to_owned(), 200),
            ("3".to_owned(), 30),
            ("4".to_owned(), 40),
            ("5".to_owned(), 50),
        ]
    );
}

// Test: clear empties every slot but keeps the current capacity, even one
// adopted through an explicit resize.
#[test]
fn clear_preserves_capacity() {
    let mut m = QuadMap::new(53, additive);
    m.put("key1", 10);
    m.put("key2", 20);
    m.resize(100);
    assert_eq!(m.capacity(), 101);
    assert_eq!(m.len(), 2);

    m.clear();
    assert_eq!(m.len(), 0);
    assert_eq!(m.capacity(), 101);
    assert!(m.is_empty());
    assert_eq!(m.get("key1"), None);
    assert_eq!(m.iter().count(), 0);
}

// Test: iteration yields live entries only, in a single forward pass;
// for-loop sugar via IntoIterator works on shared and mutable borrows.
#[test]
fn iteration_over_live_entries() {
    let mut m = QuadMap::new(10, additive);
    for i in 0..5u64 {
        m.put(&i.to_string(), i * 24);
    }

    let mut seen: Vec<String> = (&m).into_iter().map(|(k, _)| k.to_owned()).collect();
    seen.sort();
    assert_eq!(seen, ["0", "1", "2", "3", "4"]);

    m.remove("0");
    m.remove("4");
    let mut total = 0;
    for (k, v) in &m {
        assert!(k == "1" || k == "2" || k == "3");
        total += *v;
    }
    assert_eq!(total, 24 + 48 + 72);

    for (_, v) in &mut m {
        *v = 0;
    }
    assert!(m.iter().all(|(_, v)| *v == 0));
}

// Test: a long chain of explicit resizes with churn in between.
// Verifies: every inserted key stays retrievable with its value, every
// never-inserted neighbor stays absent, and a put/remove pair per round
// leaves no residue. Assumes resize targets all exceed the live count.
#[test]
fn repeated_resizes_preserve_contents() {
    let mut m = QuadMap::new(75, weighted);
    let keys: Vec<u64> = (25..1000).step_by(13).collect();
    for &key in &keys {
        m.put(&key.to_string(), key * 42);
    }
    assert_eq!(m.len(), keys.len());

    for target in (111..1000).step_by(117) {
        m.resize(target);
        assert!(m.capacity() >= target);

        m.put("some key", 1);
        assert!(m.contains_key("some key"));
        m.remove("some key");
        assert!(!m.contains_key("some key"));

        for &key in &keys {
            assert_eq!(m.get(&key.to_string()), Some(&(key * 42)));
            assert!(!m.contains_key(&(key + 1).to_string()));
        }
        assert_eq!(m.len(), keys.len());
    }
}

// Test: a put after a deep shrink restores the load bound in one step.
// Assumes: additive("a"/"b"/"c") = 97/98/99 land on distinct residues mod
// 3, so resize(3) packs the table to load 1.0. The next put must then
// double past 6 (load 4/7 >= 0.5) to 12, adopting 13.
#[test]
fn put_after_deep_shrink_restores_load_bound() {
    let mut m = QuadMap::new(11, additive);
    m.put("a", 1);
    m.put("b", 2);
    m.put("c", 3);

    m.resize(3);
    assert_eq!(m.capacity(), 3);
    assert_eq!(m.table_load(), 1.0);

    m.put("d", 4);
    assert_eq!(m.capacity(), 13);
    assert!(m.table_load() < 0.5);
    for (k, v) in [("a", 1), ("b", 2), ("c", 3), ("d", 4)] {
        assert_eq!(m.get(k), Some(&v));
    }
}

// Test: a resize request of 2 adopts capacity 3, never 2.
// Verifies: capacities stay odd primes, so the next put still leaves the
// load strictly below 0.5.
#[test]
fn resize_to_two_adopts_capacity_three() {
    let mut m = QuadMap::new(11, additive);
    m.put("x", 10);

    m.resize(2);
    assert_eq!(m.capacity(), 3);
    assert_eq!(m.get("x"), Some(&10));

    m.put("y", 20);
    assert!(m.table_load() < 0.5);
    assert_eq!(m.get("x"), Some(&10));
    assert_eq!(m.get("y"), Some(&20));
}

// Test: the shrink guard leaves the table completely unchanged, not just
// non-empty: same capacity, same load, same retrievable entries.
#[test]
fn shrink_below_live_count_is_a_no_op() {
    let mut m = QuadMap::new(31, additive);
    for i in 0..10 {
        m.put(&format!("k{i}"), i);
    }
    let capacity = m.capacity();
    let load = m.table_load();

    m.resize(9);
    assert_eq!(m.capacity(), capacity);
    assert_eq!(m.table_load(), load);
    for i in 0..10 {
        assert_eq!(m.get(&format!("k{i}")), Some(&i));
    }

    // Exactly the live count is allowed (capacity advances to a prime
    // able to hold it).
    m.resize(10);
    assert!(m.capacity() >= 10);
    for i in 0..10 {
        assert_eq!(m.get(&format!("k{i}")), Some(&i));
    }
}
