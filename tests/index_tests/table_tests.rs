//! HashIndex Tests
//!
//! Tests verify:
//! - Basic put/get operations
//! - Overwrite (last write wins)
//! - Capacity rounding and growth
//! - Load factor bound
//! - Iteration

use tallykv::HashIndex;

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_new_index_is_empty() {
    let index = HashIndex::new();
    assert_eq!(index.len(), 0);
    assert!(index.is_empty());
    assert_eq!(index.capacity(), 16);
    assert_eq!(index.load_factor(), 0.0);
}

#[test]
fn test_put_and_get() {
    let mut index = HashIndex::new();

    index.put("name".to_string(), "Phani".to_string());

    assert_eq!(index.get("name"), Some("Phani"));
    assert!(index.contains_key("name"));
}

#[test]
fn test_get_nonexistent_key() {
    let index = HashIndex::new();
    assert_eq!(index.get("does_not_exist"), None);
    assert!(!index.contains_key("does_not_exist"));
}

#[test]
fn test_put_multiple_entries() {
    let mut index = HashIndex::new();

    index.put("key1".to_string(), "val1".to_string());
    index.put("key2".to_string(), "val2".to_string());
    index.put("key3".to_string(), "val3".to_string());

    assert_eq!(index.len(), 3);
    assert_eq!(index.get("key1"), Some("val1"));
    assert_eq!(index.get("key2"), Some("val2"));
    assert_eq!(index.get("key3"), Some("val3"));
}

#[test]
fn test_put_overwrites_existing() {
    let mut index = HashIndex::new();

    let first = index.put("language".to_string(), "Python".to_string());
    let second = index.put("language".to_string(), "Go".to_string());

    assert_eq!(first, None);
    assert_eq!(second, Some("Python".to_string()));
    assert_eq!(index.len(), 1);
    assert_eq!(index.get("language"), Some("Go"));
}

#[test]
fn test_duplicate_puts_same_value() {
    let mut index = HashIndex::new();

    index.put("color".to_string(), "blue".to_string());
    index.put("color".to_string(), "blue".to_string());

    assert_eq!(index.len(), 1);
    assert_eq!(index.get("color"), Some("blue"));
}

#[test]
fn test_long_key_and_value() {
    let mut index = HashIndex::new();

    let long_key = "k".repeat(200);
    let long_value = "v".repeat(500);
    index.put(long_key.clone(), long_value.clone());

    assert_eq!(index.get(&long_key), Some(long_value.as_str()));
}

#[test]
fn test_special_characters() {
    let mut index = HashIndex::new();

    index.put("spécial@key!".to_string(), "välüe#123$".to_string());

    assert_eq!(index.get("spécial@key!"), Some("välüe#123$"));
}

#[test]
fn test_similar_keys_are_distinct() {
    let mut index = HashIndex::new();

    index.put("a".to_string(), "1".to_string());
    index.put("A".to_string(), "2".to_string());
    index.put("aa".to_string(), "3".to_string());

    assert_eq!(index.get("a"), Some("1"));
    assert_eq!(index.get("A"), Some("2"));
    assert_eq!(index.get("aa"), Some("3"));
}

// =============================================================================
// Capacity Tests
// =============================================================================

#[test]
fn test_capacity_rounds_up_to_power_of_two() {
    assert_eq!(HashIndex::with_capacity(10).capacity(), 16);
    assert_eq!(HashIndex::with_capacity(16).capacity(), 16);
    assert_eq!(HashIndex::with_capacity(17).capacity(), 32);
}

#[test]
fn test_zero_capacity_becomes_one() {
    let mut index = HashIndex::with_capacity(0);
    assert_eq!(index.capacity(), 1);

    index.put("only".to_string(), "one".to_string());
    assert_eq!(index.get("only"), Some("one"));
    assert!(index.load_factor() <= 0.7);
}

// =============================================================================
// Growth Tests
// =============================================================================

#[test]
fn test_growth_triggers_past_load_factor() {
    let mut index = HashIndex::with_capacity(16);

    // 11 / 16 = 0.6875: no growth yet
    for i in 0..11 {
        index.put(format!("key{}", i), format!("value{}", i));
    }
    assert_eq!(index.capacity(), 16);

    // 12 / 16 = 0.75 > 0.7: grows before put returns
    index.put("key11".to_string(), "value11".to_string());
    assert_eq!(index.capacity(), 32);
    assert_eq!(index.len(), 12);
}

#[test]
fn test_overwrite_does_not_trigger_growth() {
    let mut index = HashIndex::with_capacity(16);
    for i in 0..11 {
        index.put(format!("key{}", i), "v".to_string());
    }

    for _ in 0..100 {
        index.put("key0".to_string(), "again".to_string());
    }

    assert_eq!(index.capacity(), 16);
    assert_eq!(index.len(), 11);
}

#[test]
fn test_many_growths_preserve_every_key() {
    let mut index = HashIndex::with_capacity(2);

    for i in 0..5000 {
        index.put(format!("key{:05}", i), format!("value{}", i));
        assert!(index.load_factor() <= index.max_load_factor());
    }

    assert_eq!(index.len(), 5000);
    assert!(index.capacity() >= 8192);
    for i in 0..5000 {
        assert_eq!(
            index.get(&format!("key{:05}", i)),
            Some(format!("value{}", i).as_str())
        );
    }
    assert_eq!(index.get("key05000"), None);
}

#[test]
fn test_explicit_grow_preserves_entries() {
    let mut index = HashIndex::new();
    for i in 0..8 {
        index.put(format!("k{}", i), format!("v{}", i));
    }

    index.grow();

    assert_eq!(index.capacity(), 32);
    assert_eq!(index.len(), 8);
    for i in 0..8 {
        assert_eq!(index.get(&format!("k{}", i)), Some(format!("v{}", i).as_str()));
    }
}

#[test]
fn test_custom_load_factor() {
    let mut index = HashIndex::with_load_factor(8, 0.5);

    for i in 0..4 {
        index.put(format!("k{}", i), "v".to_string());
    }
    assert_eq!(index.capacity(), 8);

    index.put("k4".to_string(), "v".to_string());
    assert_eq!(index.capacity(), 16);
}

#[test]
fn test_tiny_load_factor_grows_far_enough() {
    let mut index = HashIndex::with_load_factor(1, 0.1);

    for i in 0..20 {
        index.put(format!("k{}", i), "v".to_string());
        assert!(index.load_factor() <= 0.1);
    }
    assert_eq!(index.len(), 20);
}

#[test]
fn test_out_of_range_load_factor_falls_back_to_default() {
    for bad in [0.0, -1.0, 1.0, 2.5, f64::NAN, f64::INFINITY] {
        let mut index = HashIndex::with_load_factor(4, bad);
        assert_eq!(index.max_load_factor(), 0.7);

        for i in 0..50 {
            index.put(format!("k{}", i), "v".to_string());
        }

        assert_eq!(index.len(), 50);
        assert!(index.load_factor() <= 0.7);
        assert_eq!(index.get("k49"), Some("v"));
    }
}

// =============================================================================
// Iteration Tests
// =============================================================================

#[test]
fn test_iter_yields_every_entry_once() {
    let mut index = HashIndex::new();
    for i in 0..100 {
        index.put(format!("key{}", i), format!("value{}", i));
    }
    index.put("key7".to_string(), "latest".to_string());

    let mut entries: Vec<(String, String)> = index
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    entries.sort();

    assert_eq!(entries.len(), 100);
    assert!(entries.contains(&("key7".to_string(), "latest".to_string())));
}
