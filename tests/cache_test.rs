//! Cache and service integration tests
//!
//! Validates the memoization contract from the outside: TTL windows, FIFO
//! eviction under capacity pressure, and the service front that ties the
//! cache to the conversion pipeline.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use markdown_condenser::cache::{ConversionCache, DEFAULT_TTL};
use markdown_condenser::{ConversionService, StripConfig, fingerprint};

#[test]
fn test_store_and_lookup_within_ttl() {
    let cache = ConversionCache::new(16, DEFAULT_TTL);
    let key = fingerprint(b"<p>page one</p>");
    cache.store(&key, "# Page One".to_string());

    assert_eq!(cache.lookup(&key), Some("# Page One".to_string()));
}

#[test]
fn test_unknown_fingerprint_misses() {
    let cache = ConversionCache::new(16, DEFAULT_TTL);
    assert_eq!(cache.lookup(&fingerprint(b"never converted")), None);
}

#[test]
fn test_expiry_makes_entry_invisible() {
    let cache = ConversionCache::new(16, Duration::from_millis(30));
    cache.store("key", "content".to_string());
    assert!(cache.lookup("key").is_some(), "entry must be visible before expiry");

    thread::sleep(Duration::from_millis(60));
    assert_eq!(cache.lookup("key"), None, "entry must read as a miss after expiry");
    assert_eq!(cache.len(), 1, "expired entries stay until evicted or overwritten");
}

#[test]
fn test_capacity_pressure_evicts_earliest_fingerprint() {
    let cache = ConversionCache::new(4, DEFAULT_TTL);
    let keys: Vec<String> = (0..6)
        .map(|i| fingerprint(format!("<p>document {i}</p>").as_bytes()))
        .collect();

    for (i, key) in keys.iter().enumerate() {
        cache.store(key, format!("doc {i}"));
    }

    // Two oldest insertions pushed out, the rest retrievable
    assert_eq!(cache.lookup(&keys[0]), None);
    assert_eq!(cache.lookup(&keys[1]), None);
    for (i, key) in keys.iter().enumerate().skip(2) {
        assert_eq!(cache.lookup(key), Some(format!("doc {i}")), "key {i} must survive");
    }
}

#[test]
fn test_reinsertion_overwrites_without_eviction() {
    let cache = ConversionCache::new(2, DEFAULT_TTL);
    cache.store("a", "first".to_string());
    cache.store("b", "second".to_string());
    cache.store("a", "first, revised".to_string());

    assert_eq!(cache.lookup("a"), Some("first, revised".to_string()));
    assert_eq!(cache.lookup("b"), Some("second".to_string()));
}

#[test]
fn test_service_serves_second_call_from_cache() {
    let service = ConversionService::new(StripConfig::default());
    let html = b"<h1>Docs</h1><p>Install instructions.</p>";

    let first = service.convert_with_stats(html).expect("conversion failed");
    let second = service.convert_with_stats(html).expect("conversion failed");

    assert!(!first.cached);
    assert!(second.cached);
    assert_eq!(first.markdown, second.markdown);
}

#[test]
fn test_service_recomputes_after_ttl() {
    let service = ConversionService::with_cache_bounds(
        StripConfig::default(),
        16,
        Duration::from_millis(30),
    );
    let html = b"<p>short-lived</p>";

    let first = service.convert_with_stats(html).expect("conversion failed");
    thread::sleep(Duration::from_millis(60));
    let second = service.convert_with_stats(html).expect("conversion failed");

    assert!(!first.cached);
    assert!(!second.cached, "expired entry must not be served");
    assert_eq!(first.markdown, second.markdown, "recomputation is deterministic");
}

#[test]
fn test_service_eviction_follows_insertion_order() {
    let service =
        ConversionService::with_cache_bounds(StripConfig::default(), 2, DEFAULT_TTL);

    let pages: Vec<Vec<u8>> = (0..3)
        .map(|i| format!("<p>page number {i}</p>").into_bytes())
        .collect();

    for page in &pages {
        service.convert(page).expect("conversion failed");
    }

    // Page 0 was the earliest insertion; converting it again is a miss
    let again = service
        .convert_with_stats(&pages[0])
        .expect("conversion failed");
    assert!(!again.cached);

    // Page 2 is still resident
    let resident = service
        .convert_with_stats(&pages[2])
        .expect("conversion failed");
    assert!(resident.cached);
}

#[test]
fn test_concurrent_conversions_share_the_cache() {
    let service = Arc::new(ConversionService::new(StripConfig::default()));
    let html = b"<h1>Shared</h1><p>Converted by many threads.</p>";

    // Warm the cache, then hammer it with readers
    let expected = service.convert(html).expect("conversion failed");

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = Arc::clone(&service);
        let expected = expected.clone();
        handles.push(thread::spawn(move || {
            for _ in 0..50 {
                let result = service
                    .convert_with_stats(b"<h1>Shared</h1><p>Converted by many threads.</p>")
                    .expect("conversion failed");
                assert!(result.cached);
                assert_eq!(result.markdown, expected);
            }
        }));
    }

    for handle in handles {
        handle.join().expect("reader thread panicked");
    }
}

#[test]
fn test_concurrent_writers_keep_cache_bounded() {
    let service = Arc::new(ConversionService::with_cache_bounds(
        StripConfig::default(),
        32,
        DEFAULT_TTL,
    ));

    let mut handles = Vec::new();
    for t in 0..4 {
        let service = Arc::clone(&service);
        handles.push(thread::spawn(move || {
            for i in 0..100 {
                let html = format!("<p>thread {t} page {i}</p>");
                service.convert(html.as_bytes()).expect("conversion failed");
            }
        }));
    }

    for handle in handles {
        handle.join().expect("writer thread panicked");
    }
    assert!(service.cache().len() <= 32, "capacity bound must hold under contention");
}
