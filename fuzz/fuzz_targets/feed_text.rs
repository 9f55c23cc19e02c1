#![no_main]

use libfuzzer_sys::fuzz_target;

use newsdesk::fetcher::parse_feed;
use newsdesk::text::{compact, normalize_text};

fuzz_target!(|data: &[u8]| {
    let raw = String::from_utf8_lossy(data);

    // Normalizing is total and idempotent
    let once = normalize_text(&raw);
    assert_eq!(normalize_text(&once), once);
    assert!(compact(&once, 220).chars().count() <= 220);

    // Feed parsing may fail but never panics
    if let Ok(entries) = parse_feed(&raw) {
        for entry in entries {
            let _ = entry.title.as_deref().map(normalize_text);
        }
    }
});
