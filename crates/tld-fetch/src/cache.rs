use chrono::{DateTime, Utc};

use crate::metadata::SourceMetadata;

/// Extract the `max-age` directive of a `Cache-Control` value, in seconds
#[must_use]
pub fn parse_max_age(cache_control: &str) -> Option<u64> {
    cache_control.split(',').find_map(|directive| {
        let (name, value) = directive.trim().split_once('=')?;
        if name.trim().eq_ignore_ascii_case("max-age") {
            value.trim().trim_matches('"').parse().ok()
        } else {
            None
        }
    })
}

/// Returns true if the last download is younger than its stored `max-age`
#[must_use]
pub fn is_fresh(entry: &SourceMetadata, now: DateTime<Utc>) -> bool {
    let (Some(downloaded), Some(max_age)) = (entry.last_downloaded, entry.headers.cache_max_age)
    else {
        return false;
    };
    let age = now.signed_duration_since(downloaded).num_seconds();
    age >= 0 && age.unsigned_abs() < max_age
}
