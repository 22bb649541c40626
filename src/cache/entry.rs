//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
///
/// Entries are immutable once created: a re-set replaces the entry
/// wholesale, it is never mutated in place.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored payload
    pub value: Value,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
    /// The TTL the entry was stored with, in seconds
    pub ttl_seconds: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl_seconds` from now.
    pub fn new(value: Value, ttl_seconds: u64) -> Self {
        let now = current_timestamp_ms();

        Self {
            value,
            created_at: now,
            expires_at: now + ttl_seconds * 1000,
            ttl_seconds,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is considered expired when the current
    /// time is greater than or equal to the expiration time.
    pub fn is_expired(&self) -> bool {
        current_timestamp_ms() >= self.expires_at
    }

    // == Remaining TTL ==
    /// Remaining TTL in whole seconds, rounded up; 0 once expired.
    pub fn remaining_ttl(&self) -> u64 {
        let now = current_timestamp_ms();
        if self.expires_at > now {
            (self.expires_at - now).div_ceil(1000)
        } else {
            0
        }
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new(json!({"name": "paracetamol"}), 60);

        assert_eq!(entry.value, json!({"name": "paracetamol"}));
        assert_eq!(entry.ttl_seconds, 60);
        assert_eq!(entry.expires_at, entry.created_at + 60_000);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_entry_expiration() {
        // Create entry with 1 second TTL
        let entry = CacheEntry::new(json!("value"), 1);

        assert!(!entry.is_expired());

        // Wait for expiration
        sleep(Duration::from_millis(1100));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_remaining_ttl() {
        let entry = CacheEntry::new(json!("value"), 10);

        let remaining = entry.remaining_ttl();
        assert!(remaining <= 10);
        assert!(remaining >= 9);
    }

    #[test]
    fn test_remaining_ttl_rounds_up() {
        let now = current_timestamp_ms();
        let entry = CacheEntry {
            value: json!("value"),
            created_at: now,
            expires_at: now + 1500,
            ttl_seconds: 2,
        };

        // 1.5 seconds left rounds up to 2
        assert_eq!(entry.remaining_ttl(), 2);
    }

    #[test]
    fn test_remaining_ttl_expired() {
        let entry = CacheEntry::new(json!("value"), 1);

        sleep(Duration::from_millis(1100));

        assert_eq!(entry.remaining_ttl(), 0);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = current_timestamp_ms();
        let entry = CacheEntry {
            value: json!("value"),
            created_at: now,
            expires_at: now, // Expires exactly at creation time
            ttl_seconds: 0,
        };

        // Entry should be expired when current time >= expires_at
        assert!(entry.is_expired(), "Entry should be expired at boundary");
    }
}
