//! Cache Entry Module
//!
//! Defines a cached response body with its expiry timestamp.

use std::time::Duration;

use chrono::{DateTime, Utc};

// == Cache Entry ==
/// A raw response body stored until `expires_at`.
///
/// The body is kept as received and re-parsed on every hit, so callers always
/// get a fresh `Value` they are free to mutate.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Response text exactly as received
    pub raw_body: String,
    /// When the entry was stored
    pub created_at: DateTime<Utc>,
    /// Last instant at which the entry may be served
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry that expires `ttl` from now.
    pub fn new(raw_body: String, ttl: Duration) -> Self {
        let now = Utc::now();
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            raw_body,
            created_at: now,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has expired at `now`.
    ///
    /// Boundary condition: the entry is still valid when `now == expires_at`
    /// and expired strictly after it.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Checks whether the entry has expired against the wall clock.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    // == Time To Live ==
    /// Remaining lifetime, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        (self.expires_at - Utc::now()).to_std().unwrap_or(Duration::ZERO)
    }
}
