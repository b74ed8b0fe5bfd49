//! When to re-fetch rates before a conversion

use crate::core::currency::CurrencyCode;
use crate::core::rates::RateSnapshot;
use chrono::{DateTime, Duration, Utc};

/// Age in seconds after which a cached fiat table is no longer reused.
pub const FIAT_STALE_AFTER_SECS: i64 = 300;

/// True when the fiat table lacks `target`, was never fetched, or is older than
/// [`FIAT_STALE_AFTER_SECS`].
///
/// The source code is not consulted: a table fetched for another base still
/// counts as fresh when it happens to contain `target`.
pub fn needs_refresh(
    snapshot: &RateSnapshot,
    _source: &CurrencyCode,
    target: &CurrencyCode,
    now: DateTime<Utc>,
) -> bool {
    if snapshot.fiat_rate(target).is_none() {
        return true;
    }
    match snapshot.last_fetch() {
        None => true,
        Some(fetched_at) => now - fetched_at > Duration::seconds(FIAT_STALE_AFTER_SECS),
    }
}

/// Which tables to fetch before resolving a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPlan {
    /// Crypto prices are re-fetched on every request touching a crypto code.
    pub crypto: bool,
    /// Fiat rates are fetched with the source as base, only for fiat sources.
    pub fiat: bool,
}

impl RefreshPlan {
    pub fn for_pair(
        snapshot: &RateSnapshot,
        source: &CurrencyCode,
        target: &CurrencyCode,
        now: DateTime<Utc>,
    ) -> Self {
        let crypto = source.is_crypto() || target.is_crypto();
        let fiat = !source.is_crypto() && needs_refresh(snapshot, source, target, now);
        Self { crypto, fiat }
    }

    pub fn is_noop(&self) -> bool {
        !self.crypto && !self.fiat
    }
}
