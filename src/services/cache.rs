use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::types::{RawCandle, Timeframe};

/// Identifies one fetched candle window.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandleKey {
    /// Upper-cased symbol.
    pub symbol: String,
    pub timeframe: Timeframe,
    pub limit: usize,
}

impl CandleKey {
    pub fn new(symbol: &str, timeframe: Timeframe, limit: usize) -> Self {
        Self {
            symbol: symbol.trim().to_uppercase(),
            timeframe,
            limit,
        }
    }
}

struct CachedWindow {
    candles: Arc<Vec<RawCandle>>,
    expires_at: Instant,
}

/// Thread-safe TTL cache of fetched candle windows.
///
/// Only raw source data is cached; classifications are always recomputed.
/// A zero TTL disables caching.
pub struct CandleCache {
    data: DashMap<CandleKey, CachedWindow>,
    ttl: Duration,
}

impl CandleCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            data: DashMap::new(),
            ttl,
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Get a window if it has not expired.
    pub fn get(&self, key: &CandleKey) -> Option<Arc<Vec<RawCandle>>> {
        if let Some(entry) = self.data.get(key) {
            if entry.expires_at > Instant::now() {
                return Some(entry.candles.clone());
            }
        }
        // Only evict if the entry is still stale; a concurrent insert survives
        self.data.remove_if(key, |_, entry| entry.expires_at <= Instant::now());
        None
    }

    /// Store a window and hand back the shared copy.
    pub fn insert(&self, key: CandleKey, candles: Vec<RawCandle>) -> Arc<Vec<RawCandle>> {
        let candles = Arc::new(candles);
        if self.is_enabled() {
            self.data.insert(
                key,
                CachedWindow {
                    candles: candles.clone(),
                    expires_at: Instant::now() + self.ttl,
                },
            );
        }
        candles
    }

    /// Remove all expired windows.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.data.retain(|_, entry| entry.expires_at > now);
    }

    /// Number of stored windows (including expired).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
