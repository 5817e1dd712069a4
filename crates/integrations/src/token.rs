//! # Access Token Cache
//!
//! The only shared mutable state in the service. Readers take the
//! `RwLock` fast path; on a miss, one caller at a time holds the refresh
//! mutex, re-checks, and fetches, so concurrent misses cause a single
//! upstream request.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

/// Tokens are treated as expired this long before the issuer says so.
pub const EXPIRY_MARGIN_SECONDS: i64 = 300;

/// A token as returned by the issuer.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuedToken {
    pub access_token: String,
    /// Lifetime in seconds
    pub expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// A lifetime that cannot be represented leaves the token expired on
    /// arrival: it serves the current caller and the next one refetches.
    fn issued_at(token: IssuedToken, now: DateTime<Utc>) -> Self {
        let expires_at = token
            .expires_in
            .checked_sub(EXPIRY_MARGIN_SECONDS)
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime));

        let expires_at = match expires_at {
            Some(expires_at) => expires_at,
            None => {
                warn!(
                    "Token issuer returned an unusable lifetime of {}s; not caching",
                    token.expires_in
                );
                now
            }
        };

        Self {
            value: token.access_token,
            expires_at,
        }
    }

    fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

#[async_trait]
pub trait TokenFetcher: Send + Sync {
    async fn fetch_token(&self) -> eyre::Result<IssuedToken>;
}

pub struct TokenCache<F> {
    fetcher: F,
    current: RwLock<Option<CachedToken>>,
    refresh: Mutex<()>,
}

impl<F: TokenFetcher> TokenCache<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            current: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    /// Returns a token valid right now, fetching a new one when needed.
    pub async fn valid_token(&self) -> eyre::Result<String> {
        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        let _refreshing = self.refresh.lock().await;

        // Another caller may have refreshed while we waited.
        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        let issued = self.fetcher.fetch_token().await?;
        let token = CachedToken::issued_at(issued, Utc::now());
        debug!("Access token refreshed, valid until {}", token.expires_at);

        let value = token.value.clone();
        *self.current.write().await = Some(token);
        Ok(value)
    }

    async fn cached(&self) -> Option<String> {
        let current = self.current.read().await;
        current
            .as_ref()
            .filter(|token| token.is_valid(Utc::now()))
            .map(|token| token.value.clone())
    }
}
