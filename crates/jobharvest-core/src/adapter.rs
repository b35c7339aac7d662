//! Platform-aware wrapper around any [`SearchProvider`].
//!
//! Applies per-platform parameter adjustment before the query goes out.
//! Currently the only adjustment is location granularity: platforms that
//! reject city-level queries get the country substituted for the location.
//! Substitutions are recorded so verbose output and tests can observe them.

use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::models::{RawJobRecord, SearchRequest};
use crate::platform::Platform;
use crate::traits::SearchProvider;

/// A recorded location substitution, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub platform: Platform,
    pub requested_location: String,
    pub effective_location: String,
}

/// A [`SearchProvider`] wrapper that adjusts requests per platform quirks.
#[derive(Clone)]
pub struct PlatformAdapter<P> {
    inner: P,
    substitutions: Arc<Mutex<Vec<Substitution>>>,
}

impl<P: SearchProvider> PlatformAdapter<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            substitutions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Substitutions applied so far in this adapter's lifetime.
    pub fn substitutions(&self) -> Vec<Substitution> {
        self.substitutions.lock().unwrap().clone()
    }

    /// Apply platform-specific parameter adjustment to a request.
    fn adjust(&self, request: &SearchRequest) -> SearchRequest {
        let mut adjusted = request.clone();
        let caps = request.platform.capabilities();

        if caps.requires_country_location && adjusted.location != adjusted.country {
            tracing::debug!(
                platform = %request.platform,
                requested = %adjusted.location,
                effective = %adjusted.country,
                "Substituting country-level location"
            );
            self.substitutions.lock().unwrap().push(Substitution {
                platform: request.platform,
                requested_location: adjusted.location.clone(),
                effective_location: adjusted.country.clone(),
            });
            adjusted.location = adjusted.country.clone();
        }

        adjusted
    }
}

impl<P: SearchProvider> SearchProvider for PlatformAdapter<P> {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawJobRecord>, AppError> {
        let adjusted = self.adjust(request);
        self.inner.search(&adjusted).await
    }
}
