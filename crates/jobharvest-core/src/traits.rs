use std::future::Future;

use crate::error::AppError;
use crate::models::{RawJobRecord, SearchRequest};

/// Queries one platform for raw job postings.
///
/// The request/response shape beyond [`RawJobRecord`] is platform-defined
/// and opaque to the pipeline. Implementations perform the network call;
/// no caching.
pub trait SearchProvider: Send + Sync + Clone {
    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<Vec<RawJobRecord>, AppError>> + Send;
}

/// A provider that always returns no results. Useful for dry runs.
#[derive(Debug, Clone)]
pub struct NullProvider;

impl SearchProvider for NullProvider {
    async fn search(&self, _request: &SearchRequest) -> Result<Vec<RawJobRecord>, AppError> {
        Ok(vec![])
    }
}
