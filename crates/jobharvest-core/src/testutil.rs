//! Test utilities: mock provider and record builders.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! The mock uses `Arc<Mutex<_>>` for interior mutability, allowing
//! assertions on the requests it received.

use std::sync::{Arc, Mutex};

use crate::error::AppError;
use crate::models::{CleanJobRecord, RawJobRecord, SearchRequest};
use crate::platform::Platform;
use crate::traits::SearchProvider;

/// Mock provider with a queue of configurable responses.
///
/// Each `search` call pops the first queued response and records the
/// request it was given. An empty queue answers with the records passed to
/// [`MockProvider::new`] (or nothing).
#[derive(Clone)]
pub struct MockProvider {
    default_batch: Arc<Vec<RawJobRecord>>,
    responses: Arc<Mutex<Vec<Result<Vec<RawJobRecord>, AppError>>>>,
    requests: Arc<Mutex<Vec<SearchRequest>>>,
}

impl MockProvider {
    /// Provider that answers every call with the same batch.
    pub fn new(batch: Vec<RawJobRecord>) -> Self {
        Self {
            default_batch: Arc::new(batch),
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Provider that fails its first call with the given error.
    pub fn with_error(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    /// Provider with an explicit per-call response queue.
    pub fn with_responses(responses: Vec<Result<Vec<RawJobRecord>, AppError>>) -> Self {
        Self {
            default_batch: Arc::new(Vec::new()),
            responses: Arc::new(Mutex::new(responses)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every request this provider has received, in order.
    pub fn requests(&self) -> Vec<SearchRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl SearchProvider for MockProvider {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawJobRecord>, AppError> {
        self.requests.lock().unwrap().push(request.clone());

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(self.default_batch.as_ref().clone())
        } else {
            responses.remove(0)
        }
    }
}

/// A raw record with the fields every platform is expected to return.
pub fn make_raw_record(platform: Platform, job_url: &str, title: &str) -> RawJobRecord {
    let mut fields = serde_json::Map::new();
    fields.insert("id".into(), serde_json::json!(format!("{platform}-{title}")));
    fields.insert("site".into(), serde_json::json!(platform.as_str()));
    fields.insert("job_url".into(), serde_json::json!(job_url));
    fields.insert("title".into(), serde_json::json!(title));
    fields.insert("company".into(), serde_json::json!("Acme Corp"));
    fields.insert("location".into(), serde_json::json!("Recife, Pernambuco"));
    fields.insert(
        "description".into(),
        serde_json::json!("We are looking for a QA engineer."),
    );
    RawJobRecord::new(platform, fields)
}

/// A minimal clean record: identifier + title, everything else absent.
/// An empty `job_url` becomes `None`.
pub fn make_clean_record(job_url: &str, title: &str) -> CleanJobRecord {
    CleanJobRecord {
        id: Some(format!("test-{title}")),
        site: Some("indeed".into()),
        job_url: if job_url.is_empty() {
            None
        } else {
            Some(job_url.into())
        },
        job_url_direct: None,
        title: Some(title.into()),
        company: Some("Acme Corp".into()),
        location: None,
        date_posted: None,
        job_type: None,
        salary_source: None,
        interval: None,
        min_amount: None,
        max_amount: None,
        currency: None,
        is_remote: None,
        job_level: None,
        job_function: None,
        description: Some("We are looking for a QA engineer.".into()),
        skills: None,
    }
}

/// A default search request for the given platform.
pub fn make_search_request(platform: Platform) -> SearchRequest {
    SearchRequest {
        term: "QA Engineer".into(),
        location: "Recife, Pernambuco".into(),
        country: "Brazil".into(),
        platform,
        result_limit: 10,
        max_age_days: 7,
        filters: Default::default(),
    }
}
