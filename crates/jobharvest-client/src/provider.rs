use std::time::Duration;

use jobharvest_core::error::AppError;
use jobharvest_core::models::{RawJobRecord, SearchRequest};
use jobharvest_core::platform::Platform;
use jobharvest_core::traits::SearchProvider;
use reqwest::Client;
use url::Url;

/// HTTP search provider using reqwest.
///
/// Queries `{base_url}/{platform}/search` and expects a JSON array of
/// objects, one per posting. The object shape is platform-defined and
/// passed through untouched as [`RawJobRecord`] fields. No caching.
#[derive(Clone, Debug)]
pub struct HttpProvider {
    client: Client,
    base_url: Url,
    timeout_secs: u64,
}

impl HttpProvider {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        Self::with_options(base_url, Duration::from_secs(30), &[])
    }

    /// Build a provider with an explicit timeout and optional proxies.
    /// Only the first proxy is used; the list form matches the settings
    /// schema.
    pub fn with_options(
        base_url: &str,
        timeout: Duration,
        proxies: &[String],
    ) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("invalid provider base URL: {e}")))?;

        let mut builder = Client::builder()
            .user_agent("jobharvest/0.1 (job collection pipeline)")
            .timeout(timeout);

        if let Some(proxy) = proxies.first() {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| AppError::Config(format!("invalid proxy URL: {e}")))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| AppError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            timeout_secs: timeout.as_secs(),
        })
    }

    /// Endpoint for one platform's search resource.
    fn endpoint(&self, platform: Platform) -> Result<Url, AppError> {
        self.base_url
            .join(&format!("{}/search", platform.as_str()))
            .map_err(|e| AppError::Config(format!("cannot build endpoint URL: {e}")))
    }
}

/// Query parameters for one search request.
fn query_params(request: &SearchRequest) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("term", request.term.clone()),
        ("location", request.location.clone()),
        ("country", request.country.clone()),
        ("limit", request.result_limit.to_string()),
        ("max_age_days", request.max_age_days.to_string()),
    ];
    if let Some(job_type) = &request.filters.job_type {
        params.push(("job_type", job_type.clone()));
    }
    if let Some(is_remote) = request.filters.is_remote {
        params.push(("is_remote", is_remote.to_string()));
    }
    params
}

/// Interpret a provider response body as a batch of raw records.
fn parse_batch(platform: Platform, body: serde_json::Value) -> Result<Vec<RawJobRecord>, AppError> {
    let items = body.as_array().ok_or_else(|| AppError::MalformedResponse {
        platform,
        message: "expected a JSON array of postings".into(),
    })?;

    items
        .iter()
        .map(|item| match item.as_object() {
            Some(fields) => Ok(RawJobRecord::new(platform, fields.clone())),
            None => Err(AppError::MalformedResponse {
                platform,
                message: format!("expected an object posting, got {item}"),
            }),
        })
        .collect()
}

impl SearchProvider for HttpProvider {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<RawJobRecord>, AppError> {
        let platform = request.platform;
        let url = self.endpoint(platform)?;

        tracing::debug!(
            platform = %platform,
            term = %request.term,
            location = %request.location,
            "Querying provider"
        );

        let response = self
            .client
            .get(url)
            .query(&query_params(request))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    AppError::Network(format!("connection failed: {e}"))
                } else {
                    AppError::Provider {
                        platform,
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Provider {
                platform,
                message: format!("HTTP {}", status.as_u16()),
            });
        }

        let body: serde_json::Value =
            response
                .json()
                .await
                .map_err(|e| AppError::MalformedResponse {
                    platform,
                    message: format!("invalid JSON body: {e}"),
                })?;

        let batch = parse_batch(platform, body)?;
        tracing::debug!(platform = %platform, count = batch.len(), "Provider answered");
        Ok(batch)
    }
}
