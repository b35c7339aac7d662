//! Collection orchestration: searches × platforms, rate-limit sequencing,
//! cleaning, deduplication, and export.
//!
//! Execution is deliberately sequential: exactly one outstanding provider
//! request at a time, spaced by a courtesy delay. The delay is the
//! rate-limit contract; do not parallelise requests without re-deriving it.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::adapter::PlatformAdapter;
use crate::cleaner::JobCleaner;
use crate::error::AppError;
use crate::export::{ExportPaths, JobExporter};
use crate::models::{JobDataset, RawJobRecord, SearchFilters, SearchRequest};
use crate::platform::Platform;
use crate::traits::SearchProvider;

/// One place to search: the platform-facing location string plus the
/// country used for platforms that only accept country-level queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchLocation {
    pub location: String,
    pub country: String,
}

/// Pre-validated settings for one collection run.
#[derive(Debug, Clone)]
pub struct CollectRequest {
    pub search_terms: Vec<String>,
    pub locations: Vec<SearchLocation>,
    pub platforms: Vec<Platform>,
    pub results_per_term: usize,
    pub days_old: u32,
    pub filters: SearchFilters,
    /// Courtesy delay between consecutive provider requests.
    pub delay: Duration,
    pub output_filename: String,
}

/// What one collection run produced.
#[derive(Debug, Clone)]
pub struct CollectSummary {
    /// Raw records returned by providers, before any filtering.
    pub records_collected: usize,
    /// Records excluded for an empty description on a platform known to
    /// omit them, plus records the cleaner could not identify.
    pub records_dropped: usize,
    pub records_after_dedup: usize,
    pub records_per_platform: BTreeMap<Platform, usize>,
    /// None when the run produced an empty dataset (nothing was exported).
    pub files_written: Option<ExportPaths>,
}

/// Drives the whole pipeline: adapter → accumulate → clean → dedup → export.
pub struct Collector<P: SearchProvider> {
    adapter: PlatformAdapter<P>,
    cleaner: JobCleaner,
    exporter: JobExporter,
    cancel: CancellationToken,
}

impl<P: SearchProvider> Collector<P> {
    pub fn new(provider: P, exporter: JobExporter) -> Self {
        Self {
            adapter: PlatformAdapter::new(provider),
            cleaner: JobCleaner::new(),
            exporter,
            cancel: CancellationToken::new(),
        }
    }

    /// Use an external cancellation token. Cancellation is checked before
    /// each (term, platform) step; whatever was already collected is still
    /// cleaned and exported.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Run every configured search, then clean, deduplicate, and export.
    ///
    /// A provider failure skips that (term, platform) pair and the run
    /// continues; only a run where *every* attempted search failed, or an
    /// export failure, is fatal.
    pub async fn collect_and_export(
        &self,
        request: &CollectRequest,
    ) -> Result<CollectSummary, AppError> {
        if request.output_filename.trim().is_empty() {
            return Err(AppError::Config("output filename must not be empty".into()));
        }

        let raw_records = self.run_searches(request).await?;
        self.consolidate_and_export(request, raw_records)
    }

    /// Iterate locations × terms × platforms, accumulating raw batches.
    async fn run_searches(&self, request: &CollectRequest) -> Result<Vec<RawJobRecord>, AppError> {
        let total_searches = if request.results_per_term == 0 {
            // Short-circuit: nothing will be requested from the provider.
            0
        } else {
            request.locations.len() * request.search_terms.len() * request.platforms.len()
        };

        let mut raw_records: Vec<RawJobRecord> = Vec::new();
        let mut issued = 0usize;
        let mut failed = 0usize;

        'search: for place in &request.locations {
            for term in &request.search_terms {
                for platform in &request.platforms {
                    if self.cancel.is_cancelled() {
                        tracing::info!(
                            completed = issued,
                            total = total_searches,
                            "Cancelled; exporting what was collected"
                        );
                        break 'search;
                    }
                    if request.results_per_term == 0 {
                        continue;
                    }

                    issued += 1;
                    tracing::info!(
                        step = issued,
                        total = total_searches,
                        term = %term,
                        platform = %platform,
                        location = %place.location,
                        "Searching"
                    );

                    let search = SearchRequest {
                        term: term.clone(),
                        location: place.location.clone(),
                        country: place.country.clone(),
                        platform: *platform,
                        result_limit: request.results_per_term,
                        max_age_days: request.days_old,
                        filters: request.filters.clone(),
                    };

                    match self.adapter.search(&search).await {
                        Ok(mut batch) => {
                            for record in &mut batch {
                                record.tag(term, &place.location, &place.country);
                            }
                            tracing::info!(
                                found = batch.len(),
                                platform = %platform,
                                "Search completed"
                            );
                            raw_records.extend(batch);
                        }
                        Err(e) if e.is_recoverable() => {
                            failed += 1;
                            tracing::warn!(
                                term = %term,
                                platform = %platform,
                                error = %e,
                                "Search failed; continuing with remaining searches"
                            );
                        }
                        Err(e) => return Err(e),
                    }

                    // Courtesy delay after every request except the last of
                    // the whole run.
                    if issued < total_searches {
                        tracing::debug!(
                            delay_ms = request.delay.as_millis() as u64,
                            "Waiting before next search"
                        );
                        tokio::time::sleep(request.delay).await;
                    }
                }
            }
        }

        if issued > 0 && failed == issued {
            return Err(AppError::AllSearchesFailed { attempted: issued });
        }

        Ok(raw_records)
    }

    /// Clean the full accumulation once, deduplicate, and export.
    fn consolidate_and_export(
        &self,
        request: &CollectRequest,
        raw_records: Vec<RawJobRecord>,
    ) -> Result<CollectSummary, AppError> {
        let records_collected = raw_records.len();

        // Business rule: a record with an empty description from a platform
        // known to omit descriptions is invalid, not an error.
        let (usable, incomplete): (Vec<_>, Vec<_>) = raw_records.into_iter().partition(|r| {
            r.platform.capabilities().supports_descriptions || !r.has_empty_description()
        });
        for record in &incomplete {
            tracing::debug!(
                platform = %record.platform,
                term = %record.search_term,
                "Excluding record with missing description"
            );
        }
        if !incomplete.is_empty() {
            tracing::info!(
                excluded = incomplete.len(),
                "Excluded records without descriptions"
            );
        }

        let outcome = self.cleaner.clean(&usable);

        let mut dataset = JobDataset::new();
        let mut duplicates = 0usize;
        for record in outcome.records {
            if !dataset.insert(record) {
                duplicates += 1;
            }
        }

        tracing::info!(
            collected = records_collected,
            duplicates_removed = duplicates,
            unique = dataset.len(),
            "Consolidated results"
        );

        let mut records_per_platform: BTreeMap<Platform, usize> = BTreeMap::new();
        for record in dataset.records() {
            if let Some(platform) = record
                .site
                .as_deref()
                .and_then(|s| Platform::from_str(s).ok())
            {
                *records_per_platform.entry(platform).or_default() += 1;
            }
        }

        let files_written = if dataset.is_empty() {
            tracing::info!("No records collected; nothing to export");
            None
        } else {
            Some(self.exporter.export(&dataset, &request.output_filename)?)
        };

        Ok(CollectSummary {
            records_collected,
            records_dropped: incomplete.len() + outcome.dropped,
            records_after_dedup: dataset.len(),
            records_per_platform,
            files_written,
        })
    }
}
