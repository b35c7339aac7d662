use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::platform::Platform;

/// A platform-specific search result, untouched beyond source tagging.
///
/// `fields` holds whatever the platform returned (heterogeneous types,
/// possibly sentinel "missing" values). The record is consumed by the
/// cleaner and never outlives a single collection run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawJobRecord {
    pub platform: Platform,
    /// Search term that produced this record (set by the collector).
    pub search_term: String,
    /// Location the search was issued for (set by the collector).
    pub search_location: String,
    /// Country the search was issued for (set by the collector).
    pub search_country: String,
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl RawJobRecord {
    pub fn new(platform: Platform, fields: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            platform,
            search_term: String::new(),
            search_location: String::new(),
            search_country: String::new(),
            fields,
        }
    }

    /// Tag the record with the search that produced it.
    pub fn tag(&mut self, term: &str, location: &str, country: &str) {
        self.search_term = term.to_string();
        self.search_location = location.to_string();
        self.search_country = country.to_string();
    }

    /// String value of a field, if present and actually a string.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|v| v.as_str())
    }

    /// True when the description field is missing, null, or blank.
    pub fn has_empty_description(&self) -> bool {
        self.field_str("description")
            .map(|s| s.trim().is_empty())
            .unwrap_or(true)
    }
}

/// Fixed 19-field schema of a normalized job posting.
///
/// Invariant: no field ever holds a missing-value sentinel. Absent values
/// are `None`, which serialises as JSON null and as an empty CSV field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanJobRecord {
    pub id: Option<String>,
    pub site: Option<String>,
    pub job_url: Option<String>,
    pub job_url_direct: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub date_posted: Option<String>,
    pub job_type: Option<String>,
    pub salary_source: Option<String>,
    pub interval: Option<String>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub currency: Option<String>,
    pub is_remote: Option<bool>,
    pub job_level: Option<String>,
    pub job_function: Option<String>,
    pub description: Option<String>,
    pub skills: Option<String>,
}

impl CleanJobRecord {
    /// Field names in export order.
    pub const FIELDS: [&'static str; 19] = [
        "id",
        "site",
        "job_url",
        "job_url_direct",
        "title",
        "company",
        "location",
        "date_posted",
        "job_type",
        "salary_source",
        "interval",
        "min_amount",
        "max_amount",
        "currency",
        "is_remote",
        "job_level",
        "job_function",
        "description",
        "skills",
    ];

    /// Stable deduplication key: hash of the listing URL, falling back to
    /// the platform-assigned id. The cleaner guarantees at least one of the
    /// two is present on every surviving record.
    pub fn dedup_key(&self) -> Option<String> {
        if let Some(url) = self.job_url.as_deref().filter(|u| !u.is_empty()) {
            return Some(compute_hash(url));
        }
        self.id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| compute_hash(&format!("id:{id}")))
    }
}

/// Parameters for one (term, platform) provider query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub term: String,
    pub location: String,
    pub country: String,
    pub platform: Platform,
    pub result_limit: usize,
    pub max_age_days: u32,
    pub filters: SearchFilters,
}

/// Optional narrowing filters forwarded to the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub job_type: Option<String>,
    pub is_remote: Option<bool>,
}

/// Ordered, deduplicated collection result.
///
/// Invariant: no two entries share a deduplication key. Insertion keeps the
/// first occurrence, so iteration order of the collection run is the
/// tie-break rule.
#[derive(Debug, Default, Clone)]
pub struct JobDataset {
    records: Vec<CleanJobRecord>,
    keys: HashSet<String>,
}

impl JobDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record unless its key was already seen.
    /// Returns true if the record was kept.
    pub fn insert(&mut self, record: CleanJobRecord) -> bool {
        let Some(key) = record.dedup_key() else {
            return false;
        };
        if self.keys.insert(key) {
            self.records.push(record);
            true
        } else {
            false
        }
    }

    pub fn records(&self) -> &[CleanJobRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Compute a SHA-256 hash of a string, returned as 64-char hex.
pub fn compute_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}
