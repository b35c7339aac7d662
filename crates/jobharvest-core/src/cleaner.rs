//! Raw-to-clean record normalization.
//!
//! A single canonicalization pass at the raw/clean boundary enforces the
//! "no missing-value sentinel" invariant: every platform representation of
//! "no value" (JSON null, NaN/infinite floats, blank strings, literal
//! "nan"/"null"/"none" strings) becomes `None`. Pure and deterministic:
//! no I/O, no randomness, never errors. Records it cannot use are dropped
//! and counted, not raised.

use serde_json::Value;

use crate::models::{CleanJobRecord, RawJobRecord};
use crate::platform::Platform;

/// Result of cleaning one batch.
#[derive(Debug, Clone, Default)]
pub struct CleanOutcome {
    pub records: Vec<CleanJobRecord>,
    /// Records dropped for lacking a usable identifier (job_url or id).
    pub dropped: usize,
}

/// Normalizes raw platform records onto the fixed 19-field schema.
#[derive(Debug, Clone, Default)]
pub struct JobCleaner;

impl JobCleaner {
    pub fn new() -> Self {
        Self
    }

    /// Clean a full batch. Drops (with a count) any record that lacks a
    /// non-empty unique identifier; such a record cannot be deduplicated
    /// or traced downstream.
    pub fn clean(&self, batch: &[RawJobRecord]) -> CleanOutcome {
        let mut outcome = CleanOutcome::default();

        for raw in batch {
            match self.clean_record(raw) {
                Some(record) => outcome.records.push(record),
                None => {
                    outcome.dropped += 1;
                    tracing::debug!(
                        platform = %raw.platform,
                        term = %raw.search_term,
                        "Dropping record without job_url or id"
                    );
                }
            }
        }

        if outcome.dropped > 0 {
            tracing::info!(
                dropped = outcome.dropped,
                kept = outcome.records.len(),
                "Cleaning dropped unidentifiable records"
            );
        }

        outcome
    }

    /// Project one raw record onto the clean schema, or None if unusable.
    fn clean_record(&self, raw: &RawJobRecord) -> Option<CleanJobRecord> {
        let text = |name: &str| raw.fields.get(name).and_then(clean_text);
        let number = |name: &str| raw.fields.get(name).and_then(clean_number);
        let boolean = |name: &str| raw.fields.get(name).and_then(clean_bool);

        let record = CleanJobRecord {
            id: text("id"),
            // The queried platform is authoritative for the site column:
            // recognisable payload values are canonicalized, anything else
            // (or nothing) falls back to the source platform.
            site: Some(
                text("site")
                    .and_then(|s| s.parse::<Platform>().ok())
                    .unwrap_or(raw.platform)
                    .as_str()
                    .to_string(),
            ),
            job_url: text("job_url"),
            job_url_direct: text("job_url_direct"),
            title: text("title"),
            company: text("company"),
            location: text("location"),
            date_posted: text("date_posted"),
            job_type: text("job_type"),
            salary_source: text("salary_source"),
            interval: text("interval"),
            min_amount: number("min_amount"),
            max_amount: number("max_amount"),
            currency: text("currency"),
            is_remote: boolean("is_remote"),
            job_level: text("job_level"),
            job_function: text("job_function"),
            description: text("description"),
            skills: text("skills"),
        };

        if record.job_url.is_none() && record.id.is_none() {
            return None;
        }
        Some(record)
    }
}

/// True for strings that are really a missing-value sentinel.
fn is_sentinel_str(s: &str) -> bool {
    s.is_empty() || matches!(s.to_lowercase().as_str(), "nan" | "null" | "none" | "n/a")
}

/// Normalize any JSON value to clean text, or None when absent.
///
/// Strings are trimmed and stripped of control characters (so the text is
/// always well-formed printable Unicode); numbers and booleans are
/// stringified; arrays are flattened to a comma-separated list.
fn clean_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => {
            let cleaned: String = s
                .trim()
                .chars()
                .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
                .collect();
            if is_sentinel_str(&cleaned) {
                None
            } else {
                Some(cleaned)
            }
        }
        Value::Number(n) => {
            if let Some(f) = n.as_f64() {
                if !f.is_finite() {
                    return None;
                }
            }
            Some(n.to_string())
        }
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(clean_text).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        Value::Object(_) => None,
    }
}

/// Coerce a JSON value to a finite f64, or None when absent/unparseable.
fn clean_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => {
            let trimmed = s.trim();
            if is_sentinel_str(trimmed) {
                return None;
            }
            trimmed
                .replace(',', "")
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
        }
        _ => None,
    }
}

/// Coerce a JSON value to a boolean, or None when absent/unrecognised.
fn clean_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 1.0 => Some(true),
            Some(f) if f == 0.0 => Some(false),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Platform;
    use crate::testutil::make_raw_record;
    use serde_json::json;

    fn raw_with(fields: serde_json::Value) -> RawJobRecord {
        let map = fields.as_object().cloned().unwrap();
        RawJobRecord::new(Platform::Indeed, map)
    }

    #[test]
    fn projects_onto_fixed_schema_dropping_extras() {
        let raw = raw_with(json!({
            "job_url": "https://example.com/jobs/1",
            "title": "QA Engineer",
            "emails": "recruiter@example.com",
            "company_logo": "https://cdn.example.com/logo.png"
        }));

        let outcome = JobCleaner::new().clean(&[raw]);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.dropped, 0);

        // Unknown fields are gone; known absent fields are None.
        let record = &outcome.records[0];
        assert_eq!(record.title.as_deref(), Some("QA Engineer"));
        assert_eq!(record.company, None);
        assert_eq!(record.skills, None);
    }

    #[test]
    fn no_field_holds_a_sentinel() {
        let raw = raw_with(json!({
            "job_url": "https://example.com/jobs/1",
            "title": "NaN",
            "company": "  ",
            "location": null,
            "job_type": "none",
            "currency": "N/A",
            "min_amount": "nan",
            "description": "\u{0000}Real text\u{0007}"
        }));

        let record = JobCleaner::new().clean(&[raw]).records.remove(0);
        assert_eq!(record.title, None);
        assert_eq!(record.company, None);
        assert_eq!(record.location, None);
        assert_eq!(record.job_type, None);
        assert_eq!(record.currency, None);
        assert_eq!(record.min_amount, None);
        // Control characters stripped, content preserved.
        assert_eq!(record.description.as_deref(), Some("Real text"));
    }

    #[test]
    fn coerces_numeric_fields() {
        let raw = raw_with(json!({
            "job_url": "https://example.com/jobs/1",
            "min_amount": "12,500.50",
            "max_amount": 90000
        }));

        let record = JobCleaner::new().clean(&[raw]).records.remove(0);
        assert_eq!(record.min_amount, Some(12500.50));
        assert_eq!(record.max_amount, Some(90000.0));
    }

    #[test]
    fn coerces_remote_flag() {
        for (input, expected) in [
            (json!(true), Some(true)),
            (json!("yes"), Some(true)),
            (json!(0), Some(false)),
            (json!("maybe"), None),
            (json!(null), None),
        ] {
            let raw = raw_with(json!({
                "job_url": "https://example.com/jobs/1",
                "is_remote": input
            }));
            let record = JobCleaner::new().clean(&[raw]).records.remove(0);
            assert_eq!(record.is_remote, expected);
        }
    }

    #[test]
    fn flattens_skill_arrays() {
        let raw = raw_with(json!({
            "job_url": "https://example.com/jobs/1",
            "skills": ["rust", "sql", null, "  "]
        }));

        let record = JobCleaner::new().clean(&[raw]).records.remove(0);
        assert_eq!(record.skills.as_deref(), Some("rust, sql"));
    }

    #[test]
    fn fills_site_from_source_platform() {
        let raw = raw_with(json!({"job_url": "https://example.com/jobs/1"}));
        let record = JobCleaner::new().clean(&[raw]).records.remove(0);
        assert_eq!(record.site.as_deref(), Some("indeed"));
    }

    #[test]
    fn canonicalizes_site_values() {
        // Unrecognisable payload value falls back to the queried platform.
        let raw = raw_with(json!({
            "job_url": "https://example.com/jobs/1",
            "site": "Indeed.com"
        }));
        let record = JobCleaner::new().clean(&[raw]).records.remove(0);
        assert_eq!(record.site.as_deref(), Some("indeed"));

        // Recognisable spellings normalize to the canonical name.
        let raw = raw_with(json!({
            "job_url": "https://example.com/jobs/2",
            "site": "ZipRecruiter"
        }));
        let record = JobCleaner::new().clean(&[raw]).records.remove(0);
        assert_eq!(record.site.as_deref(), Some("zip_recruiter"));
    }

    #[test]
    fn drops_records_without_identifier_and_counts_them() {
        let keeper = make_raw_record(Platform::Indeed, "https://example.com/jobs/1", "QA");
        let no_identity = raw_with(json!({"title": "Ghost job", "job_url": "", "id": null}));

        let outcome = JobCleaner::new().clean(&[keeper, no_identity]);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.dropped, 1);
    }

    #[test]
    fn keeps_record_with_id_but_no_url() {
        let raw = raw_with(json!({"id": "in-9f2a", "title": "QA Engineer"}));
        let outcome = JobCleaner::new().clean(&[raw]);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].id.as_deref(), Some("in-9f2a"));
    }

    #[test]
    fn preserves_non_ascii_text() {
        let raw = raw_with(json!({
            "job_url": "https://example.com/jobs/1",
            "location": "São Paulo, Brasil",
            "title": "Engenheiro de Testes — Júnior"
        }));

        let record = JobCleaner::new().clean(&[raw]).records.remove(0);
        assert_eq!(record.location.as_deref(), Some("São Paulo, Brasil"));
        assert_eq!(record.title.as_deref(), Some("Engenheiro de Testes — Júnior"));
    }

    #[test]
    fn cleaning_is_idempotent() {
        let raw = raw_with(json!({
            "job_url": "https://example.com/jobs/1",
            "title": "  QA Engineer  ",
            "company": "nan",
            "min_amount": "5000",
            "is_remote": "true",
            "skills": ["rust", "tokio"]
        }));

        let cleaner = JobCleaner::new();
        let first = cleaner.clean(std::slice::from_ref(&raw)).records.remove(0);

        // Re-project the cleaned record as if it were a fresh raw batch.
        let reprojected = serde_json::to_value(&first).unwrap();
        let again = raw_with(reprojected);
        let second = cleaner.clean(&[again]).records.remove(0);

        assert_eq!(first, second);
    }

    #[test]
    fn empty_batch_cleans_to_empty() {
        let outcome = JobCleaner::new().clean(&[]);
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.dropped, 0);
    }
}
