//! Dataset export to CSV and JSON.
//!
//! Both files are written from the same in-memory dataset with one shared
//! timestamp, so their logical content is identical: same records, same
//! order, same field values modulo the empty-string/null representation
//! difference between the two formats.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::models::JobDataset;

/// Paths of the files produced by one export call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub csv_path: PathBuf,
    pub json_path: PathBuf,
}

/// Writes a [`JobDataset`] to `{base}_{timestamp}.csv` and `.json`.
#[derive(Debug, Clone)]
pub struct JobExporter {
    output_dir: PathBuf,
}

impl JobExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Export the dataset. Creates the output directory if absent
    /// (idempotent). Fatal on any write failure; the caller still owns the
    /// dataset and may retry.
    pub fn export(
        &self,
        dataset: &JobDataset,
        base_filename: &str,
    ) -> Result<ExportPaths, AppError> {
        fs::create_dir_all(&self.output_dir).map_err(|e| {
            AppError::Export(format!(
                "cannot create output directory {}: {e}",
                self.output_dir.display()
            ))
        })?;

        // One timestamp per export call, shared by both files.
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let csv_path = self.output_dir.join(format!("{base_filename}_{timestamp}.csv"));
        let json_path = self
            .output_dir
            .join(format!("{base_filename}_{timestamp}.json"));

        self.write_csv(dataset, &csv_path)?;
        self.write_json(dataset, &json_path)?;

        tracing::info!(
            records = dataset.len(),
            csv = %csv_path.display(),
            json = %json_path.display(),
            "Dataset exported"
        );

        Ok(ExportPaths { csv_path, json_path })
    }

    /// UTF-8 CSV, every field quoted, empty string for absent values.
    fn write_csv(&self, dataset: &JobDataset, path: &Path) -> Result<(), AppError> {
        let mut writer = csv::WriterBuilder::new()
            .quote_style(csv::QuoteStyle::Always)
            .from_path(path)
            .map_err(|e| AppError::Export(format!("cannot write {}: {e}", path.display())))?;

        for record in dataset.records() {
            writer.serialize(record)?;
        }
        writer
            .flush()
            .map_err(|e| AppError::Export(format!("cannot flush {}: {e}", path.display())))?;
        Ok(())
    }

    /// Pretty-printed UTF-8 JSON, null for absent values. serde_json leaves
    /// non-ASCII characters and forward slashes unescaped.
    fn write_json(&self, dataset: &JobDataset, path: &Path) -> Result<(), AppError> {
        let body = serde_json::to_string_pretty(dataset.records())?;
        fs::write(path, body)
            .map_err(|e| AppError::Export(format!("cannot write {}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::make_clean_record;

    fn dataset_of(records: Vec<crate::models::CleanJobRecord>) -> JobDataset {
        let mut dataset = JobDataset::new();
        for record in records {
            dataset.insert(record);
        }
        dataset
    }

    #[test]
    fn writes_both_files_with_shared_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = JobExporter::new(dir.path());
        let dataset = dataset_of(vec![make_clean_record("https://example.com/jobs/1", "QA")]);

        let paths = exporter.export(&dataset, "jobs_dataset").unwrap();

        assert!(paths.csv_path.exists());
        assert!(paths.json_path.exists());

        let csv_stem = paths.csv_path.file_stem().unwrap().to_str().unwrap();
        let json_stem = paths.json_path.file_stem().unwrap().to_str().unwrap();
        assert_eq!(csv_stem, json_stem);

        // jobs_dataset_YYYYMMDD_HHMMSS
        let suffix = csv_stem.strip_prefix("jobs_dataset_").unwrap();
        assert_eq!(suffix.len(), 15);
        assert!(suffix.chars().filter(|c| *c == '_').count() == 1);
    }

    #[test]
    fn creates_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("results").join("deep");
        let exporter = JobExporter::new(&nested);
        let dataset = dataset_of(vec![make_clean_record("https://example.com/jobs/1", "QA")]);

        exporter.export(&dataset, "jobs").unwrap();
        assert!(nested.is_dir());

        // Idempotent on an existing directory.
        exporter.export(&dataset, "jobs").unwrap();
    }

    #[test]
    fn unwritable_output_directory_is_an_export_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("results");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let exporter = JobExporter::new(&blocker);
        let dataset = dataset_of(vec![make_clean_record("https://example.com/jobs/1", "QA")]);

        let err = exporter.export(&dataset, "jobs").unwrap_err();
        assert!(matches!(err, AppError::Export(_)));
    }

    #[test]
    fn csv_quotes_every_field_and_uses_empty_for_absent() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = JobExporter::new(dir.path());
        let mut record = make_clean_record("https://example.com/jobs/1", "QA Engineer");
        record.company = None;
        record.min_amount = None;

        let paths = exporter.export(&dataset_of(vec![record]), "jobs").unwrap();
        let content = std::fs::read_to_string(&paths.csv_path).unwrap();
        let mut lines = content.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("\"id\",\"site\",\"job_url\""));

        let row = lines.next().unwrap();
        assert!(row.contains("\"https://example.com/jobs/1\""));
        assert!(row.contains("\"QA Engineer\""));
        // Absent values are quoted empty strings, never a sentinel.
        assert!(row.contains("\"\""));
        assert!(!row.to_lowercase().contains("nan"));
    }

    #[test]
    fn json_uses_null_and_preserves_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = JobExporter::new(dir.path());
        let mut record = make_clean_record("https://example.com/jobs/1", "QA");
        record.location = Some("São Paulo".into());
        record.company = None;

        let paths = exporter.export(&dataset_of(vec![record]), "jobs").unwrap();
        let content = std::fs::read_to_string(&paths.json_path).unwrap();

        assert!(content.contains("\"company\": null"));
        assert!(content.contains("São Paulo"));
        assert!(!content.contains("\\u"));
        // Forward slashes stay unescaped.
        assert!(content.contains("https://example.com/jobs/1"));
    }

    #[test]
    fn csv_and_json_carry_identical_logical_content() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = JobExporter::new(dir.path());
        let mut record = make_clean_record("https://example.com/jobs/1", "QA Engineer");
        record.min_amount = Some(5000.0);
        record.is_remote = Some(true);
        record.company = None;

        let paths = exporter.export(&dataset_of(vec![record]), "jobs").unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&paths.json_path).unwrap()).unwrap();
        let json_record = &json.as_array().unwrap()[0];

        let mut reader = csv::Reader::from_path(&paths.csv_path).unwrap();
        let headers = reader.headers().unwrap().clone();
        let row = reader.records().next().unwrap().unwrap();

        for (field, csv_value) in headers.iter().zip(row.iter()) {
            let json_value = &json_record[field];
            match json_value {
                serde_json::Value::Null => assert_eq!(csv_value, "", "field {field}"),
                serde_json::Value::String(s) => assert_eq!(csv_value, s, "field {field}"),
                other => assert_eq!(csv_value, other.to_string(), "field {field}"),
            }
        }
    }
}
