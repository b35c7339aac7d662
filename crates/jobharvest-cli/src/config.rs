//! JSON configuration: defaults, single-location backward compatibility,
//! and fail-fast validation.
//!
//! Every field carries a serde default, so a partial config file overrides
//! only what it mentions. Validation happens once at load time; the core
//! pipeline receives an already-checked [`CollectRequest`].

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use jobharvest_core::collector::{CollectRequest, SearchLocation};
use jobharvest_core::models::SearchFilters;
use jobharvest_core::platform::Platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub scraping: ScrapingConfig,
    #[serde(default)]
    pub filters: FiltersConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    #[serde(default = "default_terms")]
    pub terms: Vec<String>,
    #[serde(default)]
    pub locations: Vec<LocationConfig>,
    /// Single-location shorthand, kept for older config files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default = "default_platforms")]
    pub platforms: Vec<String>,
    #[serde(default = "default_results_per_term")]
    pub results_per_term: usize,
    #[serde(default = "default_days_old")]
    pub days_old: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub location: String,
    pub country: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_output_directory")]
    pub directory: String,
    #[serde(default = "default_output_filename")]
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScrapingConfig {
    #[serde(default = "default_delay")]
    pub delay_between_searches: u64,
    #[serde(default = "default_verbose")]
    pub verbose: u8,
    #[serde(default)]
    pub proxies: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FiltersConfig {
    #[serde(default)]
    pub job_type: Option<String>,
    #[serde(default)]
    pub is_remote: Option<bool>,
}

fn default_terms() -> Vec<String> {
    vec!["QA Engineer".into()]
}

fn default_platforms() -> Vec<String> {
    vec!["indeed".into()]
}

fn default_results_per_term() -> usize {
    10
}

fn default_days_old() -> u32 {
    7
}

fn default_output_directory() -> String {
    "results".into()
}

fn default_output_filename() -> String {
    "jobs_dataset".into()
}

fn default_delay() -> u64 {
    10
}

fn default_verbose() -> u8 {
    1
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            terms: default_terms(),
            locations: vec![],
            location: None,
            country: None,
            platforms: default_platforms(),
            results_per_term: default_results_per_term(),
            days_old: default_days_old(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            filename: default_output_filename(),
        }
    }
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        Self {
            delay_between_searches: default_delay(),
            verbose: default_verbose(),
            proxies: vec![],
        }
    }
}

impl Config {
    /// Load from a JSON file, falling back to defaults when the file does
    /// not exist. Invalid JSON or invalid values are an error, never a
    /// silently partial configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            serde_json::from_str::<Config>(&raw)
                .with_context(|| format!("invalid JSON in config file {}", path.display()))?
        } else {
            eprintln!(
                "Config file not found: {}; using default configuration",
                path.display()
            );
            Config::default()
        };

        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Convert the single-location shorthand into the list form.
    fn normalize(&mut self) {
        if self.search.locations.is_empty() {
            if let Some(location) = self.search.location.take() {
                let country = self.search.country.take().unwrap_or_else(|| location.clone());
                self.search.locations.push(LocationConfig { location, country });
            } else {
                self.search.locations.push(LocationConfig {
                    location: "Brazil".into(),
                    country: "Brazil".into(),
                });
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.search.terms.is_empty() {
            bail!("search.terms must be a non-empty list");
        }
        if self.search.locations.is_empty() {
            bail!("search.locations must be a non-empty list");
        }
        if self.search.platforms.is_empty() {
            bail!("search.platforms must be a non-empty list");
        }
        for name in &self.search.platforms {
            name.parse::<Platform>().map_err(|e| {
                anyhow::anyhow!(
                    "{e}; valid platforms: {}",
                    Platform::ALL.map(|p| p.as_str()).join(", ")
                )
            })?;
        }
        if self.scraping.verbose > 2 {
            bail!(
                "scraping.verbose must be 0 (silent), 1 (basic), or 2 (detailed), got {}",
                self.scraping.verbose
            );
        }
        Ok(())
    }

    /// Build the pipeline request. Only valid after [`Config::load`].
    pub fn to_collect_request(&self) -> CollectRequest {
        CollectRequest {
            search_terms: self.search.terms.clone(),
            locations: self
                .search
                .locations
                .iter()
                .map(|l| SearchLocation {
                    location: l.location.clone(),
                    country: l.country.clone(),
                })
                .collect(),
            platforms: self
                .search
                .platforms
                .iter()
                .map(|name| name.parse().expect("validated at load time"))
                .collect(),
            results_per_term: self.search.results_per_term,
            days_old: self.search.days_old,
            filters: SearchFilters {
                job_type: self.filters.job_type.clone(),
                is_remote: self.filters.is_remote,
            },
            delay: Duration::from_secs(self.scraping.delay_between_searches),
            output_filename: self.output.filename.clone(),
        }
    }

    /// Tracing filter directive for the configured verbose level.
    pub fn log_directive(&self) -> &'static str {
        match self.scraping.verbose {
            0 => "off",
            1 => "jobharvest_core=info,jobharvest_client=info",
            _ => "jobharvest_core=debug,jobharvest_client=debug",
        }
    }
}

/// Example configuration written by `jobharvest init`.
pub fn example_config() -> String {
    let example = serde_json::json!({
        "search": {
            "terms": [
                "QA Engineer",
                "Test Automation Engineer"
            ],
            "locations": [
                {"location": "São Paulo", "country": "Brazil"}
            ],
            "platforms": ["indeed", "glassdoor"],
            "results_per_term": 50,
            "days_old": 7
        },
        "output": {
            "directory": "results",
            "filename": "jobs_dataset"
        },
        "scraping": {
            "delay_between_searches": 10,
            "verbose": 1,
            "proxies": []
        },
        "filters": {
            "job_type": null,
            "is_remote": null
        }
    });
    serde_json::to_string_pretty(&example).expect("static example serialises")
}
