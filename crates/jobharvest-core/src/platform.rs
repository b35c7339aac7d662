use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A job-listing platform queried through the search provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Indeed,
    Glassdoor,
    Linkedin,
    ZipRecruiter,
}

/// Per-platform quirks consumed by the generic adapter and the collector.
///
/// One flag set per platform instead of one adapter type per platform:
/// the behavioural differences are small and data-driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// The platform rejects city-level queries; the adapter must substitute
    /// the country for the configured location.
    pub requires_country_location: bool,
    /// The platform reliably returns job descriptions. Records from
    /// platforms without this flag that arrive with an empty description
    /// are excluded from the dataset as a business rule.
    pub supports_descriptions: bool,
}

impl Platform {
    pub const ALL: [Platform; 4] = [
        Platform::Indeed,
        Platform::Glassdoor,
        Platform::Linkedin,
        Platform::ZipRecruiter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Indeed => "indeed",
            Platform::Glassdoor => "glassdoor",
            Platform::Linkedin => "linkedin",
            Platform::ZipRecruiter => "zip_recruiter",
        }
    }

    /// Platform quirk flags.
    ///
    /// Glassdoor historically rejects city-level locations and frequently
    /// omits descriptions from search results.
    pub fn capabilities(&self) -> Capabilities {
        match self {
            Platform::Glassdoor => Capabilities {
                requires_country_location: true,
                supports_descriptions: false,
            },
            Platform::Indeed | Platform::Linkedin | Platform::ZipRecruiter => Capabilities {
                requires_country_location: false,
                supports_descriptions: true,
            },
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "indeed" => Ok(Platform::Indeed),
            "glassdoor" => Ok(Platform::Glassdoor),
            "linkedin" => Ok(Platform::Linkedin),
            "zip_recruiter" | "ziprecruiter" => Ok(Platform::ZipRecruiter),
            _ => Err(format!("Unknown platform: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_strings() {
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>(), Ok(platform));
        }
        assert_eq!("ZipRecruiter".parse::<Platform>(), Ok(Platform::ZipRecruiter));
        assert!("monster".parse::<Platform>().is_err());
    }

    #[test]
    fn glassdoor_quirks() {
        let caps = Platform::Glassdoor.capabilities();
        assert!(caps.requires_country_location);
        assert!(!caps.supports_descriptions);
    }

    #[test]
    fn indeed_has_no_quirks() {
        let caps = Platform::Indeed.capabilities();
        assert!(!caps.requires_country_location);
        assert!(caps.supports_descriptions);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Platform::ZipRecruiter).unwrap();
        assert_eq!(json, "\"zip_recruiter\"");
    }
}
