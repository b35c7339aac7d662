pub mod adapter;
pub mod cleaner;
pub mod collector;
pub mod error;
pub mod export;
pub mod models;
pub mod platform;
pub mod testutil;
pub mod traits;

pub use collector::{CollectRequest, CollectSummary, Collector, SearchLocation};
pub use error::AppError;
pub use export::{ExportPaths, JobExporter};
pub use models::{CleanJobRecord, JobDataset, RawJobRecord, SearchFilters, SearchRequest};
pub use platform::Platform;
pub use traits::SearchProvider;
