pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod filters;
pub mod model;
pub mod normalize;
pub mod salary;
pub mod search_api;
pub mod spreadsheet;

pub use database::{IngestStats, JobStore};
pub use error::NormalizeError;
pub use model::JobRecord;
pub use normalize::{normalize_batch, ApiJob, RawJob, SheetRow};
