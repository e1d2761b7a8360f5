// src/model.rs
use serde::{Deserialize, Serialize};

/// Canonical, source-agnostic job listing. Both the search-API adapter and
/// the spreadsheet adapter normalize into this shape; persistence and
/// filtering never see raw source records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// Globally unique identity from the source. Immutable once created;
    /// re-ingesting the same id is a whole-record no-op.
    pub job_id: String,
    pub title: String,
    pub company_name: String,
    pub location: String,
    pub description: String,
    /// Free-text recency string, e.g. "3 days ago".
    pub posted_at: String,
    /// Free-text salary, raw from the source or synthesized by the salary
    /// parser. May be empty or the literal "0".
    pub salary: String,
    /// Unknown is stored as false.
    pub remote: bool,
    /// Ordered; duplicates within one record are dropped at write time.
    pub links: Vec<String>,
    /// Ordered; duplicates permitted.
    pub qualifications: Vec<String>,
}
