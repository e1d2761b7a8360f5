// src/error.rs
use thiserror::Error;

/// Failures while normalizing a single raw source record. Fatal for that
/// record only; callers skip it and continue the batch.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
}
