//! Error types for the fallible edges of the crate
//!
//! The simulation itself never fails: degenerate input is recovered locally.
//! Only decoding tuning files and save records can go wrong.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported save schema {found} (newest known is {supported})")]
    UnsupportedSchema { found: u32, supported: u32 },
}

pub type Result<T> = std::result::Result<T, Error>;
