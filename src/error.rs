// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Engine error types
//!
//! Every fallible engine operation returns one of these variants per call.
//! There is no global error state and no internal retry; recovery policy
//! (re-prompting for input, falling back to a fresh profile) belongs to the
//! caller.

use thiserror::Error;

/// Errors surfaced by the metric-and-plan engine
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed time or pace string. Always recoverable by re-prompting.
    #[error("Failed to parse '{input}': {reason}")]
    Parse { input: String, reason: String },

    /// An operation needs more test results than the profile holds.
    /// The caller must prompt for more test data; the engine never guesses.
    #[error("Insufficient test data (need {required}, got {actual})")]
    InsufficientData { required: usize, actual: usize },

    /// Target event date is in the past or too close to build a viable plan.
    #[error("Invalid target event: {0}")]
    InvalidTarget(String),

    /// No migration path exists from the stored schema version.
    /// Fatal for that record; the caller should treat the profile as new.
    #[error("Unsupported schema version {from} (current is {current})")]
    UnsupportedVersion { from: u32, current: u32 },

    /// Malformed coefficient/phase/workout table. Indicates a packaged-data
    /// defect rather than a user-recoverable condition.
    #[error("Invalid configuration table: {0}")]
    InvalidTable(String),
}

impl EngineError {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        Self::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the engine
pub type Result<T> = std::result::Result<T, EngineError>;
