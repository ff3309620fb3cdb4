//! Error type shared across the engine.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// The target table has no entry for the composite key. Indicates a
    /// data/config mismatch upstream; never recovered here.
    #[error("no target for plan '{plan}', disturbance '{disturbance}', zone '{zone}', option '{option}'")]
    MissingTarget {
        plan: String,
        disturbance: String,
        zone: String,
        option: String,
    },

    /// A resource-plan name with no short-name mapping.
    #[error("unknown resource plan '{0}'")]
    UnknownResourcePlan(String),

    /// The target table header lacks a required column.
    #[error("target table is missing required column '{0}'")]
    MissingTargetColumn(&'static str),

    /// A target row that cannot be parsed. Line numbers are 1-based and
    /// include the header line.
    #[error("target table line {line}: {reason}")]
    MalformedTargetRow { line: usize, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
