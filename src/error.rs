//! Error types for errshape
//!
//! Projection itself never fails — malformed input is normalized into a
//! canonical unknown-error shape instead of being rejected. The only fallible
//! operations are `FieldMap` and `ExcludePolicy` construction, which reject
//! configuration naming fields the projector does not recognize.

use thiserror::Error;

/// Errors raised while building projection configuration
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// A source path named a field identifier outside the recognized set
    #[error("unrecognized field identifier '{0}'")]
    UnknownField(String),

    /// A dotted source path was malformed (non-relation head, extra hops)
    #[error("invalid source path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

/// Result type alias for configuration construction
pub type Result<T> = std::result::Result<T, ProjectionError>;
