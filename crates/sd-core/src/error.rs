//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

use crate::Point;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    /// A direction was required from two identical points.
    #[error("degenerate line at {0}: start and end coincide")]
    DegenerateLine(Point),
}

pub type CoreResult<T> = Result<T, CoreError>;
