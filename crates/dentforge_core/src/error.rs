//! Tooth generation error types
//!
//! Every failure is surfaced to the caller of the factory. Nothing is retried
//! and no default tooth is ever substituted.

use std::fmt;

/// Error type for tooth generation
#[derive(Debug, Clone, PartialEq)]
pub enum ToothError {
    /// Category name outside the fixed set (incisor, canine, premolar, molar)
    InvalidCategory(String),
    /// Condition name outside the fixed set
    InvalidCondition(String),
    /// Generated geometry broke an internal invariant (a defect, not a
    /// recoverable condition)
    GeometryAssembly(String),
}

impl fmt::Display for ToothError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToothError::InvalidCategory(name) => write!(f, "Invalid tooth category: {:?}", name),
            ToothError::InvalidCondition(name) => write!(f, "Invalid tooth condition: {:?}", name),
            ToothError::GeometryAssembly(msg) => write!(f, "Geometry assembly failure: {}", msg),
        }
    }
}

impl std::error::Error for ToothError {}
