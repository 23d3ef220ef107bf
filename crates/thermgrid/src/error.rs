//! Error taxonomy for the analysis engine.
//!
//! All errors are local, synchronous, and non-retryable: they indicate a
//! programming or input-data defect, not a transient condition. Batch
//! correlation never aborts wholesale; per-region failures carry the region
//! name so callers know which rectangle failed and why.

use crate::session::SessionState;

/// Failure modes across the analysis pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// A grid, mask, or threshold cannot be used for detection.
    InvalidInput { reason: String },
    /// A region of interest has degenerate geometry, falls outside the grid,
    /// or its two-click capture is malformed.
    InvalidRegion { reason: String },
    /// No region of interest registered under the requested name.
    NotFound { name: String },
    /// A region rectangle exceeds the dimensions of the mask it is applied
    /// to (the grid was reloaded at a different resolution).
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        bounds: [u32; 2],
    },
    /// An operation was invoked out of session-state order.
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },
    /// A thermal source could not be read or decoded.
    Extraction { reason: String },
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { reason } => write!(f, "invalid input: {reason}"),
            Self::InvalidRegion { reason } => write!(f, "invalid region: {reason}"),
            Self::NotFound { name } => write!(f, "no region of interest named {name:?}"),
            Self::OutOfBounds {
                x,
                y,
                width,
                height,
                bounds,
            } => write!(
                f,
                "region {width}x{height} at ({x}, {y}) exceeds mask bounds {}x{}",
                bounds[0], bounds[1]
            ),
            Self::InvalidState { operation, state } => {
                write!(f, "cannot {operation} in {state} state")
            }
            Self::Extraction { reason } => write!(f, "extraction failed: {reason}"),
        }
    }
}

impl std::error::Error for AnalysisError {}
