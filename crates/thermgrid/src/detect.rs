//! Threshold-based anomaly detection.

use crate::contour::{trace_contours, Contour};
use crate::error::AnalysisError;
use crate::grid::ThermalGrid;
use crate::mask::AnomalyMask;

/// One detection pass: the mask, its contours, and the threshold that
/// produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub mask: AnomalyMask,
    /// External boundaries of anomalous regions, in discovery order.
    pub contours: Vec<Contour>,
    /// Threshold the mask was computed against.
    pub threshold: f32,
}

/// Flag every cell strictly above `threshold` and trace region boundaries.
///
/// Pure function of its inputs: a threshold change recomputes mask and
/// contours from scratch, never incrementally. Cells equal to the threshold
/// are not anomalous; no-data (NaN) cells are never anomalous.
pub fn detect(grid: &ThermalGrid, threshold: f32) -> Result<Detection, AnalysisError> {
    if !threshold.is_finite() {
        return Err(AnalysisError::InvalidInput {
            reason: format!("threshold must be finite, got {threshold}"),
        });
    }
    let (width, height) = grid.dimensions();
    let cells: Vec<bool> = grid.as_slice().iter().map(|&v| v > threshold).collect();
    let mask = AnomalyMask::from_raw(width, height, cells)?;
    let contours = trace_contours(&mask);
    tracing::debug!(
        "threshold {} flagged {} cells in {} regions",
        threshold,
        mask.count_set(),
        contours.len()
    );
    Ok(Detection {
        mask,
        contours,
        threshold,
    })
}
