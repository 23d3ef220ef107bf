//! Correlation of detection masks with named regions of interest.
//!
//! Each region selects the half-open window `[top_left, bottom_right)` of
//! the mask, re-traces contours inside that window, and reports them in
//! full-grid coordinates. The mask is read-only throughout; repeated
//! correlation of the same inputs yields the same report.

use serde::{Deserialize, Serialize};

use crate::contour::{trace_contours, Contour};
use crate::error::AnalysisError;
use crate::mask::AnomalyMask;
use crate::roi::RegionOfInterest;

/// Per-region correlation outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationResult {
    /// Name of the region this result belongs to.
    pub roi_name: String,
    /// True if any cell inside the region is anomalous.
    pub has_anomaly: bool,
    /// Boundaries of the anomalous areas inside the region, in full-grid
    /// coordinates. Empty when `has_anomaly` is false.
    pub contours: Vec<Contour>,
}

/// A region that could not be correlated, with the error that stopped it.
#[derive(Debug, Clone, PartialEq)]
pub struct RoiFailure {
    pub roi_name: String,
    pub error: AnalysisError,
}

/// Outcome of correlating a batch of regions against one mask.
///
/// A failing region never aborts the batch; it lands in `failures` and the
/// remaining regions are still processed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CorrelationReport {
    pub results: Vec<CorrelationResult>,
    pub failures: Vec<RoiFailure>,
}

impl CorrelationReport {
    /// True if any successfully correlated region contains an anomaly.
    pub fn any_anomalous(&self) -> bool {
        self.results.iter().any(|r| r.has_anomaly)
    }
}

/// Correlate a single region against the mask.
///
/// Fails with `OutOfBounds` if the region extends past the mask, which
/// happens when the region was defined against a larger grid than the one
/// the mask was detected on.
pub fn correlate_roi(
    mask: &AnomalyMask,
    roi: &RegionOfInterest,
) -> Result<CorrelationResult, AnalysisError> {
    let window = mask.crop(
        roi.top_left[0],
        roi.top_left[1],
        roi.width(),
        roi.height(),
    )?;
    let has_anomaly = window.any_set();
    let contours = if has_anomaly {
        trace_contours(&window)
            .into_iter()
            .map(|c| c.translated(roi.top_left[0], roi.top_left[1]))
            .collect()
    } else {
        Vec::new()
    };
    Ok(CorrelationResult {
        roi_name: roi.name.clone(),
        has_anomaly,
        contours,
    })
}

/// Correlate every region against the mask, collecting per-region outcomes.
pub fn correlate(mask: &AnomalyMask, rois: &[RegionOfInterest]) -> CorrelationReport {
    let mut report = CorrelationReport::default();
    for roi in rois {
        match correlate_roi(mask, roi) {
            Ok(result) => report.results.push(result),
            Err(error) => {
                tracing::warn!("correlation failed for region {:?}: {}", roi.name, error);
                report.failures.push(RoiFailure {
                    roi_name: roi.name.clone(),
                    error,
                });
            }
        }
    }
    tracing::debug!(
        "correlated {} regions: {} anomalous, {} failed",
        rois.len(),
        report.results.iter().filter(|r| r.has_anomaly).count(),
        report.failures.len()
    );
    report
}
