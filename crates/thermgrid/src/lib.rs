//! thermgrid — thermal-grid anomaly detection with named region reporting.
//!
//! Built for inspection workflows over decoded radiometric data. The
//! pipeline stages are:
//!
//! 1. **Extract** – load temperature grids from CSV tables or 16-bit
//!    grayscale images with a linear value mapping.
//! 2. **Detect** – strict threshold comparison producing a boolean mask.
//! 3. **Contour** – external boundary tracing of 4-connected anomaly
//!    regions, clockwise in image coordinates.
//! 4. **Regions** – named rectangle registry plus the two-click capture
//!    protocol.
//! 5. **Correlate** – per-region anomaly verdicts with contours mapped back
//!    to full-grid coordinates.
//! 6. **Report** – serializable session summary, false-color renders, CSV
//!    export.
//!
//! # Public API
//! - [`AnalysisSession`] as the stateful entry point for the full lifecycle
//! - [`detect`], [`trace_contours`], [`correlate`] as pure building blocks
//! - result structures ([`Detection`], [`CorrelationReport`],
//!   [`AnalysisReport`]) that serialize to JSON

mod contour;
mod correlate;
mod detect;
mod error;
pub mod export;
mod extract;
mod grid;
mod mask;
mod render;
mod roi;
mod session;
#[cfg(test)]
mod test_utils;

pub use contour::{trace_contours, Contour};
pub use correlate::{correlate, correlate_roi, CorrelationReport, CorrelationResult, RoiFailure};
pub use detect::{detect, Detection};
pub use error::AnalysisError;
pub use extract::{load_csv_grid, load_grid, load_image_grid, LoadOptions};
pub use grid::ThermalGrid;
pub use mask::AnomalyMask;
pub use render::{hot, render_grid, render_overlay, Colormap, RenderConfig};
pub use roi::{CaptureState, RegionOfInterest, RoiCapture, RoiRegistry};
pub use session::{AnalysisSession, SessionState};

pub const REPORT_SCHEMA_V1: &str = "thermgrid.report.v1";

/// Correlation failure as it appears in the report, with the error
/// flattened to its display form.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RoiFailureEntry {
    /// Name of the region that failed to correlate.
    pub roi_name: String,
    /// Human-readable failure description.
    pub error: String,
}

/// Serializable summary of an analysis session.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisReport {
    pub schema_version: String,
    /// Path the grid was loaded from, if it came from a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Grid dimensions [width, height].
    pub grid_size: [u32; 2],
    /// Threshold the detection ran with.
    pub threshold: f32,
    /// Number of cells strictly above the threshold.
    pub anomalous_cells: usize,
    /// External boundaries of all anomalous regions, full-grid coordinates.
    pub contours: Vec<Contour>,
    /// Defined regions of interest in definition order.
    pub rois: Vec<RegionOfInterest>,
    /// Per-region correlation outcomes, if correlation was run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roi_results: Vec<CorrelationResult>,
    /// Regions that failed to correlate, if any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roi_failures: Vec<RoiFailureEntry>,
}

impl AnalysisReport {
    pub(crate) fn build(
        grid: &ThermalGrid,
        detection: &Detection,
        source: Option<&str>,
        rois: &[RegionOfInterest],
        correlation: Option<&CorrelationReport>,
    ) -> Self {
        let (roi_results, roi_failures) = match correlation {
            Some(report) => (
                report.results.clone(),
                report
                    .failures
                    .iter()
                    .map(|f| RoiFailureEntry {
                        roi_name: f.roi_name.clone(),
                        error: f.error.to_string(),
                    })
                    .collect(),
            ),
            None => (Vec::new(), Vec::new()),
        };
        Self {
            schema_version: REPORT_SCHEMA_V1.to_string(),
            source: source.map(str::to_string),
            grid_size: [grid.width(), grid.height()],
            threshold: detection.threshold,
            anomalous_cells: detection.mask.count_set(),
            contours: detection.contours.clone(),
            rois: rois.to_vec(),
            roi_results,
            roi_failures,
        }
    }
}
