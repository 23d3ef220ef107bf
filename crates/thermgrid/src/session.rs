//! Analysis session: owns the grid, detection outcome, region registry,
//! and correlation report, and enforces the order operations may run in.
//!
//! The lifecycle is empty -> loaded -> detected -> reported. Loading a new
//! grid invalidates detection and correlation but keeps the region
//! registry; re-detecting invalidates the correlation report. Operations
//! attempted out of order fail with `InvalidState` rather than panicking.

use std::fmt;
use std::path::Path;

use crate::contour::Contour;
use crate::correlate::CorrelationReport;
use crate::detect::Detection;
use crate::error::AnalysisError;
use crate::extract::LoadOptions;
use crate::grid::ThermalGrid;
use crate::mask::AnomalyMask;
use crate::roi::{RoiCapture, RoiRegistry};
use crate::AnalysisReport;

/// Lifecycle stage of an [`AnalysisSession`], derived from which artifacts
/// it currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No grid loaded yet.
    Empty,
    /// A grid is loaded; nothing has been detected on it.
    Loaded,
    /// A detection exists for the loaded grid.
    Detected,
    /// A correlation report exists for the current detection.
    Reported,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionState::Empty => "empty",
            SessionState::Loaded => "loaded",
            SessionState::Detected => "detected",
            SessionState::Reported => "reported",
        };
        f.write_str(label)
    }
}

/// Stateful front door for the analysis pipeline.
///
/// The session never exposes stale artifacts: every mutation clears the
/// downstream products it invalidates, so an accessor returning `Some`
/// always refers to the current grid and threshold.
#[derive(Debug, Clone, Default)]
pub struct AnalysisSession {
    grid: Option<ThermalGrid>,
    source: Option<String>,
    detection: Option<Detection>,
    report: Option<CorrelationReport>,
    rois: RoiRegistry,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle stage.
    pub fn state(&self) -> SessionState {
        if self.report.is_some() {
            SessionState::Reported
        } else if self.detection.is_some() {
            SessionState::Detected
        } else if self.grid.is_some() {
            SessionState::Loaded
        } else {
            SessionState::Empty
        }
    }

    /// Install a grid, replacing any previous one.
    ///
    /// Detection and correlation results are dropped since they no longer
    /// describe the installed grid. Region definitions are kept; a region
    /// that no longer fits the new grid surfaces as a per-region failure
    /// at the next correlation.
    pub fn load_grid(&mut self, grid: ThermalGrid) {
        tracing::info!("loaded {}x{} grid", grid.width(), grid.height());
        self.grid = Some(grid);
        self.source = None;
        self.detection = None;
        self.report = None;
    }

    /// Load a grid from a CSV table or a 16-bit grayscale image file.
    pub fn load_from_path(
        &mut self,
        path: &Path,
        options: &LoadOptions,
    ) -> Result<(), AnalysisError> {
        let grid = crate::extract::load_grid(path, options)?;
        self.load_grid(grid);
        self.source = Some(path.display().to_string());
        Ok(())
    }

    /// Run threshold detection on the loaded grid.
    ///
    /// Replaces any previous detection and drops the correlation report.
    pub fn detect(&mut self, threshold: f32) -> Result<&Detection, AnalysisError> {
        let Some(grid) = self.grid.as_ref() else {
            return Err(AnalysisError::InvalidState {
                operation: "detect",
                state: self.state(),
            });
        };
        if let Some(previous) = self.detection.as_ref() {
            if previous.threshold != threshold {
                tracing::info!(
                    "re-detecting at threshold {} (was {})",
                    threshold,
                    previous.threshold
                );
            }
        }
        let detection = crate::detect::detect(grid, threshold)?;
        tracing::info!(
            "threshold {} flagged {} cells in {} regions",
            threshold,
            detection.mask.count_set(),
            detection.contours.len()
        );
        self.report = None;
        Ok(self.detection.insert(detection))
    }

    /// Define or redefine a named region against the loaded grid's bounds.
    pub fn define_roi(
        &mut self,
        name: &str,
        top_left: [u32; 2],
        width: u32,
        height: u32,
    ) -> Result<(), AnalysisError> {
        let Some(grid) = self.grid.as_ref() else {
            return Err(AnalysisError::InvalidState {
                operation: "define a region",
                state: self.state(),
            });
        };
        let bounds = grid.dimensions();
        self.rois.define(name, top_left, width, height, bounds)
    }

    /// Start a two-click region capture.
    ///
    /// The returned handle is a plain value owned by the caller; dropping
    /// it abandons the capture without touching the session.
    pub fn begin_roi_capture(&self) -> Result<RoiCapture, AnalysisError> {
        if self.grid.is_none() {
            return Err(AnalysisError::InvalidState {
                operation: "capture a region",
                state: self.state(),
            });
        }
        Ok(RoiCapture::new())
    }

    /// Turn a completed capture into a named region definition.
    pub fn finalize_roi(
        &mut self,
        capture: &RoiCapture,
        name: &str,
    ) -> Result<(), AnalysisError> {
        let Some((top_left, width, height)) = capture.rect() else {
            return Err(AnalysisError::InvalidRegion {
                reason: "capture is incomplete; two points are required".to_string(),
            });
        };
        self.define_roi(name, top_left, width, height)
    }

    /// Correlate every defined region against the current detection mask.
    ///
    /// Valid with an empty registry, which yields an empty report. Replaces
    /// any previous report.
    pub fn correlate(&mut self) -> Result<&CorrelationReport, AnalysisError> {
        let Some(detection) = self.detection.as_ref() else {
            return Err(AnalysisError::InvalidState {
                operation: "correlate",
                state: self.state(),
            });
        };
        let report = crate::correlate::correlate(&detection.mask, self.rois.all());
        tracing::info!(
            "correlation report: {}/{} regions anomalous, {} failed",
            report.results.iter().filter(|r| r.has_anomaly).count(),
            self.rois.len(),
            report.failures.len()
        );
        Ok(self.report.insert(report))
    }

    /// Build the serializable summary of everything the session holds.
    ///
    /// Requires at least a detection; the correlation section is included
    /// when a report exists.
    pub fn summary(&self) -> Result<AnalysisReport, AnalysisError> {
        let (Some(grid), Some(detection)) = (self.grid.as_ref(), self.detection.as_ref()) else {
            return Err(AnalysisError::InvalidState {
                operation: "summarize",
                state: self.state(),
            });
        };
        Ok(AnalysisReport::build(
            grid,
            detection,
            self.source.as_deref(),
            self.rois.all(),
            self.report.as_ref(),
        ))
    }

    // ── accessors ────────────────────────────────────────────────────────

    pub fn grid(&self) -> Option<&ThermalGrid> {
        self.grid.as_ref()
    }

    /// Path the grid was loaded from, if it came from a file.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn detection(&self) -> Option<&Detection> {
        self.detection.as_ref()
    }

    pub fn mask(&self) -> Option<&AnomalyMask> {
        self.detection.as_ref().map(|d| &d.mask)
    }

    pub fn contours(&self) -> Option<&[Contour]> {
        self.detection.as_ref().map(|d| d.contours.as_slice())
    }

    pub fn threshold(&self) -> Option<f32> {
        self.detection.as_ref().map(|d| d.threshold)
    }

    pub fn report(&self) -> Option<&CorrelationReport> {
        self.report.as_ref()
    }

    pub fn rois(&self) -> &RoiRegistry {
        &self.rois
    }
}
