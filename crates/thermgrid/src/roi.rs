//! Named rectangular regions of interest and the two-click capture state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// A named axis-aligned rectangle over the grid.
///
/// `bottom_right` is exclusive: the region covers columns
/// `[top_left.x, bottom_right.x)` and rows `[top_left.y, bottom_right.y)`.
/// Both extents are at least one cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionOfInterest {
    pub name: String,
    pub top_left: [u32; 2],
    pub bottom_right: [u32; 2],
}

impl RegionOfInterest {
    pub fn width(&self) -> u32 {
        self.bottom_right[0] - self.top_left[0]
    }

    pub fn height(&self) -> u32 {
        self.bottom_right[1] - self.top_left[1]
    }
}

/// Session-owned mapping from name to region, iterated in definition order.
///
/// Redefining an existing name silently overwrites the rectangle and keeps
/// the region's original position in iteration order. The registry is
/// always present and possibly empty; it survives grid reloads.
#[derive(Debug, Clone, Default)]
pub struct RoiRegistry {
    rois: Vec<RegionOfInterest>,
    index: HashMap<String, usize>,
}

impl RoiRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define or redefine a region.
    ///
    /// `bounds` is the (width, height) of the current grid; the rectangle
    /// must lie fully inside it. Extents are unsigned, so the degenerate
    /// case is exactly zero width or height.
    pub fn define(
        &mut self,
        name: &str,
        top_left: [u32; 2],
        width: u32,
        height: u32,
        bounds: (u32, u32),
    ) -> Result<(), AnalysisError> {
        if width == 0 || height == 0 {
            return Err(AnalysisError::InvalidRegion {
                reason: format!(
                    "region {name:?} must have positive extent, got {width}x{height}"
                ),
            });
        }
        let (bw, bh) = bounds;
        if top_left[0] as u64 + width as u64 > bw as u64
            || top_left[1] as u64 + height as u64 > bh as u64
        {
            return Err(AnalysisError::InvalidRegion {
                reason: format!(
                    "region {name:?} ({width}x{height} at ({}, {})) exceeds grid bounds {bw}x{bh}",
                    top_left[0], top_left[1]
                ),
            });
        }
        let roi = RegionOfInterest {
            name: name.to_string(),
            top_left,
            bottom_right: [top_left[0] + width, top_left[1] + height],
        };
        match self.index.get(name) {
            Some(&slot) => self.rois[slot] = roi,
            None => {
                self.index.insert(name.to_string(), self.rois.len());
                self.rois.push(roi);
            }
        }
        Ok(())
    }

    /// Look up a region by name.
    pub fn get(&self, name: &str) -> Result<&RegionOfInterest, AnalysisError> {
        self.index
            .get(name)
            .map(|&slot| &self.rois[slot])
            .ok_or_else(|| AnalysisError::NotFound {
                name: name.to_string(),
            })
    }

    /// All regions in definition order.
    pub fn all(&self) -> &[RegionOfInterest] {
        &self.rois
    }

    pub fn len(&self) -> usize {
        self.rois.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rois.is_empty()
    }
}

/// Progress of a two-click region capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    AwaitingFirst,
    AwaitingSecond,
    Complete,
}

/// Geometry of the interactive two-click protocol, decoupled from the UI
/// event stream that produces the points.
///
/// The first submitted point anchors the region's top-left corner in image
/// coordinates; the second must lie strictly right of and below the anchor
/// and fixes the extent. The handle is a plain owned value: an abandoned
/// capture is simply dropped. Bounds against the grid are checked when the
/// capture is finalized into the registry, not per click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoiCapture {
    progress: Progress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Progress {
    AwaitingFirst,
    AwaitingSecond {
        anchor: [u32; 2],
    },
    Complete {
        top_left: [u32; 2],
        width: u32,
        height: u32,
    },
}

impl RoiCapture {
    pub fn new() -> Self {
        Self {
            progress: Progress::AwaitingFirst,
        }
    }

    /// Feed the next clicked point.
    ///
    /// A second point that is not strictly right of and below the anchor is
    /// rejected and the capture keeps awaiting a corrected second point.
    /// Submitting to a complete capture is an error.
    pub fn submit_point(&mut self, point: [u32; 2]) -> Result<(), AnalysisError> {
        match self.progress {
            Progress::AwaitingFirst => {
                self.progress = Progress::AwaitingSecond { anchor: point };
                Ok(())
            }
            Progress::AwaitingSecond { anchor } => {
                if point[0] <= anchor[0] || point[1] <= anchor[1] {
                    return Err(AnalysisError::InvalidRegion {
                        reason: format!(
                            "second point ({}, {}) must lie strictly right of and below the anchor ({}, {})",
                            point[0], point[1], anchor[0], anchor[1]
                        ),
                    });
                }
                self.progress = Progress::Complete {
                    top_left: anchor,
                    width: point[0] - anchor[0],
                    height: point[1] - anchor[1],
                };
                Ok(())
            }
            Progress::Complete { .. } => Err(AnalysisError::InvalidRegion {
                reason: "capture already holds two points".to_string(),
            }),
        }
    }

    pub fn state(&self) -> CaptureState {
        match self.progress {
            Progress::AwaitingFirst => CaptureState::AwaitingFirst,
            Progress::AwaitingSecond { .. } => CaptureState::AwaitingSecond,
            Progress::Complete { .. } => CaptureState::Complete,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.progress, Progress::Complete { .. })
    }

    /// Captured rectangle once complete: (top_left, width, height).
    pub(crate) fn rect(&self) -> Option<([u32; 2], u32, u32)> {
        match self.progress {
            Progress::Complete {
                top_left,
                width,
                height,
            } => Some((top_left, width, height)),
            _ => None,
        }
    }
}

impl Default for RoiCapture {
    fn default() -> Self {
        Self::new()
    }
}
