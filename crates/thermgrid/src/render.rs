//! False-color rendering of grids and annotated overlay images.
//!
//! Grids are normalized against their own min/max before mapping through a
//! colormap; no-data cells get a fixed color outside the ramp. Overlays
//! draw anomaly contours as closed polylines and region rectangles as
//! hollow boxes, switching to the alert color for regions the correlation
//! report flags as anomalous.

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};

use crate::contour::Contour;
use crate::correlate::CorrelationReport;
use crate::grid::ThermalGrid;
use crate::roi::RegionOfInterest;

/// Colormap applied to normalized temperatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    /// Black through red and yellow to white.
    #[default]
    Hot,
    /// Plain grayscale ramp.
    Gray,
}

/// Colors and colormap used by [`render_grid`] and [`render_overlay`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub colormap: Colormap,
    /// RGB for anomaly contour polylines.
    pub contour_color: [u8; 3],
    /// RGB for region rectangles without anomalies.
    pub roi_color: [u8; 3],
    /// RGB for region rectangles the report flags as anomalous.
    pub roi_alert_color: [u8; 3],
    /// RGB for no-data cells.
    pub no_data_color: [u8; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            colormap: Colormap::Hot,
            contour_color: [0, 255, 0],
            roi_color: [80, 160, 255],
            roi_alert_color: [255, 40, 40],
            no_data_color: [40, 40, 60],
        }
    }
}

/// Classic 'hot' ramp: `t` in `[0, 1]` ramps red, then green, then blue.
pub fn hot(t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let r = (t * 3.0).min(1.0);
    let g = (t * 3.0 - 1.0).clamp(0.0, 1.0);
    let b = (t * 3.0 - 2.0).clamp(0.0, 1.0);
    [
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    ]
}

/// Render the grid alone, one pixel per cell.
pub fn render_grid(grid: &ThermalGrid, config: &RenderConfig) -> RgbImage {
    let (width, height) = grid.dimensions();
    let lo = grid.min().unwrap_or(0.0);
    let hi = grid.max().unwrap_or(0.0);
    // Uniform grids map everything to the cold end of the ramp.
    let span = if hi > lo { hi - lo } else { 1.0 };

    let mut canvas = RgbImage::new(width, height);
    for (y, row) in grid.rows().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            let pixel = if value.is_nan() {
                Rgb(config.no_data_color)
            } else {
                let t = (value - lo) / span;
                match config.colormap {
                    Colormap::Hot => Rgb(hot(t)),
                    Colormap::Gray => {
                        let g = (t.clamp(0.0, 1.0) * 255.0).round() as u8;
                        Rgb([g, g, g])
                    }
                }
            };
            canvas.put_pixel(x as u32, y as u32, pixel);
        }
    }
    canvas
}

/// Render the grid with contours and region rectangles drawn on top.
///
/// Pass the correlation report to color anomalous regions with the alert
/// color; without it every region uses the neutral color.
pub fn render_overlay(
    grid: &ThermalGrid,
    contours: &[Contour],
    rois: &[RegionOfInterest],
    correlation: Option<&CorrelationReport>,
    config: &RenderConfig,
) -> RgbImage {
    let mut canvas = render_grid(grid, config);
    for contour in contours {
        draw_contour(&mut canvas, contour, Rgb(config.contour_color));
    }
    for roi in rois {
        let anomalous = correlation
            .map(|report| {
                report
                    .results
                    .iter()
                    .any(|r| r.roi_name == roi.name && r.has_anomaly)
            })
            .unwrap_or(false);
        let color = if anomalous {
            Rgb(config.roi_alert_color)
        } else {
            Rgb(config.roi_color)
        };
        let rect = Rect::at(roi.top_left[0] as i32, roi.top_left[1] as i32)
            .of_size(roi.width(), roi.height());
        draw_hollow_rect_mut(&mut canvas, rect, color);
    }
    canvas
}

fn draw_contour(canvas: &mut RgbImage, contour: &Contour, color: Rgb<u8>) {
    if contour.points.len() == 1 {
        let [x, y] = contour.points[0];
        if x < canvas.width() && y < canvas.height() {
            canvas.put_pixel(x, y, color);
        }
        return;
    }
    for i in 0..contour.points.len() {
        let p1 = contour.points[i];
        let p2 = contour.points[(i + 1) % contour.points.len()];
        draw_line_segment_mut(
            canvas,
            (p1[0] as f32, p1[1] as f32),
            (p2[0] as f32, p2[1] as f32),
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlate::CorrelationResult;
    use crate::test_utils::grid_with_hotspots;

    #[test]
    fn hot_ramp_endpoints() {
        assert_eq!(hot(0.0), [0, 0, 0]);
        assert_eq!(hot(0.5), [255, 128, 0]);
        assert_eq!(hot(1.0), [255, 255, 255]);
        // Out-of-range inputs clamp instead of wrapping.
        assert_eq!(hot(-2.0), [0, 0, 0]);
        assert_eq!(hot(7.0), [255, 255, 255]);
    }

    #[test]
    fn render_grid_normalizes_against_its_own_range() {
        let grid = grid_with_hotspots(2, 1, 0.0, &[([1, 0], 10.0)]);
        let config = RenderConfig {
            colormap: Colormap::Gray,
            ..RenderConfig::default()
        };
        let img = render_grid(&grid, &config);
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(img.get_pixel(1, 0).0, [255, 255, 255]);
    }

    #[test]
    fn no_data_cells_use_the_sentinel_color() {
        let grid = grid_with_hotspots(2, 1, 10.0, &[([0, 0], f32::NAN)]);
        let config = RenderConfig::default();
        let img = render_grid(&grid, &config);
        assert_eq!(img.get_pixel(0, 0).0, config.no_data_color);
    }

    #[test]
    fn uniform_grid_renders_without_dividing_by_zero() {
        let grid = grid_with_hotspots(3, 3, 25.0, &[]);
        let img = render_grid(&grid, &RenderConfig::default());
        assert_eq!(img.get_pixel(1, 1).0, [0, 0, 0]);
    }

    #[test]
    fn overlay_marks_contours_and_regions() {
        let grid = grid_with_hotspots(6, 6, 0.0, &[([3, 3], 50.0)]);
        let config = RenderConfig::default();
        let contour = Contour {
            points: vec![[3, 3]],
        };
        let roi = RegionOfInterest {
            name: "corner".to_string(),
            top_left: [0, 0],
            bottom_right: [2, 2],
        };
        let report = CorrelationReport {
            results: vec![CorrelationResult {
                roi_name: "corner".to_string(),
                has_anomaly: true,
                contours: Vec::new(),
            }],
            failures: Vec::new(),
        };

        let img = render_overlay(&grid, &[contour], &[roi.clone()], Some(&report), &config);
        assert_eq!(img.get_pixel(3, 3).0, config.contour_color);
        assert_eq!(img.get_pixel(0, 0).0, config.roi_alert_color);

        let img = render_overlay(&grid, &[], &[roi], None, &config);
        assert_eq!(img.get_pixel(0, 0).0, config.roi_color);
    }
}
