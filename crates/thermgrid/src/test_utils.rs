//! Shared test fixtures for grid- and mask-based unit tests.
//!
//! Consolidated here to avoid near-identical hotspot-grid builders in
//! `detect.rs`, `correlate.rs`, and `session.rs`.

use crate::grid::ThermalGrid;
use crate::mask::AnomalyMask;

/// Build a `w`x`h` grid filled with `base`, then stamp `value` at each
/// listed `[x, y]` cell.
pub(crate) fn grid_with_hotspots(
    w: u32,
    h: u32,
    base: f32,
    spots: &[([u32; 2], f32)],
) -> ThermalGrid {
    let mut data = vec![base; (w * h) as usize];
    for &([x, y], value) in spots {
        data[(y * w + x) as usize] = value;
    }
    ThermalGrid::from_raw(w, h, data).unwrap()
}

/// Build a `w`x`h` mask with exactly the listed `[x, y]` cells set.
pub(crate) fn mask_with_cells(w: u32, h: u32, cells: &[[u32; 2]]) -> AnomalyMask {
    let mut data = vec![false; (w * h) as usize];
    for &[x, y] in cells {
        data[(y * w + x) as usize] = true;
    }
    AnomalyMask::from_raw(w, h, data).unwrap()
}

/// The 4x4 two-hotspot grid used across the detection and correlation
/// tests: 50.0 at (1, 1) and (2, 2), 0.0 elsewhere. Against a threshold
/// of 45.0 it yields two diagonally-touching single-cell anomalies.
pub(crate) fn two_hotspot_grid() -> ThermalGrid {
    grid_with_hotspots(4, 4, 0.0, &[([1, 1], 50.0), ([2, 2], 50.0)])
}
