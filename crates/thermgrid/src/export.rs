//! Plain-text persistence of grids and masks.
//!
//! Grid CSV uses two decimal places with `nan` for no-data cells, so a
//! written grid loads back through the CSV loader. Masks serialize as
//! `1`/`0` cells.

use std::io;
use std::path::Path;

use crate::grid::ThermalGrid;
use crate::mask::AnomalyMask;

/// Render the grid as CSV text, one row per line.
pub fn grid_csv(grid: &ThermalGrid) -> String {
    let mut out = String::new();
    for row in grid.rows() {
        let line = row
            .iter()
            .map(|v| {
                if v.is_nan() {
                    "nan".to_string()
                } else {
                    format!("{v:.2}")
                }
            })
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Render the mask as CSV text with `1` for anomalous cells.
pub fn mask_csv(mask: &AnomalyMask) -> String {
    let mut out = String::new();
    for row in mask.rows() {
        let line = row
            .iter()
            .map(|&cell| if cell { "1" } else { "0" })
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }
    out
}

pub fn write_grid_csv(grid: &ThermalGrid, path: &Path) -> io::Result<()> {
    std::fs::write(path, grid_csv(grid))
}

pub fn write_mask_csv(mask: &AnomalyMask, path: &Path) -> io::Result<()> {
    std::fs::write(path, mask_csv(mask))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{grid_with_hotspots, mask_with_cells};

    #[test]
    fn grid_csv_uses_two_decimals_and_nan() {
        let grid = grid_with_hotspots(
            2,
            2,
            0.0,
            &[([0, 0], 1.0), ([1, 0], f32::NAN), ([0, 1], 2.5), ([1, 1], -3.0)],
        );
        assert_eq!(grid_csv(&grid), "1.00,nan\n2.50,-3.00\n");
    }

    #[test]
    fn mask_csv_uses_ones_and_zeros() {
        let mask = mask_with_cells(2, 2, &[[1, 0], [0, 1]]);
        assert_eq!(mask_csv(&mask), "0,1\n1,0\n");
    }

    #[test]
    fn written_grid_loads_back_through_the_csv_loader() {
        let grid = grid_with_hotspots(
            2,
            2,
            0.0,
            &[([0, 0], 50.0), ([1, 0], 1.25), ([0, 1], f32::NAN)],
        );
        let path = std::env::temp_dir().join("thermgrid_export_roundtrip.csv");
        write_grid_csv(&grid, &path).unwrap();
        let loaded = crate::extract::load_csv_grid(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.dimensions(), (2, 2));
        assert_eq!(loaded.get(0, 0), Some(50.0));
        assert_eq!(loaded.get(1, 0), Some(1.25));
        assert!(loaded.get(0, 1).unwrap().is_nan());
        assert_eq!(loaded.get(1, 1), Some(0.0));
    }
}
