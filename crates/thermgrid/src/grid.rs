//! Immutable per-pixel temperature grid.

use crate::error::AnalysisError;

/// Temperature readings for one thermal image.
///
/// Row-major `f32` storage with strictly positive dimensions. Cells hold a
/// finite temperature or NaN for no-data (dead sensor pixels, values
/// clipped by the calibration range). NaN cells never count as anomalous
/// and are excluded from the summary statistics; infinite cells are
/// rejected at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermalGrid {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl ThermalGrid {
    /// Build a grid from row-major cell data.
    pub fn from_raw(width: u32, height: u32, data: Vec<f32>) -> Result<Self, AnalysisError> {
        if width == 0 || height == 0 {
            return Err(AnalysisError::InvalidInput {
                reason: format!("grid dimensions must be positive, got {width}x{height}"),
            });
        }
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(AnalysisError::InvalidInput {
                reason: format!(
                    "grid data holds {} cells, expected {width}x{height} = {expected}",
                    data.len()
                ),
            });
        }
        if let Some(v) = data.iter().find(|v| v.is_infinite()) {
            return Err(AnalysisError::InvalidInput {
                reason: format!("grid cells must be finite or NaN, got {v}"),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a grid from nested rows (outer index y, inner index x).
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self, AnalysisError> {
        if rows.is_empty() {
            return Err(AnalysisError::InvalidInput {
                reason: "grid must contain at least one row".to_string(),
            });
        }
        let width = rows[0].len();
        if width == 0 {
            return Err(AnalysisError::InvalidInput {
                reason: "grid rows must contain at least one cell".to_string(),
            });
        }
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(AnalysisError::InvalidInput {
                    reason: format!("row {y} holds {} cells, expected {width}", row.len()),
                });
            }
        }
        let data = rows.iter().flatten().copied().collect();
        Self::from_raw(width as u32, rows.len() as u32, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Grid dimensions as (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Cell value at (x, y), or None outside the grid.
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y as usize * self.width as usize + x as usize])
    }

    /// Row-major cell data.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.width as usize)
    }

    /// Minimum over data cells; None when every cell is no-data.
    pub fn min(&self) -> Option<f32> {
        self.data_cells().reduce(f32::min)
    }

    /// Maximum over data cells; None when every cell is no-data.
    pub fn max(&self) -> Option<f32> {
        self.data_cells().reduce(f32::max)
    }

    /// Mean over data cells; None when every cell is no-data.
    pub fn mean(&self) -> Option<f32> {
        let mut sum = 0.0f64;
        let mut n = 0usize;
        for v in self.data_cells() {
            sum += v as f64;
            n += 1;
        }
        if n == 0 {
            None
        } else {
            Some((sum / n as f64) as f32)
        }
    }

    /// Number of no-data (NaN) cells.
    pub fn no_data_count(&self) -> usize {
        self.data.iter().filter(|v| v.is_nan()).count()
    }

    fn data_cells(&self) -> impl Iterator<Item = f32> + '_ {
        self.data.iter().copied().filter(|v| !v.is_nan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_zero_dimensions() {
        assert!(matches!(
            ThermalGrid::from_raw(0, 4, Vec::new()),
            Err(AnalysisError::InvalidInput { .. })
        ));
        assert!(matches!(
            ThermalGrid::from_raw(4, 0, Vec::new()),
            Err(AnalysisError::InvalidInput { .. })
        ));
    }

    #[test]
    fn from_raw_rejects_length_mismatch() {
        assert!(matches!(
            ThermalGrid::from_raw(3, 2, vec![0.0; 5]),
            Err(AnalysisError::InvalidInput { .. })
        ));
    }

    #[test]
    fn from_raw_rejects_infinite_cells() {
        let result = ThermalGrid::from_raw(2, 1, vec![20.0, f32::INFINITY]);
        assert!(matches!(result, Err(AnalysisError::InvalidInput { .. })));
    }

    #[test]
    fn from_raw_accepts_nan_cells() {
        let grid = ThermalGrid::from_raw(2, 1, vec![20.0, f32::NAN]).unwrap();
        assert_eq!(grid.no_data_count(), 1);
    }

    #[test]
    fn from_rows_rejects_empty_and_ragged_input() {
        assert!(ThermalGrid::from_rows(&[]).is_err());
        assert!(ThermalGrid::from_rows(&[Vec::new()]).is_err());
        let ragged = [vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(
            ThermalGrid::from_rows(&ragged),
            Err(AnalysisError::InvalidInput { .. })
        ));
    }

    #[test]
    fn get_is_bounds_checked() {
        let grid = ThermalGrid::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(grid.get(1, 0), Some(2.0));
        assert_eq!(grid.get(0, 1), Some(3.0));
        assert_eq!(grid.get(2, 0), None);
        assert_eq!(grid.get(0, 2), None);
    }

    #[test]
    fn statistics_skip_no_data() {
        let grid = ThermalGrid::from_raw(2, 2, vec![10.0, 30.0, f32::NAN, 20.0]).unwrap();
        assert_eq!(grid.min(), Some(10.0));
        assert_eq!(grid.max(), Some(30.0));
        assert_eq!(grid.mean(), Some(20.0));
        assert_eq!(grid.no_data_count(), 1);
    }

    #[test]
    fn statistics_on_all_no_data_are_none() {
        let grid = ThermalGrid::from_raw(2, 1, vec![f32::NAN, f32::NAN]).unwrap();
        assert_eq!(grid.min(), None);
        assert_eq!(grid.max(), None);
        assert_eq!(grid.mean(), None);
    }

    #[test]
    fn rows_iterate_top_to_bottom() {
        let grid = ThermalGrid::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let rows: Vec<&[f32]> = grid.rows().collect();
        assert_eq!(rows, vec![&[1.0, 2.0][..], &[3.0, 4.0][..]]);
    }
}
