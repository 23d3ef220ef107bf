//! Boolean anomaly mask derived from a thermal grid.

use crate::error::AnalysisError;

/// Per-cell anomaly flags, same shape as the grid they were derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnomalyMask {
    width: u32,
    height: u32,
    data: Vec<bool>,
}

impl AnomalyMask {
    /// Build a mask from row-major cell flags.
    pub fn from_raw(width: u32, height: u32, data: Vec<bool>) -> Result<Self, AnalysisError> {
        if width == 0 || height == 0 {
            return Err(AnalysisError::InvalidInput {
                reason: format!("mask dimensions must be positive, got {width}x{height}"),
            });
        }
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(AnalysisError::InvalidInput {
                reason: format!(
                    "mask data holds {} cells, expected {width}x{height} = {expected}",
                    data.len()
                ),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Mask dimensions as (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Cell flag at (x, y), or None outside the mask.
    pub fn get(&self, x: u32, y: u32) -> Option<bool> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y as usize * self.width as usize + x as usize])
    }

    /// Row-major cell flags.
    pub fn as_slice(&self) -> &[bool] {
        &self.data
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.data.chunks_exact(self.width as usize)
    }

    /// Number of anomalous cells.
    pub fn count_set(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    /// True when any cell is anomalous.
    pub fn any_set(&self) -> bool {
        self.data.iter().any(|&v| v)
    }

    /// Copy of the half-open window `[x, x + width) x [y, y + height)`.
    ///
    /// Fails with the out-of-bounds error when the window does not fit;
    /// this guards regions defined before a grid reload at a different
    /// resolution.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Self, AnalysisError> {
        if width == 0 || height == 0 {
            return Err(AnalysisError::InvalidInput {
                reason: format!("crop window must be non-empty, got {width}x{height}"),
            });
        }
        if x as u64 + width as u64 > self.width as u64
            || y as u64 + height as u64 > self.height as u64
        {
            return Err(AnalysisError::OutOfBounds {
                x,
                y,
                width,
                height,
                bounds: [self.width, self.height],
            });
        }
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for row in y..y + height {
            let start = row as usize * self.width as usize + x as usize;
            data.extend_from_slice(&self.data[start..start + width as usize]);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::mask_with_cells;

    #[test]
    fn from_raw_validates_shape() {
        assert!(AnomalyMask::from_raw(0, 1, Vec::new()).is_err());
        assert!(AnomalyMask::from_raw(2, 2, vec![true; 3]).is_err());
        assert!(AnomalyMask::from_raw(2, 2, vec![false; 4]).is_ok());
    }

    #[test]
    fn counting_and_lookup() {
        let mask = mask_with_cells(3, 2, &[[1, 0], [2, 1]]);
        assert_eq!(mask.count_set(), 2);
        assert!(mask.any_set());
        assert_eq!(mask.get(1, 0), Some(true));
        assert_eq!(mask.get(0, 0), Some(false));
        assert_eq!(mask.get(3, 0), None);
    }

    #[test]
    fn crop_takes_half_open_window() {
        let mask = mask_with_cells(4, 4, &[[1, 1], [2, 2]]);
        let window = mask.crop(0, 0, 2, 2).unwrap();
        assert_eq!(window.dimensions(), (2, 2));
        assert_eq!(window.get(1, 1), Some(true));
        assert_eq!(window.get(0, 0), Some(false));
        assert_eq!(window.count_set(), 1);
    }

    #[test]
    fn crop_at_far_edge_is_in_bounds() {
        let mask = mask_with_cells(4, 4, &[]);
        let window = mask.crop(3, 3, 1, 1).unwrap();
        assert_eq!(window.dimensions(), (1, 1));
        assert!(!window.any_set());
    }

    #[test]
    fn crop_past_edge_is_out_of_bounds() {
        let mask = mask_with_cells(4, 4, &[]);
        let err = mask.crop(3, 3, 2, 1).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::OutOfBounds {
                x: 3,
                y: 3,
                width: 2,
                height: 1,
                bounds: [4, 4],
            }
        );
    }

    #[test]
    fn crop_rejects_empty_window() {
        let mask = mask_with_cells(4, 4, &[]);
        assert!(matches!(
            mask.crop(0, 0, 0, 1),
            Err(AnalysisError::InvalidInput { .. })
        ));
    }
}
