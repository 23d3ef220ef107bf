//! Loading thermal grids from decoded sources.
//!
//! Two source shapes are supported: CSV tables of temperatures (comma or
//! whitespace separated, `nan` marking no-data cells) and 16-bit grayscale
//! images whose pixel values map to temperatures through a linear
//! `value * scale + offset`. Radiometric JPEG containers are out of scope;
//! external tooling decodes those into one of the shapes above.

use std::path::Path;

use crate::error::AnalysisError;
use crate::grid::ThermalGrid;

/// Linear mapping applied to image pixel values. CSV tables are read as
/// temperatures verbatim and ignore these options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadOptions {
    /// Multiplier applied to each raw pixel value.
    pub scale: f32,
    /// Added after scaling.
    pub offset: f32,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: 0.0,
        }
    }
}

/// Load a grid from `path`, dispatching on the file extension.
///
/// `.csv` and `.txt` are parsed as temperature tables; anything else is
/// handed to the image decoder.
pub fn load_grid(path: &Path, options: &LoadOptions) -> Result<ThermalGrid, AnalysisError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match extension.as_deref() {
        Some("csv") | Some("txt") => load_csv_grid(path),
        _ => load_image_grid(path, options),
    }
}

/// Load a grid from a CSV temperature table.
pub fn load_csv_grid(path: &Path) -> Result<ThermalGrid, AnalysisError> {
    let text = std::fs::read_to_string(path).map_err(|e| AnalysisError::Extraction {
        reason: format!("read {}: {e}", path.display()),
    })?;
    let grid = parse_csv(&text)?;
    tracing::info!(
        "read {}x{} grid from {}",
        grid.width(),
        grid.height(),
        path.display()
    );
    Ok(grid)
}

/// Load a grid from a 16-bit grayscale image, mapping each pixel value
/// through `value * scale + offset`.
pub fn load_image_grid(path: &Path, options: &LoadOptions) -> Result<ThermalGrid, AnalysisError> {
    let image = image::open(path).map_err(|e| AnalysisError::Extraction {
        reason: format!("open {}: {e}", path.display()),
    })?;
    let gray = image.to_luma16();
    let (width, height) = gray.dimensions();
    let data: Vec<f32> = gray
        .pixels()
        .map(|p| p.0[0] as f32 * options.scale + options.offset)
        .collect();
    let grid = ThermalGrid::from_raw(width, height, data).map_err(reason_to_extraction)?;
    tracing::info!("decoded {}x{} grid from {}", width, height, path.display());
    Ok(grid)
}

fn parse_csv(text: &str) -> Result<ThermalGrid, AnalysisError> {
    let mut rows: Vec<Vec<f32>> = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let cells: Result<Vec<f32>, _> = if line.contains(',') {
            line.split(',').map(|c| c.trim().parse::<f32>()).collect()
        } else {
            line.split_whitespace().map(|c| c.parse::<f32>()).collect()
        };
        match cells {
            Ok(cells) => rows.push(cells),
            Err(e) => {
                return Err(AnalysisError::Extraction {
                    reason: format!("line {}: {e}", index + 1),
                })
            }
        }
    }
    if rows.is_empty() {
        return Err(AnalysisError::Extraction {
            reason: "no rows in table".to_string(),
        });
    }
    ThermalGrid::from_rows(&rows).map_err(reason_to_extraction)
}

/// Grid construction failures surface as extraction errors so callers see
/// a single error kind for a failed load.
fn reason_to_extraction(error: AnalysisError) -> AnalysisError {
    match error {
        AnalysisError::InvalidInput { reason } => AnalysisError::Extraction { reason },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_rows() {
        let grid = parse_csv("1.0, 2.0\n3.0, 4.0\n").unwrap();
        assert_eq!(grid.dimensions(), (2, 2));
        assert_eq!(grid.get(1, 0), Some(2.0));
        assert_eq!(grid.get(0, 1), Some(3.0));
    }

    #[test]
    fn parses_whitespace_separated_rows() {
        let grid = parse_csv("1 2 3\n4 5 6\n").unwrap();
        assert_eq!(grid.dimensions(), (3, 2));
        assert_eq!(grid.get(2, 1), Some(6.0));
    }

    #[test]
    fn parses_nan_as_no_data() {
        let grid = parse_csv("nan, 5.0\nNaN, 6.0\n").unwrap();
        assert!(grid.get(0, 0).unwrap().is_nan());
        assert!(grid.get(0, 1).unwrap().is_nan());
        assert_eq!(grid.no_data_count(), 2);
    }

    #[test]
    fn skips_blank_lines() {
        let grid = parse_csv("\n1, 2\n\n3, 4\n\n").unwrap();
        assert_eq!(grid.dimensions(), (2, 2));
    }

    #[test]
    fn ragged_rows_fail_extraction() {
        assert!(matches!(
            parse_csv("1, 2\n3\n"),
            Err(AnalysisError::Extraction { .. })
        ));
    }

    #[test]
    fn unparsable_cell_reports_its_line() {
        let err = parse_csv("1, 2\n3, apple\n").unwrap_err();
        match err {
            AnalysisError::Extraction { reason } => assert!(reason.starts_with("line 2:")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn infinite_cell_fails_extraction() {
        assert!(matches!(
            parse_csv("1, inf\n"),
            Err(AnalysisError::Extraction { .. })
        ));
    }

    #[test]
    fn empty_table_fails_extraction() {
        for text in ["", "\n\n", "   \n"] {
            assert!(matches!(
                parse_csv(text),
                Err(AnalysisError::Extraction { .. })
            ));
        }
    }

    #[test]
    fn loads_a_csv_file_from_disk() {
        let path = std::env::temp_dir().join("thermgrid_load_table.csv");
        std::fs::write(&path, "10.0, 50.0\n20.0, 30.0\n").unwrap();
        let grid = load_grid(&path, &LoadOptions::default()).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(grid.dimensions(), (2, 2));
        assert_eq!(grid.get(1, 0), Some(50.0));
    }

    #[test]
    fn loads_a_luma16_image_with_scale_and_offset() {
        let path = std::env::temp_dir().join("thermgrid_load_luma16.png");
        let mut img = image::ImageBuffer::<image::Luma<u16>, Vec<u16>>::new(2, 2);
        img.put_pixel(0, 0, image::Luma([100u16]));
        img.put_pixel(1, 0, image::Luma([200u16]));
        img.put_pixel(0, 1, image::Luma([300u16]));
        img.put_pixel(1, 1, image::Luma([400u16]));
        img.save(&path).unwrap();

        let options = LoadOptions {
            scale: 0.5,
            offset: -5.0,
        };
        let grid = load_grid(&path, &options).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(grid.dimensions(), (2, 2));
        assert_eq!(grid.get(0, 0), Some(45.0));
        assert_eq!(grid.get(1, 1), Some(195.0));
    }

    #[test]
    fn missing_file_is_an_extraction_error() {
        let path = Path::new("definitely_missing_thermgrid_input.png");
        assert!(matches!(
            load_grid(path, &LoadOptions::default()),
            Err(AnalysisError::Extraction { .. })
        ));
    }
}
