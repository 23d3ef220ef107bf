use std::error::Error;
use thermgrid::{AnalysisSession, CaptureState, ThermalGrid};

fn main() -> Result<(), Box<dyn Error>> {
    // 6x6 grid with a hot 2x2 band in the middle.
    let mut rows = vec![vec![20.0f32; 6]; 6];
    for y in 2..4 {
        for x in 2..4 {
            rows[y][x] = 85.0;
        }
    }
    let grid = ThermalGrid::from_rows(&rows)?;

    let mut session = AnalysisSession::new();
    session.load_grid(grid);
    session.detect(60.0)?;

    // Two clicks: the anchor, then a point strictly right of and below it.
    let mut capture = session.begin_roi_capture()?;
    capture.submit_point([1, 1])?;
    assert_eq!(capture.state(), CaptureState::AwaitingSecond);
    capture.submit_point([5, 5])?;
    session.finalize_roi(&capture, "band")?;

    let report = session.correlate()?;
    for result in &report.results {
        println!(
            "region {:?}: anomalous={} ({} contours)",
            result.roi_name,
            result.has_anomaly,
            result.contours.len()
        );
    }
    Ok(())
}
