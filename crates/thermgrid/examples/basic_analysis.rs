use std::error::Error;
use std::path::Path;
use thermgrid::{AnalysisSession, LoadOptions};

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!(
            "Usage: {} <thermal.csv|image.png> <threshold> [report.json]",
            args[0]
        );
        std::process::exit(2);
    }

    let threshold: f32 = args[2].parse()?;

    let mut session = AnalysisSession::new();
    session.load_from_path(Path::new(&args[1]), &LoadOptions::default())?;

    let detection = session.detect(threshold)?;
    println!(
        "Flagged {} cells in {} regions above {threshold}.",
        detection.mask.count_set(),
        detection.contours.len()
    );

    if let Some(out_path) = args.get(3) {
        let json = serde_json::to_string_pretty(&session.summary()?)?;
        std::fs::write(out_path, json)?;
        println!("Wrote {out_path}");
    }
    Ok(())
}
