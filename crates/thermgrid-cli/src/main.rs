//! thermgrid CLI — command-line interface for thermal anomaly analysis.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use thermgrid::{
    export, load_grid, render_grid, render_overlay, AnalysisSession, Colormap, LoadOptions,
    RenderConfig,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "thermgrid")]
#[command(
    about = "Detect thermal anomalies in temperature grids and correlate them with named regions of interest"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print grid statistics for a thermal source.
    Info(CliInfoArgs),

    /// Convert a thermal source to CSV and/or a false-color PNG.
    Export(CliExportArgs),

    /// Detect anomalies, correlate regions of interest, and write reports.
    Analyze(CliAnalyzeArgs),
}

#[derive(Debug, Clone, Args)]
struct CliSourceArgs {
    /// Path to the thermal source (CSV table or 16-bit grayscale image).
    input: PathBuf,

    /// Multiplier applied to image pixel values (images only).
    #[arg(long, default_value = "1.0")]
    scale: f32,

    /// Offset added after scaling (images only).
    #[arg(long, default_value = "0.0")]
    offset: f32,
}

impl CliSourceArgs {
    fn options(&self) -> LoadOptions {
        LoadOptions {
            scale: self.scale,
            offset: self.offset,
        }
    }
}

#[derive(Debug, Clone, Args)]
struct CliInfoArgs {
    #[command(flatten)]
    source: CliSourceArgs,
}

#[derive(Debug, Clone, Args)]
struct CliExportArgs {
    #[command(flatten)]
    source: CliSourceArgs,

    /// Path to write the grid as CSV.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Path to write a false-color render (PNG).
    #[arg(long)]
    png: Option<PathBuf>,

    /// Colormap for --png.
    #[arg(long, value_enum, default_value_t = ColormapArg::Hot)]
    colormap: ColormapArg,
}

#[derive(Debug, Clone, Args)]
struct CliAnalyzeArgs {
    #[command(flatten)]
    source: CliSourceArgs,

    /// Anomaly threshold; cells strictly above it are flagged.
    #[arg(long)]
    threshold: f32,

    /// Region of interest to correlate, as NAME:X,Y,WxH. Repeatable.
    #[arg(long = "roi", value_name = "NAME:X,Y,WxH")]
    rois: Vec<String>,

    /// Path to write the analysis report (JSON).
    #[arg(long)]
    report: Option<PathBuf>,

    /// Path to write an annotated overlay image (PNG).
    #[arg(long)]
    overlay: Option<PathBuf>,

    /// Path to write the anomaly mask as CSV.
    #[arg(long)]
    mask_csv: Option<PathBuf>,

    /// Colormap for --overlay.
    #[arg(long, value_enum, default_value_t = ColormapArg::Hot)]
    colormap: ColormapArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColormapArg {
    Hot,
    Gray,
}

impl ColormapArg {
    fn to_core(self) -> Colormap {
        match self {
            Self::Hot => Colormap::Hot,
            Self::Gray => Colormap::Gray,
        }
    }
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Info(args) => run_info(&args),
        Commands::Export(args) => run_export(&args),
        Commands::Analyze(args) => run_analyze(&args),
    }
}

/// Parse a `NAME:X,Y,WxH` region spec into its parts.
fn parse_roi_spec(spec: &str) -> CliResult<(String, [u32; 2], u32, u32)> {
    let parse_u32 = |field: &str, value: &str| -> CliResult<u32> {
        value.trim().parse::<u32>().map_err(|e| -> CliError {
            format!("invalid region spec {spec:?}: bad {field}: {e}").into()
        })
    };

    let (name, rest) = spec.split_once(':').ok_or_else(|| -> CliError {
        format!("invalid region spec {spec:?}: expected NAME:X,Y,WxH").into()
    })?;
    if name.is_empty() {
        return Err(format!("invalid region spec {spec:?}: empty name").into());
    }
    let parts: Vec<&str> = rest.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("invalid region spec {spec:?}: expected X,Y,WxH after the name").into());
    }
    let x = parse_u32("x", parts[0])?;
    let y = parse_u32("y", parts[1])?;
    let size = parts[2].trim().to_ascii_lowercase();
    let (w, h) = size.split_once('x').ok_or_else(|| -> CliError {
        format!("invalid region spec {spec:?}: size must be WxH").into()
    })?;
    let width = parse_u32("width", w)?;
    let height = parse_u32("height", h)?;
    Ok((name.to_string(), [x, y], width, height))
}

// ── info ───────────────────────────────────────────────────────────────

fn run_info(args: &CliInfoArgs) -> CliResult<()> {
    let grid = load_grid(&args.source.input, &args.source.options())?;

    println!("thermal grid {}", args.source.input.display());
    println!("  size:     {}x{}", grid.width(), grid.height());
    match (grid.min(), grid.max(), grid.mean()) {
        (Some(min), Some(max), Some(mean)) => {
            println!("  min:      {min:.2}");
            println!("  max:      {max:.2}");
            println!("  mean:     {mean:.2}");
        }
        _ => println!("  every cell is no-data"),
    }
    println!("  no-data:  {}", grid.no_data_count());

    Ok(())
}

// ── export ─────────────────────────────────────────────────────────────

fn run_export(args: &CliExportArgs) -> CliResult<()> {
    if args.csv.is_none() && args.png.is_none() {
        return Err("nothing to export; pass --csv and/or --png".into());
    }

    let grid = load_grid(&args.source.input, &args.source.options())?;

    if let Some(path) = &args.csv {
        export::write_grid_csv(&grid, path)?;
        tracing::info!("grid CSV written to {}", path.display());
    }
    if let Some(path) = &args.png {
        let config = RenderConfig {
            colormap: args.colormap.to_core(),
            ..RenderConfig::default()
        };
        render_grid(&grid, &config).save(path)?;
        tracing::info!("render written to {}", path.display());
    }

    Ok(())
}

// ── analyze ────────────────────────────────────────────────────────────

fn run_analyze(args: &CliAnalyzeArgs) -> CliResult<()> {
    let mut session = AnalysisSession::new();
    session.load_from_path(&args.source.input, &args.source.options())?;

    for spec in &args.rois {
        let (name, top_left, width, height) = parse_roi_spec(spec)?;
        session.define_roi(&name, top_left, width, height)?;
    }

    session.detect(args.threshold)?;
    session.correlate()?;

    let report = session.summary()?;
    tracing::info!(
        "{} anomalous cells in {} regions at threshold {}",
        report.anomalous_cells,
        report.contours.len(),
        report.threshold,
    );
    for result in &report.roi_results {
        if result.has_anomaly {
            tracing::warn!("region {:?} contains an anomaly", result.roi_name);
        } else {
            tracing::info!("region {:?} is clear", result.roi_name);
        }
    }
    for failure in &report.roi_failures {
        tracing::warn!("region {:?} failed: {}", failure.roi_name, failure.error);
    }

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, &json)?;
        tracing::info!("report written to {}", path.display());
    }
    if let Some(path) = &args.overlay {
        let config = RenderConfig {
            colormap: args.colormap.to_core(),
            ..RenderConfig::default()
        };
        let grid = session.grid().expect("grid loaded above");
        let contours = session.contours().expect("detection ran above");
        let img = render_overlay(grid, contours, session.rois().all(), session.report(), &config);
        img.save(path)?;
        tracing::info!("overlay written to {}", path.display());
    }
    if let Some(path) = &args.mask_csv {
        let mask = session.mask().expect("detection ran above");
        export::write_mask_csv(mask, path)?;
        tracing::info!("mask CSV written to {}", path.display());
    }

    Ok(())
}
