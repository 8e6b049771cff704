use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use curvedigit::{
    export_json, export_tsv, load_script, Axis, DigitizerSession, ImageFrame, OutputFormat,
    TsvOptions,
};

/// Convert recorded clicks on a plotted curve into data coordinates
#[derive(Parser, Debug)]
#[command(name = "curvedigit")]
#[command(about = "Digitize curves from scanned plots", long_about = None)]
struct Args {
    /// Digitization script (TOML) with reference and curve clicks
    #[arg(short, long)]
    script: PathBuf,

    /// Output file prefix; each curve is written to <prefix>_<name>.<ext>
    #[arg(short, long, default_value = "curve")]
    output: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "tsv")]
    format: FormatArg,

    /// Mantissa digits in text output
    #[arg(short, long, default_value_t = 18)]
    precision: usize,

    /// Column delimiter in text output
    #[arg(short, long, default_value_t = '\t')]
    delimiter: char,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum FormatArg {
    Tsv,
    Json,
    Both,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Tsv => OutputFormat::Tsv,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Both => OutputFormat::Both,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let format: OutputFormat = args.format.into();

    println!("Curve Digitizer");
    println!("===============");
    println!("Script: {}", args.script.display());
    println!("Output: {}", args.output);
    println!("Format: {}", format);
    println!();

    let script = load_script(&args.script)
        .with_context(|| format!("Failed to load script {}", args.script.display()))?;

    if let Some(image) = &script.image {
        check_image_bounds(&script, &resolve_near(&args.script, image));
    }

    // Step 1: Calibrate both axes
    println!("Step 1: Calibrating axes...");
    let mut session = DigitizerSession::new();

    let x_request = script.reference(Axis::X)?;
    let x_scale = session.calibrate_x(&x_request).context("x calibration failed")?;
    let x_report = x_request.report_with(x_scale);
    println!("  {}", x_report);

    let y_request = script.reference(Axis::Y)?;
    let y_scale = session.calibrate_y(&y_request).context("y calibration failed")?;
    let y_report = y_request.report_with(y_scale);
    println!("  {}", y_report);

    println!("  Scales: {}, {}", x_report.scale, y_report.scale);

    // Step 2: Digitize and export every curve
    println!("\nStep 2: Digitizing {} curve(s)...", script.curves.len());
    if script.curves.is_empty() {
        println!("  Nothing to digitize.");
        return Ok(());
    }

    let tsv_options = TsvOptions {
        delimiter: args.delimiter,
        precision: args.precision,
    };

    for (idx, entry) in script.curves.iter().enumerate() {
        let name = script.curve_name(idx);
        let curve = entry.curve();
        let points = session
            .digitize(&curve)
            .with_context(|| format!("Failed to digitize curve '{}'", name))?;

        println!("  Curve '{}': {} point(s)", name, points.len());
        if let Some(last) = points.last() {
            println!("    Last point: {}", last);
        }

        if format.writes_tsv() {
            let path = format!("{}_{}.txt", args.output, name);
            export_tsv(&points, &path, &tsv_options)
                .with_context(|| format!("Failed to write {}", path))?;
            println!("    Saved: {}", path);
        }
        if format.writes_json() {
            let path = format!("{}_{}.json", args.output, name);
            export_json(&points, &path).with_context(|| format!("Failed to write {}", path))?;
            println!("    Saved: {}", path);
        }
    }

    println!("\nDigitized {} curve(s).", session.curves_digitized());
    Ok(())
}

/// Relative image paths are taken from the script's directory
fn resolve_near(script: &Path, image: &Path) -> PathBuf {
    if image.is_absolute() {
        return image.to_path_buf();
    }
    script
        .parent()
        .map(|dir| dir.join(image))
        .unwrap_or_else(|| image.to_path_buf())
}

fn check_image_bounds(script: &curvedigit::DigitizeScript, image: &Path) {
    let (width, height) = match image::image_dimensions(image) {
        Ok(dims) => dims,
        Err(e) => {
            tracing::warn!(path = %image.display(), error = %e, "cannot read image size; skipping bounds check");
            return;
        }
    };

    let frame = ImageFrame::new(width, height);
    println!("Image: {} ({})", image.display(), frame);
    for point in script.points_outside(&frame) {
        tracing::warn!(point = %point, frame = %frame, "click lies outside the image");
    }
}
