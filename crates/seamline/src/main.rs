//! seamline: stitch vertically overlapping screenshots into one image and
//! split tall images into pieces.
//!
//! # Usage
//!
//! ```text
//! seamline stitch [OPTIONS] <IMAGES>...
//! seamline split [OPTIONS] <IMAGE>
//! ```
//!
//! Logging goes to stderr through `env_logger` (`RUST_LOG` overrides the
//! default `info` filter). `--plan-json` prints the stitch geometry and
//! cut positions to stdout.

#![allow(clippy::print_stdout)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{error, info, warn};
use seamline_export::{NamingPolicy, OutputFormat, export_segments};
use seamline_pipeline::decode::decode;
use seamline_pipeline::{
    CutPlan, PixelBuffer, RefineMetric, SearchConfig, SplitMode, StitchPlan, assemble,
    clamp_overlaps, detect_overlaps, override_seam,
};

/// Stitch overlapping screenshots and split tall images.
#[derive(Parser)]
#[command(name = "seamline", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Stitch images top to bottom, optionally splitting the result.
    Stitch(StitchArgs),
    /// Split a single tall image into pieces.
    Split(SplitArgs),
}

#[derive(Args)]
struct StitchArgs {
    /// Input images (PNG, JPEG, BMP, WebP), in top-to-bottom order.
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Explicit overlap per adjacent pair, comma separated.
    ///
    /// Skips automatic detection. Each value is clamped to the height of
    /// the shorter image of its pair.
    #[arg(long, value_name = "ROWS", value_delimiter = ',')]
    overlap: Option<Vec<u32>>,

    /// Override one seam after detection, as "INDEX=DEPTH" (0-based).
    /// May be repeated.
    #[arg(long = "seam", value_name = "INDEX=DEPTH", value_parser = parse_seam)]
    seams: Vec<(usize, u32)>,

    /// Largest overlap depth searched, in rows.
    #[arg(long, default_value_t = SearchConfig::DEFAULT_MAX_SEARCH)]
    max_search: u32,

    /// Number of columns sampled per row.
    #[arg(long, default_value_t = SearchConfig::DEFAULT_COLUMN_SAMPLES)]
    column_samples: u32,

    /// Half-width of the refinement window, in rows.
    #[arg(long, default_value_t = SearchConfig::DEFAULT_REFINE_RADIUS)]
    refine_radius: u32,

    /// Metric used by the refinement pass.
    #[arg(long, value_enum, default_value_t = Metric::RowDistance)]
    refine_metric: Metric,

    /// Full search config as a JSON string.
    ///
    /// When provided, the individual search flags are ignored. The JSON
    /// must be a valid `SearchConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,

    #[command(flatten)]
    split: SplitOptions,

    #[command(flatten)]
    output: OutputOptions,
}

#[derive(Args)]
struct SplitArgs {
    /// Image to split.
    image: PathBuf,

    #[command(flatten)]
    split: SplitOptions,

    #[command(flatten)]
    output: OutputOptions,
}

#[derive(Args)]
struct SplitOptions {
    /// Cut every ROWS rows; the last piece may be shorter.
    #[arg(
        long,
        value_name = "ROWS",
        allow_negative_numbers = true,
        conflicts_with = "split_count"
    )]
    split_height: Option<i64>,

    /// Cut into N pieces of equal height.
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    split_count: Option<i64>,
}

impl SplitOptions {
    const fn mode(&self) -> Option<SplitMode> {
        match (self.split_height, self.split_count) {
            (Some(h), _) => Some(SplitMode::ByHeight(h)),
            (None, Some(n)) => Some(SplitMode::ByCount(n)),
            (None, None) => None,
        }
    }
}

#[derive(Args)]
struct OutputOptions {
    /// Directory the pieces are written to.
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// File name prefix.
    #[arg(long, default_value = NamingPolicy::DEFAULT_PREFIX)]
    prefix: String,

    /// Leave the timestamp out of file names.
    #[arg(long)]
    no_stamp: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Png)]
    format: Format,

    /// JPEG quality (1-100). Ignored for PNG.
    #[arg(long, default_value_t = OutputFormat::DEFAULT_QUALITY)]
    quality: u8,

    /// Print the plan as JSON on stdout.
    #[arg(long)]
    plan_json: bool,
}

/// Refinement metric selection.
#[derive(Clone, Copy, ValueEnum)]
enum Metric {
    /// Averaged per-row RGB distance over the whole band.
    RowDistance,
    /// The coarse composite score.
    Composite,
}

/// Output format selection.
#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Lossless PNG.
    Png,
    /// Lossy JPEG.
    Jpeg,
}

/// Parse one `--seam INDEX=DEPTH` value.
fn parse_seam(s: &str) -> Result<(usize, u32), String> {
    let (index, depth) = s
        .split_once('=')
        .ok_or_else(|| format!("seam must be 'INDEX=DEPTH', got: '{s}'"))?;
    let index = index
        .trim()
        .parse()
        .map_err(|e| format!("invalid seam index '{index}': {e}"))?;
    let depth = depth
        .trim()
        .parse()
        .map_err(|e| format!("invalid seam depth '{depth}': {e}"))?;
    Ok((index, depth))
}

/// Build a [`SearchConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual search flags are ignored.
fn config_from_cli(args: &StitchArgs) -> Result<SearchConfig, String> {
    if let Some(ref json) = args.config_json {
        return serde_json::from_str(json).map_err(|e| format!("error parsing --config-json: {e}"));
    }

    Ok(SearchConfig {
        max_search: args.max_search,
        column_samples: args.column_samples,
        refine_radius: args.refine_radius,
        refine_metric: match args.refine_metric {
            Metric::RowDistance => RefineMetric::RowDistance,
            Metric::Composite => RefineMetric::Composite,
        },
        ..SearchConfig::default()
    })
}

fn read_image(path: &Path) -> Result<PixelBuffer, String> {
    let bytes =
        std::fs::read(path).map_err(|e| format!("error reading {}: {e}", path.display()))?;
    decode(&bytes).map_err(|e| format!("{}: {e}", path.display()))
}

fn stitch(args: &StitchArgs) -> Result<(), String> {
    let config = config_from_cli(args)?;
    let images = args
        .images
        .iter()
        .map(|path| read_image(path))
        .collect::<Result<Vec<_>, _>>()?;
    info!("loaded {} images", images.len());

    let mut overlaps = match args.overlap {
        Some(ref manual) => clamp_overlaps(&images, manual).map_err(|e| e.to_string())?,
        None => detect_overlaps(&images, &config).map_err(|e| e.to_string())?,
    };
    for &(index, depth) in &args.seams {
        overlaps = override_seam(&images, &overlaps, index, depth).map_err(|e| e.to_string())?;
    }
    info!("overlaps: {overlaps:?}");

    let stitched = assemble(&images, &overlaps).map_err(|e| e.to_string())?;
    info!(
        "composite is {}x{}",
        stitched.plan.composite_width, stitched.plan.composite_height,
    );

    let cuts = plan_cuts(&args.split, stitched.plan.composite_height)?;
    write_output(&stitched.composite, Some(&stitched.plan), &cuts, &args.output)
}

fn split(args: &SplitArgs) -> Result<(), String> {
    if args.split.mode().is_none() {
        return Err("split needs --split-height or --split-count".to_string());
    }
    let image = read_image(&args.image)?;
    let cuts = plan_cuts(&args.split, image.height())?;
    if cuts.is_empty() {
        warn!(
            "{} is {} rows tall, no cuts needed; nothing written",
            args.image.display(),
            image.height(),
        );
        return Ok(());
    }
    write_output(&image, None, &cuts, &args.output)
}

fn plan_cuts(options: &SplitOptions, height: u32) -> Result<CutPlan, String> {
    options.mode().map_or_else(
        || Ok(CutPlan::whole(height)),
        |mode| mode.plan(height).map_err(|e| e.to_string()),
    )
}

fn output_format(options: &OutputOptions) -> Result<OutputFormat, String> {
    match options.format {
        Format::Png => Ok(OutputFormat::Lossless),
        Format::Jpeg => OutputFormat::lossy(options.quality).map_err(|e| e.to_string()),
    }
}

fn write_output(
    image: &PixelBuffer,
    plan: Option<&StitchPlan>,
    cuts: &CutPlan,
    options: &OutputOptions,
) -> Result<(), String> {
    if options.plan_json {
        let json = serde_json::json!({ "stitch": plan, "cuts": cuts });
        let text = serde_json::to_string_pretty(&json)
            .map_err(|e| format!("error serializing plan: {e}"))?;
        println!("{text}");
    }

    let format = output_format(options)?;
    let stamp = (!options.no_stamp)
        .then(|| chrono::Local::now().format("%Y%m%d_%H%M%S").to_string());
    let naming = NamingPolicy::new(options.prefix.clone(), stamp);
    let segments = export_segments(image, cuts, format, &naming).map_err(|e| e.to_string())?;

    std::fs::create_dir_all(&options.out_dir)
        .map_err(|e| format!("error creating {}: {e}", options.out_dir.display()))?;
    for segment in &segments {
        let path = options.out_dir.join(&segment.file_name);
        std::fs::write(&path, &segment.bytes)
            .map_err(|e| format!("error writing {}: {e}", path.display()))?;
        info!(
            "wrote {} ({} rows, {} bytes)",
            path.display(),
            segment.height,
            segment.bytes.len(),
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Stitch(ref args) => stitch(args),
        Command::Split(ref args) => split(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            error!("{msg}");
            ExitCode::FAILURE
        }
    }
}
