use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::{ArgAction, Args, Parser, Subcommand};
use dashgrid_layout::{LayoutItem, MIN_H, MIN_W, compact_with_report};
use dashgrid_timerange::{parse_date_time, to_iso_string};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::DashgridConfig;
use crate::error::{DashgridError, Result};
use crate::logging::init_logging;

#[derive(Debug, Parser)]
#[command(
    name = "dashgrid",
    about = "Compact dashboard layouts and normalize time ranges",
    version
)]
pub struct Cli {
    /// Configuration file (.toml or .json).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compact a JSON layout and print the result.
    Compact(CompactArgs),

    /// Convert a JSON layout to pixel rectangles.
    Pixels(PixelsArgs),

    /// Normalize a time-range string into a query payload.
    #[command(name = "time-range")]
    TimeRange(TimeRangeArgs),

    /// Print grid constants and derived sizes.
    Metrics(MetricsArgs),
}

#[derive(Debug, Args)]
pub struct CompactArgs {
    /// Layout file; `-` or absent reads stdin.
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// Id of the panel that was just moved or resized.
    #[arg(long)]
    pub moved: Option<String>,

    /// Fail when the moved id is not in the layout.
    #[arg(long)]
    pub strict: bool,

    /// Apply minimum panel sizes before compacting.
    #[arg(long)]
    pub clamp: bool,

    /// Include gravity pass and displacement counts.
    #[arg(long)]
    pub report: bool,

    /// Indent the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Args)]
pub struct PixelsArgs {
    /// Layout file; `-` or absent reads stdin.
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// Container width in pixels.
    #[arg(long, default_value_t = 1200.0)]
    pub container_width: f64,

    /// Indent the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Args)]
pub struct TimeRangeArgs {
    /// Range string, e.g. `15m`, `now-2h to now` or `abs:<from>|<to>`.
    pub value: String,

    /// Print the display label instead of the payload.
    #[arg(long, conflicts_with = "resolve")]
    pub label: bool,

    /// Also resolve both ends to instants.
    #[arg(long)]
    pub resolve: bool,

    /// Reference instant for --resolve (defaults to the current time).
    #[arg(long, value_parser = parse_instant, requires = "resolve")]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Args)]
pub struct MetricsArgs {
    /// Container width in pixels, to derive the column width.
    #[arg(long)]
    pub container_width: Option<f64>,
}

/// Layout input: a bare array, or an object carrying the items and
/// optionally the moved id.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LayoutDocument {
    Items(Vec<LayoutItem>),
    Wrapped {
        items: Vec<LayoutItem>,
        #[serde(default)]
        moved: Option<String>,
    },
}

impl LayoutDocument {
    fn into_parts(self) -> (Vec<LayoutItem>, Option<String>) {
        match self {
            Self::Items(items) => (items, None),
            Self::Wrapped { items, moved } => (items, moved),
        }
    }
}

#[derive(Debug, Serialize)]
struct PixelPanel<'a> {
    id: &'a str,
    #[serde(flatten)]
    rect: dashgrid_layout::PixelRect,
}

fn parse_instant(value: &str) -> std::result::Result<DateTime<Utc>, String> {
    parse_date_time(value).ok_or_else(|| format!("not a date-time: {value:?}"))
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    init_logging(&config.logging);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(&cli.command, &config, &mut out)
}

/// Configuration named by `--config` (or the defaults), with the
/// command-line verbosity applied.
pub fn load_config(cli: &Cli) -> Result<DashgridConfig> {
    let mut config = match &cli.config {
        Some(path) => DashgridConfig::load(path)?,
        None => DashgridConfig::default(),
    };
    config.logging = config.logging.with_verbosity(cli.verbose, cli.quiet);
    Ok(config)
}

/// Run one subcommand, writing its output to `out`.
pub fn execute(command: &Commands, config: &DashgridConfig, out: &mut dyn Write) -> Result<()> {
    match command {
        Commands::Compact(args) => run_compact(args, config, out),
        Commands::Pixels(args) => run_pixels(args, config, out),
        Commands::TimeRange(args) => run_time_range(args, config, out),
        Commands::Metrics(args) => run_metrics(args, config, out),
    }
}

fn run_compact(args: &CompactArgs, config: &DashgridConfig, out: &mut dyn Write) -> Result<()> {
    let document: LayoutDocument = serde_json::from_str(&read_input(args.input.as_deref())?)?;
    let (mut items, embedded_moved) = document.into_parts();
    let moved = args.moved.clone().or(embedded_moved);

    if let Some(id) = moved.as_deref() {
        if args.strict && !items.iter().any(|item| item.id == id) {
            return Err(DashgridError::UnknownMovedId { id: id.to_string() });
        }
    }
    if args.clamp {
        items = items
            .iter()
            .map(|item| config.grid.clamp_to_minimums(item))
            .collect();
    }

    let report = compact_with_report(&items, moved.as_deref());
    tracing::info!(
        items = report.items.len(),
        passes = report.passes,
        displaced = report.displaced,
        "compacted layout"
    );
    if args.report {
        let value = json!({
            "items": report.items,
            "passes": report.passes,
            "displaced": report.displaced,
        });
        write_json(out, &value, args.pretty)
    } else {
        write_json(out, &report.items, args.pretty)
    }
}

fn run_pixels(args: &PixelsArgs, config: &DashgridConfig, out: &mut dyn Write) -> Result<()> {
    let (items, _) = serde_json::from_str::<LayoutDocument>(&read_input(args.input.as_deref())?)?
        .into_parts();
    let grid = &config.grid;
    let col_w = grid.calc_col_w(args.container_width);
    let panels: Vec<PixelPanel<'_>> = items
        .iter()
        .map(|item| PixelPanel {
            id: &item.id,
            rect: grid.grid_to_pixel(item, col_w),
        })
        .collect();
    let value = json!({
        "col_w": col_w,
        "container_height": grid.container_height(&items),
        "panels": panels,
    });
    write_json(out, &value, args.pretty)
}

fn run_time_range(
    args: &TimeRangeArgs,
    config: &DashgridConfig,
    out: &mut dyn Write,
) -> Result<()> {
    let normalizer = config.normalizer();
    if args.label {
        writeln!(out, "{}", normalizer.format_label(&args.value))?;
        return Ok(());
    }

    let payload = normalizer.to_payload(&args.value);
    tracing::info!(kind = ?payload.kind, from = %payload.from, to = %payload.to, "normalized time range");
    if !args.resolve {
        return write_json(out, &payload, false);
    }

    let now = args.now.unwrap_or_else(Utc::now);
    let resolved = payload.resolve(now).map(|(from, to)| {
        json!({
            "from": to_iso_string(&from),
            "to": to_iso_string(&to),
        })
    });
    let value = json!({
        "payload": payload,
        "resolved": resolved,
    });
    write_json(out, &value, false)
}

fn run_metrics(args: &MetricsArgs, config: &DashgridConfig, out: &mut dyn Write) -> Result<()> {
    let grid = &config.grid;
    let mut value = json!({
        "cols": grid.cols,
        "row_h": grid.row_h,
        "gap": grid.gap,
        "min_w": MIN_W,
        "min_h": MIN_H,
        "row_pitch": grid.row_pitch(),
    });
    if let Some(width) = args.container_width {
        value["container_width"] = json!(width);
        value["col_w"] = json!(grid.calc_col_w(width));
    }
    write_json(out, &value, true)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn write_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}
