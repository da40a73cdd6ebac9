//! CLI tool for bubbleview - renders a data file as an SVG bubble chart
//!
//! Usage:
//!   bubbleview_cli <input.xlsx>                    # SVG to stdout
//!   bubbleview_cli <input.xlsx> -o chart.svg       # SVG to file
//!   bubbleview_cli <input.xlsx> --increase 2       # show 10 more rows
//!   bubbleview_cli <input.xlsx> --json             # validated records as JSON

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bubbleview::{BubbleView, BubbleviewError, ViewerConfig};

/// Render the leading rows of an X/Y/R/Name sheet as a bubble chart
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Workbook (.xlsx) or delimited (.csv/.tsv) file to load
    input: PathBuf,

    /// Write output here instead of stdout
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// JSON viewer configuration (camelCase keys, all optional)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Rows shown right after loading
    #[arg(long, value_name = "N")]
    rows: Option<usize>,

    /// Window step: 1, 5, 10 or 100
    #[arg(long, value_name = "S")]
    step: Option<u32>,

    /// Apply the increase operation K times
    #[arg(long, value_name = "K", default_value = "0")]
    increase: usize,

    /// Apply the decrease operation K times (after increases)
    #[arg(long, value_name = "K", default_value = "0")]
    decrease: usize,

    /// Print the validated records as JSON instead of an SVG
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "bubbleview=debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_config(args: &Args) -> Result<ViewerConfig, BubbleviewError> {
    let mut config = match &args.config {
        Some(path) => ViewerConfig::from_json(&fs::read_to_string(path)?)?,
        None => ViewerConfig::default(),
    };
    if let Some(rows) = args.rows {
        config.initial_visible = rows;
    }
    if let Some(step) = args.step {
        config.initial_step = step;
    }
    Ok(config)
}

fn run(args: &Args) -> Result<String, BubbleviewError> {
    let config = read_config(args)?;
    let data = fs::read(&args.input)?;
    tracing::debug!(path = %args.input.display(), bytes = data.len(), "input read");

    let mut view = BubbleView::new_headless(config)?;
    view.load(&data)?;
    for _ in 0..args.increase {
        view.increase()?;
    }
    for _ in 0..args.decrease {
        view.decrease()?;
    }
    tracing::info!(
        visible = view.visible_count(),
        total = view.total_count(),
        "window applied"
    );

    if args.json {
        let mut json = serde_json::to_string_pretty(view.state().dataset())?;
        json.push('\n');
        Ok(json)
    } else {
        Ok(view.svg().to_string())
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let output = match run(&args) {
        Ok(output) => output,
        Err(BubbleviewError::Load(e)) => {
            eprintln!("{}", e.user_message());
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let written = match &args.output {
        Some(path) => fs::write(path, &output).map(|()| eprintln!("Written: {}", path.display())),
        None => io::stdout().write_all(output.as_bytes()),
    };
    if let Err(e) = written {
        eprintln!("Error writing output: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
