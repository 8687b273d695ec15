use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use jdate::bridge::{self, HostBridge, JsonLinesBridge, NullBridge};
use jdate::commands;
use jdate::config;
use jdate::formatting::{to_canonical, DateFormat};
use jdate::tui::{self, RunOptions};
use jdate::types::{Configuration, WidthSpec};

// Default Configuration Constants
/// Default log level when not specified
const DEFAULT_LOG_LEVEL: &str = "info";

/// Default log file path (no logging to file)
const DEFAULT_LOG_FILE: &str = "/dev/null";

#[derive(Parser)]
#[command(name = "jdate")]
#[command(about = "Japanese date picker", long_about = "Japanese date picker\n\nIf no command is specified, the picker starts in interactive mode.")]
struct Cli {
    /// Set log level (trace, debug, info, warn, error)
    #[arg(short = 'L', long, global = true, default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    /// Log file path (default: /dev/null for no logging)
    #[arg(short = 'F', long, global = true, default_value = DEFAULT_LOG_FILE)]
    log_file: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick a date interactively and print the committed value
    Pick(PickArgs),

    /// Show the calendar scale, placement and frame height for a geometry
    Layout {
        /// Container width in pixels
        #[arg(short, long)]
        container: u32,

        /// Frame width in pixels
        #[arg(short, long)]
        frame: u32,

        /// Apply the sidebar scale floor
        #[arg(short, long)]
        sidebar: bool,

        /// Compute the frame height of an open calendar
        #[arg(short, long)]
        open: bool,

        /// Measured input and calendar popup heights in pixels (e.g. 80,240)
        #[arg(short, long, value_delimiter = ',', num_args = 2, requires = "open")]
        measured: Option<Vec<u32>>,
    },

    /// Show how a date is displayed in each format
    Format {
        /// Date in YYYY-MM-DD format
        date: String,

        /// Display format identifier (e.g. DD.MM.YYYY); all formats when omitted
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Display current configuration
    Config,
}

#[derive(clap::Args, Default)]
struct PickArgs {
    /// Field label
    #[arg(short, long)]
    label: Option<String>,

    /// Initial value in YYYY-MM-DD format
    #[arg(short, long)]
    value: Option<String>,

    /// Earliest selectable date
    #[arg(long)]
    min: Option<String>,

    /// Latest selectable date
    #[arg(long)]
    max: Option<String>,

    /// Display format identifier
    #[arg(short, long, default_value = "YYYY/MM/DD")]
    format: String,

    /// Show the field without allowing changes
    #[arg(long)]
    disabled: bool,

    /// Container width cap in pixels; stretch when omitted
    #[arg(short, long)]
    width: Option<u32>,

    /// Render as if embedded in a sidebar
    #[arg(long)]
    sidebar: bool,

    /// Read the argument bundle from a JSON file, ignoring the flags above
    #[arg(long, value_name = "FILE")]
    args: Option<PathBuf>,

    /// Follow a file of JSON argument bundles, one per line, as host re-renders
    #[arg(long, value_name = "FILE")]
    args_stream: Option<PathBuf>,

    /// Width of the emulated host frame in columns
    #[arg(long, value_name = "COLUMNS")]
    frame_width: Option<u16>,

    /// Write host messages as JSON lines to this file
    #[arg(long, value_name = "FILE")]
    bridge_out: Option<PathBuf>,
}

impl PickArgs {
    fn to_configuration(&self) -> Result<Configuration> {
        if let Some(path) = &self.args {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            return bridge::parse_configuration(&json)
                .with_context(|| format!("Invalid argument bundle in {}", path.display()));
        }

        Ok(Configuration {
            label: self.label.clone(),
            value: self.value.clone(),
            min_value: self.min.clone(),
            max_value: self.max.clone(),
            format: DateFormat::from_identifier_or_default(&self.format),
            disabled: self.disabled,
            width: self.width.map_or(WidthSpec::Stretch, WidthSpec::Pixels),
            sidebar_mode: self.sidebar,
        })
    }

    fn host_bridge(&self) -> Result<Arc<dyn HostBridge>> {
        match &self.bridge_out {
            Some(path) => {
                let file = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open bridge output {}", path.display()))?;
                Ok(Arc::new(JsonLinesBridge::new(file)))
            }
            None => Ok(Arc::new(NullBridge)),
        }
    }
}

fn init_logging(log_level: &str, log_file: &str) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Failed to open log file {}: {}", log_file, e);
            return;
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Handle the config command - display current configuration
fn handle_config_command() {
    let cfg = config::read();

    let (path_str, exists) = match config::get_config_path() {
        Some(path) => {
            let exists = path.exists();
            (path.display().to_string(), exists)
        }
        None => ("Unable to determine config path".to_string(), false),
    };

    println!("Configuration File: {} (Exists: {})", path_str, if exists { "yes" } else { "no" });
    println!();
    println!("Current Configuration:");
    println!("=====================");
    println!("log_level: {}", cfg.log_level);
    println!("log_file: {}", cfg.log_file);
    println!("focus_poll_interval_ms: {}", cfg.focus_poll_interval_ms);
    println!("select_close_delay_ms: {}", cfg.select_close_delay_ms);
    println!("cell_width_px: {}", cfg.cell_width_px);
    println!("cell_height_px: {}", cfg.cell_height_px);
    println!();
    println!("[display]");
    println!("use_unicode: {}", cfg.display.use_unicode);
    println!("selection_fg: {:?}", cfg.display.selection_fg);
    println!("unfocused_selection_fg: {:?}{}",
        cfg.display.unfocused_selection_fg(),
        if cfg.display.unfocused_selection_fg.is_none() { " (auto: 50% darker)" } else { "" }
    );
    println!("muted_fg: {:?}", cfg.display.muted_fg);
}

/// Resolve log configuration from CLI args and config file
/// CLI arguments take precedence over config file
fn resolve_log_config<'a>(cli: &'a Cli, config: &'a config::Config) -> (&'a str, &'a str) {
    let log_level = if cli.log_level != DEFAULT_LOG_LEVEL {
        cli.log_level.as_str()
    } else {
        config.log_level.as_str()
    };

    let log_file = if cli.log_file != DEFAULT_LOG_FILE {
        cli.log_file.as_str()
    } else {
        config.log_file.as_str()
    };

    (log_level, log_file)
}

/// Run the interactive picker, following an argument stream when given
async fn run_pick_mode(config: config::Config, pick: PickArgs) -> Result<()> {
    let args = pick.to_configuration()?;
    let bridge = pick.host_bridge()?;

    let updates = match &pick.args_stream {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open argument stream {}", path.display()))?;
            let (tx, rx) = mpsc::unbounded_channel();
            tokio::spawn(async move {
                match bridge::forward_configurations(BufReader::new(file), tx).await {
                    Ok(count) => tracing::debug!("Argument stream ended after {} bundles", count),
                    Err(e) => tracing::warn!("Argument stream failed: {}", e),
                }
            });
            Some(rx)
        }
        None => None,
    };

    let selected = tui::run(RunOptions {
        args,
        config,
        bridge,
        frame_columns: pick.frame_width,
        updates,
    })
    .await
    .context("Picker terminated abnormally")?;

    match selected {
        Some(date) => println!("{}", to_canonical(date)),
        None => println!("null"),
    }
    Ok(())
}

/// Execute a CLI command by routing it to the appropriate command handler
async fn execute_command(config: config::Config, command: Commands) -> Result<()> {
    match command {
        Commands::Config => unreachable!("Config command should be handled before execute_command"),
        Commands::Pick(pick) => run_pick_mode(config, pick).await,
        Commands::Layout {
            container,
            frame,
            sidebar,
            open,
            measured,
        } => commands::layout::run(commands::layout::LayoutArgs {
            container_px: container,
            frame_px: frame,
            sidebar,
            open,
            measured: measured.and_then(|heights| match heights[..] {
                [input, calendar] => Some((input, calendar)),
                _ => None,
            }),
        }),
        Commands::Format { date, format } => commands::format::run(&date, format.as_deref()),
    }
}

#[tokio::main]
async fn main() {
    let config = config::read();
    let cli = Cli::parse();

    // Resolve and initialize logging
    let (log_level, log_file) = resolve_log_config(&cli, &config);
    if log_file != DEFAULT_LOG_FILE {
        init_logging(log_level, log_file);
    }

    // If no subcommand, pick with default arguments
    let command = cli.command.unwrap_or_else(|| Commands::Pick(PickArgs {
        format: DateFormat::default().identifier().to_string(),
        ..Default::default()
    }));

    // Handle Config command separately
    if let Commands::Config = command {
        handle_config_command();
        return;
    }

    if let Err(e) = execute_command(config, command).await {
        eprintln!("Error: {:#}", e);
        tracing::error!("Command failed: {:#}", e);
        std::process::exit(1);
    }
}
