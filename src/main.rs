mod cmd;
mod ui;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDateTime};
use clap::{Parser, Subcommand};
use pickdial::data::persistence::set_data_dir;
use pickdial::data::{ConfigOverrides, Layout, PickerSettings, TimeFormat};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pickdial", about = "calendar and clock pickers for the terminal")]
struct Cli {
    /// Path to the data directory holding picker.yaml (default: ./config)
    #[arg(long, default_value = "./config")]
    data_dir: PathBuf,

    /// Settings to use instead of the data directory's picker.yaml (a directory or a .json file)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file (default: <data-dir>/pickdial.log)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Treat this as the current time, e.g. 2024-02-10T18:45:00
    #[arg(long)]
    now: Option<NaiveDateTime>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default picker.yaml into the data directory
    Init,
    /// Pick a date (YYYY-M-D) with the calendar panel
    Date {
        /// Initial value; today when omitted or malformed
        value: Option<String>,
        /// Show the month as a plain number in the header
        #[arg(long)]
        simplify: bool,
        #[arg(long)]
        layout: Option<Layout>,
        /// Accent color (#rrggbb or a color name)
        #[arg(long)]
        color: Option<String>,
    },
    /// Pick a time (H:MM or H:MM am|pm) with the clock panel
    Time {
        /// Initial value; now when omitted or malformed
        value: Option<String>,
        /// 24hr or ampm
        #[arg(long)]
        format: Option<TimeFormat>,
        #[arg(long)]
        layout: Option<Layout>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Print a month grid
    Month {
        year: Option<i32>,
        month: Option<u32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = if cli.data_dir.is_absolute() {
        cli.data_dir.clone()
    } else {
        std::env::current_dir()?.join(&cli.data_dir)
    };
    set_data_dir(data_dir.clone());

    // Auto-init when the data directory is missing or empty and the user did not
    // explicitly invoke the `init` subcommand.
    let is_init_command = matches!(cli.command, Some(Commands::Init));
    if !is_init_command && cli.config.is_none() && dir_needs_init(&data_dir) {
        eprintln!(
            "Data directory '{}' is missing or empty, running init...",
            data_dir.display()
        );
        cmd::init::run()?;
    }

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| data_dir.join("pickdial.log"));
    init_tracing(&log_file)?;

    let settings_path = cli.config.clone().unwrap_or_else(|| data_dir.clone());
    let defaults = PickerSettings::load_path(&settings_path)?;
    info!(path = %settings_path.display(), ?defaults, "settings loaded");

    match cli.command {
        Some(Commands::Init) => cmd::init::run(),
        Some(Commands::Date {
            value,
            simplify,
            layout,
            color,
        }) => {
            let overrides = ConfigOverrides {
                color,
                layout,
                simplify: simplify.then_some(true),
                ..Default::default()
            };
            cmd::date::run(value.as_deref(), &defaults, &overrides, cli.now)
        }
        Some(Commands::Time {
            value,
            format,
            layout,
            color,
        }) => {
            let overrides = ConfigOverrides {
                color,
                layout,
                format,
                ..Default::default()
            };
            cmd::time::run(value.as_deref(), &defaults, &overrides, cli.now)
        }
        Some(Commands::Month { year, month }) => {
            let today = cli.now.unwrap_or_else(|| Local::now().naive_local()).date();
            cmd::month::run(
                year.unwrap_or(today.year()),
                month.unwrap_or(today.month()),
                today,
            )
        }
        None => cmd::date::run(None, &defaults, &ConfigOverrides::default(), cli.now),
    }
}

/// Sends `tracing` output to `path`; the terminal belongs to the picker.
fn init_tracing(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log dir {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("warn,pickdial=info"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

/// Returns true when `dir` does not exist or exists but contains no files.
fn dir_needs_init(dir: &Path) -> bool {
    if !dir.exists() {
        return true;
    }
    dir.read_dir()
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}
