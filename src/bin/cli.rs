use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use log::{debug, info};
use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use timeline_engine::import::{self, ItemFormat};
use timeline_engine::recurrence::weekday_from_name;
use timeline_engine::{
    EndCondition, GanttLayout, LayoutConfig, RecurrenceConfig, RecurrencePreset, RecurrenceType,
    ViewMode,
};

/// Gantt timeline layout and recurrence preview tool
#[derive(Parser)]
#[command(version, about, name = "cli")]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out schedule items and print the chart geometry as JSON
    Layout {
        /// Item list (JSON array or CSV)
        #[arg(long)]
        items: PathBuf,
        /// Input format; guessed from the file extension when omitted
        #[arg(long)]
        format: Option<ItemFormat>,
        /// Layout settings as JSON; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        view: Option<ViewMode>,
        #[arg(long)]
        row_height: Option<f64>,
        /// Reference instant (RFC 3339 or YYYY-MM-DD); defaults to now
        #[arg(long)]
        reference: Option<String>,
    },
    /// Print upcoming dates of a recurrence rule, one per line
    Occurrences {
        #[arg(long)]
        start: NaiveDate,
        #[arg(long = "type")]
        recurrence_type: Option<RecurrenceType>,
        /// Start from a named preset (see `presets`)
        #[arg(long)]
        preset: Option<RecurrencePreset>,
        #[arg(long)]
        interval: Option<u32>,
        /// Comma separated weekdays, e.g. mon,wed,fri
        #[arg(long)]
        days: Option<String>,
        #[arg(long)]
        day_of_month: Option<u32>,
        #[arg(long, default_value_t = 10)]
        count: usize,
        /// Last permitted date, inclusive
        #[arg(long)]
        until: Option<NaiveDate>,
        #[arg(long)]
        max: Option<usize>,
        /// Print the rule summary before the dates
        #[arg(long)]
        describe: bool,
    },
    /// List recurrence presets
    Presets,
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    match args.command {
        Commands::Layout {
            items,
            format,
            config,
            view,
            row_height,
            reference,
        } => {
            let mut layout_config = match config {
                Some(path) => serde_json::from_reader(BufReader::new(File::open(&path)?))?,
                None => LayoutConfig::default(),
            };
            if let Some(view) = view {
                layout_config.view_mode = view;
            }
            if let Some(row_height) = row_height {
                layout_config.row_height = row_height;
            }
            let reference = match reference {
                Some(value) => import::parse_instant(&value)?.unwrap_or_else(Utc::now),
                None => Utc::now(),
            };
            print_layout(&items, format, &layout_config, reference)
        }
        Commands::Occurrences {
            start,
            recurrence_type,
            preset,
            interval,
            days,
            day_of_month,
            count,
            until,
            max,
            describe,
        } => {
            let mut config = RecurrenceConfig::default();
            let preset_type = preset.map(|preset| config.apply_preset(preset));
            let recurrence_type = recurrence_type
                .or(preset_type)
                .ok_or("either --type or --preset is required")?;

            if let Some(interval) = interval {
                match recurrence_type {
                    RecurrenceType::Daily => config.daily.interval = interval,
                    RecurrenceType::Weekly => config.weekly.interval = interval,
                    RecurrenceType::Monthly => config.monthly.interval = interval,
                }
            }
            if let Some(days) = days {
                config.weekly.days_of_week = days
                    .split(',')
                    .filter(|part| !part.trim().is_empty())
                    .map(weekday_from_name)
                    .collect::<Result<_, _>>()?;
            }
            if let Some(day_of_month) = day_of_month {
                config.monthly.day_of_month = day_of_month;
            }

            let rule = config.rule(recurrence_type)?;
            if describe {
                println!("{}", rule.describe());
            }
            let end = EndCondition {
                until,
                max_occurrences: max,
            };
            debug!("expanding {recurrence_type} rule from {start}, end {end:?}");
            for date in rule.occurrences_until(start, &end).take(count) {
                println!("{date}");
            }
            Ok(())
        }
        Commands::Presets => {
            for preset in RecurrencePreset::ALL {
                println!("  {:<20} {}", preset.name(), preset.expand().describe());
            }
            Ok(())
        }
    }
}

fn print_layout(
    path: &Path,
    format: Option<ItemFormat>,
    config: &LayoutConfig,
    reference: DateTime<Utc>,
) -> Result<(), Box<dyn Error>> {
    let format = format.unwrap_or_else(|| ItemFormat::from_path(path));
    let items = import::read_items(BufReader::new(File::open(path)?), format)?;
    info!("loaded {} items from {}", items.len(), path.display());

    let layout = GanttLayout::compute(&items, config, reference)?;
    println!("{}", serde_json::to_string_pretty(&layout)?);
    Ok(())
}
