//! `replay` CLI: lay out a week of videos and live streams from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Lay out the current week (events JSON on stdin, layout JSON on stdout)
//! replay layout < events.json
//!
//! # Previous week, in another timezone, with render geometry
//! replay layout -i events.json --week-offset -1 --timezone America/New_York --geometry
//!
//! # Use a settings file (locale, timezone, week_start, overlap_policy, row_height)
//! replay layout -i events.json --settings settings.json
//!
//! # Split events into the seven day buckets without assigning lanes
//! replay split -i events.json --now 2026-03-05T12:00:00Z
//!
//! # Assign lanes to a single day of fragments
//! replay lanes --sort -i monday.json
//!
//! # Human-readable overview of a week
//! replay summary -i events.json
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use replay_calendar::{
    assign_lanes_with, split_by_day, CalendarSettings, Event, Fragment, OverlapPolicy, Week,
    WeekLayout, WeekStartDay,
};
use serde_json::json;
use std::io::{self, Read};
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "replay",
    version,
    about = "Weekly VOD and live-stream calendar layout"
)]
struct Cli {
    /// Increase log verbosity on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out a JSON array of events into days and lanes
    Layout {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Emit render geometry (left, width, top, height) for every fragment
        #[arg(long)]
        geometry: bool,
        #[command(flatten)]
        week: WeekArgs,
    },
    /// Split a JSON array of events into the seven day buckets of a week
    Split {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        #[command(flatten)]
        week: WeekArgs,
    },
    /// Assign lanes to a JSON array of fragments from a single day
    Lanes {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Sort fragments by start before assigning lanes
        #[arg(long)]
        sort: bool,
        /// Treat touching fragments as overlapping
        #[arg(long)]
        inclusive: bool,
    },
    /// Print fragments and lanes per day
    Summary {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        #[command(flatten)]
        week: WeekArgs,
    },
}

/// Options selecting the displayed week.
#[derive(Args)]
struct WeekArgs {
    /// Settings JSON file
    #[arg(long)]
    settings: Option<String>,
    /// IANA timezone (overrides the settings file)
    #[arg(long)]
    timezone: Option<String>,
    /// First day of the week (overrides the locale)
    #[arg(long, value_enum)]
    week_start: Option<WeekStartArg>,
    /// Weeks relative to the current one (-1 is the previous week)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    week_offset: i64,
    /// Reference instant used instead of the current time (RFC 3339)
    #[arg(long)]
    now: Option<DateTime<Utc>>,
    /// Treat touching events as overlapping
    #[arg(long)]
    inclusive: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum WeekStartArg {
    Monday,
    Sunday,
}

impl From<WeekStartArg> for WeekStartDay {
    fn from(arg: WeekStartArg) -> Self {
        match arg {
            WeekStartArg::Monday => WeekStartDay::Monday,
            WeekStartArg::Sunday => WeekStartDay::Sunday,
        }
    }
}

impl WeekArgs {
    /// Settings file (or defaults) with command-line overrides applied.
    fn settings(&self) -> Result<CalendarSettings> {
        let mut settings = match self.settings.as_deref() {
            Some(path) => {
                let json = read_input(Some(path))?;
                CalendarSettings::from_json(&json)
                    .with_context(|| format!("Failed to load settings: {}", path))?
            }
            None => CalendarSettings::default(),
        };

        if let Some(timezone) = &self.timezone {
            settings.timezone = timezone.clone();
        }
        if let Some(week_start) = self.week_start {
            settings.week_start = Some(week_start.into());
        }
        if self.inclusive {
            settings.overlap_policy = OverlapPolicy::Inclusive;
        }

        settings.validate().context("Invalid settings")?;
        Ok(settings)
    }

    fn week(&self, settings: &CalendarSettings) -> Result<Week> {
        let now = self.now.unwrap_or_else(Utc::now);
        settings
            .week(now, self.week_offset)
            .context("Failed to resolve the displayed week")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Layout {
            input,
            output,
            geometry,
            week,
        } => {
            let settings = week.settings()?;
            let week = week.week(&settings)?;
            let layout = build_layout(input.as_deref(), &week, &settings)?;

            let json = if geometry {
                serde_json::to_string_pretty(&with_geometry(&layout, settings.row_height))?
            } else {
                serde_json::to_string_pretty(&layout)?
            };
            write_output(output.as_deref(), &json)?;
        }
        Commands::Split {
            input,
            output,
            week,
        } => {
            let settings = week.settings()?;
            let week = week.week(&settings)?;
            let events = read_events(input.as_deref())?;

            let buckets = split_by_day(&events, &week).context("Failed to split events")?;
            let json = serde_json::to_string_pretty(&buckets)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Lanes {
            input,
            output,
            sort,
            inclusive,
        } => {
            let raw = read_input(input.as_deref())?;
            let mut fragments: Vec<Fragment> =
                serde_json::from_str(&raw).context("Failed to parse fragments JSON")?;
            if sort {
                fragments.sort_by_key(|f| f.start_in_seconds);
            }

            let policy = if inclusive {
                OverlapPolicy::Inclusive
            } else {
                OverlapPolicy::HalfOpen
            };
            let day = assign_lanes_with(&fragments, policy).context("Failed to assign lanes")?;
            let json = serde_json::to_string_pretty(&day)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Summary { input, week } => {
            let settings = week.settings()?;
            let week = week.week(&settings)?;
            let layout = build_layout(input.as_deref(), &week, &settings)?;

            println!(
                "Week:       {} - {} ({})",
                week.day(0).format("%d/%m"),
                week.day(6).format("%d/%m"),
                week.timezone()
            );
            for day in &layout.days {
                println!(
                    "{} {}  {:>3} fragments  {:>2} lanes",
                    day.date.format("%a"),
                    day.date.format("%d/%m"),
                    day.fragments.len(),
                    day.lane_count
                );
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn build_layout(
    input: Option<&str>,
    week: &Week,
    settings: &CalendarSettings,
) -> Result<WeekLayout> {
    let events = read_events(input)?;

    tracing::info!(
        first_day = %week.first_day(),
        timezone = %week.timezone(),
        events = events.len(),
        "laying out week"
    );

    WeekLayout::build(&events, week, settings.overlap_policy).context("Failed to lay out week")
}

/// Layout JSON extended with the visible window, row heights and per-fragment geometry.
fn with_geometry(layout: &WeekLayout, row_height: f64) -> serde_json::Value {
    let window = layout.visible_window();

    let days: Vec<serde_json::Value> = layout
        .days
        .iter()
        .map(|day| {
            let placements: Vec<serde_json::Value> = day
                .placements(window, row_height)
                .map(|(fragment, geometry)| {
                    json!({
                        "id": fragment.fragment.id,
                        "lane_index": fragment.lane_index,
                        "is_fragment_copy": fragment.fragment.is_fragment_copy,
                        "is_live": fragment.fragment.is_live,
                        "geometry": geometry,
                    })
                })
                .collect();

            json!({
                "index": day.index,
                "date": day.date,
                "lane_count": day.lane_count,
                "row_height": day.row_height(row_height),
                "placements": placements,
            })
        })
        .collect();

    json!({
        "first_day": layout.first_day,
        "timezone": layout.timezone.name(),
        "window": window,
        "hours": window.hour_labels(),
        "days": days,
    })
}

fn read_events(path: Option<&str>) -> Result<Vec<Event>> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw).context("Failed to parse events JSON")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
