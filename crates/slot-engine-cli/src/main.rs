//! `slots` CLI - generate, resolve, and check clinic appointment slots from the
//! command line.
//!
//! ## Usage
//!
//! ```sh
//! # Split a working interval into 15-minute slots
//! slots generate --day Monday --start 08:00 --end 09:00 --room 1 --date 2026-03-16
//!
//! # Bookable slots for one date (JSON request on stdin)
//! slots available < request.json
//!
//! # Same, hiding slots that already started, in an explicit zone
//! slots available -i request.json --hide-past --now 2026-03-16T11:10:00Z --timezone America/Santiago
//!
//! # Availability over a date range
//! slots range -i range.json
//!
//! # Conflicts of a proposed schedule entry (add --cross-specialty for the owner pass)
//! slots check -i check.json
//!
//! # Validate an admin-form draft
//! slots validate -i draft.json
//!
//! # Dates a weekday falls on, and the selectable time grid
//! slots dates --day Lunes --from 2026-03-01 --until 2026-03-31
//! slots options
//! ```
//!
//! Logging goes to stderr and is controlled by `SLOTS_LOG` (default `warn`).

use std::collections::BTreeMap;
use std::io::{self, Read};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use slot_engine::interval::parse_weekday;
use slot_engine::overlap::{find_owner_conflicts, find_room_conflicts};
use slot_engine::recurrence::occurrences;
use slot_engine::rules::time_options;
use slot_engine::slots::group_by_period;
use slot_engine::zone::{discard_started, parse_date, parse_instant};
use slot_engine::{
    generate_slots, resolve_availability, resolve_range, validate_rule, AvailabilityRequest,
    BookedInterval, EngineConfig, OwnerId, RoomId, RuleDraft, SlotDuration, WorkingInterval,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "slots", version, about = "Clinic appointment slot engine CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON engine configuration file (slot_minutes, timezone, rules)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Slot length in minutes (overrides the configuration)
    #[arg(long, global = true)]
    duration: Option<u16>,

    /// IANA timezone slot times are expressed in (overrides the configuration)
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// Output file (writes to stdout if omitted)
    #[arg(short, long, global = true)]
    output: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Split one working interval into fixed-length slots
    Generate {
        /// Day of the week (English or Spanish name)
        #[arg(long)]
        day: String,
        /// Start time, HH:MM
        #[arg(long)]
        start: String,
        /// End time, HH:MM
        #[arg(long)]
        end: String,
        #[arg(long, default_value_t = 1)]
        room: u64,
        #[arg(long, default_value_t = 1)]
        owner: u64,
        /// Date the slots are for, YYYY-MM-DD
        #[arg(long)]
        date: String,
    },
    /// Bookable slots for an owner in a room on one date
    Available {
        /// Request JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Drop slots that start at or before --now
        #[arg(long)]
        hide_past: bool,
        /// Reference instant, RFC 3339 (defaults to the current time)
        #[arg(long)]
        now: Option<String>,
        /// Group slots into morning, afternoon, and evening
        #[arg(long)]
        by_period: bool,
    },
    /// Bookable slots for every working date in a range
    Range {
        /// Request JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Conflicts between a proposed schedule entry and existing ones
    Check {
        /// Request JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Also run the cross-specialty pass over the owner's other assignments
        #[arg(long)]
        cross_specialty: bool,
    },
    /// Validate a schedule entry draft against the configured rules
    Validate {
        /// Draft JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Dates in a range that fall on a given weekday
    Dates {
        #[arg(long)]
        day: String,
        /// First date, YYYY-MM-DD
        #[arg(long)]
        from: String,
        /// Last date (inclusive), YYYY-MM-DD
        #[arg(long)]
        until: String,
    },
    /// Selectable start/end times on the configured grid
    Options,
}

#[derive(Deserialize)]
struct AvailableInput {
    owner: OwnerId,
    room: RoomId,
    date: String,
    #[serde(default)]
    working: Vec<WorkingInterval>,
    #[serde(default)]
    booked: Vec<BookedInterval>,
}

#[derive(Deserialize)]
struct RangeInput {
    owner: OwnerId,
    room: RoomId,
    from: String,
    until: String,
    #[serde(default)]
    working: Vec<WorkingInterval>,
    #[serde(default)]
    booked: BTreeMap<NaiveDate, Vec<BookedInterval>>,
}

#[derive(Deserialize)]
struct CheckInput {
    candidate: WorkingInterval,
    #[serde(default)]
    existing: Vec<WorkingInterval>,
}

#[derive(Serialize)]
struct CheckReport {
    conflict: bool,
    room_conflicts: Vec<slot_engine::Conflict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    owner_conflicts: Option<Vec<slot_engine::Conflict>>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("SLOTS_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let tz = config.tz().context("Invalid timezone")?;
    debug!(
        slot_minutes = config.slot_minutes.get(),
        timezone = %config.timezone,
        "resolved configuration"
    );

    let rendered = match cli.command {
        Commands::Generate {
            day,
            start,
            end,
            room,
            owner,
            date,
        } => {
            let day = parse_weekday(&day)?;
            let interval = WorkingInterval::parse(day, &start, &end, RoomId(room), OwnerId(owner))
                .context("Invalid working interval")?;
            let date = parse_date(&date)?;
            let slots = generate_slots(&interval, config.slot_minutes, date);
            info!(count = slots.len(), "generated slots");
            serde_json::to_string_pretty(&slots)?
        }
        Commands::Available {
            input,
            hide_past,
            now,
            by_period,
        } => {
            let request: AvailableInput = read_json(input.as_deref())?;
            let date = parse_date(&request.date)?;
            let mut availability = resolve_availability(&AvailabilityRequest {
                owner: request.owner,
                room: request.room,
                date,
                working: &request.working,
                booked: &request.booked,
                duration: config.slot_minutes,
            });
            info!(
                owner = %request.owner,
                room = %request.room,
                date = %date,
                count = availability.slots.len(),
                "resolved availability"
            );

            if hide_past {
                let now = match now.as_deref() {
                    Some(raw) => parse_instant(raw)?,
                    None => Utc::now(),
                };
                availability.slots = discard_started(availability.slots, now, tz);
                debug!(%now, remaining = availability.slots.len(), "discarded started slots");
            }

            if by_period {
                serde_json::to_string_pretty(&group_by_period(&availability.slots))?
            } else {
                serde_json::to_string_pretty(&availability)?
            }
        }
        Commands::Range { input } => {
            let request: RangeInput = read_json(input.as_deref())?;
            let days = resolve_range(
                request.owner,
                request.room,
                parse_date(&request.from)?,
                parse_date(&request.until)?,
                &request.working,
                &request.booked,
                config.slot_minutes,
                tz,
            )?;
            info!(dates = days.len(), "resolved availability range");
            serde_json::to_string_pretty(&days)?
        }
        Commands::Check {
            input,
            cross_specialty,
        } => {
            let request: CheckInput = read_json(input.as_deref())?;
            let room_conflicts = find_room_conflicts(&request.candidate, &request.existing);
            let owner_conflicts =
                cross_specialty.then(|| find_owner_conflicts(&request.candidate, &request.existing));
            let conflict = !room_conflicts.is_empty()
                || owner_conflicts.as_ref().is_some_and(|c| !c.is_empty());
            info!(conflict, "checked schedule entry");
            serde_json::to_string_pretty(&CheckReport {
                conflict,
                room_conflicts,
                owner_conflicts,
            })?
        }
        Commands::Validate { input } => {
            let draft: RuleDraft = read_json(input.as_deref())?;
            let interval = validate_rule(&draft, &config.rules)?;
            serde_json::to_string_pretty(&interval)?
        }
        Commands::Dates { day, from, until } => {
            let day = parse_weekday(&day)?;
            let dates = occurrences(day, parse_date(&from)?, parse_date(&until)?, tz)?;
            serde_json::to_string_pretty(&dates)?
        }
        Commands::Options => {
            let options: Vec<String> = time_options(&config.rules)
                .into_iter()
                .map(|t| t.to_string())
                .collect();
            serde_json::to_string_pretty(&options)?
        }
    };

    write_output(cli.output.as_deref(), &rendered)
}

/// Build the engine configuration from --config, then apply flag overrides.
fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match cli.config.as_deref() {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            EngineConfig::from_json(&raw)
                .with_context(|| format!("Invalid config file: {}", path))?
        }
        None => EngineConfig::default(),
    };

    if let Some(minutes) = cli.duration {
        config.slot_minutes = SlotDuration::minutes(minutes)?;
    }
    if let Some(tz) = &cli.timezone {
        config.timezone = tz.clone();
    }
    Ok(config)
}

fn read_json<T: serde::de::DeserializeOwned>(path: Option<&str>) -> Result<T> {
    let raw = read_input(path)?;
    debug!(bytes = raw.len(), source = path.unwrap_or("stdin"), "read input");
    serde_json::from_str(&raw).context("Failed to parse input JSON")
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
