//! Create a record of any kind.

use std::io::Write;

use anyhow::{Context, Result, bail, ensure};
use carelog_core::record::{
    ActivityDetails, NewActivity, NewBehavior, NewHydration, NewLocation, NewMeal, NewSleep,
};
use carelog_core::{FeedItem, NewRecord, project};
use carelog_state::Coordinator;
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};

use super::resolve_child;
use super::util::parse_datetime;
use crate::Config;

#[derive(Debug, Args)]
pub struct LogArgs {
    /// Child ID (defaults to `default_child`, then the first child).
    #[arg(long)]
    pub child: Option<String>,

    #[command(subcommand)]
    pub record: LogKind,
}

/// One subcommand per log kind.
#[derive(Debug, Clone, Subcommand)]
pub enum LogKind {
    /// Log a meal.
    Meal {
        /// Breakfast, Lunch, Dinner, Snack...
        #[arg(long = "type")]
        meal_type: String,
        #[arg(long)]
        photo_url: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Log sleep. Leave out --end while the child is still asleep.
    Sleep {
        /// When sleep started (ISO 8601, "now", or e.g. "20 minutes ago").
        #[arg(long, default_value = "now")]
        start: String,
        /// When sleep ended.
        #[arg(long)]
        end: Option<String>,
        /// Quality from 1 to 5.
        #[arg(long, value_parser = clap::value_parser!(i32).range(1..=5))]
        rating: Option<i32>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Log a behavior observation.
    Behavior {
        /// e.g. calm, meltdown, happy.
        #[arg(long = "type")]
        behavior_type: String,
        /// Mood from 1 to 5.
        #[arg(long, value_parser = clap::value_parser!(i32).range(1..=5))]
        mood: Option<i32>,
        /// What happened.
        #[arg(long)]
        incident: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Log a drink.
    Hydration {
        #[arg(long, default_value = "Water")]
        fluid: String,
        /// Amount in millilitres.
        #[arg(long)]
        amount: u32,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Log a location check-in.
    Location {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Place name, e.g. "Park".
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Log an activity.
    Activity {
        /// e.g. Walk, Swimming, Therapy.
        #[arg(long = "type")]
        activity_type: String,
        /// Duration in minutes.
        #[arg(long)]
        minutes: Option<u32>,
        #[arg(long)]
        notes: Option<String>,
    },
}

impl LogKind {
    /// Builds the create request, resolving relative times against `now`.
    pub fn to_record(&self, now: DateTime<Utc>) -> Result<NewRecord> {
        let record = match self.clone() {
            Self::Meal {
                meal_type,
                photo_url,
                notes,
            } => NewRecord::Meal(NewMeal {
                meal_type: required(&meal_type, "meal type")?,
                photo_url,
                notes,
            }),
            Self::Sleep {
                start,
                end,
                rating,
                notes,
            } => {
                let start_time = parse_datetime(&start, now).context("invalid --start")?;
                let end_time = end
                    .map(|end| parse_datetime(&end, now).context("invalid --end"))
                    .transpose()?;
                if end_time.is_some_and(|end| end < start_time) {
                    bail!("sleep cannot end before it starts");
                }
                NewRecord::Sleep(NewSleep {
                    start_time,
                    end_time,
                    quality_rating: rating,
                    notes,
                })
            }
            Self::Behavior {
                behavior_type,
                mood,
                incident,
                notes,
            } => NewRecord::Behavior(NewBehavior {
                behavior_type: required(&behavior_type, "behavior type")?,
                mood_rating: mood,
                incident_description: incident,
                notes,
            }),
            Self::Hydration {
                fluid,
                amount,
                notes,
            } => {
                ensure!(amount > 0, "amount must be greater than zero");
                NewRecord::Hydration(NewHydration {
                    fluid_type: required(&fluid, "fluid")?,
                    amount_ml: amount,
                    notes,
                })
            }
            Self::Location {
                lat,
                lon,
                name,
                notes,
            } => {
                ensure!((-90.0..=90.0).contains(&lat), "latitude {lat} out of range");
                ensure!((-180.0..=180.0).contains(&lon), "longitude {lon} out of range");
                NewRecord::Location(NewLocation {
                    latitude: lat.to_string(),
                    longitude: lon.to_string(),
                    location_name: name,
                    notes,
                })
            }
            Self::Activity {
                activity_type,
                minutes,
                notes,
            } => NewRecord::Activity(NewActivity {
                activity_type: required(&activity_type, "activity type")?,
                details: ActivityDetails {
                    duration_minutes: minutes,
                    notes,
                    ..ActivityDetails::default()
                },
            }),
        };
        Ok(record)
    }
}

fn required(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    ensure!(!trimmed.is_empty(), "{field} must not be empty");
    Ok(trimmed.to_string())
}

pub async fn run<W: Write>(
    writer: &mut W,
    coordinator: &Coordinator,
    config: &Config,
    args: &LogArgs,
) -> Result<()> {
    let record = args.record.to_record(Utc::now())?;
    let child = resolve_child(coordinator, config, args.child.as_deref()).await?;
    let created = coordinator
        .log_record(&child, &record)
        .await
        .with_context(|| format!("failed to log {}", record.kind()))?;
    match created {
        Some(created) => render(writer, &project(&created)),
        None => {
            writeln!(writer, "Logged {}", record.kind())?;
            Ok(())
        }
    }
}

pub fn render<W: Write>(writer: &mut W, item: &FeedItem) -> Result<()> {
    writeln!(
        writer,
        "Logged {} #{}: {} - {}",
        item.kind, item.id.record_id, item.title, item.subtitle
    )?;
    Ok(())
}
