//! Command-line front end over the reminder core.
//!
//! # Responsibility
//! - Drive the same view-models and repository the mobile shell uses.
//! - Print results as JSON on stdout; failures go to stderr via `anyhow`.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use geominder_core::{
    init_logging, regions_containing, CoreConfig, GeofenceEvent, GeofenceTransitionHandler,
    ReminderDataItem, ReminderDataSource, ReminderNotification, ReminderRepository,
    RemindersListViewModel, SaveReminderViewModel, UiEvent,
};
use log::info;
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "geominder")]
#[command(version)]
#[command(about = "Location reminders from the terminal", long_about = None)]
struct Args {
    /// SQLite database file (overrides GEOMINDER_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files (overrides GEOMINDER_LOG_DIR)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every reminder
    List,

    /// Show one reminder
    Show {
        /// Reminder id
        id: String,
    },

    /// Validate and save a reminder
    Add {
        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Place name; defaults to a coordinate label when --lat/--lng are given
        #[arg(long)]
        location: Option<String>,

        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,

        /// Reuse an existing id to overwrite that reminder
        #[arg(long)]
        id: Option<String>,
    },

    /// Delete every reminder
    Clear,

    /// Simulate arriving at a position and print the notifications raised
    Enter {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lng: f64,

        /// Region radius in meters (overrides GEOMINDER_GEOFENCE_RADIUS_M)
        #[arg(long)]
        radius: Option<f64>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = CoreConfig::from_env()?;
    if let Some(db) = args.db {
        config.db_path = db;
    }
    if let Some(log_dir) = args.log_dir {
        config.log_dir = Some(log_dir);
    }
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, &log_dir.to_string_lossy()).map_err(anyhow::Error::msg)?;
    }

    apply_radius_flag(&mut config, &args.command)?;

    let repo = ReminderRepository::open(config.db_path.clone())
        .with_context(|| format!("failed to open {}", config.db_path.display()))?;

    match args.command {
        Commands::List => list(&repo),
        Commands::Show { id } => show(&repo, &id),
        Commands::Add {
            title,
            description,
            location,
            lat,
            lng,
            id,
        } => {
            let (reminder_id, message) =
                add(&repo, title, description, location, lat.zip(lng), id)?;
            print_json(&json!({ "id": reminder_id, "message": message }))
        }
        Commands::Clear => clear(&repo),
        Commands::Enter { lat, lng, .. } => {
            print_json(&enter(&repo, lat, lng, config.geofence_radius_m)?)
        }
    }
}

/// Runs `enter --radius` through the same check as the environment value.
fn apply_radius_flag(config: &mut CoreConfig, command: &Commands) -> Result<()> {
    if let Commands::Enter {
        radius: Some(radius),
        ..
    } = command
    {
        config.set_geofence_radius_m(*radius)?;
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn list(repo: &ReminderRepository) -> Result<()> {
    let mut view_model = RemindersListViewModel::new(repo);
    view_model.load_reminders();
    if let Some(message) = failure_message(view_model.take_events()) {
        bail!(message);
    }
    print_json(view_model.reminders_list())
}

fn show(repo: &ReminderRepository, id: &str) -> Result<()> {
    let record = repo.get_reminder(id).into_result()?;
    print_json(&ReminderDataItem::from(record))
}

fn add(
    repo: &ReminderRepository,
    title: Option<String>,
    description: Option<String>,
    location: Option<String>,
    coordinates: Option<(f64, f64)>,
    id: Option<String>,
) -> Result<(String, String)> {
    let mut view_model = SaveReminderViewModel::new(repo);
    view_model.set_title(title);
    view_model.set_description(description);
    match (location, coordinates) {
        (None, Some((lat, lng))) => view_model.select_map_point(lat, lng),
        (location, coordinates) => {
            view_model.set_location_label(location);
            view_model.set_coordinates(
                coordinates.map(|(lat, _)| lat),
                coordinates.map(|(_, lng)| lng),
            );
        }
    }

    let mut item = view_model.current_item();
    if let Some(id) = id {
        item = item.with_id(id);
    }
    let reminder_id = item.id.clone();
    let saved = view_model.save_reminder(item);
    let message = last_message(view_model.take_events()).unwrap_or_default();
    if !saved {
        bail!(message);
    }
    Ok((reminder_id, message))
}

fn clear(repo: &ReminderRepository) -> Result<()> {
    let mut view_model = RemindersListViewModel::new(repo);
    view_model.clear_todos_history();
    if let Some(message) = failure_message(view_model.take_events()) {
        bail!(message);
    }
    println!("{}", json!({ "cleared": true }));
    Ok(())
}

fn enter(
    repo: &ReminderRepository,
    lat: f64,
    lng: f64,
    radius_m: f64,
) -> Result<Vec<ReminderNotification>> {
    let items = repo
        .get_reminders()
        .into_result()?
        .into_iter()
        .map(ReminderDataItem::from)
        .collect::<Vec<_>>();
    let ids = regions_containing(&items, lat, lng, radius_m);

    let handler = GeofenceTransitionHandler::new(repo, |n: &ReminderNotification| {
        info!(
            "event=cli_notify module=cli status=ok reminder_id={}",
            n.reminder.id
        );
    });
    Ok(handler.handle(&GeofenceEvent::entered(ids)))
}

fn failure_message(events: Vec<UiEvent>) -> Option<String> {
    events.into_iter().find_map(|event| match event {
        UiEvent::SnackBar(message) => Some(message),
        _ => None,
    })
}

fn last_message(events: Vec<UiEvent>) -> Option<String> {
    events.into_iter().rev().find_map(|event| match event {
        UiEvent::Toast(message) | UiEvent::SnackBar(message) => Some(message),
        UiEvent::Prompt(prompt) => Some(prompt.default_text().to_string()),
        UiEvent::Loading(_) | UiEvent::Navigate(_) => None,
    })
}
