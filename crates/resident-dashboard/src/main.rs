//! `residash` - CLI for the resident dashboard
//!
//! Renders the dashboard in a terminal and edits the on-device override.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime, Utc};
use clap::Parser;

use resident_dashboard::cli::{
    AdminCommand, Cli, Command, ConfigCommand, EventCommand, PhotoCommand, ShowCommand,
    WatchCommand,
};
use resident_dashboard::editor::{self, EditContext};
use resident_dashboard::export::export_record;
use resident_dashboard::render::{render_text, CLEAR_SCREEN};
use resident_dashboard::{
    init_logging, run_surface, source_for, Config, DashboardRecord, DashboardView, Loader,
    OverrideStore, Surface, SurfaceHandle, SurfaceOptions,
};

const SAVED_MESSAGE: &str = "Saved (this device only).";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    match cli.command {
        Command::Show(cmd) => handle_show(&config, &cmd).await,
        Command::Watch(cmd) => handle_watch(&config, &cmd).await,
        Command::Status(cmd) => handle_status(&config, cmd.json).await,
        Command::Admin(cmd) => handle_admin(&config, cmd).await,
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_loader(config: &Config) -> Result<Loader> {
    let store = OverrideStore::open(config.database_path())?
        .with_max_value_bytes(config.storage.max_override_bytes);
    let source = source_for(&config.source.base, config.timeout())?;
    Ok(Loader::new(source, store))
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn parse_when(text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), "%Y-%m-%d %H:%M")
        .with_context(|| format!("invalid time {text:?}, expected \"YYYY-MM-DD HH:MM\""))
}

async fn handle_show(config: &Config, cmd: &ShowCommand) -> Result<()> {
    let now = match &cmd.at {
        Some(text) => parse_when(text)?,
        None => local_now(),
    };
    let surface = Surface::from(cmd.surface);

    let loader = open_loader(config)?;
    let record = loader.load().await?;
    let view = DashboardView::build(
        &record,
        now,
        0,
        millis(config.rotation_interval(surface)),
        config.meal_hints,
    );

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render_text(&view, surface));
    }
    Ok(())
}

async fn handle_watch(config: &Config, cmd: &WatchCommand) -> Result<()> {
    let surface = Surface::from(cmd.surface);
    let loader = open_loader(config)?;
    let options = SurfaceOptions {
        surface,
        clock_tick: config.clock_tick(),
        rotation: config.rotation_interval(surface),
        bands: config.meal_hints,
        max_ticks: cmd.ticks,
    };

    let handle = SurfaceHandle::new();
    let stopper = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stopper.stop();
        }
    });

    let stats = run_surface(&loader, &options, &handle, local_now, |view| {
        let mut stdout = std::io::stdout().lock();
        write!(stdout, "{CLEAR_SCREEN}{}", render_text(view, surface))?;
        stdout.flush()?;
        Ok(())
    })
    .await?;

    println!();
    println!(
        "Stopped after {} ticks ({} redraws, {} reloads).",
        stats.ticks, stats.renders, stats.reloads
    );
    Ok(())
}

async fn handle_status(config: &Config, json: bool) -> Result<()> {
    let loader = open_loader(config)?;
    let base = loader.fetch_base().await;
    let info = loader.store().info()?;

    if json {
        let status = serde_json::json!({
            "base": loader.location(),
            "base_ok": base.is_ok(),
            "base_error": base.as_ref().err().map(ToString::to_string),
            "base_events": base.as_ref().ok().map(|r| r.events.len()),
            "base_photos": base.as_ref().ok().map(|r| r.photos.len()),
            "database_path": loader.store().path(),
            "override_present": info.is_some(),
            "override_stored_at": info.as_ref().and_then(|i| i.stored_at),
            "override_bytes": info.as_ref().map(|i| i.size_bytes),
            "override_readable": info.as_ref().map(|i| i.readable),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("residash status");
    println!("---------------");
    println!("Base data:     {}", loader.location());
    match &base {
        Ok(record) => println!(
            "               {} events, {} photos",
            record.events.len(),
            record.photos.len()
        ),
        Err(e) => println!("               {e}"),
    }
    println!("Database:      {}", loader.store().path().display());
    match info {
        Some(info) => {
            let stored = info
                .stored_at
                .map_or_else(|| "unknown".to_string(), |t| t.to_rfc3339());
            println!("Local edits:   saved {stored} ({} bytes)", info.size_bytes);
            if !info.readable {
                println!("               unreadable, base data is shown instead");
            }
        }
        None => println!("Local edits:   none"),
    }
    Ok(())
}

async fn handle_admin(config: &Config, cmd: AdminCommand) -> Result<()> {
    let loader = open_loader(config)?;

    if let AdminCommand::Reset = cmd {
        if loader.store().clear_override()? {
            println!("Local edits cleared. Showing base data.");
        } else {
            println!("No local edits to clear.");
        }
        return Ok(());
    }

    let mut record = loader.load().await?;

    match cmd {
        AdminCommand::Meals {
            breakfast,
            lunch,
            dinner,
        } => {
            editor::set_meals(&mut record, breakfast, lunch, dinner);
            save(&loader, &record)?;
        }
        AdminCommand::Event(EventCommand::List) => list_events(&record),
        AdminCommand::Event(EventCommand::Add(fields)) => {
            let id = editor::add_event(&mut record, fields.into(), &EditContext::now())?;
            save(&loader, &record)?;
            println!("Added event {id}");
        }
        AdminCommand::Event(EventCommand::Update { id, fields }) => {
            editor::update_event(&mut record, &id, fields.into())?;
            save(&loader, &record)?;
        }
        AdminCommand::Event(EventCommand::Remove { id }) => {
            let removed = editor::remove_event(&mut record, &id)?;
            save(&loader, &record)?;
            println!("Removed {}", removed.title);
        }
        AdminCommand::Photo(PhotoCommand::List) => list_photos(&record),
        AdminCommand::Photo(PhotoCommand::Add { url, alt }) => {
            editor::add_photo(&mut record, url, alt);
            save(&loader, &record)?;
        }
        AdminCommand::Photo(PhotoCommand::Update { number, url, alt }) => {
            editor::update_photo(&mut record, photo_index(number), PhotoCommand::patch(url, alt))?;
            save(&loader, &record)?;
        }
        AdminCommand::Photo(PhotoCommand::Remove { number }) => {
            editor::remove_photo(&mut record, photo_index(number))?;
            save(&loader, &record)?;
        }
        AdminCommand::Export { output } => {
            let bytes = export_record(&record, &output)?;
            println!("Exported {bytes} bytes to {}", output.display());
        }
        AdminCommand::Reset => {}
    }
    Ok(())
}

fn save(loader: &Loader, record: &DashboardRecord) -> Result<()> {
    loader.store().write_override(record, Utc::now())?;
    println!("{SAVED_MESSAGE}");
    Ok(())
}

fn photo_index(number: u32) -> usize {
    usize::try_from(number.saturating_sub(1)).unwrap_or(usize::MAX)
}

fn list_events(record: &DashboardRecord) {
    let events = record.sorted_events();
    if events.is_empty() {
        println!("No events.");
        return;
    }
    for event in events {
        let location = event.location.as_deref().unwrap_or("");
        println!(
            "{:<20} {} {}  {}  {}",
            event.id, event.date, event.time, event.title, location
        );
    }
}

fn list_photos(record: &DashboardRecord) {
    if record.photos.is_empty() {
        println!("No photos.");
        return;
    }
    for (n, photo) in record.photos.iter().enumerate() {
        println!("{:>3}. {}  {}", n + 1, photo.url, photo.alt);
    }
}

fn millis(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Source]");
                println!("  Base:               {}", config.source.base);
                println!("  Timeout (secs):     {}", config.source.timeout_secs);
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Max override bytes: {}", config.storage.max_override_bytes);
                println!();
                println!("[Display]");
                println!("  Clock tick (ms):    {}", config.display.clock_tick_ms);
                println!("  Frame (ms):         {}", config.display.frame_interval_ms);
                println!("  Hero (ms):          {}", config.display.hero_interval_ms);
                println!("  Slideshow (ms):     {}", config.display.slideshow_interval_ms);
                println!();
                println!("[Meal hints]");
                println!("  Dinner from:        {}:00", config.meal_hints.dinner_from);
                println!("  Breakfast from:     {}:00", config.meal_hints.breakfast_from);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
