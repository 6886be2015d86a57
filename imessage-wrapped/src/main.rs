//! imessage-wrapped - iMessage Year in Review CLI
//!
//! Your year in emoji and reactions, read straight from the Messages database.
//!
//! Reading `~/Library/Messages/chat.db` requires Full Disk Access for the
//! terminal (System Settings → Privacy & Security → Full Disk Access).

mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use imessage_wrapped_core::{generate_wrapped, time, Config, Database, Error};

#[derive(Parser, Debug)]
#[command(name = "imessage-wrapped")]
#[command(about = "iMessage Wrapped - Your year in emoji and reactions")]
#[command(version)]
struct Args {
    /// Year to generate wrapped for (default: last year)
    #[arg(value_parser = clap::value_parser!(i32).range(1..=9999))]
    year: Option<i32>,

    /// Path to chat.db (default: ~/Library/Messages/chat.db)
    #[arg(long)]
    db: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = imessage_wrapped_core::logging::init(&config.logging).ok();

    let year = args.year.unwrap_or_else(time::last_year);
    let db_path = args.db.unwrap_or_else(|| config.database_path());
    tracing::info!(year, db = %db_path.display(), "Generating wrapped");

    let db = Database::open_read_only(&db_path).map_err(|e| {
        tracing::error!(error = %e, "failed to open database");
        match open_hint(&e) {
            Some(hint) => anyhow::Error::new(e).context(hint),
            None => anyhow::Error::new(e),
        }
    })?;

    let stats = generate_wrapped(&db, year).context("failed to generate wrapped stats")?;

    print!(
        "{}",
        report::render(&stats, &config.report, db.path(), &Local::now())
    );

    Ok(())
}

/// What the user can do about a failed open.
fn open_hint(err: &Error) -> Option<&'static str> {
    match err {
        Error::DatabaseNotFound(_) => Some(
            "Database not found. Make sure you're running this on a Mac with Messages.app configured.",
        ),
        Error::DatabaseAccess { .. } => Some(
            "Can't open database. Grant Full Disk Access to your terminal in System Settings.",
        ),
        Error::Schema(_) => Some("That file doesn't look like a Messages database."),
        _ => None,
    }
}
