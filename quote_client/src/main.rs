//! Quote Client: a command-line quote keeper that stores quotes in a local data
//! directory, shows and filters them, imports/exports JSON, and syncs with a public
//! mock quote server using a server-wins merge.
//!
//! Usage example (CLI):
//! ```bash
//! quote_client add --text "Stay curious." --category Life
//! quote_client filter life
//! quote_client export --path ./quotes.json
//! quote_client sync
//! quote_client shell --sync-interval 30
//! ```
//!
//! One-shot commands load the store, run, and exit. `shell` keeps an interactive
//! session with a background sync worker (startup, periodic and manual syncs).
//! Pass `--offline` to never contact the server.
#![warn(missing_docs)]
mod app;
mod args;
mod render;
mod shell;

use crate::app::QuoteApp;
use crate::args::{Args, Command};
use clap::Parser;
use log::{info, warn};
use quote_common::storage::{FileStorage, KeyValueStore};
use quote_common::{CategoryFilter, Quote, QuoteStore, Result};
use quote_sync::{HttpRemote, OfflineRemote, RemoteSource, SyncTrigger, run_cycle};
use std::process::ExitCode;

fn main() -> ExitCode {
    init_logger();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", render::user_message(&e));
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let data_dir = args.data_dir();
    let config = args.sync_config();
    let storage = FileStorage::open(&data_dir)?;
    info!("Using data directory {}", data_dir.display());

    let remote: Box<dyn RemoteSource> = if args.offline {
        Box::new(OfflineRemote)
    } else {
        Box::new(HttpRemote::new(&config))
    };
    let mut app = QuoteApp::new(QuoteStore::load(storage));

    match args.command {
        Command::List => println!("{}", render::quote_list(&app.list()?)),
        Command::Add { text, category } => {
            let quote = app.add(&text, &category)?;
            println!("Added {}", render::quote_line(&quote));
            if let Err(e) = remote.publish(&quote) {
                warn!("Posting quote {} to server failed: {}", quote.id, e);
            }
        }
        Command::Remove { id } => {
            let removed = app.remove(id)?;
            println!("{}", shell::removed_message(id, removed));
        }
        Command::Random => show_random(&mut app, &CategoryFilter::All)?,
        Command::Filter { category } => {
            let filter: CategoryFilter = category.parse().unwrap_or_default();
            let picked = app.filter(&filter)?;
            print_pick(picked.as_ref(), &filter);
        }
        Command::Categories => {
            let (categories, selected) = app.categories()?;
            println!("{}", render::categories(&categories, &selected));
        }
        Command::Export { path } => {
            let count = app.export(&path)?;
            info!("Exported {} quotes", count);
            println!("Quotes exported to {}", path.display());
        }
        Command::Import { path } => {
            let count = app.import(&path)?;
            println!("Imported {} quotes successfully!", count);
        }
        Command::Sync => {
            let outcome = run_cycle(&remote, &**app.store(), SyncTrigger::Manual);
            println!("{}", outcome);
        }
        Command::Shell => shell::run(app, remote, config.interval)?,
    }
    Ok(())
}

fn show_random<S: KeyValueStore>(app: &mut QuoteApp<S>, filter: &CategoryFilter) -> Result<()> {
    let picked = app.show_random(filter)?;
    print_pick(picked.as_ref(), filter);
    Ok(())
}

fn print_pick(picked: Option<&Quote>, filter: &CategoryFilter) {
    match picked {
        Some(quote) => println!("{}", render::quote(quote)),
        None => println!("{}", render::no_quotes(filter)),
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
