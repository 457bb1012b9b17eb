//! Interactive session.
//!
//! The shell plays the role of an open page: it keeps a session slot for the last viewed
//! quote, runs a startup sync, syncs periodically in the background and on demand, and
//! prints the status line after every finished cycle.
//!
//! Input is read on a dedicated thread and forwarded over a channel so the main loop can
//! `select!` between user lines, Ctrl+C and sync outcomes.
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, select, unbounded};
use log::{error, info, warn};
use quote_common::storage::KeyValueStore;
use quote_common::transfer::EXPORT_FILE_NAME;
use quote_common::{CategoryFilter, Result};
use quote_sync::{RemoteSource, SyncHandle, SyncTrigger, SyncWorker};

use crate::app::QuoteApp;
use crate::render;

const HELP: &str = "\
Commands:
  list                      show all quotes
  random                    show a random quote
  filter <category|all>     select a category and show a quote from it
  categories                show categories
  add <text> | <category>   add a quote
  remove <id>               remove a quote
  last                      show the last viewed quote
  sync                      sync with the server now
  export [path]             export quotes to JSON
  import <path>             import quotes from JSON
  help                      show this help
  quit                      leave the shell";

/// One line typed in the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Blank line.
    Empty,
    /// `list`
    List,
    /// `random`
    Random,
    /// `filter <category|all>`
    Filter(CategoryFilter),
    /// `categories`
    Categories,
    /// `add <text> | <category>`
    Add {
        /// Quote text.
        text: String,
        /// Quote category.
        category: String,
    },
    /// `remove <id>`
    Remove(u64),
    /// `last`
    Last,
    /// `sync`
    Sync,
    /// `export [path]`
    Export(PathBuf),
    /// `import <path>`
    Import(PathBuf),
    /// `help`
    Help,
    /// `quit` / `exit`
    Quit,
    /// Anything that could not be understood, with a hint.
    Invalid(String),
}

impl ShellCommand {
    /// Parse a line of input.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_lowercase().as_str() {
            "" => ShellCommand::Empty,
            "list" | "ls" => ShellCommand::List,
            "random" | "new" => ShellCommand::Random,
            "filter" => ShellCommand::Filter(rest.parse().unwrap_or_default()),
            "categories" => ShellCommand::Categories,
            "add" => match rest.split_once('|') {
                Some((text, category)) => ShellCommand::Add {
                    text: text.trim().to_string(),
                    category: category.trim().to_string(),
                },
                None => ShellCommand::Add {
                    text: rest.to_string(),
                    category: String::new(),
                },
            },
            "remove" | "rm" => match rest.parse() {
                Ok(id) => ShellCommand::Remove(id),
                Err(_) => ShellCommand::Invalid(format!("Usage: remove <id> (got {:?})", rest)),
            },
            "last" => ShellCommand::Last,
            "sync" => ShellCommand::Sync,
            "export" if rest.is_empty() => ShellCommand::Export(PathBuf::from(EXPORT_FILE_NAME)),
            "export" => ShellCommand::Export(PathBuf::from(rest)),
            "import" if rest.is_empty() => ShellCommand::Invalid(String::from("No file selected.")),
            "import" => ShellCommand::Import(PathBuf::from(rest)),
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            other => ShellCommand::Invalid(format!("Unknown command {:?}, type `help`.", other)),
        }
    }
}

/// Run the interactive session until `quit`, end of input or Ctrl+C.
pub fn run<S, R>(mut app: QuoteApp<S>, remote: R, interval: Duration) -> Result<()>
where
    S: KeyValueStore + 'static,
    R: RemoteSource + 'static,
{
    let (interrupt_tx, interrupt_rx) = bounded::<()>(1);
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = interrupt_tx.try_send(());
    }) {
        warn!("Failed to install Ctrl+C handler: {}", e);
    }

    let (line_tx, line_rx) = unbounded::<String>();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("Failed to read input: {}", e);
                    break;
                }
            }
        }
    });

    let selected = app.selected_category()?;
    println!("{}", render::quote_list(&app.list()?));
    println!("Selected category: {}", selected);

    let sync = SyncWorker::spawn(remote, app.store().clone(), Some(interval));
    info!("Shell started, syncing every {}s. Press Ctrl+C to exit.", interval.as_secs());
    prompt();

    loop {
        select! {
            recv(interrupt_rx) -> _ => {
                info!("Ctrl+C received. Shutting down shell...");
                break;
            },
            recv(sync.outcomes()) -> msg => if let Ok((trigger, outcome)) = msg {
                info!("Sync ({}) finished", trigger);
                println!("\n{}", outcome);
                prompt();
            },
            recv(line_rx) -> msg => match msg {
                Ok(line) => {
                    if !execute(&mut app, &sync, ShellCommand::parse(&line)) {
                        break;
                    }
                    prompt();
                }
                Err(_) => break,
            },
        }
    }

    sync.shutdown();
    Ok(())
}

/// Execute one shell command; returns `false` when the session should end.
fn execute<S: KeyValueStore>(app: &mut QuoteApp<S>, sync: &SyncHandle, command: ShellCommand) -> bool {
    let result = match command {
        ShellCommand::Empty => Ok(None),
        ShellCommand::Quit => return false,
        ShellCommand::Help => Ok(Some(HELP.to_string())),
        ShellCommand::Invalid(hint) => Ok(Some(hint)),
        ShellCommand::List => app.list().map(|quotes| Some(render::quote_list(&quotes))),
        ShellCommand::Random => show(app, &CategoryFilter::All),
        ShellCommand::Filter(filter) => app
            .filter(&filter)
            .map(|picked| Some(picked.map_or_else(|| render::no_quotes(&filter), |q| render::quote(&q)))),
        ShellCommand::Categories => app
            .categories()
            .map(|(categories, selected)| Some(render::categories(&categories, &selected))),
        ShellCommand::Add { text, category } => app.add(&text, &category).map(|quote| {
            let line = format!("Added {}", render::quote_line(&quote));
            if let Err(e) = sync.publish(quote) {
                warn!("Could not queue quote for the server: {}", e);
            }
            Some(line)
        }),
        ShellCommand::Remove(id) => app.remove(id).map(|removed| Some(removed_message(id, removed))),
        ShellCommand::Last => Ok(Some(match app.last_viewed() {
            Some(quote) => render::last_viewed(&quote),
            None => String::from("No quote viewed yet."),
        })),
        ShellCommand::Sync => Ok(Some(sync_requested_message(sync.request(SyncTrigger::Manual)))),
        ShellCommand::Export(path) => app
            .export(&path)
            .map(|_| Some(format!("Quotes exported to {}", path.display()))),
        ShellCommand::Import(path) => app
            .import(&path)
            .map(|count| Some(format!("Imported {} quotes successfully!", count))),
    };

    match result {
        Ok(Some(output)) => println!("{}", output),
        Ok(None) => {}
        Err(e) => println!("{}", render::user_message(&e)),
    }
    true
}

fn show<S: KeyValueStore>(app: &mut QuoteApp<S>, filter: &CategoryFilter) -> Result<Option<String>> {
    let picked = app.show_random(filter)?;
    Ok(Some(picked.map_or_else(|| render::no_quotes(filter), |q| render::quote(&q))))
}

/// Message printed after `sync`; the status line follows once the cycle finishes.
pub fn sync_requested_message(queued: bool) -> String {
    if queued {
        String::from("Syncing with server...")
    } else {
        String::from("A sync is already pending.")
    }
}

/// Message printed after `remove`.
pub fn removed_message(id: u64, removed: bool) -> String {
    if removed {
        format!("Removed quote {}.", id)
    } else {
        format!("No quote with id {}.", id)
    }
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}
