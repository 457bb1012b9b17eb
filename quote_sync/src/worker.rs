//! Sync cycle and the background worker that owns it.
//!
//! Every sync cycle of a running session executes on one worker thread, so two merges
//! can never interleave their reads and writes of the shared store. The worker
//! multiplexes its inputs with Crossbeam `select!`:
//!
//! - shutdown: stop after the current cycle, once every queued quote has been posted;
//! - manual requests: a bounded(1) queue: while a cycle runs, at most one more request
//!   waits, further [`SyncHandle::request`] calls are dropped;
//! - timer ticks: `crossbeam_channel::tick`, which holds at most one pending tick, so
//!   ticks missed during a slow cycle collapse into one;
//! - published quotes: locally added quotes are POSTed to the server in order.
//!
//! A startup cycle runs as soon as the worker starts. The fetch itself happens without
//! holding the store lock; only the merge and the save do.

use std::sync::Mutex;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded, never, select, tick, unbounded};
use log::{debug, error, info, warn};
use quote_common::storage::KeyValueStore;
use quote_common::{Quote, QuoteError, QuoteStore, Result, SharedStore};

use crate::outcome::{SyncOutcome, SyncTrigger};
use crate::remote::RemoteSource;

/// Run one fetch-and-merge cycle against `store`.
///
/// A failed or empty fetch is logged and reported as [`SyncOutcome::NoRemoteData`]
/// without touching the store.
pub fn run_cycle<R, S>(remote: &R, store: &Mutex<QuoteStore<S>>, trigger: SyncTrigger) -> SyncOutcome
where
    R: RemoteSource + ?Sized,
    S: KeyValueStore,
{
    info!("Syncing with server ({})...", trigger);
    let remote_quotes = match remote.fetch_quotes() {
        Ok(quotes) => quotes,
        Err(e) => {
            warn!("Fetching quotes from server failed: {}", e);
            Vec::new()
        }
    };
    if remote_quotes.is_empty() {
        info!("No server data, local quotes left untouched");
        return SyncOutcome::NoRemoteData;
    }

    let mut store = match store.lock() {
        Ok(store) => store,
        Err(e) => return SyncOutcome::StorageFailed(QuoteError::from(e).to_string()),
    };
    match store.merge(&remote_quotes) {
        Ok(report) => {
            info!(
                "Merged {} server quotes: {} new, {} conflicts resolved",
                remote_quotes.len(),
                report.added,
                report.conflicts
            );
            SyncOutcome::Merged(report)
        }
        Err(e) => {
            error!("Failed to persist merged quotes: {}", e);
            SyncOutcome::StorageFailed(e.to_string())
        }
    }
}

fn post<R: RemoteSource + ?Sized>(remote: &R, quote: &Quote) {
    if let Err(e) = remote.publish(quote) {
        warn!("Posting quote {} to server failed: {}", quote.id, e);
    }
}

struct SyncRequest {
    trigger: SyncTrigger,
    reply: Option<Sender<SyncOutcome>>,
}

/// Handle to a running sync worker. Dropping it stops the worker.
pub struct SyncHandle {
    request_tx: Sender<SyncRequest>,
    publish_tx: Sender<Quote>,
    shutdown_tx: Sender<()>,
    outcome_rx: Receiver<(SyncTrigger, SyncOutcome)>,
    thread: Option<JoinHandle<()>>,
}

/// Background sync worker.
pub struct SyncWorker;

impl SyncWorker {
    /// Start the worker thread for `store`, ticking every `interval` if given.
    pub fn spawn<R, S>(remote: R, store: SharedStore<S>, interval: Option<Duration>) -> SyncHandle
    where
        R: RemoteSource + 'static,
        S: KeyValueStore + 'static,
    {
        let (request_tx, request_rx) = bounded::<SyncRequest>(1);
        let (publish_tx, publish_rx) = unbounded::<Quote>();
        let (shutdown_tx, shutdown_rx) = unbounded::<()>();
        let (outcome_tx, outcome_rx) = unbounded::<(SyncTrigger, SyncOutcome)>();

        let thread = thread::spawn(move || {
            let ticker = match interval {
                Some(period) => tick(period),
                None => never(),
            };
            let finish = |trigger: SyncTrigger, outcome: SyncOutcome| {
                let _ = outcome_tx.send((trigger, outcome));
            };

            finish(SyncTrigger::Startup, run_cycle(&remote, &*store, SyncTrigger::Startup));

            loop {
                select! {
                    recv(shutdown_rx) -> _ => {
                        for quote in publish_rx.try_iter() {
                            post(&remote, &quote);
                        }
                        break;
                    },
                    recv(request_rx) -> msg => match msg {
                        Ok(request) => {
                            let outcome = run_cycle(&remote, &*store, request.trigger);
                            if let Some(reply) = request.reply {
                                let _ = reply.send(outcome.clone());
                            }
                            finish(request.trigger, outcome);
                        }
                        Err(_) => break,
                    },
                    recv(ticker) -> _ => {
                        finish(SyncTrigger::Interval, run_cycle(&remote, &*store, SyncTrigger::Interval));
                    },
                    recv(publish_rx) -> msg => match msg {
                        Ok(quote) => post(&remote, &quote),
                        Err(_) => break,
                    },
                }
            }
            info!("Sync worker stopping...");
        });

        SyncHandle {
            request_tx,
            publish_tx,
            shutdown_tx,
            outcome_rx,
            thread: Some(thread),
        }
    }
}

impl SyncHandle {
    /// Ask for a sync without waiting for it.
    ///
    /// Returns `false` if the request was dropped because one is already queued.
    pub fn request(&self, trigger: SyncTrigger) -> bool {
        match self.request_tx.try_send(SyncRequest { trigger, reply: None }) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!("Sync already pending, dropping {} trigger", trigger);
                false
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!("Sync worker is gone, dropping {} trigger", trigger);
                false
            }
        }
    }

    /// Queue a manual sync and wait for its outcome.
    pub fn sync_now(&self) -> Result<SyncOutcome> {
        let (reply_tx, reply_rx) = bounded(1);
        self.request_tx
            .send(SyncRequest {
                trigger: SyncTrigger::Manual,
                reply: Some(reply_tx),
            })
            .map_err(|e| QuoteError::ChannelSend(e.to_string()))?;
        reply_rx
            .recv()
            .map_err(|e| QuoteError::ChannelRecv(e.to_string()))
    }

    /// Queue `quote` to be posted to the server.
    pub fn publish(&self, quote: Quote) -> Result<()> {
        self.publish_tx
            .send(quote)
            .map_err(|e| QuoteError::ChannelSend(e.to_string()))
    }

    /// Outcomes of finished cycles, in completion order.
    pub fn outcomes(&self) -> &Receiver<(SyncTrigger, SyncOutcome)> {
        &self.outcome_rx
    }

    /// Stop the worker and wait for the current cycle to finish.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = self.shutdown_tx.send(());
            if thread.join().is_err() {
                error!("Sync worker panicked");
            }
        }
    }
}

impl Drop for SyncHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
