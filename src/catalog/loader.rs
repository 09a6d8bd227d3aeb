//! Background tool loading
//!
//! At most one load result per catalog is ever delivered: starting a new load
//! (or saving tools) bumps a generation counter, and a worker whose ticket is
//! no longer current drops its result instead of calling back. File I/O that
//! is already under way is not interrupted.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;

use tracing::{debug, warn};

use crate::error::Result;
use crate::models::Tool;

use super::Catalog;
use super::tools::read_tools;

/// Monotonic counter identifying the newest load request
#[derive(Debug, Clone, Default)]
pub(super) struct Generation(Arc<AtomicU64>);

impl Generation {
    /// Start a new request, invalidating every earlier ticket
    fn issue(&self) -> u64 {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Invalidate outstanding tickets without starting a request
    pub(super) fn supersede(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.0.load(Ordering::SeqCst) == ticket
    }
}

/// Handle to a background load started by `Catalog::load_tools_async`
pub struct LoadHandle {
    ticket: u64,
    generation: Generation,
    thread: JoinHandle<bool>,
}

impl LoadHandle {
    /// Whether a newer load or a save has made this one stale
    pub fn is_superseded(&self) -> bool {
        !self.generation.is_current(self.ticket)
    }

    /// Wait for the worker; true if it delivered its result to the callback
    pub fn join(self) -> bool {
        self.thread.join().unwrap_or(false)
    }
}

/// Hand `result` to `on_done` only if `ticket` is still the newest request
fn deliver<F>(generation: &Generation, ticket: u64, result: Result<Arc<Vec<Tool>>>, on_done: F) -> bool
where
    F: FnOnce(Result<Arc<Vec<Tool>>>),
{
    if !generation.is_current(ticket) {
        debug!(ticket, "dropping superseded tool load");
        return false;
    }
    if let Err(e) = &result {
        warn!(error = %e, "background tool load failed");
    }
    on_done(result);
    true
}

impl Catalog {
    /// Load tools on a worker thread and pass the outcome to `on_done`.
    ///
    /// The callback runs on the worker thread, exactly once, unless the load
    /// is superseded first, in which case it is never called. A failed load
    /// passes the error instead of a tool list.
    pub fn load_tools_async<F>(&self, on_done: F) -> LoadHandle
    where
        F: FnOnce(Result<Arc<Vec<Tool>>>) + Send + 'static,
    {
        let ticket = self.generation.issue();
        let generation = self.generation.clone();
        let tools = Arc::clone(&self.tools);
        let categories = Arc::clone(&self.categories);

        debug!(ticket, "starting background tool load");
        let worker_generation = generation.clone();
        let thread = std::thread::spawn(move || {
            let result = read_tools(&tools, &categories);
            deliver(&worker_generation, ticket, result, on_done)
        });

        LoadHandle {
            ticket,
            generation,
            thread,
        }
    }
}
