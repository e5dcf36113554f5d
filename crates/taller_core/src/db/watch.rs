//! Push-updated query subscriptions.
//!
//! # Responsibility
//! - Track which live queries watch which tables.
//! - Re-run watched queries and push fresh snapshots after committed writes.
//!
//! # Invariants
//! - A watcher never holds the connection lock across a snapshot send;
//!   delivery re-acquires it through the normal query path.
//! - Dropping a [`Subscription`] deregisters its watcher; a send to a
//!   dropped receiver prunes the watcher as well. No registration outlives
//!   its consumer.

use super::lifecycle::Database;
use log::warn;
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

type DeliverFn = Box<dyn Fn(&Database) -> bool + Send>;

struct Watcher {
    token: u64,
    tables: Vec<&'static str>,
    /// Re-runs the query and sends the snapshot. Returns `false` once the
    /// receiving side is gone.
    deliver: DeliverFn,
}

type WatcherList = Arc<Mutex<Vec<Watcher>>>;

/// Per-database registry of live query watchers.
pub(crate) struct WatchHub {
    watchers: WatcherList,
    next_token: AtomicU64,
}

impl WatchHub {
    pub(crate) fn new() -> Self {
        Self {
            watchers: Arc::new(Mutex::new(Vec::new())),
            next_token: AtomicU64::new(1),
        }
    }

    fn register(&self, tables: &[&'static str], deliver: DeliverFn) -> (u64, WatcherList) {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        self.lock_watchers().push(Watcher {
            token,
            tables: tables.to_vec(),
            deliver,
        });
        (token, Arc::clone(&self.watchers))
    }

    /// Re-delivers snapshots for every watcher scoped to one of `tables`.
    ///
    /// Callers must not hold the connection lock; delivery takes it again.
    pub(crate) fn notify(&self, db: &Database, tables: &[&str]) {
        self.lock_watchers().retain(|watcher| {
            if !watcher.tables.iter().any(|table| tables.contains(table)) {
                return true;
            }
            (watcher.deliver)(db)
        });
    }

    pub(crate) fn len(&self) -> usize {
        self.lock_watchers().len()
    }

    fn lock_watchers(&self) -> std::sync::MutexGuard<'_, Vec<Watcher>> {
        self.watchers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Database {
    /// Registers a live query over `tables`.
    ///
    /// The returned [`Subscription`] immediately carries one initial
    /// snapshot; every committed write touching a watched table queues a
    /// fresh full snapshot. Query failures during refresh are logged and
    /// skipped so one bad refresh does not kill the stream.
    ///
    /// # Errors
    /// Fails only when the initial snapshot query fails.
    pub fn subscribe<T, E, F>(
        &self,
        tables: &[&'static str],
        query: F,
    ) -> Result<Subscription<T>, E>
    where
        T: Send + 'static,
        E: Display,
        F: Fn(&Database) -> Result<Vec<T>, E> + Send + 'static,
    {
        let initial = query(self)?;
        let (tx, rx) = mpsc::channel();
        // Receiver is still local; this send cannot fail.
        let _ = tx.send(initial);

        let deliver: DeliverFn = Box::new(move |db| match query(db) {
            Ok(snapshot) => tx.send(snapshot).is_ok(),
            Err(err) => {
                warn!("event=watch_refresh module=db status=error error={err}");
                true
            }
        });
        let (token, registry) = self.watch_hub().register(tables, deliver);

        Ok(Subscription {
            rx,
            registry,
            token,
        })
    }

    /// Number of live watcher registrations. Diagnostic accessor.
    pub fn active_watchers(&self) -> usize {
        self.watch_hub().len()
    }
}

/// A cancellable stream of query snapshots.
///
/// Each received item is a complete result set, not a delta. Dropping the
/// subscription stops delivery and removes the underlying registration.
pub struct Subscription<T> {
    rx: Receiver<Vec<T>>,
    registry: WatcherList,
    token: u64,
}

impl<T> Subscription<T> {
    /// Blocks until the next snapshot arrives.
    pub fn recv(&self) -> Option<Vec<T>> {
        self.rx.recv().ok()
    }

    /// Waits up to `timeout` for the next snapshot.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Vec<T>> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Returns the next queued snapshot without blocking.
    pub fn try_recv(&self) -> Option<Vec<T>> {
        self.rx.try_recv().ok()
    }

    /// Stops delivery and deregisters the watcher.
    pub fn cancel(self) {}
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        let mut watchers = self
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        watchers.retain(|watcher| watcher.token != self.token);
    }
}
