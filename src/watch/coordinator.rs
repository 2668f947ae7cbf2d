//! Rebuild gating.
//!
//! At most one rebuild runs at a time. A request that arrives while one is in
//! flight is dropped, not queued: bursts of filesystem events collapse into a
//! single rebuild, and the next qualifying event re-triggers. A trailing edit
//! that lands after the in-flight rebuild has already read the files is only
//! picked up by that next event; the gate does not re-run on release.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::debug;
use crate::deck::{self, Template};
use crate::error::Result;
use crate::logger::{status_error, status_success};

/// Admits one runner at a time; released when the guard drops, so the flag
/// clears on every exit path.
pub(crate) struct BusyGate {
    flag: AtomicBool,
}

pub(crate) struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl BusyGate {
    pub(crate) const fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
        }
    }

    pub(crate) fn try_acquire(&self) -> Option<BusyGuard<'_>> {
        // then(), not then_some(): the guard must only exist on success, or
        // its Drop would release a gate someone else holds
        self.flag
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
            .then(|| BusyGuard { flag: &self.flag })
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Decides when a rebuild may run and keeps failures contained.
pub struct RebuildCoordinator {
    dir: PathBuf,
    template: Template,
    busy: BusyGate,
    completed: AtomicUsize,
}

impl RebuildCoordinator {
    pub fn new(dir: impl Into<PathBuf>, template: Template) -> Self {
        Self {
            dir: dir.into(),
            template,
            busy: BusyGate::new(),
            completed: AtomicUsize::new(0),
        }
    }

    /// Run a rebuild unless one is already in flight.
    ///
    /// Returns `false` when the request was dropped. Rebuild failures are
    /// logged here and never propagate to the caller: the watcher loop must
    /// outlive any broken save.
    pub fn request_rebuild(&self) -> bool {
        let Some(_guard) = self.busy.try_acquire() else {
            debug!("rebuild"; "already in flight, dropping request");
            return false;
        };

        match self.rebuild_now() {
            Ok(()) => status_success(&format!("{} refreshed", deck::OUTPUT_FILE)),
            Err(e) => status_error("rebuild failed", &e.to_string()),
        }
        true
    }

    /// Run one rebuild unconditionally, bypassing the busy gate.
    ///
    /// For session start (no watcher is running yet) and one-shot builds,
    /// where the caller decides what to do with the error.
    pub fn rebuild_now(&self) -> Result<()> {
        deck::rebuild(&self.dir, &self.template)?;
        self.completed.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Number of rebuilds that finished successfully.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }
}
