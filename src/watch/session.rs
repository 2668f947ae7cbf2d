//! Watch session lifecycle.
//!
//! One session owns one recursive watcher over the presentation folder and
//! one background thread that drains its events. Events cross the watcher's
//! internal thread boundary over a channel; the background loop polls that
//! channel with a bounded timeout so the stop flag is observed within one
//! interval. `stop()` joins the thread, which means it also waits out any
//! rebuild the loop is in the middle of.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use super::coordinator::RebuildCoordinator;
use crate::deck::Template;
use crate::error::{BuildError, Result};
use crate::{debug, log};

/// How long the background loop blocks before re-checking the stop flag.
/// Bounds stop latency; tunable, not a contract.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A running watch-and-rebuild session for one presentation folder.
pub struct WatchSession {
    dir: PathBuf,
    coordinator: Arc<RebuildCoordinator>,
    /// Cooperative stop signal for the background loop.
    running: Arc<AtomicBool>,
    /// Kept alive for the session's lifetime; dropping it unsubscribes.
    watcher: Option<RecommendedWatcher>,
    worker: Option<JoinHandle<()>>,
}

impl WatchSession {
    /// Start watching `dir`, after one unconditional rebuild.
    ///
    /// A missing folder or template file is fatal here and propagates; a
    /// failing initial rebuild (say, an empty folder) is only logged, since a
    /// later save may fix it while the session is live.
    pub fn start(dir: &Path, template: Template) -> Result<Self> {
        if !dir.is_dir() {
            return Err(BuildError::NotFound(dir.to_path_buf()));
        }
        if let Template::File(path) = &template
            && !path.is_file()
        {
            return Err(BuildError::NotFound(path.clone()));
        }

        let coordinator = Arc::new(RebuildCoordinator::new(dir, template));

        log!("watch"; "running conversion once");
        if let Err(e) = coordinator.rebuild_now() {
            log!("rebuild"; "initial build failed: {e}");
        }

        let (tx, rx) = channel::unbounded();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(dir, RecursiveMode::Recursive)?;
        log!("watch"; "watching {} for changes", dir.display());

        let running = Arc::new(AtomicBool::new(true));
        let worker = std::thread::spawn({
            let running = Arc::clone(&running);
            let coordinator = Arc::clone(&coordinator);
            move || run_event_loop(&rx, &running, &coordinator)
        });

        Ok(Self {
            dir: dir.to_path_buf(),
            coordinator,
            running,
            watcher: Some(watcher),
            worker: Some(worker),
        })
    }

    /// Stop watching and wait for the background loop (and any rebuild it is
    /// running) to finish. Calling this twice is a no-op.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        self.running.store(false, Ordering::SeqCst);
        if let Some(mut watcher) = self.watcher.take() {
            let _ = watcher.unwatch(&self.dir);
        }
        if worker.join().is_err() {
            log!("watch"; "worker thread panicked");
        }
        log!("watch"; "stop watching");
    }

    pub(crate) fn coordinator(&self) -> &Arc<RebuildCoordinator> {
        &self.coordinator
    }
}

impl Drop for WatchSession {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_event_loop(
    rx: &Receiver<notify::Result<notify::Event>>,
    running: &AtomicBool,
    coordinator: &RebuildCoordinator,
) {
    while running.load(Ordering::SeqCst) {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(Ok(event)) => {
                if is_qualifying(&event) {
                    debug!("watch"; "change: {:?} {:?}", event.kind, event.paths);
                    coordinator.request_rebuild();
                }
            }
            Ok(Err(e)) => log!("watch"; "notify error: {e}"),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

/// Whether a filesystem event should trigger a rebuild: a file-level change
/// to a `.md` file, or to an `.html` file other than the output document.
fn is_qualifying(event: &notify::Event) -> bool {
    use notify::EventKind;
    use notify::event::{CreateKind, RemoveKind};

    match event.kind {
        // reads of the fragments (our own rebuild included) never qualify
        EventKind::Access(_) => return false,
        // directory-level events never qualify
        EventKind::Create(CreateKind::Folder) | EventKind::Remove(RemoveKind::Folder) => {
            return false;
        }
        _ => {}
    }

    event.paths.iter().any(|path| qualifying_path(path))
}

fn qualifying_path(path: &Path) -> bool {
    let Some(s) = path.to_str() else {
        return false;
    };
    s.ends_with(".md") || (s.ends_with(".html") && !s.ends_with("index.html"))
}

#[cfg(test)]
mod filter_tests {
    use std::path::PathBuf;

    use notify::EventKind;
    use notify::event::{CreateKind, DataChange, ModifyKind, RemoveKind};

    use super::*;

    fn event(paths: Vec<&str>, kind: EventKind) -> notify::Event {
        notify::Event {
            kind,
            paths: paths.into_iter().map(PathBuf::from).collect(),
            attrs: Default::default(),
        }
    }

    fn modify() -> EventKind {
        EventKind::Modify(ModifyKind::Data(DataChange::Any))
    }

    #[test]
    fn test_markdown_and_html_qualify() {
        assert!(is_qualifying(&event(vec!["/deck/00_title.md"], modify())));
        assert!(is_qualifying(&event(vec!["/deck/01_slide.html"], modify())));
    }

    #[test]
    fn test_output_and_unrelated_do_not_qualify() {
        assert!(!is_qualifying(&event(vec!["/deck/index.html"], modify())));
        assert!(!is_qualifying(&event(vec!["/deck/notes.txt"], modify())));
    }

    #[test]
    fn test_path_suffix_rules() {
        // the filter matches on the path suffix, not the exact filename
        assert!(!is_qualifying(&event(vec!["/deck/my_index.html"], modify())));
        assert!(is_qualifying(&event(vec!["/deck/weird.index.md"], modify())));
    }

    #[test]
    fn test_directory_events_do_not_qualify() {
        assert!(!is_qualifying(&event(
            vec!["/deck/sub.md"],
            EventKind::Create(CreateKind::Folder)
        )));
        assert!(!is_qualifying(&event(
            vec!["/deck/sub.md"],
            EventKind::Remove(RemoveKind::Folder)
        )));
    }

    #[test]
    fn test_access_events_do_not_qualify() {
        assert!(!is_qualifying(&event(
            vec!["/deck/00_title.md"],
            EventKind::Access(notify::event::AccessKind::Any)
        )));
    }
}
