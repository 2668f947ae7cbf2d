//! File watching and rebuild triggering.
//!
//! The [`WatchSession`] owns the notify watcher and its background loop; the
//! [`RebuildCoordinator`] guarantees at most one rebuild in flight.

mod coordinator;
mod session;


pub use coordinator::RebuildCoordinator;
pub use session::WatchSession;
