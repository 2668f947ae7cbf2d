//! Browser live reload.
//!
//! A WebSocket endpoint pushes [`message::ReloadMessage`] frames to every
//! connected browser whenever something under the served root changes. The
//! HTTP side injects the client script into served HTML pages.

mod message;
mod server;

pub use message::ReloadMessage;
pub use server::ReloadServer;

/// Default WebSocket port for browser refresh (the LiveReload convention).
pub const DEFAULT_WS_PORT: u16 = 35729;
