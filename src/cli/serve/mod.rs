//! Development server with live reload support.

mod lifecycle;
mod response;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tiny_http::Server;

use crate::deck::Template;
use crate::error::BuildError;
use crate::reload::{DEFAULT_WS_PORT, ReloadServer};
use crate::watch::WatchSession;
use crate::{debug, log};

/// Serve the presentation folder until Ctrl+C.
///
/// Three collaborators are wired together here and torn down in reverse:
/// the HTTP server, the browser refresh endpoint (with its own watcher over
/// the folder), and the watch session that rebuilds `index.html` on saves.
pub fn run(folder: &Path, port: u16, template: Template) -> Result<()> {
    let folder = folder
        .canonicalize()
        .map_err(|_| BuildError::NotFound(folder.to_path_buf()))?;

    // Bind HTTP first so a taken port surfaces before any background work
    let (server, addr) = lifecycle::bind_with_retry(port)?;
    let server = Arc::new(server);
    crate::core::register_server(Arc::clone(&server));

    // Browser refresh: WebSocket push plus a watcher over the served root
    let mut reload = ReloadServer::bind(DEFAULT_WS_PORT)?;
    reload.watch(&folder)?;

    // Rebuild session: one unconditional rebuild, then watch for saves
    let mut session = WatchSession::start(&folder, template)?;

    log!("serve"; "http://{}", addr);
    run_request_loop(&server, &folder, reload.ws_port());

    log!("serve"; "stop serving");
    session.stop();
    reload.shutdown();
    Ok(())
}

fn run_request_loop(server: &Server, root: &Path, ws_port: u16) {
    for request in server.incoming_requests() {
        debug!("serve"; "{} {}", request.method(), request.url());
        if let Err(e) = response::handle_request(request, root, ws_port) {
            log!("serve"; "request error: {e}");
        }
    }
}
