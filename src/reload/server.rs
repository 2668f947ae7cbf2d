//! WebSocket push server.
//!
//! Accepts browser connections on a dedicated port and broadcasts a reload
//! frame when a watched directory changes. Connection handling and change
//! watching each run on their own thread; both poll the shared stop flag so
//! `shutdown()` returns within one poll interval.

use std::net::{TcpListener, TcpStream};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::Result;
use crossbeam::channel::{self, RecvTimeoutError};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use tungstenite::WebSocket;
use tungstenite::protocol::Message;

use super::message::ReloadMessage;
use crate::{debug, log};

/// Maximum port retry attempts
const MAX_PORT_RETRIES: u16 = 10;

/// Poll interval for the accept loop and the change watcher.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Settle time after a change before broadcasting, so one save (editors often
/// write several times) produces one refresh.
const SETTLE: Duration = Duration::from_millis(100);

type ClientList = Arc<Mutex<Vec<WebSocket<TcpStream>>>>;

/// Browser refresh endpoint: one acceptor thread plus one watcher thread per
/// registered directory.
pub struct ReloadServer {
    ws_port: u16,
    clients: ClientList,
    running: Arc<AtomicBool>,
    threads: Vec<JoinHandle<()>>,
    /// Watcher handles must stay alive for their threads to receive events.
    watchers: Vec<RecommendedWatcher>,
}

impl ReloadServer {
    /// Bind the WebSocket listener and start accepting browsers.
    pub fn bind(base_port: u16) -> Result<Self> {
        let (listener, ws_port) = try_bind_port(base_port, MAX_PORT_RETRIES)?;
        listener.set_nonblocking(true)?;
        debug!("reload"; "ws://localhost:{ws_port}");

        let clients: ClientList = Arc::new(Mutex::new(Vec::new()));
        let running = Arc::new(AtomicBool::new(true));

        let acceptor = std::thread::spawn({
            let clients = Arc::clone(&clients);
            let running = Arc::clone(&running);
            move || accept_loop(&listener, &clients, &running)
        });

        Ok(Self {
            ws_port,
            clients,
            running,
            threads: vec![acceptor],
            watchers: Vec::new(),
        })
    }

    /// Actual bound port (may differ from the requested one if it was taken).
    pub fn ws_port(&self) -> u16 {
        self.ws_port
    }

    /// Register a directory: any change under it pushes a refresh to every
    /// connected browser.
    pub fn watch(&mut self, dir: &Path) -> Result<()> {
        let (tx, rx) = channel::unbounded();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(dir, RecursiveMode::Recursive)?;
        self.watchers.push(watcher);

        let clients = Arc::clone(&self.clients);
        let running = Arc::clone(&self.running);
        self.threads.push(std::thread::spawn(move || {
            while running.load(Ordering::SeqCst) {
                match rx.recv_timeout(POLL_INTERVAL) {
                    Ok(Ok(event)) if is_reload_worthy(&event) => {
                        // let the burst settle, then drain whatever queued up
                        std::thread::sleep(SETTLE);
                        while rx.try_recv().is_ok() {}
                        broadcast(&clients, &ReloadMessage::reload("/").to_json());
                    }
                    Ok(_) => {}
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        }));

        Ok(())
    }

    /// Connected browser count.
    pub fn client_count(&self) -> usize {
        self.clients.lock().len()
    }

    /// Stop accepting, close every client, and join the worker threads.
    pub fn shutdown(&mut self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        self.watchers.clear();
        for thread in self.threads.drain(..) {
            let _ = thread.join();
        }
        let mut clients = self.clients.lock();
        for mut client in clients.drain(..) {
            let _ = client.close(None);
        }
        debug!("reload"; "stopped");
    }
}

impl Drop for ReloadServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn accept_loop(listener: &TcpListener, clients: &ClientList, running: &AtomicBool) {
    while running.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, addr)) => {
                debug!("reload"; "client connected: {addr}");
                let _ = stream.set_nonblocking(false);
                match tungstenite::accept(stream) {
                    Ok(ws) => clients.lock().push(ws),
                    Err(e) => debug!("reload"; "handshake failed: {e}"),
                }
            }
            Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                log!("reload"; "accept error: {e}");
                std::thread::sleep(POLL_INTERVAL);
            }
        }
    }
}

/// Push one frame to every client, dropping the ones that hung up.
fn broadcast(clients: &ClientList, frame: &str) {
    let mut clients = clients.lock();
    let before = clients.len();
    clients.retain_mut(|ws| ws.send(Message::Text(frame.into())).is_ok());
    if before > 0 {
        debug!("reload"; "refresh pushed to {} client(s)", clients.len());
    }
}

/// Real content changes only: access events (our own rebuild reads the
/// fragments) must not refresh the browser.
fn is_reload_worthy(event: &notify::Event) -> bool {
    use notify::EventKind;
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

/// Try binding to port, retry with incremented port if in use
fn try_bind_port(base_port: u16, max_retries: u16) -> Result<(TcpListener, u16)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        match TcpListener::bind(format!("127.0.0.1:{port}")) {
            Ok(listener) => {
                let actual_port = listener.local_addr()?.port();
                return Ok((listener, actual_port));
            }
            Err(e) => {
                last_error = Some(e);
                continue;
            }
        }
    }

    Err(anyhow::anyhow!(
        "Failed to bind WebSocket server after {} attempts: {}",
        max_retries,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use tempfile::TempDir;

    use super::*;

    fn wait_for(mut cond: impl FnMut() -> bool, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(25));
        }
        false
    }

    #[test]
    fn test_client_receives_reload_on_change() {
        let tmp = TempDir::new().unwrap();
        // port 0: let the OS pick, no collisions between parallel tests
        let mut server = ReloadServer::bind(0).unwrap();
        server.watch(tmp.path()).unwrap();

        let (mut client, _) =
            tungstenite::connect(format!("ws://127.0.0.1:{}/", server.ws_port())).unwrap();
        assert!(
            wait_for(|| server.client_count() == 1, Duration::from_secs(5)),
            "handshake did not complete"
        );

        std::fs::write(tmp.path().join("00_title.md"), "# changed").unwrap();

        let frame = client.read().unwrap();
        let text = frame.into_text().unwrap();
        assert!(text.contains(r#""command":"reload""#));

        server.shutdown();
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut server = ReloadServer::bind(0).unwrap();
        server.shutdown();
        server.shutdown();
    }
}
