//! Registry of connected live-reload clients.

use crate::dev::ReloadEvent;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Per-client queue depth; a client that falls this far behind is dropped.
const CLIENT_BUFFER: usize = 100;

/// Client connection tracker for Server-Sent Events.
pub type ClientRegistry = Arc<RwLock<HashMap<usize, mpsc::Sender<String>>>>;

/// Fan-out point for reload events.
///
/// Steps and watchers call [`broadcast`](Self::broadcast); the dev server
/// registers one client per open SSE connection. Broadcasting with no
/// clients connected is a no-op, so the hub can be shared by commands that
/// never start a server.
#[derive(Debug, Default)]
pub struct ReloadHub {
    clients: ClientRegistry,
    next_client_id: RwLock<usize>,
}

pub type SharedHub = Arc<ReloadHub>;

impl ReloadHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new SSE client.
    ///
    /// Returns the client id and the receiver its events arrive on.
    pub fn register_client(&self) -> (usize, mpsc::Receiver<String>) {
        let id = {
            let mut next_id = self.next_client_id.write();
            let id = *next_id;
            *next_id += 1;
            id
        };

        let (tx, rx) = mpsc::channel(CLIENT_BUFFER);
        self.clients.write().insert(id, tx);

        (id, rx)
    }

    pub fn unregister_client(&self, id: usize) {
        self.clients.write().remove(&id);
    }

    /// Send `event` to one client.
    pub fn send_to(&self, id: usize, event: &ReloadEvent) {
        let json = to_json(event);
        let closed = match self.clients.read().get(&id) {
            Some(tx) => tx.try_send(json).is_err(),
            None => false,
        };
        if closed {
            self.unregister_client(id);
        }
    }

    /// Broadcast `event` to every connected client.
    ///
    /// Clients whose channel is closed or full are dropped.
    pub fn broadcast(&self, event: &ReloadEvent) {
        let json = to_json(event);

        let mut failed_ids = Vec::new();
        for (id, tx) in self.clients.read().iter() {
            if tx.try_send(json.clone()).is_err() {
                failed_ids.push(*id);
            }
        }

        if !failed_ids.is_empty() {
            let mut clients = self.clients.write();
            for id in failed_ids {
                tracing::debug!(client = id, "dropping disconnected client");
                clients.remove(&id);
            }
        }

        tracing::trace!(event = ?event, "broadcast");
    }

    pub fn client_count(&self) -> usize {
        self.clients.read().len()
    }
}

fn to_json(event: &ReloadEvent) -> String {
    serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string())
}
