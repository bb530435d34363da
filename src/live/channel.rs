//! Push-channel lifecycle
//!
//! `LiveChannel` is owned by whatever owns the authenticated session. It opens
//! at most one connection, hands consumers a `LiveHandle` to the shared
//! `SubscriptionManager`, and tears the connection down on `close` or drop.
//! Connection failures never reach the caller: the manager just stays
//! disconnected and every subscribe/unsubscribe becomes a no-op. There is no
//! automatic reconnect.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::manager::SubscriptionManager;
use crate::config::ChannelSettings;
use crate::transport::{self, Inbound, ServerMessage};

/// Shared access to the session's subscription manager.
pub type LiveHandle = Arc<Mutex<SubscriptionManager>>;

/// Lock the manager, recovering the data if a previous holder panicked.
pub fn lock(handle: &LiveHandle) -> MutexGuard<'_, SubscriptionManager> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct LiveChannel {
    manager: LiveHandle,
    reader: Option<JoinHandle<()>>,
    writer: Option<JoinHandle<()>>,
}

impl LiveChannel {
    /// A channel with no connection, used when there is no session.
    pub fn disconnected() -> Self {
        Self {
            manager: Arc::new(Mutex::new(SubscriptionManager::new())),
            reader: None,
            writer: None,
        }
    }

    /// Open the push channel for a session credential.
    ///
    /// With no token, or if the connection cannot be established, the
    /// returned channel is disconnected.
    pub async fn open(settings: &ChannelSettings, token: Option<&str>) -> Self {
        let mut channel = Self::disconnected();

        let Some(token) = token else {
            debug!("No session credential, push channel stays closed");
            return channel;
        };

        match transport::connect(&settings.url, token).await {
            Ok(transport) => {
                let connection_id = transport.connection.id.clone();
                lock(&channel.manager).attach(transport.connection);
                channel.writer = Some(transport.writer);
                channel.reader = Some(tokio::spawn(read_loop(
                    transport.inbound,
                    channel.manager.clone(),
                    connection_id,
                )));
            }
            Err(e) => {
                warn!("Push channel unavailable, live updates disabled: {e}");
            }
        }
        channel
    }

    pub fn handle(&self) -> LiveHandle {
        self.manager.clone()
    }

    pub fn is_connected(&self) -> bool {
        lock(&self.manager).is_connected()
    }

    /// Release the transport and discard all subscriptions.
    pub fn close(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        // dropping the connection's sender lets the writer close the socket
        if lock(&self.manager).detach().is_some() {
            info!("Push channel closed");
        }
        self.writer.take();
    }
}

impl Drop for LiveChannel {
    fn drop(&mut self) {
        self.close();
    }
}

async fn read_loop(mut inbound: Inbound, manager: LiveHandle, connection_id: String) {
    while let Some(frame) = inbound.next().await {
        match frame {
            Ok(msg) if msg.is_close() => break,
            Ok(msg) => {
                if let Some(ServerMessage::VoteUpdate(update)) = ServerMessage::decode(&msg) {
                    let topic = update.position_id.clone();
                    let delivered = lock(&manager).apply_update(update);
                    debug!("vote-update for {topic} delivered to {delivered} listeners");
                }
            }
            Err(e) => {
                warn!("Push channel {connection_id} failed: {e}");
                break;
            }
        }
    }

    info!("Push channel {connection_id} ended");
    lock(&manager).detach_if(&connection_id);
}
