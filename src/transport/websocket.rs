//! WebSocket transport
//!
//! Opens the push channel and splits it into:
//! - a writer task draining an unbounded queue into the socket, so frames
//!   leave in the order they were queued
//! - the inbound half, handed back to the caller to read updates from
//!
//! The handshake carries the session token as a bearer `Authorization`
//! header.

use futures_util::stream::SplitStream;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};
use tungstenite::protocol::Message as WsMessage;
use uuid::Uuid;

use crate::transport::message::ClientMessage;
use crate::utils::Result;

pub type Inbound = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// The sending side of an open push channel.
///
/// `id` tells connections apart so a stale reader cannot tear down a newer
/// connection.
#[derive(Debug, Clone)]
pub struct Connection {
    pub id: String,
    sender: UnboundedSender<WsMessage>,
}

impl Connection {
    pub fn new(sender: UnboundedSender<WsMessage>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender,
        }
    }

    /// Queue a frame. Returns `false` when the channel is gone.
    pub fn send(&self, msg: &ClientMessage) -> bool {
        let frame = match msg.to_ws() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Failed to serialize channel message: {e}");
                return false;
            }
        };
        match self.sender.send(frame) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to queue frame on {}: {e}", self.id);
                false
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

pub struct ChannelTransport {
    pub connection: Connection,
    pub inbound: Inbound,
    pub writer: JoinHandle<()>,
}

/// Connect to the push channel at `url`, authenticating with `token`.
pub async fn connect(url: &str, token: &str) -> Result<ChannelTransport> {
    let mut request = url.into_client_request()?;
    request
        .headers_mut()
        .insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);

    let (ws_stream, _response) = connect_async(request).await?;
    let (mut ws_sender, inbound) = ws_stream.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();
    let connection = Connection::new(tx);

    info!("Push channel {} connected to {url}", connection.id);

    let connection_id = connection.id.clone();
    let writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Err(e) = ws_sender.send(msg).await {
                warn!("Failed to send frame on {connection_id}: {e}");
                break;
            }
        }
        let _ = ws_sender.close().await;
        debug!("Send loop closed for {connection_id}");
    });

    Ok(ChannelTransport {
        connection,
        inbound,
        writer,
    })
}
