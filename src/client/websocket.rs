//! WebSocket client for the diff depth stream.
//!
//! This module provides [`DepthStream`], a typed boundary over the venue's
//! raw stream connection. Everything that is not a depth event - command
//! acks, pings, malformed frames - is handled or discarded here, so the sync
//! engine only ever sees [`DepthUpdateEvent`]s.
//!
//! Reconnection is the caller's decision, driven by [`ReconnectConfig`]: the
//! stream reports `Error::ConnectionClosed` and the feed loop decides when to
//! dial again. The engine itself only sees explicit "source lost" signals.

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::error::Error;
use crate::types::messages::{DepthUpdateEvent, StreamMessage, WsCommand};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Typed connection to a `<symbol>@depth` stream.
///
/// # Thread Safety
///
/// Not thread-safe; owned and polled by a single task (the feed loop).
#[derive(Debug)]
pub struct DepthStream {
    write: SplitSink<WsStream, Message>,
    read: SplitStream<WsStream>,
    stream_name: String,
    message_id: u64,
    /// Frames discarded because they could not be decoded
    malformed: u64,
}

impl DepthStream {
    /// Connect to the diff depth stream for the configured symbol.
    ///
    /// The stream name is part of the URL, so depth events start flowing
    /// without an explicit subscribe; [`subscribe`](Self::subscribe) exists
    /// for adding streams to an open connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the connection fails.
    pub async fn connect(config: &Config) -> Result<Self, Error> {
        let url = Url::parse(&config.websocket_url())
            .map_err(|e| Error::Config(format!("invalid stream URL: {}", e)))?;

        let (ws_stream, _response) = tokio_tungstenite::connect_async(url.as_str()).await?;
        let (write, read) = ws_stream.split();

        debug!(url = %url, "depth stream connected");

        Ok(Self {
            write,
            read,
            stream_name: config.stream_name(),
            message_id: 1,
            malformed: 0,
        })
    }

    /// Name of the stream this connection was opened for
    pub fn stream_name(&self) -> &str {
        &self.stream_name
    }

    /// Frames discarded as undecodable since connect
    pub fn malformed_count(&self) -> u64 {
        self.malformed
    }

    /// Subscribe to an additional stream on this connection
    pub async fn subscribe(&mut self, stream: &str) -> Result<u64, Error> {
        let cmd = WsCommand::Subscribe {
            params: vec![stream.to_string()],
            id: self.message_id,
        };
        self.send_command(cmd).await
    }

    /// Unsubscribe from a stream on this connection
    pub async fn unsubscribe(&mut self, stream: &str) -> Result<u64, Error> {
        let cmd = WsCommand::Unsubscribe {
            params: vec![stream.to_string()],
            id: self.message_id,
        };
        self.send_command(cmd).await
    }

    async fn send_command(&mut self, cmd: WsCommand) -> Result<u64, Error> {
        let msg_id = self.message_id;
        let json = serde_json::to_string(&cmd)?;
        self.write.send(Message::Text(json)).await?;
        self.message_id += 1;
        Ok(msg_id)
    }

    /// Receive the next depth event.
    ///
    /// Pings are answered, command acks are swallowed, and malformed frames
    /// are logged and counted but never forwarded: a bad frame must not crash
    /// the feed or masquerade as book data.
    ///
    /// # Returns
    ///
    /// The next event; `Error::ConnectionClosed` when the venue closes the
    /// stream; `None` when the transport is exhausted.
    pub async fn next(&mut self) -> Option<Result<DepthUpdateEvent, Error>> {
        loop {
            match self.read.next().await? {
                Ok(Message::Text(text)) => match serde_json::from_str::<StreamMessage>(&text) {
                    Ok(StreamMessage::DepthUpdate(event)) => {
                        if event.event_type != "depthUpdate" {
                            self.malformed += 1;
                            warn!(event_type = %event.event_type, "unexpected event type, discarding");
                            continue;
                        }
                        return Some(Ok(event));
                    }
                    Ok(StreamMessage::Ack(ack)) => {
                        debug!(id = ack.id, "command acknowledged");
                        continue;
                    }
                    Err(e) => {
                        self.malformed += 1;
                        warn!(error = %e, "discarding undecodable frame");
                        continue;
                    }
                },
                Ok(Message::Ping(data)) => {
                    // Venue disconnects clients that do not answer pings
                    if let Err(e) = self.write.send(Message::Pong(data)).await {
                        return Some(Err(e.into()));
                    }
                }
                Ok(Message::Close(_)) => {
                    return Some(Err(Error::ConnectionClosed));
                }
                Ok(_) => {
                    // Ignore other message types (Binary, Pong, Frame)
                    continue;
                }
                Err(e) => {
                    return Some(Err(e.into()));
                }
            }
        }
    }

    /// Close the stream connection
    pub async fn close(&mut self) -> Result<(), Error> {
        self.write.close().await?;
        Ok(())
    }
}

/// Reconnect and retry policy.
///
/// One policy object drives both stream redials and snapshot fetch retries,
/// decoupled from the engine: the engine only ever sees "source lost" and a
/// fresh snapshot/event flow after resume.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Maximum number of attempts (0 = infinite)
    pub max_retries: u32,
    /// Initial delay between attempts
    pub initial_delay_ms: u64,
    /// Maximum delay between attempts
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_retries: 10,
            initial_delay_ms: 100,
            max_delay_ms: 30_000,
            backoff_multiplier: 2.0,
        }
    }
}

impl ReconnectConfig {
    /// Create a policy with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum attempts (0 = infinite)
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the initial delay in milliseconds
    pub fn initial_delay_ms(mut self, ms: u64) -> Self {
        self.initial_delay_ms = ms;
        self
    }

    /// Set the maximum delay in milliseconds
    pub fn max_delay_ms(mut self, ms: u64) -> Self {
        self.max_delay_ms = ms;
        self
    }

    /// Set the backoff multiplier
    pub fn backoff_multiplier(mut self, multiplier: f64) -> Self {
        self.backoff_multiplier = multiplier;
        self
    }

    /// Whether another attempt is allowed after `attempt` failures
    pub fn allows_attempt(&self, attempt: u32) -> bool {
        self.max_retries == 0 || attempt < self.max_retries
    }

    /// Delay before the given attempt, capped at `max_delay_ms`
    pub fn delay_for_attempt(&self, attempt: u32) -> std::time::Duration {
        let delay = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(attempt as i32);
        let delay_ms = delay.min(self.max_delay_ms as f64) as u64;
        std::time::Duration::from_millis(delay_ms)
    }
}
