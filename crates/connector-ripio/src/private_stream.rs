//! Private WebSocket channel client.
//!
//! Flow:
//! 1. Request a ticket over REST
//! 2. Connect with the same signed headers as REST, using the logical path `ws`
//! 3. Send one subscribe message carrying the ticket and wait for its ack
//! 4. Read updates for a fixed number of receive attempts, each bounded by a timeout
//! 5. Close the socket, whatever happened

use crate::error::ConnectorError;
use crate::ticket::TicketIssuer;
use auth::{mask, ApiCredentials, HttpMethod, RequestSigner};
use common::ApiConfig;
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use std::fmt;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Lifecycle of one private stream run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Unauthenticated,
    TicketRequested,
    Connected,
    Subscribed,
    Streaming,
    Closed,
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unauthenticated => "unauthenticated",
            Self::TicketRequested => "ticket_requested",
            Self::Connected => "connected",
            Self::Subscribed => "subscribed",
            Self::Streaming => "streaming",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

/// Why a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// Every receive attempt was used.
    BudgetExhausted,
    /// The server sent a close frame or ended the stream.
    ServerClosed,
    /// The shutdown signal fired.
    Shutdown,
}

/// Outcome of a run that got past the subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSummary {
    /// Raw subscription acknowledgement.
    pub ack: String,
    /// Updates handed to the handler.
    pub updates: usize,
    /// Receive attempts that timed out without a message.
    pub idle_windows: usize,
    pub close_reason: CloseReason,
}

/// Subscribe control message.
#[derive(Debug, Serialize)]
struct SubscribeRequest<'a> {
    method: &'static str,
    topics: &'a [String],
    ticket: &'a str,
    id: i64,
}

/// What one bounded receive produced.
enum Frame {
    Message(Message),
    Idle,
    Ended,
    Shutdown,
}

/// Client for one private channel session.
pub struct PrivateStream {
    config: ApiConfig,
    credentials: ApiCredentials,
    shutdown_rx: Option<watch::Receiver<bool>>,
    state: StreamState,
}

impl PrivateStream {
    pub fn new(config: ApiConfig, credentials: ApiCredentials) -> Self {
        Self {
            config,
            credentials,
            shutdown_rx: None,
            state: StreamState::Unauthenticated,
        }
    }

    /// Stop receiving as soon as `shutdown_rx` turns true.
    pub fn with_shutdown(mut self, shutdown_rx: watch::Receiver<bool>) -> Self {
        self.shutdown_rx = Some(shutdown_rx);
        self
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Run the full flow, passing each update's text to `on_update`.
    ///
    /// A failed ticket request stops in `TicketRequested` without opening a
    /// connection. Once connected, the socket is closed on every exit path
    /// and the state ends as `Closed`.
    pub async fn run<I, F>(
        &mut self,
        issuer: &I,
        mut on_update: F,
    ) -> Result<StreamSummary, ConnectorError>
    where
        I: TicketIssuer + ?Sized,
        F: FnMut(&str) -> Result<(), ConnectorError>,
    {
        self.transition(StreamState::Unauthenticated);

        self.transition(StreamState::TicketRequested);
        let ticket = issuer.issue_ticket().await.map_err(|e| {
            warn!(error = %e, "Failed to obtain WebSocket ticket");
            ConnectorError::TicketUnavailable(e.to_string())
        })?;
        info!(ticket = %mask(&ticket), "Obtained ticket, connecting to private stream");

        let mut ws = match self.connect().await {
            Ok(ws) => ws,
            Err(e) => {
                self.transition(StreamState::Closed);
                return Err(e);
            }
        };
        self.transition(StreamState::Connected);

        let result = self.session(&mut ws, &ticket, &mut on_update).await;

        match tokio::time::timeout(self.config.receive_timeout(), ws.close(None)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!(error = %e, "Close frame not delivered"),
            Err(_) => debug!("Close handshake timed out, dropping socket"),
        }
        drop(ws);
        self.transition(StreamState::Closed);

        match &result {
            Ok(summary) => info!(
                updates = summary.updates,
                idle_windows = summary.idle_windows,
                reason = ?summary.close_reason,
                "Private stream closed"
            ),
            Err(e) => warn!(error = %e, "Private stream closed with error"),
        }

        result
    }

    async fn connect(&self) -> Result<WsStream, ConnectorError> {
        let headers = RequestSigner::new(&self.credentials).build_headers(
            HttpMethod::Get,
            self.config.ws_auth_path(),
            "",
        )?;

        let mut request = self
            .config
            .ws_url()
            .into_client_request()
            .map_err(|e| ConnectorError::WebSocket(e.to_string()))?;

        for (name, value) in headers.to_pairs() {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ConnectorError::WebSocket(e.to_string()))?;
            let value =
                HeaderValue::from_str(&value).map_err(|e| ConnectorError::WebSocket(e.to_string()))?;
            request.headers_mut().insert(name, value);
        }

        debug!(url = %self.config.ws_url(), "Connecting to private stream");

        match tokio::time::timeout(self.config.connect_timeout(), connect_async(request)).await {
            Ok(Ok((stream, response))) => {
                info!(status = %response.status(), "Connected to private stream");
                Ok(stream)
            }
            Ok(Err(e)) => Err(ConnectorError::WebSocket(e.to_string())),
            Err(_) => Err(ConnectorError::WebSocket("connection timeout".into())),
        }
    }

    async fn session<F>(
        &mut self,
        ws: &mut WsStream,
        ticket: &str,
        on_update: &mut F,
    ) -> Result<StreamSummary, ConnectorError>
    where
        F: FnMut(&str) -> Result<(), ConnectorError>,
    {
        let request = SubscribeRequest {
            method: "subscribe",
            topics: self.config.topics(),
            ticket,
            id: common::now_ms(),
        };
        let text =
            serde_json::to_string(&request).map_err(|e| ConnectorError::Serialize(e.to_string()))?;

        ws.send(Message::Text(text.into()))
            .await
            .map_err(|e| ConnectorError::WebSocket(e.to_string()))?;
        debug!(topics = ?self.config.topics(), "Subscribe request sent");

        let ack = self.await_ack(ws).await?;
        info!(ack = %ack, "Subscription acknowledged");
        self.transition(StreamState::Subscribed);

        self.transition(StreamState::Streaming);
        let mut summary = StreamSummary {
            ack,
            updates: 0,
            idle_windows: 0,
            close_reason: CloseReason::BudgetExhausted,
        };

        for attempt in 1..=self.config.receive_attempts() {
            match self.next_frame(ws).await? {
                Frame::Message(Message::Text(text)) => {
                    summary.updates += 1;
                    debug!(attempt = attempt, "Received update");
                    on_update(text.as_str())?;
                }
                Frame::Message(Message::Ping(data)) => {
                    debug!("Received Ping, sending Pong");
                    ws.send(Message::Pong(data))
                        .await
                        .map_err(|e| ConnectorError::WebSocket(e.to_string()))?;
                }
                Frame::Message(Message::Close(_)) | Frame::Ended => {
                    info!("Private stream closed by server");
                    summary.close_reason = CloseReason::ServerClosed;
                    return Ok(summary);
                }
                Frame::Message(_) => {}
                Frame::Idle => {
                    summary.idle_windows += 1;
                    debug!(attempt = attempt, "No update in receive window");
                }
                Frame::Shutdown => {
                    info!("Shutdown signal received, closing private stream");
                    summary.close_reason = CloseReason::Shutdown;
                    return Ok(summary);
                }
            }
        }

        Ok(summary)
    }

    /// Wait for the single subscription acknowledgement.
    async fn await_ack(&mut self, ws: &mut WsStream) -> Result<String, ConnectorError> {
        let attempts = self.config.receive_attempts();

        for _ in 0..attempts {
            match self.next_frame(ws).await? {
                Frame::Message(Message::Text(text)) => return Ok(text.as_str().to_string()),
                Frame::Message(Message::Ping(data)) => {
                    ws.send(Message::Pong(data))
                        .await
                        .map_err(|e| ConnectorError::WebSocket(e.to_string()))?;
                }
                Frame::Message(Message::Close(_)) | Frame::Ended => {
                    return Err(ConnectorError::ConnectionClosed);
                }
                Frame::Message(_) | Frame::Idle => {}
                Frame::Shutdown => return Err(ConnectorError::Shutdown),
            }
        }

        Err(ConnectorError::SubscriptionTimeout { attempts })
    }

    /// One receive attempt bounded by the receive timeout.
    async fn next_frame(&mut self, ws: &mut WsStream) -> Result<Frame, ConnectorError> {
        let receive_timeout = self.config.receive_timeout();

        tokio::select! {
            biased;

            _ = wait_for_shutdown(&mut self.shutdown_rx) => Ok(Frame::Shutdown),

            result = tokio::time::timeout(receive_timeout, ws.next()) => match result {
                Err(_) => Ok(Frame::Idle),
                Ok(None) => Ok(Frame::Ended),
                Ok(Some(Ok(msg))) => Ok(Frame::Message(msg)),
                Ok(Some(Err(e))) => Err(ConnectorError::WebSocket(e.to_string())),
            },
        }
    }

    fn transition(&mut self, next: StreamState) {
        debug!(from = %self.state, to = %next, "Private stream state");
        self.state = next;
    }
}

/// Resolves once shutdown is requested; never resolves without a receiver.
async fn wait_for_shutdown(shutdown_rx: &mut Option<watch::Receiver<bool>>) {
    let Some(rx) = shutdown_rx else {
        return std::future::pending().await;
    };

    loop {
        if *rx.borrow() {
            return;
        }
        if rx.changed().await.is_err() {
            // Sender dropped without requesting shutdown.
            return std::future::pending().await;
        }
    }
}
