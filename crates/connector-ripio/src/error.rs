use auth::AuthError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The ticket request failed or returned no ticket. No connection was attempted.
    #[error("WebSocket ticket unavailable: {0}")]
    TicketUnavailable(String),

    /// Handshake headers could not be built.
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// No acknowledgement arrived within the receive budget after subscribing.
    #[error("No subscription acknowledgement after {attempts} receive attempts")]
    SubscriptionTimeout { attempts: u32 },

    #[error("Connection closed")]
    ConnectionClosed,

    /// The update handler rejected a message.
    #[error("Update handler error: {0}")]
    Handler(String),

    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("Shutdown requested")]
    Shutdown,
}
