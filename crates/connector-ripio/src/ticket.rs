//! Ticket issuance for private WebSocket channels.

use async_trait::async_trait;
use ripio_rest::{RipioRestClient, RipioRestError};

/// Source of short-lived WebSocket tickets.
#[async_trait]
pub trait TicketIssuer: Send + Sync {
    async fn issue_ticket(&self) -> Result<String, RipioRestError>;
}

#[async_trait]
impl TicketIssuer for RipioRestClient {
    async fn issue_ticket(&self) -> Result<String, RipioRestError> {
        self.create_ticket().await
    }
}
