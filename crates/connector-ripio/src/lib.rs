//! Private WebSocket channels for Ripio Trade.
//!
//! A session obtains a ticket over REST, connects with signed headers,
//! subscribes once and reads updates within a fixed receive budget.

mod error;
mod private_stream;
mod ticket;

pub use error::ConnectorError;
pub use private_stream::{CloseReason, PrivateStream, StreamState, StreamSummary};
pub use ticket::TicketIssuer;
