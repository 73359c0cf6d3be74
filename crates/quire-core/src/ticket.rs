//! Issue tracker boundary.

use quire_commit::TicketIssue;
use thiserror::Error;

/// Ticket lookup errors.
#[derive(Debug, Error)]
pub enum TicketError {
    /// The tracker has no ticket with this ID.
    #[error("ticket not found: {0}")]
    NotFound(String),

    /// The tracker could not be reached.
    #[error("failed to fetch ticket {id}: {message}")]
    Transport {
        /// Ticket ID.
        id: String,
        /// Transport failure description.
        message: String,
    },

    /// The tracker rejected the credentials.
    #[error("not authorized to fetch ticket {id}: {message}")]
    Auth {
        /// Ticket ID.
        id: String,
        /// Rejection description.
        message: String,
    },
}

/// Fetches ticket metadata for IDs captured from commit headers.
///
/// Lookups are synchronous; callers own timeouts and retries.
pub trait TicketEnricher {
    /// Fetches a ticket.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::NotFound`] for unknown tickets; the parser
    /// tolerates those and aborts on any other error.
    fn fetch(&self, id: &str) -> Result<TicketIssue, TicketError>;
}
