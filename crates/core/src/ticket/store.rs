//! Ticket storage trait.

use std::fmt;

use crate::ticket::Ticket;

/// Error type for ticket operations.
#[derive(Debug)]
pub enum TicketError {
    /// Database error.
    Database(String),
}

impl fmt::Display for TicketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for TicketError {}

/// Trait for ticket storage backends.
pub trait TicketStore: Send + Sync {
    /// List all open tickets, oldest first.
    ///
    /// A store whose tickets table does not exist yet reports no
    /// tickets rather than an error.
    fn list_open(&self) -> Result<Vec<Ticket>, TicketError>;

    /// Mark the ticket with the given id as closed.
    ///
    /// Closing an unknown or already-closed ticket is a no-op.
    fn close(&self, id: i64) -> Result<(), TicketError>;
}
