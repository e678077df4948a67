//! SQLite-backed ticket store implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use tracing::info;

use super::{Ticket, TicketError, TicketStatus, TicketStore};

/// Demo records inserted when the store is first found empty.
const SEED_TICKETS: [(&str, &str, TicketStatus); 4] = [
    ("Kylo Ren", "Helmet Refurbishment", TicketStatus::Open),
    ("Gen. Hux", "Trooper Aim Calibration", TicketStatus::Open),
    ("FN-2187", "Sanitation Duty Appeal", TicketStatus::Closed),
    ("Palpatine", "Electricity Bill Dispute", TicketStatus::Open),
];

/// SQLite-backed ticket store.
pub struct SqliteTicketStore {
    conn: Mutex<Connection>,
}

impl SqliteTicketStore {
    /// Open a SQLite ticket store, creating the database file if needed.
    ///
    /// The schema is not touched here; call [`ensure_initialized`] once at
    /// startup to create and seed the tickets table.
    ///
    /// [`ensure_initialized`]: SqliteTicketStore::ensure_initialized
    pub fn new(path: &Path) -> Result<Self, TicketError> {
        let conn = Connection::open(path).map_err(|e| TicketError::Database(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite ticket store (useful for testing).
    pub fn in_memory() -> Result<Self, TicketError> {
        let conn =
            Connection::open_in_memory().map_err(|e| TicketError::Database(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create the tickets table if absent and seed it with demo records
    /// if empty. Idempotent, called on every process start.
    pub fn ensure_initialized(&self) -> Result<(), TicketError> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS tickets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user TEXT NOT NULL,
                subject TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'open',
                created_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| TicketError::Database(e.to_string()))?;

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM tickets", [], |row| row.get(0))
            .map_err(|e| TicketError::Database(e.to_string()))?;

        if count == 0 {
            let now = Utc::now().to_rfc3339();
            for (user, subject, status) in SEED_TICKETS {
                conn.execute(
                    "INSERT INTO tickets (user, subject, status, created_at) VALUES (?, ?, ?, ?)",
                    params![user, subject, status.as_str(), now],
                )
                .map_err(|e| TicketError::Database(e.to_string()))?;
            }
            info!("Seeded tickets table with {} demo records", SEED_TICKETS.len());
        }

        Ok(())
    }

    fn row_to_ticket(row: &rusqlite::Row) -> rusqlite::Result<Ticket> {
        let id: i64 = row.get(0)?;
        let user: String = row.get(1)?;
        let subject: String = row.get(2)?;
        let status_str: String = row.get(3)?;
        let created_at_str: String = row.get(4)?;

        // Unknown status text shouldn't happen with valid data; treat it as open
        let status = TicketStatus::parse(&status_str).unwrap_or(TicketStatus::Open);

        // Parse timestamp - use now if parsing fails (shouldn't happen with valid data)
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(Ticket {
            id,
            user,
            subject,
            status,
            created_at,
        })
    }

    /// A query against a table that was never created degrades to "no
    /// tickets" instead of an error.
    fn is_missing_table(err: &rusqlite::Error) -> bool {
        matches!(err, rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("no such table"))
    }

    #[cfg(test)]
    fn all_tickets(&self) -> Vec<Ticket> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT id, user, subject, status, created_at FROM tickets ORDER BY id ASC")
            .unwrap();
        let rows = stmt.query_map([], Self::row_to_ticket).unwrap();
        rows.map(|r| r.unwrap()).collect()
    }
}

impl TicketStore for SqliteTicketStore {
    fn list_open(&self) -> Result<Vec<Ticket>, TicketError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = match conn.prepare(
            "SELECT id, user, subject, status, created_at FROM tickets WHERE status = 'open' ORDER BY id ASC",
        ) {
            Ok(stmt) => stmt,
            Err(e) if Self::is_missing_table(&e) => return Ok(Vec::new()),
            Err(e) => return Err(TicketError::Database(e.to_string())),
        };

        let rows = stmt
            .query_map([], Self::row_to_ticket)
            .map_err(|e| TicketError::Database(e.to_string()))?;

        let mut tickets = Vec::new();
        for row_result in rows {
            let ticket = row_result.map_err(|e| TicketError::Database(e.to_string()))?;
            tickets.push(ticket);
        }

        Ok(tickets)
    }

    fn close(&self, id: i64) -> Result<(), TicketError> {
        let conn = self.conn.lock().unwrap();

        // Unknown ids match zero rows, which is fine
        match conn.execute(
            "UPDATE tickets SET status = 'closed' WHERE id = ?",
            params![id],
        ) {
            Ok(_) => Ok(()),
            Err(e) if Self::is_missing_table(&e) => Ok(()),
            Err(e) => Err(TicketError::Database(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> SqliteTicketStore {
        let store = SqliteTicketStore::in_memory().unwrap();
        store.ensure_initialized().unwrap();
        store
    }

    #[test]
    fn test_seed_on_first_run() {
        let store = create_test_store();

        let all = store.all_tickets();
        assert_eq!(all.len(), 4);
        assert_eq!(all.iter().filter(|t| t.is_open()).count(), 3);
        assert_eq!(
            all.iter()
                .filter(|t| t.status == TicketStatus::Closed)
                .count(),
            1
        );
    }

    #[test]
    fn test_ensure_initialized_is_idempotent() {
        let store = create_test_store();
        store.ensure_initialized().unwrap();
        store.ensure_initialized().unwrap();

        assert_eq!(store.all_tickets().len(), 4);
    }

    #[test]
    fn test_no_reseed_after_all_closed() {
        let store = create_test_store();
        for ticket in store.all_tickets() {
            store.close(ticket.id).unwrap();
        }

        // Table is non-empty (all closed), so a restart must not reseed
        store.ensure_initialized().unwrap();
        assert!(store.list_open().unwrap().is_empty());
        assert_eq!(store.all_tickets().len(), 4);
    }

    #[test]
    fn test_list_open_excludes_closed() {
        let store = create_test_store();

        let open = store.list_open().unwrap();
        assert_eq!(open.len(), 3);
        assert!(open.iter().all(|t| t.status == TicketStatus::Open));
        assert!(!open.iter().any(|t| t.user == "FN-2187"));
    }

    #[test]
    fn test_list_open_insertion_order() {
        let store = create_test_store();

        let open = store.list_open().unwrap();
        let ids: Vec<i64> = open.iter().map(|t| t.id).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
        assert_eq!(open[0].user, "Kylo Ren");
    }

    #[test]
    fn test_close_removes_from_listing() {
        let store = create_test_store();

        let open = store.list_open().unwrap();
        let id = open[0].id;

        store.close(id).unwrap();

        let open = store.list_open().unwrap();
        assert_eq!(open.len(), 2);
        assert!(!open.iter().any(|t| t.id == id));
    }

    #[test]
    fn test_close_nonexistent_is_noop() {
        let store = create_test_store();

        let before = store.all_tickets();
        store.close(9999).unwrap();
        let after = store.all_tickets();

        assert_eq!(before, after);
    }

    #[test]
    fn test_close_already_closed_is_idempotent() {
        let store = create_test_store();

        let closed = store
            .all_tickets()
            .into_iter()
            .find(|t| t.status == TicketStatus::Closed)
            .unwrap();

        store.close(closed.id).unwrap();

        let all = store.all_tickets();
        assert_eq!(all.iter().filter(|t| t.is_open()).count(), 3);
        assert_eq!(store.list_open().unwrap().len(), 3);
    }

    #[test]
    fn test_list_open_without_table_is_empty() {
        let store = SqliteTicketStore::in_memory().unwrap();
        let open = store.list_open().unwrap();
        assert!(open.is_empty());
    }

    #[test]
    fn test_close_without_table_is_noop() {
        let store = SqliteTicketStore::in_memory().unwrap();
        assert!(store.close(1).is_ok());
    }

    #[test]
    fn test_file_based_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("tickets.db");

        let store = SqliteTicketStore::new(&db_path).unwrap();
        store.ensure_initialized().unwrap();

        assert!(db_path.exists());

        // A second store against the same file sees the seeded rows
        let reopened = SqliteTicketStore::new(&db_path).unwrap();
        reopened.ensure_initialized().unwrap();
        assert_eq!(reopened.list_open().unwrap().len(), 3);
    }
}
