pub mod config;
pub mod ticket;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DatabaseConfig,
    ServerConfig,
};
pub use ticket::{SqliteTicketStore, Ticket, TicketError, TicketStatus, TicketStore};
