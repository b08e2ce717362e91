//! Connection registry and per-connection state

mod connection;
mod manager;

pub use connection::{Connection, ConnectionState, Outbound, SendError};
pub use manager::ConnectionManager;
