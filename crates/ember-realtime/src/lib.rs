//! # ember-realtime
//!
//! In-process WebSocket layer: connection registry, subscription map, wire
//! protocol, session loop, and the notifier the REST handlers use to push
//! events to live clients. Single-process by design; there is no cross-node
//! fan-out.

pub mod connection;
pub mod notifier;
pub mod protocol;
pub mod session;

pub use connection::{Connection, ConnectionManager, ConnectionState, Outbound, SendError};
pub use notifier::RealtimeNotifier;
pub use protocol::{ClientEvent, CloseCode, EventKind, ServerEvent};
pub use session::run_session;
