//! # ember-api
//!
//! The single server binary: REST API plus the `/ws` realtime endpoint.

pub mod extractors;
pub mod external;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run, run_server};
pub use state::AppState;
