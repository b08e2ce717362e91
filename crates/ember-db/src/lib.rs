//! # ember-db
//!
//! Database layer implementing the repository traits with PostgreSQL via SQLx.
//!
//! Provides:
//! - Connection pool management and migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ model mappers
//! - Repository implementations, including the atomic operations the
//!   concurrency model relies on (conditional super-like decrement,
//!   single-statement unread updates, transactional match + conversation
//!   creation guarded by a partial unique index)

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_pool_from_env, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgBlockRepository, PgConversationRepository, PgMatchRepository, PgMessageRepository,
    PgSwipeRepository, PgUserRepository,
};
