//! Match database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the matches table
#[derive(Debug, Clone, FromRow)]
pub struct MatchModel {
    pub id: i64,
    pub user1_id: i64,
    pub user2_id: i64,
    pub matched_at: DateTime<Utc>,
    pub is_active: bool,
    pub user1_seen: bool,
    pub user2_seen: bool,
}
