//! Block database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the blocks table
#[derive(Debug, Clone, FromRow)]
pub struct BlockModel {
    pub id: i64,
    pub blocker_id: i64,
    pub blocked_id: i64,
    pub created_at: DateTime<Utc>,
}
