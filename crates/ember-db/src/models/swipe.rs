//! Swipe database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the swipes table
#[derive(Debug, Clone, FromRow)]
pub struct SwipeModel {
    pub id: i64,
    pub swiper_id: i64,
    pub swiped_id: i64,
    pub kind: String,
    pub created_at: DateTime<Utc>,
}
