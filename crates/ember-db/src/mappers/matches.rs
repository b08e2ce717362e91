//! Match entity <-> model mapper

use ember_core::entities::Match;
use ember_core::value_objects::Snowflake;

use crate::models::MatchModel;

impl From<MatchModel> for Match {
    fn from(model: MatchModel) -> Self {
        Match {
            id: Snowflake::new(model.id),
            user1_id: Snowflake::new(model.user1_id),
            user2_id: Snowflake::new(model.user2_id),
            matched_at: model.matched_at,
            is_active: model.is_active,
            user1_seen: model.user1_seen,
            user2_seen: model.user2_seen,
        }
    }
}
