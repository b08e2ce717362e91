//! Block entity <-> model mapper

use ember_core::entities::Block;
use ember_core::value_objects::Snowflake;

use crate::models::BlockModel;

impl From<BlockModel> for Block {
    fn from(model: BlockModel) -> Self {
        Block {
            id: Snowflake::new(model.id),
            blocker_id: Snowflake::new(model.blocker_id),
            blocked_id: Snowflake::new(model.blocked_id),
            created_at: model.created_at,
        }
    }
}
