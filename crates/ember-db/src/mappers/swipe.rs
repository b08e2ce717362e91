//! Swipe entity <-> model mapper

use ember_core::entities::{Swipe, SwipeKind};
use ember_core::error::DomainError;
use ember_core::value_objects::Snowflake;

use crate::models::SwipeModel;

impl TryFrom<SwipeModel> for Swipe {
    type Error = DomainError;

    fn try_from(model: SwipeModel) -> Result<Self, Self::Error> {
        Ok(Swipe {
            id: Snowflake::new(model.id),
            swiper_id: Snowflake::new(model.swiper_id),
            swiped_id: Snowflake::new(model.swiped_id),
            kind: SwipeKind::from_str_opt(&model.kind).ok_or_else(|| {
                DomainError::DatabaseError(format!("invalid swipe kind: {}", model.kind))
            })?,
            created_at: model.created_at,
        })
    }
}
