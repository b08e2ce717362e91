//! Block service
//!
//! Directed blocks; creating one deactivates any active match between the
//! pair and removes its conversation.

use ember_core::entities::Block;
use ember_core::{DomainError, Snowflake};
use tracing::{info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// A blocked user as listed back to the blocker
#[derive(Debug, Clone)]
pub struct BlockedUser {
    pub user_id: Snowflake,
    pub name: String,
    pub blocked_at: chrono::DateTime<chrono::Utc>,
}

/// Block service
pub struct BlockService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BlockService<'a> {
    /// Create a new BlockService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Block a user
    #[instrument(skip(self))]
    pub async fn block_user(&self, blocker_id: Snowflake, blocked_id: Snowflake) -> ServiceResult<()> {
        if blocker_id == blocked_id {
            return Err(DomainError::SelfBlock.into());
        }

        self.ctx
            .user_repo()
            .find_by_id(blocked_id)
            .await?
            .ok_or(DomainError::UserNotFound(blocked_id))?;

        if self
            .ctx
            .block_repo()
            .find(blocker_id, blocked_id)
            .await?
            .is_some()
        {
            return Err(DomainError::AlreadyBlocked.into());
        }

        let block = Block::new(self.ctx.generate_id(), blocker_id, blocked_id);
        self.ctx.block_repo().create(&block).await?;

        // Blocking tears down any active match between the pair
        if let Some(record) = self
            .ctx
            .match_repo()
            .deactivate_between(blocker_id, blocked_id)
            .await?
        {
            self.ctx.conversation_repo().delete_by_match(record.id).await?;
            info!(match_id = %record.id, "Match deactivated by block");
        }

        info!(blocker_id = %blocker_id, blocked_id = %blocked_id, "User blocked");

        Ok(())
    }

    /// Unblock a user
    #[instrument(skip(self))]
    pub async fn unblock_user(
        &self,
        blocker_id: Snowflake,
        blocked_id: Snowflake,
    ) -> ServiceResult<()> {
        let block = self
            .ctx
            .block_repo()
            .find(blocker_id, blocked_id)
            .await?
            .ok_or(DomainError::BlockNotFound)?;

        self.ctx.block_repo().delete(block.id).await?;

        Ok(())
    }

    /// Users the caller has blocked
    #[instrument(skip(self))]
    pub async fn blocked_users(&self, blocker_id: Snowflake) -> ServiceResult<Vec<BlockedUser>> {
        let blocks = self.ctx.block_repo().list_by_blocker(blocker_id).await?;

        let mut results = Vec::new();
        for block in blocks {
            if let Some(user) = self.ctx.user_repo().find_by_id(block.blocked_id).await? {
                results.push(BlockedUser {
                    user_id: block.blocked_id,
                    name: user.name,
                    blocked_at: block.created_at,
                });
            }
        }

        Ok(results)
    }
}
