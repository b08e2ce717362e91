//! In-memory test doubles for the repository and collaborator traits
//!
//! A single `MemStore` backs every repository so tests can assert on
//! cross-entity effects (e.g. a block deactivating a match).

// Not every test binary exercises every helper
#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use ember_common::JwtService;
use ember_core::entities::{
    Block, Conversation, Coordinates, Gender, Location, Match, Message, PinnedMessage, Reaction,
    Swipe, User,
};
use ember_core::traits::{
    BlockRepository, CandidateQuery, ConversationRepository, CreatedMatch, GeocodedPlace, Geocoder,
    MatchRepository, MessageRepository, RepoResult, SwipeRepository, UserRepository,
};
use ember_core::{DomainError, Snowflake, SnowflakeGenerator};
use ember_service::{ServiceContext, ServiceContextBuilder};

#[derive(Default)]
pub struct Inner {
    pub users: Vec<User>,
    pub swipes: Vec<Swipe>,
    pub matches: Vec<Match>,
    pub conversations: Vec<Conversation>,
    pub messages: Vec<Message>,
    pub blocks: Vec<Block>,
}

/// Shared in-memory store implementing every repository trait
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

impl MemStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("store poisoned")
    }

    pub fn insert_user(&self, user: User) {
        self.lock().users.push(user);
    }

    pub fn active_matches_between(&self, a: Snowflake, b: Snowflake) -> usize {
        self.lock()
            .matches
            .iter()
            .filter(|m| {
                m.is_active
                    && ((m.user1_id == a && m.user2_id == b)
                        || (m.user1_id == b && m.user2_id == a))
            })
            .count()
    }
}

#[async_trait]
impl UserRepository for MemStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.lock().users.iter().any(|u| u.email == email))
    }

    async fn create(&self, user: &User) -> RepoResult<()> {
        let mut inner = self.lock();
        if inner.users.iter().any(|u| u.email == user.email) {
            return Err(DomainError::EmailAlreadyExists);
        }
        inner.users.push(user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        let mut inner = self.lock();
        let slot = inner
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(DomainError::UserNotFound(user.id))?;
        *slot = user.clone();
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut inner = self.lock();
        let before = inner.users.len();
        inner.users.retain(|u| u.id != id);
        if inner.users.len() == before {
            return Err(DomainError::UserNotFound(id));
        }
        Ok(())
    }

    async fn set_presence(
        &self,
        id: Snowflake,
        online: bool,
        last_active: DateTime<Utc>,
    ) -> RepoResult<()> {
        if let Some(user) = self.lock().users.iter_mut().find(|u| u.id == id) {
            user.is_online = online;
            user.last_active = last_active;
        }
        Ok(())
    }

    async fn consume_super_like(&self, id: Snowflake) -> RepoResult<bool> {
        let mut inner = self.lock();
        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(DomainError::UserNotFound(id))?;
        if user.super_likes_remaining > 0 {
            user.super_likes_remaining -= 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn refill_super_likes(
        &self,
        id: Snowflake,
        remaining: i32,
        reset_at: DateTime<Utc>,
    ) -> RepoResult<()> {
        let mut inner = self.lock();
        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(DomainError::UserNotFound(id))?;
        user.super_likes_remaining = remaining;
        user.super_likes_reset_at = Some(reset_at);
        Ok(())
    }

    async fn set_premium(&self, id: Snowflake, is_premium: bool) -> RepoResult<()> {
        if let Some(user) = self.lock().users.iter_mut().find(|u| u.id == id) {
            user.is_premium = is_premium;
        }
        Ok(())
    }

    async fn find_candidates(&self, query: &CandidateQuery) -> RepoResult<Vec<User>> {
        Ok(self
            .lock()
            .users
            .iter()
            .filter(|u| {
                u.discovery_enabled
                    && u.gender == query.gender
                    && u.looking_for == query.looking_for
                    && u.age >= query.min_age
                    && u.age <= query.max_age
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SwipeRepository for MemStore {
    async fn find_pair(
        &self,
        swiper_id: Snowflake,
        swiped_id: Snowflake,
    ) -> RepoResult<Option<Swipe>> {
        Ok(self
            .lock()
            .swipes
            .iter()
            .find(|s| s.swiper_id == swiper_id && s.swiped_id == swiped_id)
            .cloned())
    }

    async fn find_positive_from(
        &self,
        swiper_id: Snowflake,
        swiped_id: Snowflake,
    ) -> RepoResult<Option<Swipe>> {
        Ok(self
            .lock()
            .swipes
            .iter()
            .find(|s| s.swiper_id == swiper_id && s.swiped_id == swiped_id && s.kind.is_positive())
            .cloned())
    }

    async fn create(&self, swipe: &Swipe) -> RepoResult<()> {
        let mut inner = self.lock();
        if inner
            .swipes
            .iter()
            .any(|s| s.swiper_id == swipe.swiper_id && s.swiped_id == swipe.swiped_id)
        {
            return Err(DomainError::AlreadySwiped);
        }
        inner.swipes.push(swipe.clone());
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        self.lock().swipes.retain(|s| s.id != id);
        Ok(())
    }

    async fn find_latest_by_swiper(&self, swiper_id: Snowflake) -> RepoResult<Option<Swipe>> {
        Ok(self
            .lock()
            .swipes
            .iter()
            .filter(|s| s.swiper_id == swiper_id)
            .max_by_key(|s| (s.created_at, s.id))
            .cloned())
    }

    async fn swiped_ids(&self, swiper_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        Ok(self
            .lock()
            .swipes
            .iter()
            .filter(|s| s.swiper_id == swiper_id)
            .map(|s| s.swiped_id)
            .collect())
    }
}

#[async_trait]
impl MatchRepository for MemStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Match>> {
        Ok(self.lock().matches.iter().find(|m| m.id == id).cloned())
    }

    async fn find_active_between(
        &self,
        user_a: Snowflake,
        user_b: Snowflake,
    ) -> RepoResult<Option<Match>> {
        Ok(self
            .lock()
            .matches
            .iter()
            .find(|m| {
                m.is_active
                    && ((m.user1_id == user_a && m.user2_id == user_b)
                        || (m.user1_id == user_b && m.user2_id == user_a))
            })
            .cloned())
    }

    async fn create_with_conversation(
        &self,
        record: &Match,
        conversation: &Conversation,
    ) -> RepoResult<CreatedMatch> {
        let mut inner = self.lock();

        let existing = inner
            .matches
            .iter()
            .find(|m| {
                m.is_active
                    && ((m.user1_id == record.user1_id && m.user2_id == record.user2_id)
                        || (m.user1_id == record.user2_id && m.user2_id == record.user1_id))
            })
            .cloned();

        if let Some(existing) = existing {
            let conversation = inner
                .conversations
                .iter()
                .find(|c| c.match_id == existing.id)
                .cloned()
                .ok_or_else(|| {
                    DomainError::DatabaseError("existing match has no conversation".to_string())
                })?;
            return Ok(CreatedMatch {
                record: existing,
                conversation,
                created: false,
            });
        }

        inner.matches.push(record.clone());
        inner.conversations.push(conversation.clone());
        Ok(CreatedMatch {
            record: record.clone(),
            conversation: conversation.clone(),
            created: true,
        })
    }

    async fn find_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Match>> {
        let mut results: Vec<Match> = self
            .lock()
            .matches
            .iter()
            .filter(|m| m.is_active && m.has_participant(user_id))
            .cloned()
            .collect();
        results.sort_by(|a, b| b.matched_at.cmp(&a.matched_at));
        Ok(results)
    }

    async fn deactivate(&self, id: Snowflake) -> RepoResult<()> {
        let mut inner = self.lock();
        let record = inner
            .matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(DomainError::MatchNotFound(id))?;
        record.is_active = false;
        Ok(())
    }

    async fn deactivate_between(
        &self,
        user_a: Snowflake,
        user_b: Snowflake,
    ) -> RepoResult<Option<Match>> {
        let mut inner = self.lock();
        for record in &mut inner.matches {
            if record.is_active
                && ((record.user1_id == user_a && record.user2_id == user_b)
                    || (record.user1_id == user_b && record.user2_id == user_a))
            {
                record.is_active = false;
                return Ok(Some(record.clone()));
            }
        }
        Ok(None)
    }

    async fn mark_seen(&self, id: Snowflake, user_id: Snowflake) -> RepoResult<()> {
        let mut inner = self.lock();
        let record = inner
            .matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(DomainError::MatchNotFound(id))?;
        if record.user1_id == user_id {
            record.user1_seen = true;
        }
        if record.user2_id == user_id {
            record.user2_seen = true;
        }
        Ok(())
    }
}

#[async_trait]
impl ConversationRepository for MemStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Conversation>> {
        Ok(self.lock().conversations.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_match(&self, match_id: Snowflake) -> RepoResult<Option<Conversation>> {
        Ok(self
            .lock()
            .conversations
            .iter()
            .find(|c| c.match_id == match_id)
            .cloned())
    }

    async fn find_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Conversation>> {
        let mut results: Vec<Conversation> = self
            .lock()
            .conversations
            .iter()
            .filter(|c| c.has_participant(user_id))
            .cloned()
            .collect();
        results.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(results)
    }

    async fn ids_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        Ok(self
            .lock()
            .conversations
            .iter()
            .filter(|c| c.has_participant(user_id))
            .map(|c| c.id)
            .collect())
    }

    async fn record_message(
        &self,
        id: Snowflake,
        recipient_id: Snowflake,
        message_id: Snowflake,
        preview: &str,
        sender_id: Snowflake,
        sent_at: DateTime<Utc>,
    ) -> RepoResult<()> {
        let mut inner = self.lock();
        let conversation = inner
            .conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(DomainError::ConversationNotFound(id))?;

        conversation.last_message_id = Some(message_id);
        conversation.last_message_content = Some(preview.to_string());
        conversation.last_message_sender_id = Some(sender_id);
        conversation.last_message_at = Some(sent_at);
        conversation.updated_at = Utc::now();
        if conversation.user1_id == recipient_id {
            conversation.user1_unread_count += 1;
        } else if conversation.user2_id == recipient_id {
            conversation.user2_unread_count += 1;
        }
        Ok(())
    }

    async fn reset_unread(&self, id: Snowflake, user_id: Snowflake) -> RepoResult<()> {
        let mut inner = self.lock();
        let conversation = inner
            .conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(DomainError::ConversationNotFound(id))?;
        if conversation.user1_id == user_id {
            conversation.user1_unread_count = 0;
        } else if conversation.user2_id == user_id {
            conversation.user2_unread_count = 0;
        }
        Ok(())
    }

    async fn set_mute(
        &self,
        id: Snowflake,
        user_id: Snowflake,
        muted_until: Option<DateTime<Utc>>,
    ) -> RepoResult<()> {
        let mut inner = self.lock();
        let conversation = inner
            .conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(DomainError::ConversationNotFound(id))?;
        if conversation.user1_id == user_id {
            conversation.user1_muted_until = muted_until;
        } else if conversation.user2_id == user_id {
            conversation.user2_muted_until = muted_until;
        }
        Ok(())
    }

    async fn set_pinned(&self, id: Snowflake, pinned: &[PinnedMessage]) -> RepoResult<()> {
        let mut inner = self.lock();
        let conversation = inner
            .conversations
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(DomainError::ConversationNotFound(id))?;
        conversation.pinned_messages = pinned.to_vec();
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        self.lock().conversations.retain(|c| c.id != id);
        Ok(())
    }

    async fn delete_by_match(&self, match_id: Snowflake) -> RepoResult<()> {
        self.lock().conversations.retain(|c| c.match_id != match_id);
        Ok(())
    }
}

#[async_trait]
impl MessageRepository for MemStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        Ok(self.lock().messages.iter().find(|m| m.id == id).cloned())
    }

    async fn create(&self, message: &Message) -> RepoResult<()> {
        self.lock().messages.push(message.clone());
        Ok(())
    }

    async fn update_content(
        &self,
        id: Snowflake,
        content: &str,
        edited_at: DateTime<Utc>,
    ) -> RepoResult<()> {
        let mut inner = self.lock();
        let message = inner
            .messages
            .iter_mut()
            .find(|m| m.id == id && !m.is_deleted)
            .ok_or(DomainError::MessageNotFound(id))?;
        message.content = content.to_string();
        message.is_edited = true;
        message.edited_at = Some(edited_at);
        Ok(())
    }

    async fn soft_delete(
        &self,
        id: Snowflake,
        placeholder: &str,
        deleted_at: DateTime<Utc>,
    ) -> RepoResult<()> {
        let mut inner = self.lock();
        let message = inner
            .messages
            .iter_mut()
            .find(|m| m.id == id && !m.is_deleted)
            .ok_or(DomainError::MessageNotFound(id))?;
        message.content = placeholder.to_string();
        message.is_deleted = true;
        message.deleted_at = Some(deleted_at);
        Ok(())
    }

    async fn set_reactions(&self, id: Snowflake, reactions: &[Reaction]) -> RepoResult<()> {
        let mut inner = self.lock();
        let message = inner
            .messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(DomainError::MessageNotFound(id))?;
        message.reactions = reactions.to_vec();
        Ok(())
    }

    async fn mark_read(
        &self,
        conversation_id: Snowflake,
        message_ids: &[Snowflake],
        reader_id: Snowflake,
    ) -> RepoResult<u64> {
        let mut inner = self.lock();
        let mut updated = 0;
        for message in &mut inner.messages {
            if message.conversation_id == conversation_id
                && message_ids.contains(&message.id)
                && message.sender_id != reader_id
            {
                message.status = ember_core::MessageStatus::Read;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn list_page(
        &self,
        conversation_id: Snowflake,
        before: Option<DateTime<Utc>>,
        limit: i64,
    ) -> RepoResult<Vec<Message>> {
        let mut results: Vec<Message> = self
            .lock()
            .messages
            .iter()
            .filter(|m| {
                m.conversation_id == conversation_id
                    && !m.is_deleted
                    && before.is_none_or(|cutoff| m.sent_at < cutoff)
            })
            .cloned()
            .collect();
        results.sort_by(|a, b| (b.sent_at, b.id).cmp(&(a.sent_at, a.id)));
        results.truncate(limit as usize);
        Ok(results)
    }
}

#[async_trait]
impl BlockRepository for MemStore {
    async fn find(
        &self,
        blocker_id: Snowflake,
        blocked_id: Snowflake,
    ) -> RepoResult<Option<Block>> {
        Ok(self
            .lock()
            .blocks
            .iter()
            .find(|b| b.blocker_id == blocker_id && b.blocked_id == blocked_id)
            .cloned())
    }

    async fn create(&self, block: &Block) -> RepoResult<()> {
        self.lock().blocks.push(block.clone());
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        self.lock().blocks.retain(|b| b.id != id);
        Ok(())
    }

    async fn exists_between(&self, user_a: Snowflake, user_b: Snowflake) -> RepoResult<bool> {
        Ok(self.lock().blocks.iter().any(|b| {
            (b.blocker_id == user_a && b.blocked_id == user_b)
                || (b.blocker_id == user_b && b.blocked_id == user_a)
        }))
    }

    async fn involving(&self, user_id: Snowflake) -> RepoResult<Vec<Block>> {
        Ok(self
            .lock()
            .blocks
            .iter()
            .filter(|b| b.blocker_id == user_id || b.blocked_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_by_blocker(&self, blocker_id: Snowflake) -> RepoResult<Vec<Block>> {
        Ok(self
            .lock()
            .blocks
            .iter()
            .filter(|b| b.blocker_id == blocker_id)
            .cloned()
            .collect())
    }
}

/// Geocoder stub returning a fixed place
pub struct FixedGeocoder;

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn reverse_geocode(
        &self,
        _latitude: f64,
        _longitude: f64,
    ) -> Result<GeocodedPlace, DomainError> {
        Ok(GeocodedPlace {
            city: Some("Springfield".to_string()),
            state: Some("IL".to_string()),
            country: Some("USA".to_string()),
        })
    }
}

/// Build a service context wired to a fresh in-memory store
pub fn build_context() -> (ServiceContext, Arc<MemStore>) {
    let store = MemStore::new();
    let ctx = ServiceContextBuilder::new()
        .user_repo(store.clone())
        .swipe_repo(store.clone())
        .match_repo(store.clone())
        .conversation_repo(store.clone())
        .message_repo(store.clone())
        .block_repo(store.clone())
        .geocoder(Arc::new(FixedGeocoder))
        .jwt_service(Arc::new(JwtService::new("test-secret-for-unit-tests", 900, 604800)))
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(0)))
        .build()
        .expect("context builds");
    (ctx, store)
}

/// A user with sensible defaults for tests
pub fn make_user(id: i64, gender: Gender, looking_for: Gender, age: i32) -> User {
    let mut user = User::new(
        Snowflake::new(id),
        format!("user{id}@example.com"),
        String::new(),
        format!("User {id}"),
        age,
        gender,
        looking_for,
    );
    user.interests = vec!["music".to_string(), "hiking".to_string()];
    user
}

/// Place a user at the given coordinates
pub fn with_coordinates(mut user: User, latitude: f64, longitude: f64) -> User {
    user.location = Some(Location {
        city: None,
        state: None,
        country: None,
        coordinates: Some(Coordinates {
            latitude,
            longitude,
        }),
    });
    user
}
