//! Behavior tests for conversations, messages, reactions, pins, and mutes

mod support;

use chrono::{Duration, Utc};
use ember_core::entities::{Gender, MessageKind, MessageStatus, DELETED_PLACEHOLDER};
use ember_core::Snowflake;
use ember_service::{
    ConversationService, MessageService, NewMessage, ReactionService, SwipeService,
};
use support::{build_context, make_user};

const ALICE: Snowflake = Snowflake::new(1);
const BOB: Snowflake = Snowflake::new(2);
const EVE: Snowflake = Snowflake::new(3);

/// Match Alice and Bob and return their conversation ID
async fn matched_conversation(ctx: &ember_service::ServiceContext) -> Snowflake {
    let swipes = SwipeService::new(ctx);
    swipes.like(ALICE, BOB).await.unwrap();
    let outcome = swipes.like(BOB, ALICE).await.unwrap();
    outcome.conversation.unwrap().id
}

fn seed_pair(store: &support::MemStore) {
    store.insert_user(make_user(1, Gender::Male, Gender::Female, 30));
    store.insert_user(make_user(2, Gender::Female, Gender::Male, 28));
    store.insert_user(make_user(3, Gender::Female, Gender::Male, 25));
}

#[tokio::test]
async fn send_message_updates_conversation_state() {
    let (ctx, store) = build_context();
    seed_pair(&store);
    let conversation_id = matched_conversation(&ctx).await;

    let messages = MessageService::new(&ctx);
    let sent = messages
        .send_message(conversation_id, ALICE, NewMessage::text("hello"))
        .await
        .unwrap();
    assert_eq!(sent.status, MessageStatus::Sent);

    let conversations = ConversationService::new(&ctx);
    let conversation = conversations
        .get_conversation(conversation_id, BOB)
        .await
        .unwrap();

    assert_eq!(conversation.last_message_content.as_deref(), Some("hello"));
    assert_eq!(conversation.last_message_sender_id, Some(ALICE));
    assert_eq!(conversation.unread_count_for(BOB), 1);
    assert_eq!(conversation.unread_count_for(ALICE), 0);

    // Reading resets the counter and flips the status
    conversations
        .mark_read(conversation_id, BOB, &[sent.id])
        .await
        .unwrap();

    let conversation = conversations
        .get_conversation(conversation_id, BOB)
        .await
        .unwrap();
    assert_eq!(conversation.unread_count_for(BOB), 0);

    let (page, _) = messages
        .get_messages(conversation_id, BOB, 10, None)
        .await
        .unwrap();
    assert_eq!(page[0].status, MessageStatus::Read);
}

#[tokio::test]
async fn mark_read_never_flips_own_messages() {
    let (ctx, store) = build_context();
    seed_pair(&store);
    let conversation_id = matched_conversation(&ctx).await;

    let messages = MessageService::new(&ctx);
    let own = messages
        .send_message(conversation_id, ALICE, NewMessage::text("mine"))
        .await
        .unwrap();

    let conversations = ConversationService::new(&ctx);
    let updated = conversations
        .mark_read(conversation_id, ALICE, &[own.id])
        .await
        .unwrap();
    assert_eq!(updated, 0);

    let (page, _) = messages
        .get_messages(conversation_id, ALICE, 10, None)
        .await
        .unwrap();
    assert_eq!(page[0].status, MessageStatus::Sent);
}

#[tokio::test]
async fn mark_read_with_empty_set_still_resets_counter() {
    let (ctx, store) = build_context();
    seed_pair(&store);
    let conversation_id = matched_conversation(&ctx).await;

    let messages = MessageService::new(&ctx);
    messages
        .send_message(conversation_id, ALICE, NewMessage::text("one"))
        .await
        .unwrap();
    messages
        .send_message(conversation_id, ALICE, NewMessage::text("two"))
        .await
        .unwrap();

    let conversations = ConversationService::new(&ctx);
    conversations.mark_read(conversation_id, BOB, &[]).await.unwrap();

    let conversation = conversations
        .get_conversation(conversation_id, BOB)
        .await
        .unwrap();
    assert_eq!(conversation.unread_count_for(BOB), 0);
}

#[tokio::test]
async fn non_participant_cannot_send() {
    let (ctx, store) = build_context();
    seed_pair(&store);
    let conversation_id = matched_conversation(&ctx).await;

    let err = MessageService::new(&ctx)
        .send_message(conversation_id, EVE, NewMessage::text("hi"))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);
}

#[tokio::test]
async fn reply_snapshot_is_immutable() {
    let (ctx, store) = build_context();
    seed_pair(&store);
    let conversation_id = matched_conversation(&ctx).await;

    let messages = MessageService::new(&ctx);
    let original = messages
        .send_message(conversation_id, ALICE, NewMessage::text("original text"))
        .await
        .unwrap();

    let mut reply = NewMessage::text("replying");
    reply.reply_to_id = Some(original.id);
    let reply = messages
        .send_message(conversation_id, BOB, reply)
        .await
        .unwrap();

    let snapshot = reply.reply_to.clone().expect("snapshot captured");
    assert_eq!(snapshot.content, "original text");
    assert_eq!(snapshot.sender_id, ALICE);

    // Editing the original does not rewrite the snapshot
    messages
        .edit_message(original.id, ALICE, "edited away".to_string())
        .await
        .unwrap();

    let (page, _) = messages
        .get_messages(conversation_id, BOB, 10, None)
        .await
        .unwrap();
    let stored_reply = page.iter().find(|m| m.id == reply.id).unwrap();
    assert_eq!(stored_reply.reply_to.as_ref().unwrap().content, "original text");
}

#[tokio::test]
async fn long_text_preview_is_truncated() {
    let (ctx, store) = build_context();
    seed_pair(&store);
    let conversation_id = matched_conversation(&ctx).await;

    let content = "x".repeat(400);
    MessageService::new(&ctx)
        .send_message(conversation_id, ALICE, NewMessage::text(content))
        .await
        .unwrap();

    let conversation = ConversationService::new(&ctx)
        .get_conversation(conversation_id, ALICE)
        .await
        .unwrap();
    assert_eq!(
        conversation.last_message_content.unwrap().chars().count(),
        100
    );
}

#[tokio::test]
async fn media_messages_use_fixed_preview_labels() {
    let (ctx, store) = build_context();
    seed_pair(&store);
    let conversation_id = matched_conversation(&ctx).await;

    let mut photo = NewMessage::text("https://cdn.example.com/a.jpg");
    photo.kind = MessageKind::Image;
    photo.media_url = Some("https://cdn.example.com/a.jpg".to_string());

    MessageService::new(&ctx)
        .send_message(conversation_id, ALICE, photo)
        .await
        .unwrap();

    let conversation = ConversationService::new(&ctx)
        .get_conversation(conversation_id, ALICE)
        .await
        .unwrap();
    assert_eq!(
        conversation.last_message_content.as_deref(),
        Some("\u{1F4F7} Photo")
    );
}

#[tokio::test]
async fn edit_rules_are_enforced() {
    let (ctx, store) = build_context();
    seed_pair(&store);
    let conversation_id = matched_conversation(&ctx).await;

    let messages = MessageService::new(&ctx);
    let text = messages
        .send_message(conversation_id, ALICE, NewMessage::text("typo"))
        .await
        .unwrap();

    // Only the sender can edit
    let err = messages
        .edit_message(text.id, BOB, "hijack".to_string())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);

    // Within the window the edit lands
    let edited = messages
        .edit_message(text.id, ALICE, "fixed".to_string())
        .await
        .unwrap();
    assert!(edited.is_edited);
    assert_eq!(edited.content, "fixed");

    // Non-text messages can never be edited
    let mut gif = NewMessage::text("https://cdn.example.com/a.gif");
    gif.kind = MessageKind::Gif;
    let gif = messages.send_message(conversation_id, ALICE, gif).await.unwrap();
    let err = messages
        .edit_message(gif.id, ALICE, "nope".to_string())
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "NOT_EDITABLE");
}

#[tokio::test]
async fn edit_window_closes_after_48_hours() {
    let (ctx, store) = build_context();
    seed_pair(&store);
    let conversation_id = matched_conversation(&ctx).await;

    let messages = MessageService::new(&ctx);
    let old = messages
        .send_message(conversation_id, ALICE, NewMessage::text("ancient"))
        .await
        .unwrap();

    // Age the message past the boundary
    {
        let mut inner = store.lock();
        let stored = inner.messages.iter_mut().find(|m| m.id == old.id).unwrap();
        stored.sent_at = Utc::now() - Duration::hours(48);
    }

    let err = messages
        .edit_message(old.id, ALICE, "too late".to_string())
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "EDIT_WINDOW_EXPIRED");
}

#[tokio::test]
async fn delete_is_a_soft_delete_hidden_from_history() {
    let (ctx, store) = build_context();
    seed_pair(&store);
    let conversation_id = matched_conversation(&ctx).await;

    let messages = MessageService::new(&ctx);
    let message = messages
        .send_message(conversation_id, ALICE, NewMessage::text("regret"))
        .await
        .unwrap();

    // Only the sender can delete, regardless of the for_everyone flag
    let err = messages.delete_message(message.id, BOB, true).await.unwrap_err();
    assert_eq!(err.status_code(), 403);

    let deleted = messages.delete_message(message.id, ALICE, false).await.unwrap();
    assert!(deleted.is_deleted);
    assert_eq!(deleted.content, DELETED_PLACEHOLDER);

    let (page, _) = messages
        .get_messages(conversation_id, BOB, 10, None)
        .await
        .unwrap();
    assert!(page.iter().all(|m| m.id != message.id));
}

#[tokio::test]
async fn message_pagination_with_before_cursor() {
    let (ctx, store) = build_context();
    seed_pair(&store);
    let conversation_id = matched_conversation(&ctx).await;

    let messages = MessageService::new(&ctx);
    for i in 0..5i64 {
        let sent = messages
            .send_message(conversation_id, ALICE, NewMessage::text(format!("m{i}")))
            .await
            .unwrap();
        // Spread the timestamps so the cursor cuts cleanly
        let mut inner = store.lock();
        let stored = inner.messages.iter_mut().find(|m| m.id == sent.id).unwrap();
        stored.sent_at = Utc::now() - Duration::minutes(10 - i);
    }

    let (page, has_more) = messages
        .get_messages(conversation_id, ALICE, 2, None)
        .await
        .unwrap();
    assert!(has_more);
    assert_eq!(page.len(), 2);
    // Chronological order: the page holds the two newest, oldest first
    assert_eq!(page[0].content, "m3");
    assert_eq!(page[1].content, "m4");

    let (older, has_more) = messages
        .get_messages(conversation_id, ALICE, 2, Some(page[0].id))
        .await
        .unwrap();
    assert!(has_more);
    assert_eq!(older[0].content, "m1");
    assert_eq!(older[1].content, "m2");

    let (oldest, has_more) = messages
        .get_messages(conversation_id, ALICE, 2, Some(older[0].id))
        .await
        .unwrap();
    assert!(!has_more);
    assert_eq!(oldest.len(), 1);
    assert_eq!(oldest[0].content, "m0");
}

#[tokio::test]
async fn one_reaction_per_user_last_write_wins() {
    let (ctx, store) = build_context();
    seed_pair(&store);
    let conversation_id = matched_conversation(&ctx).await;

    let messages = MessageService::new(&ctx);
    let message = messages
        .send_message(conversation_id, ALICE, NewMessage::text("react to me"))
        .await
        .unwrap();

    let reactions = ReactionService::new(&ctx);

    let reacted = reactions
        .add_reaction(message.id, BOB, "❤️".to_string())
        .await
        .unwrap();
    assert_eq!(reacted.reactions.len(), 1);

    // A second reaction by the same user replaces the first
    let reacted = reactions
        .add_reaction(message.id, BOB, "🔥".to_string())
        .await
        .unwrap();
    assert_eq!(reacted.reactions.len(), 1);
    assert_eq!(reacted.reactions[0].emoji, "🔥");

    // Reactions from different users coexist
    let reacted = reactions
        .add_reaction(message.id, ALICE, "😂".to_string())
        .await
        .unwrap();
    assert_eq!(reacted.reactions.len(), 2);

    // Removal is idempotent
    let removed = reactions.remove_reaction(message.id, BOB).await.unwrap();
    assert_eq!(removed.reactions.len(), 1);
    let removed = reactions.remove_reaction(message.id, BOB).await.unwrap();
    assert_eq!(removed.reactions.len(), 1);

    // Outsiders cannot react
    let err = reactions
        .add_reaction(message.id, EVE, "👀".to_string())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 403);
}

#[tokio::test]
async fn pin_limit_and_idempotent_unpin() {
    let (ctx, store) = build_context();
    seed_pair(&store);
    let conversation_id = matched_conversation(&ctx).await;

    let messages = MessageService::new(&ctx);
    let conversations = ConversationService::new(&ctx);

    let mut ids = Vec::new();
    for i in 0..6 {
        let sent = messages
            .send_message(conversation_id, ALICE, NewMessage::text(format!("pin {i}")))
            .await
            .unwrap();
        ids.push(sent.id);
    }

    for id in &ids[..5] {
        conversations
            .pin_message(conversation_id, *id, ALICE)
            .await
            .unwrap();
    }

    // The sixth pin exceeds the limit
    let err = conversations
        .pin_message(conversation_id, ids[5], ALICE)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "PIN_LIMIT_REACHED");

    // Pinning the same message twice is rejected
    let err = conversations
        .pin_message(conversation_id, ids[0], ALICE)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "ALREADY_PINNED");

    // Unpinning an absent ID is a quiet success
    let conversation = conversations
        .unpin_message(conversation_id, ids[5], ALICE)
        .await
        .unwrap();
    assert_eq!(conversation.pinned_messages.len(), 5);

    let conversation = conversations
        .unpin_message(conversation_id, ids[0], ALICE)
        .await
        .unwrap();
    assert_eq!(conversation.pinned_messages.len(), 4);
}

#[tokio::test]
async fn mute_durations() {
    let (ctx, store) = build_context();
    seed_pair(&store);
    let conversation_id = matched_conversation(&ctx).await;

    let conversations = ConversationService::new(&ctx);
    let now = Utc::now();

    // Positive duration
    let conversation = conversations
        .mute_conversation(conversation_id, ALICE, Some(8))
        .await
        .unwrap();
    let until = conversation.muted_until_for(ALICE).unwrap();
    assert!(until > now + Duration::hours(7));
    assert!(until < now + Duration::hours(9));

    // Omitted duration mutes effectively forever
    let conversation = conversations
        .mute_conversation(conversation_id, ALICE, None)
        .await
        .unwrap();
    let until = conversation.muted_until_for(ALICE).unwrap();
    assert!(until > now + Duration::days(365 * 99));

    // Zero clears the mute
    let conversation = conversations
        .mute_conversation(conversation_id, ALICE, Some(0))
        .await
        .unwrap();
    assert!(conversation.muted_until_for(ALICE).is_none());

    // Negative durations are rejected
    let err = conversations
        .mute_conversation(conversation_id, ALICE, Some(-1))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);

    // The mute is per-user
    let conversation = conversations
        .mute_conversation(conversation_id, BOB, Some(2))
        .await
        .unwrap();
    assert!(conversation.muted_until_for(ALICE).is_none());
    assert!(conversation.muted_until_for(BOB).is_some());
}

#[tokio::test]
async fn conversation_listing_reflects_activity() {
    let (ctx, store) = build_context();
    seed_pair(&store);
    let conversation_id = matched_conversation(&ctx).await;

    MessageService::new(&ctx)
        .send_message(conversation_id, ALICE, NewMessage::text("hey"))
        .await
        .unwrap();

    let (summaries, total) = ConversationService::new(&ctx)
        .get_conversations(BOB, 10, 0)
        .await
        .unwrap();
    assert_eq!(total, 1);

    let summary = &summaries[0];
    assert_eq!(summary.other_user.id, ALICE);
    assert_eq!(summary.unread_count, 1);
    assert_eq!(summary.last_message.as_ref().unwrap().content, "hey");
    assert!(!summary.is_muted);
}

#[tokio::test]
async fn conversation_lookup_by_match_fails_after_unmatch() {
    let (ctx, store) = build_context();
    seed_pair(&store);

    let swipes = SwipeService::new(&ctx);
    swipes.like(ALICE, BOB).await.unwrap();
    let outcome = swipes.like(BOB, ALICE).await.unwrap();
    let match_id = outcome.matched.unwrap().id;

    let conversations = ConversationService::new(&ctx);
    assert!(conversations
        .get_conversation_by_match(match_id, ALICE)
        .await
        .is_ok());

    ember_service::MatchService::new(&ctx)
        .unmatch(ALICE, match_id)
        .await
        .unwrap();

    let err = conversations
        .get_conversation_by_match(match_id, ALICE)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}
