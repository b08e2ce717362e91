//! Behavior tests for the swipe, match, discovery, and block flows

mod support;

use chrono::{Duration, Utc};
use ember_core::entities::Gender;
use ember_core::Snowflake;
use ember_service::{BlockService, DiscoveryService, MatchService, SwipeService};
use support::{build_context, make_user, with_coordinates};

#[tokio::test]
async fn duplicate_swipe_is_rejected() {
    let (ctx, store) = build_context();
    store.insert_user(make_user(1, Gender::Male, Gender::Female, 30));
    store.insert_user(make_user(2, Gender::Female, Gender::Male, 28));

    let swipes = SwipeService::new(&ctx);
    swipes.like(Snowflake::new(1), Snowflake::new(2)).await.unwrap();

    let err = swipes
        .like(Snowflake::new(1), Snowflake::new(2))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "ALREADY_SWIPED");

    // A pass on the same ordered pair is also rejected
    let err = swipes
        .pass(Snowflake::new(1), Snowflake::new(2))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "ALREADY_SWIPED");
}

#[tokio::test]
async fn like_on_missing_target_fails() {
    let (ctx, store) = build_context();
    store.insert_user(make_user(1, Gender::Male, Gender::Female, 30));

    let err = SwipeService::new(&ctx)
        .like(Snowflake::new(1), Snowflake::new(99))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn mutual_like_creates_exactly_one_match() {
    let (ctx, store) = build_context();
    store.insert_user(make_user(1, Gender::Male, Gender::Female, 30));
    store.insert_user(make_user(2, Gender::Female, Gender::Male, 28));

    let swipes = SwipeService::new(&ctx);

    let first = swipes.like(Snowflake::new(1), Snowflake::new(2)).await.unwrap();
    assert!(!first.is_match);
    assert!(first.matched.is_none());

    let second = swipes.like(Snowflake::new(2), Snowflake::new(1)).await.unwrap();
    assert!(second.is_match);

    let matched = second.matched.expect("match record");
    assert!(matched.is_active);

    let conversation = second.conversation.expect("conversation");
    assert_eq!(conversation.match_id, matched.id);
    assert_eq!(conversation.unread_count_for(Snowflake::new(1)), 0);
    assert_eq!(conversation.unread_count_for(Snowflake::new(2)), 0);

    assert_eq!(store.active_matches_between(Snowflake::new(1), Snowflake::new(2)), 1);
}

#[tokio::test]
async fn pass_never_matches() {
    let (ctx, store) = build_context();
    store.insert_user(make_user(1, Gender::Male, Gender::Female, 30));
    store.insert_user(make_user(2, Gender::Female, Gender::Male, 28));

    let swipes = SwipeService::new(&ctx);
    swipes.like(Snowflake::new(2), Snowflake::new(1)).await.unwrap();
    swipes.pass(Snowflake::new(1), Snowflake::new(2)).await.unwrap();

    assert_eq!(store.active_matches_between(Snowflake::new(1), Snowflake::new(2)), 0);
}

#[tokio::test]
async fn super_like_quota_is_enforced_and_resets() {
    let (ctx, store) = build_context();
    store.insert_user(make_user(1, Gender::Male, Gender::Female, 30));
    for id in 2..=6 {
        store.insert_user(make_user(id, Gender::Female, Gender::Male, 28));
    }

    let swipes = SwipeService::new(&ctx);

    // Three super likes succeed, counting down the daily allowance
    for (i, target) in (2..=4).enumerate() {
        let result = swipes
            .super_like(Snowflake::new(1), Snowflake::new(target))
            .await
            .unwrap();
        assert_eq!(result.remaining, 2 - i as i32);
    }

    // The fourth fails with the quota error
    let err = swipes
        .super_like(Snowflake::new(1), Snowflake::new(5))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "SUPER_LIKE_QUOTA_EXCEEDED");

    // Once the reset timestamp lapses the allowance refills
    {
        let mut inner = store.lock();
        let user = inner.users.iter_mut().find(|u| u.id == Snowflake::new(1)).unwrap();
        user.super_likes_reset_at = Some(Utc::now() - Duration::hours(1));
    }

    let result = swipes
        .super_like(Snowflake::new(1), Snowflake::new(5))
        .await
        .unwrap();
    assert_eq!(result.remaining, 2);
}

#[tokio::test]
async fn super_like_also_matches() {
    let (ctx, store) = build_context();
    store.insert_user(make_user(1, Gender::Male, Gender::Female, 30));
    store.insert_user(make_user(2, Gender::Female, Gender::Male, 28));

    let swipes = SwipeService::new(&ctx);
    swipes.like(Snowflake::new(2), Snowflake::new(1)).await.unwrap();

    let result = swipes
        .super_like(Snowflake::new(1), Snowflake::new(2))
        .await
        .unwrap();
    assert!(result.outcome.is_match);
    assert_eq!(store.active_matches_between(Snowflake::new(1), Snowflake::new(2)), 1);
}

#[tokio::test]
async fn undo_requires_premium() {
    let (ctx, store) = build_context();
    store.insert_user(make_user(1, Gender::Male, Gender::Female, 30));
    store.insert_user(make_user(2, Gender::Female, Gender::Male, 28));

    let swipes = SwipeService::new(&ctx);
    swipes.like(Snowflake::new(1), Snowflake::new(2)).await.unwrap();

    let err = swipes.undo_last(Snowflake::new(1)).await.unwrap_err();
    assert_eq!(err.status_code(), 403);
}

#[tokio::test]
async fn expired_premium_is_lazily_revoked() {
    let (ctx, store) = build_context();
    let mut user = make_user(1, Gender::Male, Gender::Female, 30);
    user.is_premium = true;
    user.premium_expires_at = Some(Utc::now() - Duration::days(1));
    store.insert_user(user);
    store.insert_user(make_user(2, Gender::Female, Gender::Male, 28));

    let swipes = SwipeService::new(&ctx);
    swipes.like(Snowflake::new(1), Snowflake::new(2)).await.unwrap();

    let err = swipes.undo_last(Snowflake::new(1)).await.unwrap_err();
    assert_eq!(err.error_code(), "PREMIUM_EXPIRED");

    let inner = store.lock();
    let user = inner.users.iter().find(|u| u.id == Snowflake::new(1)).unwrap();
    assert!(!user.is_premium);
}

#[tokio::test]
async fn undo_reverses_a_match() {
    let (ctx, store) = build_context();
    let mut premium = make_user(1, Gender::Male, Gender::Female, 30);
    premium.is_premium = true;
    store.insert_user(premium);
    store.insert_user(make_user(2, Gender::Female, Gender::Male, 28));

    let swipes = SwipeService::new(&ctx);
    swipes.like(Snowflake::new(2), Snowflake::new(1)).await.unwrap();
    let outcome = swipes.like(Snowflake::new(1), Snowflake::new(2)).await.unwrap();
    assert!(outcome.is_match);
    let match_id = outcome.matched.unwrap().id;

    let undone = swipes.undo_last(Snowflake::new(1)).await.unwrap();
    assert_eq!(undone.swiped_id, Snowflake::new(2));

    assert_eq!(store.active_matches_between(Snowflake::new(1), Snowflake::new(2)), 0);
    let inner = store.lock();
    assert!(!inner.conversations.iter().any(|c| c.match_id == match_id));
    assert!(!inner
        .swipes
        .iter()
        .any(|s| s.swiper_id == Snowflake::new(1) && s.swiped_id == Snowflake::new(2)));
}

#[tokio::test]
async fn undo_with_no_swipes_fails() {
    let (ctx, store) = build_context();
    let mut premium = make_user(1, Gender::Male, Gender::Female, 30);
    premium.is_premium = true;
    store.insert_user(premium);

    let err = SwipeService::new(&ctx)
        .undo_last(Snowflake::new(1))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "NO_SWIPE_TO_UNDO");
}

#[tokio::test]
async fn discovery_applies_distance_and_exclusions() {
    let (ctx, store) = build_context();

    // Seeker in Manhattan with a 50 mile radius
    let seeker = with_coordinates(make_user(1, Gender::Male, Gender::Female, 30), 40.7831, -73.9712);
    store.insert_user(seeker);

    // Close by (Brooklyn)
    store.insert_user(with_coordinates(
        make_user(2, Gender::Female, Gender::Male, 28),
        40.6782,
        -73.9442,
    ));
    // Far away (Los Angeles)
    store.insert_user(with_coordinates(
        make_user(3, Gender::Female, Gender::Male, 27),
        34.0522,
        -118.2437,
    ));
    // No coordinates at all: never distance-filtered
    store.insert_user(make_user(4, Gender::Female, Gender::Male, 29));
    // Wrong orientation pairing
    store.insert_user(make_user(5, Gender::Female, Gender::Female, 28));
    // Outside the age window
    store.insert_user(make_user(6, Gender::Female, Gender::Male, 55));
    // Already swiped
    store.insert_user(make_user(7, Gender::Female, Gender::Male, 26));
    // Blocked the seeker
    store.insert_user(make_user(8, Gender::Female, Gender::Male, 25));

    let swipes = SwipeService::new(&ctx);
    swipes.like(Snowflake::new(1), Snowflake::new(7)).await.unwrap();

    let blocks = BlockService::new(&ctx);
    blocks.block_user(Snowflake::new(8), Snowflake::new(1)).await.unwrap();

    let (page, total) = DiscoveryService::new(&ctx)
        .find_candidates(Snowflake::new(1), 10, 0)
        .await
        .unwrap();

    let ids: Vec<i64> = page.iter().map(|c| c.user.id.into_inner()).collect();
    assert_eq!(total, 2);
    assert!(ids.contains(&2), "nearby candidate expected: {ids:?}");
    assert!(ids.contains(&4), "coordinate-less candidate expected: {ids:?}");

    let nearby = page.iter().find(|c| c.user.id == Snowflake::new(2)).unwrap();
    let distance = nearby.distance_miles.expect("distance computed");
    assert!(distance < 50.0);
    assert_eq!(
        nearby.common_interests,
        vec!["music".to_string(), "hiking".to_string()]
    );

    let no_coords = page.iter().find(|c| c.user.id == Snowflake::new(4)).unwrap();
    assert!(no_coords.distance_miles.is_none());
}

#[tokio::test]
async fn discovery_paginates_after_filtering() {
    let (ctx, store) = build_context();
    store.insert_user(make_user(1, Gender::Male, Gender::Female, 30));
    for id in 2..=7 {
        store.insert_user(make_user(id, Gender::Female, Gender::Male, 28));
    }

    let discovery = DiscoveryService::new(&ctx);

    let (page, total) = discovery.find_candidates(Snowflake::new(1), 4, 0).await.unwrap();
    assert_eq!(total, 6);
    assert_eq!(page.len(), 4);

    let (page, total) = discovery.find_candidates(Snowflake::new(1), 4, 4).await.unwrap();
    assert_eq!(total, 6);
    assert_eq!(page.len(), 2);
}

#[tokio::test]
async fn unmatch_deactivates_and_removes_conversation() {
    let (ctx, store) = build_context();
    store.insert_user(make_user(1, Gender::Male, Gender::Female, 30));
    store.insert_user(make_user(2, Gender::Female, Gender::Male, 28));

    let swipes = SwipeService::new(&ctx);
    swipes.like(Snowflake::new(1), Snowflake::new(2)).await.unwrap();
    let outcome = swipes.like(Snowflake::new(2), Snowflake::new(1)).await.unwrap();
    let match_id = outcome.matched.unwrap().id;

    let matches = MatchService::new(&ctx);

    // Outsiders cannot unmatch
    store.insert_user(make_user(3, Gender::Female, Gender::Male, 22));
    let err = matches.unmatch(Snowflake::new(3), match_id).await.unwrap_err();
    assert_eq!(err.status_code(), 403);

    matches.unmatch(Snowflake::new(1), match_id).await.unwrap();

    assert_eq!(store.active_matches_between(Snowflake::new(1), Snowflake::new(2)), 0);
    assert!(store.lock().conversations.is_empty());
}

#[tokio::test]
async fn block_tears_down_active_match() {
    let (ctx, store) = build_context();
    store.insert_user(make_user(1, Gender::Male, Gender::Female, 30));
    store.insert_user(make_user(2, Gender::Female, Gender::Male, 28));

    let swipes = SwipeService::new(&ctx);
    swipes.like(Snowflake::new(1), Snowflake::new(2)).await.unwrap();
    swipes.like(Snowflake::new(2), Snowflake::new(1)).await.unwrap();

    let blocks = BlockService::new(&ctx);
    blocks.block_user(Snowflake::new(1), Snowflake::new(2)).await.unwrap();

    assert_eq!(store.active_matches_between(Snowflake::new(1), Snowflake::new(2)), 0);
    assert!(store.lock().conversations.is_empty());

    // Blocking twice is a conflict; blocking yourself is invalid
    let err = blocks
        .block_user(Snowflake::new(1), Snowflake::new(2))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "ALREADY_BLOCKED");

    let err = blocks
        .block_user(Snowflake::new(1), Snowflake::new(1))
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn match_listing_tracks_seen_state() {
    let (ctx, store) = build_context();
    store.insert_user(make_user(1, Gender::Male, Gender::Female, 30));
    store.insert_user(make_user(2, Gender::Female, Gender::Male, 28));

    let swipes = SwipeService::new(&ctx);
    swipes.like(Snowflake::new(1), Snowflake::new(2)).await.unwrap();
    let outcome = swipes.like(Snowflake::new(2), Snowflake::new(1)).await.unwrap();
    let match_id = outcome.matched.unwrap().id;

    let matches = MatchService::new(&ctx);

    let (summaries, total) = matches
        .get_matches(Snowflake::new(1), 10, 0, true)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert!(summaries[0].is_new);
    assert_eq!(summaries[0].other_user.id, Snowflake::new(2));

    matches.mark_seen(Snowflake::new(1), match_id).await.unwrap();

    let (summaries, _) = matches
        .get_matches(Snowflake::new(1), 10, 0, true)
        .await
        .unwrap();
    assert!(summaries.is_empty());

    // The other side still sees it as new
    let (summaries, _) = matches
        .get_matches(Snowflake::new(2), 10, 0, true)
        .await
        .unwrap();
    assert_eq!(summaries.len(), 1);
}
