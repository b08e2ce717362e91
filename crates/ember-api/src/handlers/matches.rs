//! Match handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use ember_service::{
    ConversationDetailResponse, ConversationService, MatchService, MatchSummaryResponse,
    Page as PageResponse,
};
use serde::Deserialize;

use crate::extractors::{parse_snowflake, AuthUser, Page};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// Extra filter for the match listing
#[derive(Debug, Default, Deserialize)]
pub struct MatchListParams {
    #[serde(default)]
    pub new_only: bool,
}

/// List the caller's active matches
///
/// GET /matches
pub async fn get_matches(
    State(state): State<AppState>,
    auth: AuthUser,
    page: Page,
    Query(params): Query<MatchListParams>,
) -> ApiResult<Json<PageResponse<MatchSummaryResponse>>> {
    let service = MatchService::new(state.service_context());
    let (summaries, total) = service
        .get_matches(auth.user_id, page.limit, page.offset, params.new_only)
        .await?;

    let items = summaries.iter().map(MatchSummaryResponse::from).collect();
    Ok(Json(PageResponse::new(items, total, page.limit, page.offset)))
}

/// Mark a match as seen
///
/// POST /matches/{match_id}/seen
pub async fn mark_seen(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(match_id): Path<String>,
) -> ApiResult<NoContent> {
    let match_id = parse_snowflake(&match_id, "match_id")?;

    let service = MatchService::new(state.service_context());
    service.mark_seen(auth.user_id, match_id).await?;
    Ok(NoContent)
}

/// Unmatch
///
/// DELETE /matches/{match_id}
pub async fn unmatch(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(match_id): Path<String>,
) -> ApiResult<NoContent> {
    let match_id = parse_snowflake(&match_id, "match_id")?;

    let service = MatchService::new(state.service_context());
    service.unmatch(auth.user_id, match_id).await?;
    Ok(NoContent)
}

/// The conversation belonging to a match
///
/// GET /matches/{match_id}/conversation
pub async fn get_match_conversation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(match_id): Path<String>,
) -> ApiResult<Json<ConversationDetailResponse>> {
    let match_id = parse_snowflake(&match_id, "match_id")?;

    let service = ConversationService::new(state.service_context());
    let conversation = service
        .get_conversation_by_match(match_id, auth.user_id)
        .await?;
    Ok(Json(ConversationDetailResponse::from(&conversation)))
}
