//! Discovery handlers

use axum::{extract::State, Json};
use ember_service::{CandidateResponse, DiscoveryService, Page as PageResponse};

use crate::extractors::{AuthUser, Page};
use crate::response::ApiResult;
use crate::state::AppState;

/// Potential matches for the caller
///
/// GET /discovery
pub async fn get_candidates(
    State(state): State<AppState>,
    auth: AuthUser,
    page: Page,
) -> ApiResult<Json<PageResponse<CandidateResponse>>> {
    let service = DiscoveryService::new(state.service_context());
    let (candidates, total) = service
        .find_candidates(auth.user_id, page.limit, page.offset)
        .await?;

    let items = candidates.iter().map(CandidateResponse::from).collect();
    Ok(Json(PageResponse::new(items, total, page.limit, page.offset)))
}
