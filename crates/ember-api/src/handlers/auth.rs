//! Authentication handlers

use axum::{extract::State, Json};
use ember_service::{
    AuthResponse, AuthService, LoginRequest, RefreshRequest, RegisterRequest,
};

use crate::extractors::ValidatedJson;
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Register a new account
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<AuthResponse>>> {
    let service = AuthService::new(state.service_context());
    let (user, tokens) = service.register(request).await?;
    Ok(Created(Json(AuthResponse::new(&user, tokens))))
}

/// Log in with email and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let (user, tokens) = service.login(&request.email, &request.password).await?;
    Ok(Json(AuthResponse::new(&user, tokens)))
}

/// Exchange a refresh token for a fresh pair
///
/// POST /auth/refresh
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RefreshRequest>,
) -> ApiResult<Json<ember_common::TokenPair>> {
    let service = AuthService::new(state.service_context());
    let tokens = service.refresh(&request.refresh_token).await?;
    Ok(Json(tokens))
}
