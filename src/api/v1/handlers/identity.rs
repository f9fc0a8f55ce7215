/*
 * Responsibility
 * - GET /me: who the security middleware says the caller is (anonymous included)
 * - GET /session: the caller's live session; anonymous callers get a 401 challenge
 */
use axum::Json;

use crate::api::v1::dto::identity::{MeResponse, SessionResponse};
use crate::api::v1::extractors::{Authenticated, SecurityCtx};
use crate::error::AppError;

pub async fn me(SecurityCtx(ctx): SecurityCtx) -> Json<MeResponse> {
    Json(MeResponse::from(&ctx))
}

pub async fn current_session(
    Authenticated(ctx): Authenticated,
) -> Result<Json<SessionResponse>, AppError> {
    // Authenticated guarantees a session; anything else is a wiring bug.
    let session = ctx.session().ok_or(AppError::Internal)?;

    Ok(Json(SessionResponse {
        user_id: session.user_id.clone(),
        last_accessed_time: session.last_accessed_time,
    }))
}
