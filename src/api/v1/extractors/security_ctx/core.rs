use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::security::{Role, SecurityContext};
use crate::state::AppState;

/// Extractor for the request's SecurityContext.
/// Assumes the security middleware has inserted it into request.extensions();
/// a missing context means the route is not behind that middleware (500).
pub struct SecurityCtx(pub SecurityContext);

impl FromRequestParts<AppState> for SecurityCtx
where
    AppState: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SecurityContext>()
            .cloned()
            .map(SecurityCtx)
            .ok_or_else(|| {
                tracing::error!(
                    path = %parts.uri.path(),
                    "security context missing; route is not behind the security middleware"
                );
                AppError::Internal
            })
    }
}

/// Like `SecurityCtx`, but callers without the USER role (anonymous ones included) get a 401
/// pointing at the login service.
pub struct Authenticated(pub SecurityContext);

impl FromRequestParts<AppState> for Authenticated
where
    AppState: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let SecurityCtx(ctx) = SecurityCtx::from_request_parts(parts, state).await?;

        if !ctx.has_role(Role::User.as_str()) {
            return Err(AppError::unauthorized(
                "UNAUTHORIZED",
                "authentication required",
                state.security.authentication_service_url(),
            ));
        }

        Ok(Authenticated(ctx))
    }
}
