//! TaskRooAuth header → SecurityContext in request extensions.
//!
//! Every request that passes this layer carries a SecurityContext, anonymous or not.
//! Rejections happen only for a malformed header (under the reject policy) and for
//! session store failures; deciding what anonymous callers may do is left to handlers.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;

/// Attach the security filter to every route of `router`.
///
/// ```ignore
/// let v1 = api::v1::routes();
/// let v1 = middleware::auth::security_context::apply(v1, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, security_context_middleware))
}

async fn security_context_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let authorization = req.headers().get(header::AUTHORIZATION).cloned();

    let ctx = state
        .security
        .authenticate(authorization.as_ref())
        .await
        .map_err(|err| AppError::from_auth(err, state.security.authentication_service_url()))?;

    // middleware → extractor
    req.extensions_mut().insert(ctx);

    Ok(next.run(req).await)
}
