/*
 * Responsibility
 * - v1 URL layout
 * - /health stays outside the security middleware; everything else gets a SecurityContext
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{
    health::health,
    identity::{current_session, me},
};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let secured = Router::new()
        .route("/me", get(me))
        .route("/session", get(current_session));
    let secured = middleware::auth::security_context::apply(secured, state);

    Router::new().route("/health", get(health)).merge(secured)
}
