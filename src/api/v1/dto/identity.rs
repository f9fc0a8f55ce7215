/*
 * Responsibility
 * - response DTOs for the identity endpoints
 */
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::security::{Role, SecurityContext};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub authenticated: bool,
    pub user_id: Option<String>,
    pub roles: Vec<Role>,
    pub authentication_service_url: String,
}

impl From<&SecurityContext> for MeResponse {
    fn from(ctx: &SecurityContext) -> Self {
        Self {
            authenticated: ctx.is_authenticated(),
            user_id: ctx.principal().map(str::to_string),
            roles: ctx.roles().to_vec(),
            authentication_service_url: ctx.challenge_target().to_string(),
        }
    }
}

// The token key is deliberately not echoed back.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user_id: String,
    pub last_accessed_time: DateTime<Utc>,
}
