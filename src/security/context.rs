/*
 * Responsibility
 * - per-request identity handed to handlers (SecurityContext)
 * - built once by the security filter, read-only afterwards
 *
 * Notes
 * - a user only exists together with the session it came from, so both sit in one Option
 * - role checks are the only authorization primitive offered here
 */
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::services::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roles granted to every user with a live session.
pub const DEFAULT_ROLES: &[Role] = &[Role::User];

/// Identity behind a resolved session. Never stored; rebuilt for each request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    user_id: String,
    roles: &'static [Role],
}

impl User {
    fn from_session(session: &Session) -> Self {
        Self {
            user_id: session.user_id.clone(),
            roles: DEFAULT_ROLES,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn roles(&self) -> &[Role] {
        self.roles
    }
}

#[derive(Debug, Clone)]
struct Identity {
    session: Session,
    user: User,
}

/// What downstream code knows about the caller of the current request.
#[derive(Debug, Clone)]
pub struct SecurityContext {
    identity: Option<Identity>,
    challenge_target: Arc<str>,
}

impl SecurityContext {
    /// Context for a request without usable credentials.
    pub fn anonymous(challenge_target: Arc<str>) -> Self {
        Self {
            identity: None,
            challenge_target,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// The user id, if authenticated.
    pub fn principal(&self) -> Option<&str> {
        self.user().map(User::user_id)
    }

    /// Whether the current user holds `role` (by name, e.g. `"USER"`). Always false when anonymous.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles().iter().any(|r| r.as_str() == role)
    }

    pub fn roles(&self) -> &[Role] {
        self.user().map(User::roles).unwrap_or(&[])
    }

    /// URL of the external login service, for building 401 challenges.
    pub fn challenge_target(&self) -> &str {
        &self.challenge_target
    }

    pub fn session(&self) -> Option<&Session> {
        self.identity.as_ref().map(|i| &i.session)
    }

    pub fn user(&self) -> Option<&User> {
        self.identity.as_ref().map(|i| &i.user)
    }
}

/// Builds the request's context from the session lookup result.
///
/// `None` (no header, no token, unknown or expired token) all end up anonymous.
pub fn build_context(lookup: Option<Session>, challenge_target: Arc<str>) -> SecurityContext {
    let identity = lookup.map(|session| Identity {
        user: User::from_session(&session),
        session,
    });

    SecurityContext {
        identity,
        challenge_target,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    const LOGIN_URL: &str = "https://auth.taskroo.com/login";

    fn session(token_key: &str, user_id: &str) -> Session {
        Session {
            token_key: token_key.to_string(),
            user_id: user_id.to_string(),
            last_accessed_time: Utc::now(),
        }
    }

    #[test]
    fn resolved_session_yields_user_with_default_role() {
        let ctx = build_context(Some(session("abc123", "u42")), LOGIN_URL.into());

        assert!(ctx.is_authenticated());
        assert_eq!(ctx.principal(), Some("u42"));
        assert!(ctx.has_role("USER"));
        assert!(!ctx.has_role("ADMIN"));
        assert!(!ctx.has_role("user"));
        assert_eq!(ctx.roles(), &[Role::User]);
        assert_eq!(ctx.session().map(|s| s.token_key.as_str()), Some("abc123"));
        assert_eq!(ctx.user().map(User::user_id), Some("u42"));
        assert_eq!(ctx.challenge_target(), LOGIN_URL);
    }

    #[test]
    fn missing_session_yields_anonymous_context() {
        let ctx = build_context(None, LOGIN_URL.into());

        assert!(!ctx.is_authenticated());
        assert_eq!(ctx.principal(), None);
        assert!(!ctx.has_role("USER"));
        assert!(ctx.roles().is_empty());
        assert!(ctx.session().is_none());
        assert!(ctx.user().is_none());
        assert_eq!(ctx.challenge_target(), LOGIN_URL);
    }

    #[test]
    fn anonymous_matches_empty_lookup() {
        let a = SecurityContext::anonymous(LOGIN_URL.into());
        let b = build_context(None, LOGIN_URL.into());

        assert_eq!(a.is_authenticated(), b.is_authenticated());
        assert_eq!(a.principal(), b.principal());
        assert_eq!(a.challenge_target(), b.challenge_target());
    }

    #[test]
    fn role_names_serialize_upper_case() {
        assert_eq!(Role::User.to_string(), "USER");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"USER\"");
    }
}
