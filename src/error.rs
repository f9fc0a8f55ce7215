/*
 * Responsibility
 * - the application-wide AppError
 * - IntoResponse (HTTP status / JSON error body / challenge header)
 * - conversion from the security filter's AuthError
 */
use std::sync::Arc;

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::security::{AuthError, header::SCHEME_PREFIX};
use crate::services::session::SessionStoreError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    // Carries the login service URL so the client knows where to authenticate.
    #[error("{code}: {message}")]
    Unauthorized {
        code: &'static str,
        message: String,
        challenge_target: Arc<str>,
    },
    #[error("session store unavailable")]
    ServiceUnavailable,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn unauthorized(
        code: &'static str,
        message: impl Into<String>,
        challenge_target: Arc<str>,
    ) -> Self {
        Self::Unauthorized {
            code,
            message: message.into(),
            challenge_target,
        }
    }

    pub fn from_auth(err: AuthError, challenge_target: Arc<str>) -> Self {
        match err {
            AuthError::MalformedHeader(e) => {
                AppError::unauthorized("MALFORMED_AUTHORIZATION", e.to_string(), challenge_target)
            }
            AuthError::Store(SessionStoreError::Unavailable(_)) => AppError::ServiceUnavailable,
            AuthError::Store(SessionStoreError::InvalidRecord(_)) => AppError::Internal,
        }
    }
}

/// `WWW-Authenticate` value pointing the client at the login service.
pub fn challenge_header(challenge_target: &str) -> Option<HeaderValue> {
    let value = format!(
        r#"{}authenticationServiceUrl="{}""#,
        SCHEME_PREFIX,
        challenge_target.replace('"', "%22")
    );
    HeaderValue::from_str(&value).ok()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, challenge) = match self {
            AppError::Unauthorized {
                code,
                message,
                challenge_target,
            } => (
                StatusCode::UNAUTHORIZED,
                code,
                message,
                challenge_header(&challenge_target),
            ),
            AppError::ServiceUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SESSION_STORE_UNAVAILABLE",
                "session store unavailable".into(),
                None,
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
                None,
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(value) = challenge {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, value);
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::header::HeaderError;

    const LOGIN_URL: &str = "https://auth.taskroo.com/login";

    #[test]
    fn malformed_header_maps_to_challenge() {
        let err = AppError::from_auth(
            AuthError::MalformedHeader(HeaderError::MissingSeparator { position: 0 }),
            LOGIN_URL.into(),
        );
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            r#"TaskRooAuth authenticationServiceUrl="https://auth.taskroo.com/login""#
        );
    }

    #[test]
    fn store_outage_is_a_server_error_not_a_rejection() {
        let err = AppError::from_auth(
            AuthError::Store(SessionStoreError::Unavailable("timeout".into())),
            LOGIN_URL.into(),
        );
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn invalid_record_is_internal() {
        let err = AppError::from_auth(
            AuthError::Store(SessionStoreError::InvalidRecord("bad".into())),
            LOGIN_URL.into(),
        );
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
