//! Authorization header → SecurityContext.
//!
//! Pipeline, strictly in this order:
//! 1. no `Authorization` header → anonymous (no parsing, no store call)
//! 2. parse the `TaskRooAuth` fields
//! 3. resolve `tokenKey` against the session store (touching it)
//! 4. build the context; an unknown token is anonymous, not an error
//!
//! The filter holds only immutable collaborators and is shared by all requests.

use std::sync::Arc;

use axum::http::HeaderValue;
use thiserror::Error;

use crate::config::MalformedHeaderPolicy;
use crate::security::context::{SecurityContext, build_context};
use crate::security::header::{self, HeaderError};
use crate::services::session::{SessionResolver, SessionStoreError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("malformed authorization header: {0}")]
    MalformedHeader(#[from] HeaderError),
    #[error(transparent)]
    Store(#[from] SessionStoreError),
}

#[derive(Clone)]
pub struct SecurityContextFilter {
    resolver: SessionResolver,
    authentication_service_url: Arc<str>,
    malformed_header_policy: MalformedHeaderPolicy,
}

impl SecurityContextFilter {
    pub fn new(
        resolver: SessionResolver,
        authentication_service_url: impl Into<Arc<str>>,
        malformed_header_policy: MalformedHeaderPolicy,
    ) -> Self {
        Self {
            resolver,
            authentication_service_url: authentication_service_url.into(),
            malformed_header_policy,
        }
    }

    pub fn authentication_service_url(&self) -> Arc<str> {
        self.authentication_service_url.clone()
    }

    pub async fn authenticate(
        &self,
        authorization: Option<&HeaderValue>,
    ) -> Result<SecurityContext, AuthError> {
        let Some(authorization) = authorization else {
            return Ok(self.anonymous());
        };

        let fields = match header::parse_header_value(authorization) {
            Ok(fields) => fields,
            Err(err) => match self.malformed_header_policy {
                MalformedHeaderPolicy::Reject => return Err(err.into()),
                MalformedHeaderPolicy::Anonymous => {
                    tracing::warn!(error = %err, "ignoring malformed authorization header");
                    return Ok(self.anonymous());
                }
            },
        };

        let session = self.resolver.resolve(fields.token_key()).await.map_err(|err| {
            tracing::error!(
                error = %err,
                backend = self.resolver.backend_name(),
                "session lookup failed"
            );
            err
        })?;

        match &session {
            Some(session) => tracing::debug!(user_id = %session.user_id, "session resolved"),
            None => tracing::debug!("no live session for request, continuing anonymously"),
        }

        Ok(build_context(session, self.authentication_service_url()))
    }

    fn anonymous(&self) -> SecurityContext {
        SecurityContext::anonymous(self.authentication_service_url())
    }
}
