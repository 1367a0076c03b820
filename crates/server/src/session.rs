// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller extraction for the server.
//!
//! Authentication happens in front of this server. The upstream layer
//! forwards the resolved identity in the `X-Actor-Id` and `X-Actor-Role`
//! headers; this module turns them into an [`AuthenticatedActor`] and the
//! audit [`Cause`] for the request.

use std::sync::atomic::{AtomicU64, Ordering};

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use nagrik_setu_api::{AuthenticatedActor, Role};
use nagrik_setu_audit::Cause;
use tracing::{debug, warn};

/// Header carrying the caller's identifier.
pub const ACTOR_ID_HEADER: &str = "x-actor-id";
/// Header carrying the caller's role.
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";
/// Optional header carrying the upstream request identifier.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Extractor for the calling actor and the cause recorded in audit events.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(Caller { actor, cause }: Caller) -> Result<Json<Response>, HttpError> {
///     // actor: AuthenticatedActor
///     // cause: Cause
/// }
/// ```
///
/// # Errors
///
/// Rejects the request with HTTP 401 if either identity header is missing or
/// not valid UTF-8, and with HTTP 400 if the role is not recognized.
pub struct Caller {
    /// The authenticated caller.
    pub actor: AuthenticatedActor,
    /// Why the request is being made.
    pub cause: Cause,
}

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = SessionError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor_id: String = header(parts, ACTOR_ID_HEADER)?
            .ok_or(SessionError::MissingHeader(ACTOR_ID_HEADER))?
            .trim()
            .to_string();
        if actor_id.is_empty() {
            return Err(SessionError::MissingHeader(ACTOR_ID_HEADER));
        }

        let role: Role = header(parts, ACTOR_ROLE_HEADER)?
            .ok_or(SessionError::MissingHeader(ACTOR_ROLE_HEADER))?
            .parse::<Role>()
            .map_err(|e| {
                warn!(error = %e, "Rejected caller role");
                SessionError::InvalidRole(e.to_string())
            })?;

        let request_id: String = match header(parts, REQUEST_ID_HEADER)? {
            Some(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => format!("req-{}", REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed)),
        };
        let cause: Cause = Cause::new(
            request_id,
            format!("{} {}", parts.method, parts.uri.path()),
        );

        debug!(actor_id = %actor_id, role = role.as_str(), cause_id = %cause.id, "Caller resolved");

        Ok(Self {
            actor: AuthenticatedActor::new(actor_id, role),
            cause,
        })
    }
}

fn header<'a>(parts: &'a Parts, name: &'static str) -> Result<Option<&'a str>, SessionError> {
    parts
        .headers
        .get(name)
        .map(|value| {
            value.to_str().map_err(|_| {
                warn!(header = name, "Header is not valid UTF-8");
                SessionError::InvalidHeader(name)
            })
        })
        .transpose()
}

/// Caller extraction errors.
#[derive(Debug)]
pub enum SessionError {
    /// A required identity header is missing or blank.
    MissingHeader(&'static str),
    /// A header is not valid UTF-8.
    InvalidHeader(&'static str),
    /// The role header names no known role.
    InvalidRole(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingHeader(name) => {
                (StatusCode::UNAUTHORIZED, format!("Missing {name} header")).into_response()
            }
            Self::InvalidHeader(name) => {
                (StatusCode::UNAUTHORIZED, format!("Invalid {name} header")).into_response()
            }
            Self::InvalidRole(reason) => (StatusCode::BAD_REQUEST, reason).into_response(),
        }
    }
}
