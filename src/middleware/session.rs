use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::{error::AppError, middleware::auth::AuthUser};

pub const SESSION_HEADER: &str = "x-session-id";

/// Opaque session identifier issued by the session layer in front of this service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::BadRequest("Missing session id".into()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl<S> FromRequestParts<S> for SessionId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(SESSION_HEADER)
            .ok_or_else(|| AppError::BadRequest("Missing session id".into()))?
            .to_str()
            .map_err(|_| AppError::BadRequest("Invalid session id".into()))?;
        SessionId::parse(value)
    }
}

/// Whoever is driving the cart: always a session, sometimes a known user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shopper {
    pub session_id: String,
    pub user_id: Option<Uuid>,
}

impl Shopper {
    pub fn anonymous(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: None,
        }
    }

    pub fn user(session_id: impl Into<String>, user_id: Uuid) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: Some(user_id),
        }
    }

    pub fn from_parts(session: SessionId, user: Option<&AuthUser>) -> Self {
        Self {
            session_id: session.0,
            user_id: user.map(|u| u.user_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_session_is_rejected() {
        assert!(SessionId::parse("   ").is_err());
        assert_eq!(SessionId::parse(" abc ").unwrap(), SessionId("abc".into()));
    }

    #[test]
    fn shopper_carries_user_when_authenticated() {
        let user = AuthUser {
            user_id: Uuid::new_v4(),
            role: "user".into(),
        };
        let shopper = Shopper::from_parts(SessionId("sid".into()), Some(&user));
        assert_eq!(shopper, Shopper::user("sid", user.user_id));
        let anon = Shopper::from_parts(SessionId("sid".into()), None);
        assert_eq!(anon, Shopper::anonymous("sid"));
    }
}
