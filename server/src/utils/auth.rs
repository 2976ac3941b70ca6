use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::models::{Event, User};
use crate::state::AppState;
use crate::utils::error::AppError;

/// The signed-in user, resolved from an `Authorization: Bearer` token.
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

impl CurrentUser {
    pub fn require_organizer(&self) -> Result<(), AppError> {
        if self.user.is_organizer() {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Only organizers can perform this action".to_string(),
            ))
        }
    }

    /// Organizer who owns `event`.
    pub fn require_owner(&self, event: &Event) -> Result<(), AppError> {
        self.require_organizer()?;
        if event.organizer.id == self.user.id {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "You do not organize this event".to_string(),
            ))
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::AuthError("Missing bearer token".to_string()))?;

        let user = state
            .auth
            .current_user(token)
            .await
            .ok_or_else(|| AppError::AuthError("Session expired or invalid".to_string()))?;

        Ok(Self {
            user,
            token: token.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), Some("abc123"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc123"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
