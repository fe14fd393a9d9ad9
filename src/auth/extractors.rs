use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use crate::{
    auth::{
        jwt::{JwtKeys, TokenError},
        repo::User,
    },
    error::ApiError,
    state::AppState,
};

/// Identity resolved for the current request: the bearer token checked out
/// and the referenced user still exists. Roles come from the fresh store
/// lookup, not from the token, so role changes take effect immediately.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub roles: Vec<String>,
}

impl CurrentUser {
    /// Role gate: passes when the user holds any of the required roles.
    pub fn require_any_role(&self, required: &[&str]) -> Result<(), ApiError> {
        if required.iter().any(|r| self.roles.iter().any(|have| have == r)) {
            Ok(())
        } else {
            Err(ApiError::Forbidden {
                required: required.iter().map(|r| r.to_string()).collect(),
            })
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::NoToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::NoToken)?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "token rejected");
            match e {
                TokenError::Expired => ApiError::TokenExpired,
                TokenError::Invalid => ApiError::TokenInvalid,
            }
        })?;

        let user = User::find_by_id(&state.db, claims.sub)
            .await?
            .ok_or(ApiError::UserNotFound)?;

        Ok(CurrentUser {
            id: user.id,
            username: user.username,
            roles: user.roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_roles(roles: &[&str]) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            username: "alice".into(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn role_gate_passes_on_intersection() {
        let user = user_with_roles(&["USER", "ADMIN"]);
        assert!(user.require_any_role(&["ADMIN"]).is_ok());
        assert!(user.require_any_role(&["MODERATOR", "USER"]).is_ok());
    }

    #[test]
    fn role_gate_rejects_without_required_role() {
        let user = user_with_roles(&["USER"]);
        let err = user.require_any_role(&["ADMIN"]).unwrap_err();
        match err {
            ApiError::Forbidden { required } => assert_eq!(required, vec!["ADMIN"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn role_gate_rejects_empty_roles() {
        let user = user_with_roles(&[]);
        assert!(user.require_any_role(&["USER"]).is_err());
    }
}
