use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse, PublicUser, RegisterRequest, RegisterResponse},
        extractors::CurrentUser,
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::{is_unique_violation, User},
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        // /token is an alias for login kept for API compatibility.
        .route("/token", post(login))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/users", get(list_users))
}

pub(crate) fn is_valid_username(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^[A-Za-z0-9._-]{3,32}$").unwrap();
    }
    USERNAME_RE.is_match(username)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let (username, password) = match (payload.username, payload.password) {
        (Some(u), Some(p)) if !u.trim().is_empty() && !p.is_empty() => (u.trim().to_string(), p),
        _ => {
            return Err(ApiError::Validation(
                "Please provide username and password".into(),
            ))
        }
    };

    if !is_valid_username(&username) {
        warn!(%username, "invalid username");
        return Err(ApiError::Validation(
            "Username must be 3-32 characters (letters, digits, . _ -)".into(),
        ));
    }

    if password.len() < 6 {
        return Err(ApiError::Validation("Password too short".into()));
    }

    // Pre-check for a friendly error; the unique index remains authoritative.
    if User::find_by_username(&state.db, &username).await?.is_some() {
        warn!(%username, "username already registered");
        return Err(ApiError::Validation("User already exists".into()));
    }

    let roles = payload
        .roles
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| vec!["USER".to_string()]);

    let hash = hash_password(&password)?;

    let user = User::create(&state.db, &username, &hash, &roles)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::Validation("User already exists".into())
            } else {
                ApiError::Internal(e.into())
            }
        })?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.roles)?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            username: user.username,
            roles: user.roles,
            token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (username, password) = match (payload.username, payload.password) {
        (Some(u), Some(p)) if !u.trim().is_empty() && !p.is_empty() => (u.trim().to_string(), p),
        _ => {
            return Err(ApiError::Validation(
                "Please provide username and password".into(),
            ))
        }
    };

    // Unknown username and wrong password take the same failure path so the
    // response never distinguishes the two.
    let user = match User::find_by_username(&state.db, &username).await? {
        Some(u) => u,
        None => {
            warn!(%username, "login unknown username");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(&password, &user.password_hash)? {
        warn!(%username, user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.roles)?;

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(LoginResponse {
        token,
        user: PublicUser {
            id: user.id,
            username: user.username,
            roles: user.roles,
        },
    }))
}

#[instrument(skip(state, current))]
pub async fn list_users(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<Json<Vec<PublicUser>>, ApiError> {
    current.require_any_role(&["ADMIN"])?;

    let users = User::list(&state.db).await?;
    Ok(Json(
        users
            .into_iter()
            .map(|u| PublicUser {
                id: u.id,
                username: u.username,
                roles: u.roles,
            })
            .collect(),
    ))
}
