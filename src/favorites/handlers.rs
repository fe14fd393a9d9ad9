use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{extractors::CurrentUser, repo::is_unique_violation},
    error::ApiError,
    favorites::dto::AddFavoriteRequest,
    favorites::repo::Favorite,
    pagination::{Page, PageParams},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/favorites", get(list_favorites).post(add_favorite))
        // static segment wins over :id, so /favorites/all stays reachable
        .route("/favorites/all", delete(clear_favorites))
        .route("/favorites/:id", delete(remove_favorite))
}

#[instrument(skip(state, current))]
pub async fn list_favorites(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<Favorite>>, ApiError> {
    let items =
        Favorite::list_page(&state.db, current.id, params.limit(), params.offset()).await?;
    let total = Favorite::count_by_user(&state.db, current.id).await?;
    Ok(Json(Page::new(items, &params, total)))
}

#[instrument(skip(state, current, payload))]
pub async fn add_favorite(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<AddFavoriteRequest>,
) -> Result<(StatusCode, Json<Favorite>), ApiError> {
    let (image_id, title) = match (payload.image_id, payload.title) {
        (Some(i), Some(t)) if !i.is_empty() && !t.is_empty() => (i, t),
        _ => return Err(ApiError::Validation("imageId and title are required".into())),
    };

    // Friendly pre-check; the unique index on (user_id, image_id) decides
    // races between concurrent adds.
    if Favorite::find_by_image(&state.db, current.id, &image_id)
        .await?
        .is_some()
    {
        warn!(user_id = %current.id, %image_id, "duplicate favorite");
        return Err(ApiError::Conflict("Image already in favorites".into()));
    }

    let favorite = Favorite::insert(
        &state.db,
        current.id,
        &image_id,
        &title,
        payload.url_s.as_deref(),
        payload.url_m.as_deref(),
        payload.source.as_deref(),
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict("Image already in favorites".into())
        } else {
            ApiError::Internal(e.into())
        }
    })?;

    info!(user_id = %current.id, favorite_id = %favorite.id, "favorite added");
    Ok((StatusCode::CREATED, Json(favorite)))
}

#[instrument(skip(state, current))]
pub async fn remove_favorite(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = Favorite::delete_owned(&state.db, current.id, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("Favorite"));
    }
    info!(user_id = %current.id, favorite_id = %id, "favorite removed");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, current))]
pub async fn clear_favorites(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<StatusCode, ApiError> {
    Favorite::delete_all_by_user(&state.db, current.id).await?;
    info!(user_id = %current.id, "favorites cleared");
    Ok(StatusCode::NO_CONTENT)
}
