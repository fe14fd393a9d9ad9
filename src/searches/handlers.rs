use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::extractors::CurrentUser,
    error::ApiError,
    pagination::{Page, PageParams},
    searches::dto::AddSearchRequest,
    searches::repo::RecentSearch,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recent-searches", get(list_searches).post(add_search))
        .route("/recent-searches/all", delete(clear_searches))
}

#[instrument(skip(state, current))]
pub async fn list_searches(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<RecentSearch>>, ApiError> {
    let items =
        RecentSearch::list_page(&state.db, current.id, params.limit(), params.offset()).await?;
    let total = RecentSearch::count_by_user(&state.db, current.id).await?;
    Ok(Json(Page::new(items, &params, total)))
}

#[instrument(skip(state, current, payload))]
pub async fn add_search(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<AddSearchRequest>,
) -> Result<(StatusCode, Json<RecentSearch>), ApiError> {
    let term = normalize_term(payload.term.as_deref())
        .ok_or_else(|| ApiError::Validation("Search term cannot be empty".into()))?;

    let search = RecentSearch::insert(&state.db, current.id, term).await?;

    info!(user_id = %current.id, search_id = %search.id, "search recorded");
    Ok((StatusCode::CREATED, Json(search)))
}

#[instrument(skip(state, current))]
pub async fn clear_searches(
    State(state): State<AppState>,
    current: CurrentUser,
) -> Result<StatusCode, ApiError> {
    RecentSearch::delete_all_by_user(&state.db, current.id).await?;
    info!(user_id = %current.id, "recent searches cleared");
    Ok(StatusCode::NO_CONTENT)
}

/// Trimmed term, or None when nothing is left to store.
fn normalize_term(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|t| !t.is_empty())
}
