use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// A favorited external image, owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Favorite {
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    #[serde(rename = "imageId")]
    pub image_id: String,
    pub title: String,
    pub url_s: Option<String>,
    pub url_m: Option<String>,
    pub source: Option<String>,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

const FAVORITE_COLUMNS: &str = "id, user_id, image_id, title, url_s, url_m, source, created_at";

impl Favorite {
    /// Newest-first page of one user's favorites.
    pub async fn list_page(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Favorite>> {
        let rows = sqlx::query_as::<_, Favorite>(&format!(
            "SELECT {FAVORITE_COLUMNS}
             FROM favorites
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn count_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM favorites WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(db)
                .await?;
        Ok(count.0)
    }

    pub async fn find_by_image(
        db: &PgPool,
        user_id: Uuid,
        image_id: &str,
    ) -> anyhow::Result<Option<Favorite>> {
        let row = sqlx::query_as::<_, Favorite>(&format!(
            "SELECT {FAVORITE_COLUMNS} FROM favorites WHERE user_id = $1 AND image_id = $2"
        ))
        .bind(user_id)
        .bind(image_id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    /// Insert a favorite. Raced duplicates surface as a unique-violation on
    /// `(user_id, image_id)`, which the caller maps to a conflict.
    pub async fn insert(
        db: &PgPool,
        user_id: Uuid,
        image_id: &str,
        title: &str,
        url_s: Option<&str>,
        url_m: Option<&str>,
        source: Option<&str>,
    ) -> Result<Favorite, sqlx::Error> {
        sqlx::query_as::<_, Favorite>(&format!(
            "INSERT INTO favorites (user_id, image_id, title, url_s, url_m, source)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {FAVORITE_COLUMNS}"
        ))
        .bind(user_id)
        .bind(image_id)
        .bind(title)
        .bind(url_s)
        .bind(url_m)
        .bind(source)
        .fetch_one(db)
        .await
    }

    /// Delete one favorite, ownership-scoped. Returns false when the id does
    /// not exist or belongs to another user; the caller cannot tell which.
    pub async fn delete_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove all of one user's favorites. Idempotent.
    pub async fn delete_all_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM favorites WHERE user_id = $1")
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(())
    }
}
