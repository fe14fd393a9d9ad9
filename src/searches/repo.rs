use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// One submitted search term. Repeats are allowed; there is no retention
/// cap, the client clears in bulk.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecentSearch {
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub term: String,
    #[serde(rename = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl RecentSearch {
    pub async fn list_page(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<RecentSearch>> {
        let rows = sqlx::query_as::<_, RecentSearch>(
            "SELECT id, user_id, term, created_at
             FROM recent_searches
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn count_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM recent_searches WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(db)
                .await?;
        Ok(count.0)
    }

    pub async fn insert(db: &PgPool, user_id: Uuid, term: &str) -> anyhow::Result<RecentSearch> {
        let row = sqlx::query_as::<_, RecentSearch>(
            "INSERT INTO recent_searches (user_id, term)
             VALUES ($1, $2)
             RETURNING id, user_id, term, created_at",
        )
        .bind(user_id)
        .bind(term)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn delete_all_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM recent_searches WHERE user_id = $1")
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(())
    }
}
