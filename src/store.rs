//! Persistence gate for crawled articles.
//!
//! Writes go through [`commit`], which dedupes against a point-in-time
//! snapshot of stored titles and bulk-inserts the survivors inside one
//! transaction. The snapshot is taken once per call; concurrent writers
//! during a run can still introduce duplicate titles, which is an accepted
//! race rather than a guarantee (the schema carries no uniqueness
//! constraint).
//!
//! Crawled rows are owned by a fixed author account looked up by username;
//! the crawler never creates that account on its own.

use crate::error::Result;
use crate::models::ArticleRecord;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::HashSet;
use tracing::{info, instrument};

/// Username of the account that owns crawled rows.
pub const AUTHOR_USERNAME: &str = "admin";

/// Rows per INSERT statement inside the commit transaction.
const INSERT_BATCH_SIZE: usize = 50;

/// Snapshot the distinct titles currently stored.
pub async fn existing_titles(pool: &SqlitePool) -> Result<HashSet<String>> {
    let titles: Vec<String> = sqlx::query_scalar("SELECT DISTINCT title FROM news")
        .fetch_all(pool)
        .await?;
    Ok(titles.into_iter().collect())
}

/// Look up the author account id by username.
pub async fn find_author(pool: &SqlitePool, username: &str) -> Result<Option<i64>> {
    let id = sqlx::query_scalar("SELECT id FROM users WHERE username = ?")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(id)
}

/// Create the author account if it does not exist yet.
pub async fn seed_author(pool: &SqlitePool, username: &str) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO users (username) VALUES (?)")
        .bind(username)
        .execute(pool)
        .await?;
    Ok(())
}

/// Insert the new records among `records`, owned by `author_id`.
///
/// A record qualifies iff its title and content are non-empty and its title
/// is neither in the snapshot taken at call start nor already queued earlier
/// in this same batch. Qualifying rows are written in bounded-size chunks
/// inside one transaction: a failure in any chunk rolls back every row of
/// the call.
///
/// Returns the number of rows inserted; zero when nothing qualifies.
#[instrument(level = "info", skip_all, fields(candidates = records.len()))]
pub async fn commit(pool: &SqlitePool, records: &[ArticleRecord], author_id: i64) -> Result<u64> {
    let mut seen = existing_titles(pool).await?;

    let mut batch = Vec::new();
    for record in records {
        if record.title.is_empty() || record.content.is_empty() {
            continue;
        }
        if seen.contains(&record.title) {
            continue;
        }
        seen.insert(record.title.clone());
        batch.push(record);
    }

    if batch.is_empty() {
        info!("no rows qualify for insert");
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    for chunk in batch.chunks(INSERT_BATCH_SIZE) {
        let mut qb = QueryBuilder::<Sqlite>::new("INSERT INTO news (title, content, user_id) ");
        qb.push_values(chunk, |mut row, record| {
            row.push_bind(&record.title)
                .push_bind(&record.content)
                .push_bind(author_id);
        });
        qb.build().execute(&mut *tx).await?;
    }
    tx.commit().await?;

    info!(added = batch.len(), "inserted news rows");
    Ok(batch.len() as u64)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    /// Fresh in-memory database with the embedded migrations applied.
    ///
    /// One connection only: each sqlite `:memory:` connection is its own
    /// database.
    pub(crate) async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    pub(crate) async fn seeded_author(pool: &SqlitePool) -> i64 {
        seed_author(pool, AUTHOR_USERNAME).await.unwrap();
        find_author(pool, AUTHOR_USERNAME).await.unwrap().unwrap()
    }

    fn rec(title: &str, content: &str) -> ArticleRecord {
        ArticleRecord {
            title: title.to_string(),
            content: content.to_string(),
            source_url: format!("https://example.com/{title}"),
        }
    }

    async fn count_news(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM news")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn commit_inserts_new_records() {
        let pool = test_pool().await;
        let author = seeded_author(&pool).await;

        let added = commit(&pool, &[rec("a", "one"), rec("b", "two")], author)
            .await
            .unwrap();

        assert_eq!(added, 2);
        assert_eq!(count_news(&pool).await, 2);

        let (is_published, user_id): (i64, i64) =
            sqlx::query_as("SELECT is_published, user_id FROM news WHERE title = 'a'")
                .fetch_one(&pool)
                .await
                .unwrap();
        assert_eq!(is_published, 1);
        assert_eq!(user_id, author);
    }

    #[tokio::test]
    async fn commit_is_idempotent_across_runs() {
        let pool = test_pool().await;
        let author = seeded_author(&pool).await;
        let records = [rec("a", "one"), rec("b", "two")];

        assert_eq!(commit(&pool, &records, author).await.unwrap(), 2);
        assert_eq!(commit(&pool, &records, author).await.unwrap(), 0);
        assert_eq!(count_news(&pool).await, 2);
    }

    #[tokio::test]
    async fn commit_skips_titles_already_stored() {
        let pool = test_pool().await;
        let author = seeded_author(&pool).await;
        commit(&pool, &[rec("a", "old")], author).await.unwrap();

        let added = commit(&pool, &[rec("a", "new"), rec("b", "two")], author)
            .await
            .unwrap();

        assert_eq!(added, 1);
        let content: String = sqlx::query_scalar("SELECT content FROM news WHERE title = 'a'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(content, "old");
    }

    #[tokio::test]
    async fn commit_drops_records_with_empty_title_or_content() {
        let pool = test_pool().await;
        let author = seeded_author(&pool).await;

        let added = commit(&pool, &[rec("", "one"), rec("b", ""), rec("c", "ok")], author)
            .await
            .unwrap();

        assert_eq!(added, 1);
        assert_eq!(count_news(&pool).await, 1);
    }

    #[tokio::test]
    async fn commit_dedupes_titles_within_one_batch() {
        let pool = test_pool().await;
        let author = seeded_author(&pool).await;

        let added = commit(&pool, &[rec("a", "first"), rec("a", "second")], author)
            .await
            .unwrap();

        assert_eq!(added, 1);
        let content: String = sqlx::query_scalar("SELECT content FROM news WHERE title = 'a'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(content, "first");
    }

    #[tokio::test]
    async fn commit_returns_zero_for_empty_input() {
        let pool = test_pool().await;
        let author = seeded_author(&pool).await;
        assert_eq!(commit(&pool, &[], author).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_chunk_rolls_back_the_whole_commit() {
        let pool = test_pool().await;
        let author = seeded_author(&pool).await;
        // Case-insensitive uniqueness the gate's exact-match snapshot cannot
        // see, so the second chunk's insert fails after the first succeeded.
        sqlx::query("CREATE UNIQUE INDEX news_title_nocase ON news (title COLLATE NOCASE)")
            .execute(&pool)
            .await
            .unwrap();

        let mut records: Vec<ArticleRecord> =
            (0..50).map(|i| rec(&format!("Title-{i}"), "body")).collect();
        records.push(rec("title-0", "case variant in second chunk"));

        let result = commit(&pool, &records, author).await;

        assert!(result.is_err());
        assert_eq!(count_news(&pool).await, 0);
    }

    #[tokio::test]
    async fn find_author_misses_then_finds_after_seed() {
        let pool = test_pool().await;
        assert!(find_author(&pool, AUTHOR_USERNAME).await.unwrap().is_none());

        seed_author(&pool, AUTHOR_USERNAME).await.unwrap();
        assert!(find_author(&pool, AUTHOR_USERNAME).await.unwrap().is_some());

        // Seeding again is a no-op.
        seed_author(&pool, AUTHOR_USERNAME).await.unwrap();
        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(users, 1);
    }
}
