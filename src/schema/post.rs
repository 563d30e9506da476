use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::{
  database::{Connection, ErrorExt, Result},
  types::id::{PostId, UserId},
};

#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct Post {
  pub id: PostId,
  pub author_id: UserId,
  pub content: String,
  pub created_at: DateTime<Utc>,
}

/// A post joined with its author's username and the number of likes.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct PostView {
  pub id: PostId,
  pub author_id: UserId,
  pub author_username: String,
  pub content: String,
  pub created_at: DateTime<Utc>,
  pub like_count: i64,
}

impl Post {
  #[tracing::instrument(skip(conn), name = "db.posts.by_id")]
  pub async fn by_id(conn: &mut Connection, id: PostId) -> Result<Option<Self>> {
    sqlx::query_as::<_, Self>(r#"SELECT * FROM "posts" WHERE id = $1"#)
      .bind(id)
      .fetch_optional(conn)
      .await
      .into_db_error()
  }

  #[tracing::instrument(skip(conn, content), name = "db.posts.insert")]
  pub async fn insert(conn: &mut Connection, author_id: UserId, content: &str) -> Result<Self> {
    sqlx::query_as::<_, Self>(
      r#"INSERT INTO "posts" (author_id, content)
         VALUES ($1, $2)
         RETURNING *"#,
    )
    .bind(author_id)
    .bind(content)
    .fetch_one(conn)
    .await
    .into_db_error()
  }

  /// Locks the post until the end of the current transaction and
  /// returns the author of it.
  #[tracing::instrument(skip(conn), name = "db.posts.lock")]
  pub async fn lock_for_update(conn: &mut Connection, id: PostId) -> Result<Option<UserId>> {
    sqlx::query_scalar::<_, UserId>(r#"SELECT author_id FROM "posts" WHERE id = $1 FOR UPDATE"#)
      .bind(id)
      .fetch_optional(conn)
      .await
      .into_db_error()
  }
}

impl PostView {
  const SELECT: &'static str = r#"
    SELECT p.id, p.author_id, u.username AS author_username, p.content, p.created_at,
      (SELECT COUNT(*) FROM "likes" l WHERE l.post_id = p.id)::INT8 AS like_count
    FROM "posts" p
    JOIN "users" u ON u.id = p.author_id"#;

  #[tracing::instrument(skip(conn), name = "db.posts.view")]
  pub async fn find(conn: &mut Connection, id: PostId) -> Result<Option<Self>> {
    let query = format!("{} WHERE p.id = $1", Self::SELECT);
    sqlx::query_as::<_, Self>(&query)
      .bind(id)
      .fetch_optional(conn)
      .await
      .into_db_error()
  }

  /// Lists posts from newest to oldest by ID. `before` excludes every
  /// post with an ID greater than or equal to it and `None` as the
  /// limit lists every remaining post.
  ///
  /// Posts are ordered by ID rather than `created_at` so that paging
  /// with `before` never skips a post.
  #[tracing::instrument(skip(conn), name = "db.posts.list")]
  pub async fn list(
    conn: &mut Connection,
    before: Option<PostId>,
    limit: Option<u32>,
  ) -> Result<Vec<Self>> {
    let query = format!(
      "{} WHERE ($1::INT8 IS NULL OR p.id < $1) ORDER BY p.id DESC LIMIT $2",
      Self::SELECT
    );
    sqlx::query_as::<_, Self>(&query)
      .bind(before)
      .bind(limit.map(i64::from))
      .fetch_all(conn)
      .await
      .into_db_error()
  }
}
