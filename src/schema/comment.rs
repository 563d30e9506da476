use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::{
  database::{Connection, ErrorExt, Result},
  types::id::{CommentId, PostId, UserId},
};

#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct Comment {
  pub id: CommentId,
  pub author_id: UserId,
  pub post_id: PostId,
  pub parent_id: Option<CommentId>,
  pub content: String,
  pub created_at: DateTime<Utc>,
}

/// A comment joined with its author's username and the number of likes.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct CommentView {
  pub id: CommentId,
  pub author_id: UserId,
  pub author_username: String,
  pub post_id: PostId,
  pub parent_id: Option<CommentId>,
  pub content: String,
  pub created_at: DateTime<Utc>,
  pub like_count: i64,
}

#[derive(Debug, Clone, Copy)]
pub struct InsertComment<'a> {
  pub author_id: UserId,
  pub post_id: PostId,
  pub parent_id: Option<CommentId>,
  pub content: &'a str,
}

impl Comment {
  #[tracing::instrument(skip(conn), name = "db.comments.by_id")]
  pub async fn by_id(conn: &mut Connection, id: CommentId) -> Result<Option<Self>> {
    sqlx::query_as::<_, Self>(r#"SELECT * FROM "comments" WHERE id = $1"#)
      .bind(id)
      .fetch_optional(conn)
      .await
      .into_db_error()
  }

  /// Counts how many ancestors the comment has. Top-level comments
  /// have a depth of 0.
  #[tracing::instrument(skip(conn), name = "db.comments.depth")]
  pub async fn depth(conn: &mut Connection, id: CommentId) -> Result<u32> {
    let depth = sqlx::query_scalar::<_, i32>(
      r#"WITH RECURSIVE ancestors (id, parent_id, depth) AS (
           SELECT id, parent_id, 0 FROM "comments" WHERE id = $1
           UNION ALL
           SELECT c.id, c.parent_id, a.depth + 1
           FROM "comments" c
           JOIN ancestors a ON c.id = a.parent_id
         )
         SELECT COALESCE(MAX(depth), 0)::INT4 FROM ancestors"#,
    )
    .bind(id)
    .fetch_one(conn)
    .await
    .into_db_error()?;

    Ok(u32::try_from(depth).unwrap_or_default())
  }

  #[tracing::instrument(skip(conn, form), name = "db.comments.insert")]
  pub async fn insert(conn: &mut Connection, form: InsertComment<'_>) -> Result<Self> {
    sqlx::query_as::<_, Self>(
      r#"INSERT INTO "comments" (author_id, post_id, parent_id, content)
         VALUES ($1, $2, $3, $4)
         RETURNING *"#,
    )
    .bind(form.author_id)
    .bind(form.post_id)
    .bind(form.parent_id)
    .bind(form.content)
    .fetch_one(conn)
    .await
    .into_db_error()
  }

  /// Locks the comment until the end of the current transaction and
  /// returns the author of it.
  #[tracing::instrument(skip(conn), name = "db.comments.lock")]
  pub async fn lock_for_update(conn: &mut Connection, id: CommentId) -> Result<Option<UserId>> {
    sqlx::query_scalar::<_, UserId>(
      r#"SELECT author_id FROM "comments" WHERE id = $1 FOR UPDATE"#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await
    .into_db_error()
  }
}

impl CommentView {
  const SELECT: &'static str = r#"
    SELECT c.id, c.author_id, u.username AS author_username, c.post_id, c.parent_id,
      c.content, c.created_at,
      (SELECT COUNT(*) FROM "likes" l WHERE l.comment_id = c.id)::INT8 AS like_count
    FROM "comments" c
    JOIN "users" u ON u.id = c.author_id"#;

  #[tracing::instrument(skip(conn), name = "db.comments.view")]
  pub async fn find(conn: &mut Connection, id: CommentId) -> Result<Option<Self>> {
    let query = format!("{} WHERE c.id = $1", Self::SELECT);
    sqlx::query_as::<_, Self>(&query)
      .bind(id)
      .fetch_optional(conn)
      .await
      .into_db_error()
  }

  /// Lists every comment of a post from oldest to newest.
  #[tracing::instrument(skip(conn), name = "db.comments.list_by_post")]
  pub async fn list_by_post(conn: &mut Connection, post_id: PostId) -> Result<Vec<Self>> {
    let query = format!(
      "{} WHERE c.post_id = $1 ORDER BY c.created_at ASC, c.id ASC",
      Self::SELECT
    );
    sqlx::query_as::<_, Self>(&query)
      .bind(post_id)
      .fetch_all(conn)
      .await
      .into_db_error()
  }
}
