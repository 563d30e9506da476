use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::LikeTarget;
use crate::{
  database::{Connection, ErrorExt, Result},
  types::id::{CommentId, KarmaId, PostId, UserId},
};

/// An entry of the karma ledger. Karma of a user is the sum of the
/// points of every transaction crediting them.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct KarmaTransaction {
  pub id: KarmaId,
  pub user_id: UserId,
  pub points: i32,
  pub created_at: DateTime<Utc>,
  pub post_id: Option<PostId>,
  pub comment_id: Option<CommentId>,
}

#[derive(Debug, Clone, Copy)]
pub struct InsertKarma {
  pub recipient: UserId,
  pub target: LikeTarget,
  pub points: i32,
}

/// Aggregated karma of a user, a row of the leaderboard.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct KarmaTotal {
  pub user_id: UserId,
  pub username: String,
  pub karma: i64,
}

impl KarmaTransaction {
  #[tracing::instrument(skip(conn), name = "db.karma.insert")]
  pub async fn insert(conn: &mut Connection, form: InsertKarma) -> Result<Self> {
    sqlx::query_as::<_, Self>(
      r#"INSERT INTO "karma_transactions" (user_id, points, post_id, comment_id)
         VALUES ($1, $2, $3, $4)
         RETURNING *"#,
    )
    .bind(form.recipient)
    .bind(form.points)
    .bind(form.target.post_id())
    .bind(form.target.comment_id())
    .fetch_one(conn)
    .await
    .into_db_error()
  }

  /// Deletes one transaction crediting `recipient` for `target`,
  /// the oldest one if there are many.
  #[tracing::instrument(skip(conn), name = "db.karma.revoke")]
  pub async fn revoke(
    conn: &mut Connection,
    recipient: UserId,
    target: LikeTarget,
  ) -> Result<Option<Self>> {
    let query = format!(
      r#"DELETE FROM "karma_transactions"
         WHERE id = (
           SELECT id FROM "karma_transactions"
           WHERE user_id = $1 AND {} = $2
           ORDER BY id ASC
           LIMIT 1
         )
         RETURNING *"#,
      target.column()
    );
    target
      .bind_to(sqlx::query_as::<_, Self>(&query).bind(recipient))
      .fetch_optional(conn)
      .await
      .into_db_error()
  }
}

impl KarmaTotal {
  /// Sums the points of every user from transactions created at or
  /// after `since` (every transaction if `None`). Sorted from the
  /// highest karma, ties are sorted by user ID.
  #[tracing::instrument(skip(conn), name = "db.karma.totals")]
  pub async fn list(
    conn: &mut Connection,
    since: Option<DateTime<Utc>>,
    limit: u32,
  ) -> Result<Vec<Self>> {
    sqlx::query_as::<_, Self>(
      r#"SELECT k.user_id, u.username, SUM(k.points)::INT8 AS karma
         FROM "karma_transactions" k
         JOIN "users" u ON u.id = k.user_id
         WHERE $1::TIMESTAMPTZ IS NULL OR k.created_at >= $1
         GROUP BY k.user_id, u.username
         ORDER BY karma DESC, k.user_id ASC
         LIMIT $2"#,
    )
    .bind(since)
    .bind(i64::from(limit))
    .fetch_all(conn)
    .await
    .into_db_error()
  }
}
