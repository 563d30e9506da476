use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::{
  database::{Connection, ErrorExt, Result},
  types::id::{CommentId, LikeId, PostId, UserId},
};

/// Something a user can like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LikeTarget {
  Post(PostId),
  Comment(CommentId),
}

impl LikeTarget {
  pub const POST_REWARD: i32 = 5;
  pub const COMMENT_REWARD: i32 = 1;

  /// Karma points the author of the target earns per like.
  #[must_use]
  pub const fn reward(self) -> i32 {
    match self {
      Self::Post(..) => Self::POST_REWARD,
      Self::Comment(..) => Self::COMMENT_REWARD,
    }
  }

  #[must_use]
  pub const fn post_id(self) -> Option<PostId> {
    match self {
      Self::Post(id) => Some(id),
      Self::Comment(..) => None,
    }
  }

  #[must_use]
  pub const fn comment_id(self) -> Option<CommentId> {
    match self {
      Self::Post(..) => None,
      Self::Comment(id) => Some(id),
    }
  }

  /// Locks the row of the target until the end of the current
  /// transaction and returns its author.
  pub async fn lock_for_update(self, conn: &mut Connection) -> Result<Option<UserId>> {
    match self {
      Self::Post(id) => super::Post::lock_for_update(conn, id).await,
      Self::Comment(id) => super::Comment::lock_for_update(conn, id).await,
    }
  }

  /// Column referencing the target in `likes` and `karma_transactions`.
  #[must_use]
  pub(crate) const fn column(self) -> &'static str {
    match self {
      Self::Post(..) => "post_id",
      Self::Comment(..) => "comment_id",
    }
  }

  pub(crate) fn bind_to<'q, O>(
    self,
    query: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
  ) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    match self {
      Self::Post(id) => query.bind(id),
      Self::Comment(id) => query.bind(id),
    }
  }
}

#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct Like {
  pub id: LikeId,
  pub user_id: UserId,
  pub post_id: Option<PostId>,
  pub comment_id: Option<CommentId>,
  pub created_at: DateTime<Utc>,
}

impl Like {
  #[must_use]
  pub fn target(&self) -> Option<LikeTarget> {
    match (self.post_id, self.comment_id) {
      (Some(post), None) => Some(LikeTarget::Post(post)),
      (None, Some(comment)) => Some(LikeTarget::Comment(comment)),
      _ => None,
    }
  }

  /// Finds the like of a user for the target, creating one if there's
  /// none. The boolean is `true` if the like has been created.
  #[tracing::instrument(skip(conn), name = "db.likes.find_or_insert")]
  pub async fn find_or_insert(
    conn: &mut Connection,
    user_id: UserId,
    target: LikeTarget,
  ) -> Result<(Self, bool)> {
    let inserted = sqlx::query_as::<_, Self>(
      r#"INSERT INTO "likes" (user_id, post_id, comment_id)
         VALUES ($1, $2, $3)
         ON CONFLICT DO NOTHING
         RETURNING *"#,
    )
    .bind(user_id)
    .bind(target.post_id())
    .bind(target.comment_id())
    .fetch_optional(&mut *conn)
    .await
    .into_db_error()?;

    if let Some(like) = inserted {
      return Ok((like, true));
    }

    let query = format!(
      r#"SELECT * FROM "likes" WHERE user_id = $1 AND {} = $2"#,
      target.column()
    );
    let existing = target
      .bind_to(sqlx::query_as::<_, Self>(&query).bind(user_id))
      .fetch_one(conn)
      .await
      .into_db_error()?;

    Ok((existing, false))
  }

  #[tracing::instrument(skip(conn), name = "db.likes.delete")]
  pub async fn delete(conn: &mut Connection, id: LikeId) -> Result<()> {
    sqlx::query(r#"DELETE FROM "likes" WHERE id = $1"#)
      .bind(id)
      .execute(conn)
      .await
      .into_db_error()?;
    Ok(())
  }
}
