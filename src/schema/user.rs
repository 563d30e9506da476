use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::{
  database::{Connection, ErrorExt, Result},
  types::id::UserId,
};

#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct User {
  pub id: UserId,
  pub username: String,
  pub password_hash: String,
  pub created_at: DateTime<Utc>,
}

impl User {
  /// Password hash stored for accounts that nobody can log in to,
  /// like the guest account. It is not a valid PHC string so
  /// verification will always fail.
  pub const UNUSABLE_PASSWORD: &'static str = "!";

  #[must_use]
  pub fn has_usable_password(&self) -> bool {
    self.password_hash != Self::UNUSABLE_PASSWORD
  }

  #[tracing::instrument(skip(conn), name = "db.users.by_id")]
  pub async fn by_id(conn: &mut Connection, id: UserId) -> Result<Option<Self>> {
    sqlx::query_as::<_, Self>(r#"SELECT * FROM "users" WHERE id = $1"#)
      .bind(id)
      .fetch_optional(conn)
      .await
      .into_db_error()
  }

  #[tracing::instrument(skip(conn), name = "db.users.by_username")]
  pub async fn by_username(conn: &mut Connection, username: &str) -> Result<Option<Self>> {
    sqlx::query_as::<_, Self>(r#"SELECT * FROM "users" WHERE username = $1"#)
      .bind(username)
      .fetch_optional(conn)
      .await
      .into_db_error()
  }

  /// Inserts a new user. Returns `None` if the username is already taken.
  #[tracing::instrument(skip(conn, password_hash), name = "db.users.insert")]
  pub async fn insert(
    conn: &mut Connection,
    username: &str,
    password_hash: &str,
  ) -> Result<Option<Self>> {
    sqlx::query_as::<_, Self>(
      r#"INSERT INTO "users" (username, password_hash)
         VALUES ($1, $2)
         ON CONFLICT (username) DO NOTHING
         RETURNING *"#,
    )
    .bind(username)
    .bind(password_hash)
    .fetch_optional(conn)
    .await
    .into_db_error()
  }

  #[tracing::instrument(skip(conn, password_hash), name = "db.users.get_or_insert")]
  pub async fn get_or_insert(
    conn: &mut Connection,
    username: &str,
    password_hash: &str,
  ) -> Result<Self> {
    if let Some(user) = Self::insert(conn, username, password_hash).await? {
      return Ok(user);
    }
    sqlx::query_as::<_, Self>(r#"SELECT * FROM "users" WHERE username = $1"#)
      .bind(username)
      .fetch_one(conn)
      .await
      .into_db_error()
  }

  /// All-time karma of a user.
  #[tracing::instrument(skip(conn), name = "db.users.karma")]
  pub async fn karma(conn: &mut Connection, id: UserId) -> Result<i64> {
    sqlx::query_scalar::<_, i64>(
      r#"SELECT COALESCE(SUM(points), 0)::INT8 FROM "karma_transactions" WHERE user_id = $1"#,
    )
    .bind(id)
    .fetch_one(conn)
    .await
    .into_db_error()
  }
}
