//! Storage of the feed.
//!
//! Every service talks to the storage through [`Store`] and, for
//! anything that writes, a [`Transaction`] begun from it. Two stores
//! are available: [`PgStore`] backed by PostgreSQL and [`MemoryStore`]
//! which keeps everything in the process (used for tests and demos).
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::schema::{
  Comment, CommentView, InsertComment, InsertKarma, KarmaTotal, KarmaTransaction, Like,
  LikeTarget, Post, PostView, User,
};
use crate::types::id::{CommentId, LikeId, PostId, UserId};

mod error;
mod memory;
mod pool;
mod postgres;

#[cfg(test)]
pub(crate) mod testing;

pub mod migrations;

pub use error::*;
pub use memory::MemoryStore;
pub use pool::Pool;
pub use postgres::PgStore;

pub type PoolConnection = sqlx::pool::PoolConnection<sqlx::Postgres>;
pub type Connection = sqlx::PgConnection;

/// Read access to the storage, and the entrypoint for writes
/// with [`Store::begin`].
#[async_trait]
pub trait Store: Send + Sync + 'static {
  /// Begins a new transaction. Every change made with it is discarded
  /// unless [`Transaction::commit`] is called.
  async fn begin(&self) -> Result<Box<dyn Transaction>>;

  async fn user_by_id(&self, id: UserId) -> Result<Option<User>>;
  async fn user_by_name(&self, username: &str) -> Result<Option<User>>;

  /// All-time karma of a user.
  async fn karma_of(&self, id: UserId) -> Result<i64>;

  /// Posts from newest to oldest ID, only with IDs lower than `before`
  /// if it is set. Every post is listed without a limit.
  async fn list_posts(
    &self,
    before: Option<PostId>,
    limit: Option<u32>,
  ) -> Result<Vec<PostView>>;
  async fn post_view(&self, id: PostId) -> Result<Option<PostView>>;

  /// Every comment of a post from oldest to newest.
  async fn comment_views(&self, post: PostId) -> Result<Vec<CommentView>>;
  async fn comment_view(&self, id: CommentId) -> Result<Option<CommentView>>;

  /// Karma sums per user from transactions created at or after
  /// `since`, highest first. Ties are ordered by user ID.
  async fn karma_totals(
    &self,
    since: Option<DateTime<Utc>>,
    limit: u32,
  ) -> Result<Vec<KarmaTotal>>;

  fn is_healthy(&self) -> bool;

  fn name(&self) -> &'static str {
    std::any::type_name::<Self>()
  }
}

/// A unit of work against the storage. Dropping it without
/// committing rolls back every change made through it.
#[async_trait]
pub trait Transaction: Send {
  /// Returns `None` if the username is already taken.
  async fn insert_user(&mut self, username: &str, password_hash: &str) -> Result<Option<User>>;
  async fn get_or_create_user(&mut self, username: &str, password_hash: &str) -> Result<User>;

  async fn post_by_id(&mut self, id: PostId) -> Result<Option<Post>>;
  async fn insert_post(&mut self, author: UserId, content: &str) -> Result<Post>;

  async fn comment_by_id(&mut self, id: CommentId) -> Result<Option<Comment>>;
  /// Number of ancestors of a comment.
  async fn comment_depth(&mut self, id: CommentId) -> Result<u32>;
  async fn insert_comment(&mut self, form: InsertComment<'_>) -> Result<Comment>;

  /// Locks the target so concurrent toggles on it are serialized
  /// and returns its author, `None` if the target does not exist.
  async fn lock_target(&mut self, target: LikeTarget) -> Result<Option<UserId>>;

  /// The boolean is `true` if the like has been created.
  async fn find_or_create_like(&mut self, user: UserId, target: LikeTarget)
    -> Result<(Like, bool)>;
  async fn delete_like(&mut self, id: LikeId) -> Result<()>;

  async fn insert_karma(&mut self, form: InsertKarma) -> Result<KarmaTransaction>;
  /// Removes one karma transaction crediting `recipient` for `target`.
  async fn revoke_karma(
    &mut self,
    recipient: UserId,
    target: LikeTarget,
  ) -> Result<Option<KarmaTransaction>>;

  async fn commit(self: Box<Self>) -> Result<()>;
}
