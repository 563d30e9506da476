use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::migrations::{self, MigrationError};
use super::{ErrorExt, ErrorExt2, Pool, PoolConnection, Result, Store, Transaction};
use crate::config;
use crate::schema::{
  Comment, CommentView, InsertComment, InsertKarma, KarmaTotal, KarmaTransaction, Like,
  LikeTarget, Post, PostView, User,
};
use crate::types::id::{CommentId, LikeId, PostId, UserId};

/// PostgreSQL backed [`Store`]. Writes always go to the primary pool,
/// reads go to the replica if there's one and it is healthy.
#[derive(Debug, Clone)]
pub struct PgStore {
  primary: Pool,
  replica: Option<Pool>,
}

impl PgStore {
  #[tracing::instrument(skip_all, name = "db.connect_store")]
  pub async fn connect(cfg: &config::Database) -> Result<Self> {
    let primary = Pool::new(cfg, &cfg.primary).await?;
    let replica = if let Some(replica) = cfg.replica.as_ref() {
      Some(Pool::new(cfg, replica).await?)
    } else {
      None
    };

    if cfg.primary.readonly {
      tracing::warn!("primary database is in read-only mode, every write will be rejected");
    }

    Ok(Self { primary, replica })
  }

  #[cfg(test)]
  pub(crate) fn from_pool(primary: Pool) -> Self {
    Self {
      primary,
      replica: None,
    }
  }

  #[must_use]
  pub fn primary(&self) -> &Pool {
    &self.primary
  }

  pub async fn run_migrations(&self) -> error_stack::Result<(), MigrationError> {
    migrations::run_pending(&self.primary).await
  }

  #[tracing::instrument(skip_all)]
  async fn db_read(&self) -> Result<PoolConnection> {
    if let Some(replica) = self.replica.as_ref() {
      match replica.get().await {
        Ok(conn) => return Ok(conn),
        // fallback
        Err(err) if err.is_unhealthy() => {}
        Err(err) => return Err(err),
      }
    }
    self.primary.get().await
  }
}

#[async_trait]
impl Store for PgStore {
  async fn begin(&self) -> Result<Box<dyn Transaction>> {
    let inner = self.primary.begin().await?;
    Ok(Box::new(PgTransaction { inner }))
  }

  async fn user_by_id(&self, id: UserId) -> Result<Option<User>> {
    let mut conn = self.db_read().await?;
    User::by_id(&mut conn, id).await
  }

  async fn user_by_name(&self, username: &str) -> Result<Option<User>> {
    let mut conn = self.db_read().await?;
    User::by_username(&mut conn, username).await
  }

  async fn karma_of(&self, id: UserId) -> Result<i64> {
    let mut conn = self.db_read().await?;
    User::karma(&mut conn, id).await
  }

  async fn list_posts(
    &self,
    before: Option<PostId>,
    limit: Option<u32>,
  ) -> Result<Vec<PostView>> {
    let mut conn = self.db_read().await?;
    PostView::list(&mut conn, before, limit).await
  }

  async fn post_view(&self, id: PostId) -> Result<Option<PostView>> {
    let mut conn = self.db_read().await?;
    PostView::find(&mut conn, id).await
  }

  async fn comment_views(&self, post: PostId) -> Result<Vec<CommentView>> {
    let mut conn = self.db_read().await?;
    CommentView::list_by_post(&mut conn, post).await
  }

  async fn comment_view(&self, id: CommentId) -> Result<Option<CommentView>> {
    let mut conn = self.db_read().await?;
    CommentView::find(&mut conn, id).await
  }

  async fn karma_totals(
    &self,
    since: Option<DateTime<Utc>>,
    limit: u32,
  ) -> Result<Vec<KarmaTotal>> {
    let mut conn = self.db_read().await?;
    KarmaTotal::list(&mut conn, since, limit).await
  }

  fn is_healthy(&self) -> bool {
    self.primary.is_healthy()
  }
}

struct PgTransaction {
  inner: sqlx::Transaction<'static, sqlx::Postgres>,
}

#[async_trait]
impl Transaction for PgTransaction {
  async fn insert_user(&mut self, username: &str, password_hash: &str) -> Result<Option<User>> {
    User::insert(&mut self.inner, username, password_hash).await
  }

  async fn get_or_create_user(&mut self, username: &str, password_hash: &str) -> Result<User> {
    User::get_or_insert(&mut self.inner, username, password_hash).await
  }

  async fn post_by_id(&mut self, id: PostId) -> Result<Option<Post>> {
    Post::by_id(&mut self.inner, id).await
  }

  async fn insert_post(&mut self, author: UserId, content: &str) -> Result<Post> {
    Post::insert(&mut self.inner, author, content).await
  }

  async fn comment_by_id(&mut self, id: CommentId) -> Result<Option<Comment>> {
    Comment::by_id(&mut self.inner, id).await
  }

  async fn comment_depth(&mut self, id: CommentId) -> Result<u32> {
    Comment::depth(&mut self.inner, id).await
  }

  async fn insert_comment(&mut self, form: InsertComment<'_>) -> Result<Comment> {
    Comment::insert(&mut self.inner, form).await
  }

  async fn lock_target(&mut self, target: LikeTarget) -> Result<Option<UserId>> {
    target.lock_for_update(&mut self.inner).await
  }

  async fn find_or_create_like(
    &mut self,
    user: UserId,
    target: LikeTarget,
  ) -> Result<(Like, bool)> {
    Like::find_or_insert(&mut self.inner, user, target).await
  }

  async fn delete_like(&mut self, id: LikeId) -> Result<()> {
    Like::delete(&mut self.inner, id).await
  }

  async fn insert_karma(&mut self, form: InsertKarma) -> Result<KarmaTransaction> {
    KarmaTransaction::insert(&mut self.inner, form).await
  }

  async fn revoke_karma(
    &mut self,
    recipient: UserId,
    target: LikeTarget,
  ) -> Result<Option<KarmaTransaction>> {
    KarmaTransaction::revoke(&mut self.inner, recipient, target).await
  }

  #[tracing::instrument(skip_all, name = "db.transaction.commit")]
  async fn commit(self: Box<Self>) -> Result<()> {
    self.inner.commit().await.into_db_error()
  }
}
