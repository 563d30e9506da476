use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{Error, Result, Store, Transaction};
use crate::schema::{
  Comment, CommentView, InsertComment, InsertKarma, KarmaTotal, KarmaTransaction, Like,
  LikeTarget, Post, PostView, User,
};
use crate::types::id::{marker::Marker, CommentId, Id, KarmaId, LikeId, PostId, UserId};

/// A [`Store`] that keeps everything in memory.
///
/// Writes are serialized: only one transaction may be alive at a
/// time, no matter which post or comment it touches. It works on a
/// copy of the state that replaces the committed one on commit.
///
/// Reads never wait for a transaction. They see the last committed
/// snapshot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  writer: Arc<Mutex<()>>,
  committed: Arc<RwLock<Arc<State>>>,
}

#[derive(Debug, Clone, Default)]
struct State {
  last_id: u64,
  users: BTreeMap<UserId, User>,
  posts: BTreeMap<PostId, Post>,
  comments: BTreeMap<CommentId, Comment>,
  likes: BTreeMap<LikeId, Like>,
  karma: BTreeMap<KarmaId, KarmaTransaction>,
}

impl MemoryStore {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Moves the creation time of every karma transaction crediting
  /// `user` back by `by`.
  #[cfg(test)]
  pub(crate) async fn backdate_karma(&self, user: UserId, by: chrono::Duration) {
    let _writer = self.writer.lock().await;
    let mut committed = self.committed.write().unwrap_or_else(PoisonError::into_inner);
    let state = Arc::make_mut(&mut committed);
    for transaction in state.karma.values_mut() {
      if transaction.user_id == user {
        transaction.created_at -= by;
      }
    }
  }

  #[cfg(test)]
  pub(crate) async fn like_count(&self) -> usize {
    self.snapshot().likes.len()
  }

  fn snapshot(&self) -> Arc<State> {
    self
      .committed
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }
}

impl State {
  fn next_id<M: Marker>(&mut self) -> Id<M> {
    self.last_id += 1;
    Id::new(self.last_id)
  }

  fn like_count(&self, target: LikeTarget) -> i64 {
    let count = self
      .likes
      .values()
      .filter(|like| like.target() == Some(target))
      .count();
    i64::try_from(count).unwrap_or(i64::MAX)
  }

  fn post_view(&self, post: &Post) -> Option<PostView> {
    let author = self.users.get(&post.author_id)?;
    Some(PostView {
      id: post.id,
      author_id: post.author_id,
      author_username: author.username.clone(),
      content: post.content.clone(),
      created_at: post.created_at,
      like_count: self.like_count(LikeTarget::Post(post.id)),
    })
  }

  fn comment_view(&self, comment: &Comment) -> Option<CommentView> {
    let author = self.users.get(&comment.author_id)?;
    Some(CommentView {
      id: comment.id,
      author_id: comment.author_id,
      author_username: author.username.clone(),
      post_id: comment.post_id,
      parent_id: comment.parent_id,
      content: comment.content.clone(),
      created_at: comment.created_at,
      like_count: self.like_count(LikeTarget::Comment(comment.id)),
    })
  }

  fn target_author(&self, target: LikeTarget) -> Option<UserId> {
    match target {
      LikeTarget::Post(id) => self.posts.get(&id).map(|v| v.author_id),
      LikeTarget::Comment(id) => self.comments.get(&id).map(|v| v.author_id),
    }
  }

  fn karma_target(transaction: &KarmaTransaction) -> Option<LikeTarget> {
    match (transaction.post_id, transaction.comment_id) {
      (Some(post), None) => Some(LikeTarget::Post(post)),
      (None, Some(comment)) => Some(LikeTarget::Comment(comment)),
      _ => None,
    }
  }
}

#[async_trait]
impl Store for MemoryStore {
  async fn begin(&self) -> Result<Box<dyn Transaction>> {
    let writer = self.writer.clone().lock_owned().await;
    let staged = State::clone(&self.snapshot());
    Ok(Box::new(MemoryTransaction {
      _writer: writer,
      committed: self.committed.clone(),
      staged,
    }))
  }

  async fn user_by_id(&self, id: UserId) -> Result<Option<User>> {
    Ok(self.snapshot().users.get(&id).cloned())
  }

  async fn user_by_name(&self, username: &str) -> Result<Option<User>> {
    let state = self.snapshot();
    Ok(state.users.values().find(|v| v.username == username).cloned())
  }

  async fn karma_of(&self, id: UserId) -> Result<i64> {
    let state = self.snapshot();
    Ok(
      state
        .karma
        .values()
        .filter(|v| v.user_id == id)
        .map(|v| i64::from(v.points))
        .sum(),
    )
  }

  async fn list_posts(
    &self,
    before: Option<PostId>,
    limit: Option<u32>,
  ) -> Result<Vec<PostView>> {
    let state = self.snapshot();
    let mut posts = state
      .posts
      .values()
      .filter(|post| before.map_or(true, |before| post.id < before))
      .filter_map(|post| state.post_view(post))
      .collect::<Vec<_>>();

    posts.sort_by(|a, b| b.id.cmp(&a.id));
    if let Some(limit) = limit {
      posts.truncate(limit as usize);
    }
    Ok(posts)
  }

  async fn post_view(&self, id: PostId) -> Result<Option<PostView>> {
    let state = self.snapshot();
    Ok(state.posts.get(&id).and_then(|post| state.post_view(post)))
  }

  async fn comment_views(&self, post: PostId) -> Result<Vec<CommentView>> {
    let state = self.snapshot();
    let mut comments = state
      .comments
      .values()
      .filter(|comment| comment.post_id == post)
      .filter_map(|comment| state.comment_view(comment))
      .collect::<Vec<_>>();

    comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    Ok(comments)
  }

  async fn comment_view(&self, id: CommentId) -> Result<Option<CommentView>> {
    let state = self.snapshot();
    Ok(
      state
        .comments
        .get(&id)
        .and_then(|comment| state.comment_view(comment)),
    )
  }

  async fn karma_totals(
    &self,
    since: Option<DateTime<Utc>>,
    limit: u32,
  ) -> Result<Vec<KarmaTotal>> {
    let state = self.snapshot();

    let mut sums: HashMap<UserId, i64> = HashMap::new();
    for transaction in state.karma.values() {
      if since.map_or(true, |since| transaction.created_at >= since) {
        *sums.entry(transaction.user_id).or_default() += i64::from(transaction.points);
      }
    }

    let mut totals = sums
      .into_iter()
      .filter_map(|(user_id, karma)| {
        let user = state.users.get(&user_id)?;
        Some(KarmaTotal {
          user_id,
          username: user.username.clone(),
          karma,
        })
      })
      .collect::<Vec<_>>();

    totals.sort_by(|a, b| b.karma.cmp(&a.karma).then(a.user_id.cmp(&b.user_id)));
    totals.truncate(limit as usize);
    Ok(totals)
  }

  fn is_healthy(&self) -> bool {
    true
  }
}

struct MemoryTransaction {
  _writer: OwnedMutexGuard<()>,
  committed: Arc<RwLock<Arc<State>>>,
  staged: State,
}

#[async_trait]
impl Transaction for MemoryTransaction {
  async fn insert_user(&mut self, username: &str, password_hash: &str) -> Result<Option<User>> {
    let state = &mut self.staged;
    if state.users.values().any(|v| v.username == username) {
      return Ok(None);
    }

    let user = User {
      id: state.next_id(),
      username: username.to_string(),
      password_hash: password_hash.to_string(),
      created_at: Utc::now(),
    };
    state.users.insert(user.id, user.clone());
    Ok(Some(user))
  }

  async fn get_or_create_user(&mut self, username: &str, password_hash: &str) -> Result<User> {
    if let Some(user) = self.insert_user(username, password_hash).await? {
      return Ok(user);
    }

    self
      .staged
      .users
      .values()
      .find(|v| v.username == username)
      .cloned()
      .ok_or_else(|| error_stack::Report::new(Error::Internal(sqlx::Error::RowNotFound)))
  }

  async fn post_by_id(&mut self, id: PostId) -> Result<Option<Post>> {
    Ok(self.staged.posts.get(&id).cloned())
  }

  async fn insert_post(&mut self, author: UserId, content: &str) -> Result<Post> {
    let state = &mut self.staged;
    let post = Post {
      id: state.next_id(),
      author_id: author,
      content: content.to_string(),
      created_at: Utc::now(),
    };
    state.posts.insert(post.id, post.clone());
    Ok(post)
  }

  async fn comment_by_id(&mut self, id: CommentId) -> Result<Option<Comment>> {
    Ok(self.staged.comments.get(&id).cloned())
  }

  async fn comment_depth(&mut self, id: CommentId) -> Result<u32> {
    let mut depth = 0;
    let mut current = self.staged.comments.get(&id).and_then(|v| v.parent_id);
    while let Some(parent) = current {
      depth += 1;
      current = self.staged.comments.get(&parent).and_then(|v| v.parent_id);
    }
    Ok(depth)
  }

  async fn insert_comment(&mut self, form: InsertComment<'_>) -> Result<Comment> {
    let state = &mut self.staged;
    let comment = Comment {
      id: state.next_id(),
      author_id: form.author_id,
      post_id: form.post_id,
      parent_id: form.parent_id,
      content: form.content.to_string(),
      created_at: Utc::now(),
    };
    state.comments.insert(comment.id, comment.clone());
    Ok(comment)
  }

  async fn lock_target(&mut self, target: LikeTarget) -> Result<Option<UserId>> {
    Ok(self.staged.target_author(target))
  }

  async fn find_or_create_like(
    &mut self,
    user: UserId,
    target: LikeTarget,
  ) -> Result<(Like, bool)> {
    let state = &mut self.staged;
    let existing = state
      .likes
      .values()
      .find(|like| like.user_id == user && like.target() == Some(target));

    if let Some(like) = existing {
      return Ok((like.clone(), false));
    }

    let like = Like {
      id: state.next_id(),
      user_id: user,
      post_id: target.post_id(),
      comment_id: target.comment_id(),
      created_at: Utc::now(),
    };
    state.likes.insert(like.id, like.clone());
    Ok((like, true))
  }

  async fn delete_like(&mut self, id: LikeId) -> Result<()> {
    self.staged.likes.remove(&id);
    Ok(())
  }

  async fn insert_karma(&mut self, form: InsertKarma) -> Result<KarmaTransaction> {
    let state = &mut self.staged;
    let transaction = KarmaTransaction {
      id: state.next_id(),
      user_id: form.recipient,
      points: form.points,
      created_at: Utc::now(),
      post_id: form.target.post_id(),
      comment_id: form.target.comment_id(),
    };
    state.karma.insert(transaction.id, transaction.clone());
    Ok(transaction)
  }

  async fn revoke_karma(
    &mut self,
    recipient: UserId,
    target: LikeTarget,
  ) -> Result<Option<KarmaTransaction>> {
    let state = &mut self.staged;
    let id = state
      .karma
      .values()
      .find(|v| v.user_id == recipient && State::karma_target(v) == Some(target))
      .map(|v| v.id);

    Ok(id.and_then(|id| state.karma.remove(&id)))
  }

  async fn commit(self: Box<Self>) -> Result<()> {
    let Self {
      _writer,
      committed,
      staged,
    } = *self;
    *committed.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(staged);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;

  #[tokio::test]
  async fn dropped_transactions_are_rolled_back() {
    let store = MemoryStore::new();

    let mut tx = store.begin().await.unwrap();
    tx.insert_user("alice", User::UNUSABLE_PASSWORD)
      .await
      .unwrap();
    drop(tx);

    assert!(store.user_by_name("alice").await.unwrap().is_none());

    let mut tx = store.begin().await.unwrap();
    let alice = tx
      .insert_user("alice", User::UNUSABLE_PASSWORD)
      .await
      .unwrap()
      .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(store.user_by_id(alice.id).await.unwrap(), Some(alice));
  }

  #[tokio::test]
  async fn reads_do_not_wait_for_open_transactions() {
    let store = MemoryStore::new();

    let mut tx = store.begin().await.unwrap();
    tx.insert_user("alice", User::UNUSABLE_PASSWORD)
      .await
      .unwrap();

    let read = tokio::time::timeout(Duration::from_secs(5), store.user_by_name("alice"))
      .await
      .expect("read waited for the open transaction")
      .unwrap();
    assert!(read.is_none());

    tx.commit().await.unwrap();
    assert!(store.user_by_name("alice").await.unwrap().is_some());
  }

  #[tokio::test]
  async fn usernames_are_unique() {
    let store = MemoryStore::new();
    let mut tx = store.begin().await.unwrap();
    let first = tx.insert_user("bob", "!").await.unwrap();
    let second = tx.insert_user("bob", "!").await.unwrap();
    assert!(first.is_some());
    assert!(second.is_none());

    let existing = tx.get_or_create_user("bob", "!").await.unwrap();
    assert_eq!(Some(existing), first);
  }

  #[tokio::test]
  async fn comment_depth_counts_ancestors() {
    let store = MemoryStore::new();
    let mut tx = store.begin().await.unwrap();
    let user = tx.insert_user("carol", "!").await.unwrap().unwrap();
    let post = tx.insert_post(user.id, "hello").await.unwrap();

    let mut parent = None;
    let mut ids = Vec::new();
    for _ in 0..3 {
      let comment = tx
        .insert_comment(InsertComment {
          author_id: user.id,
          post_id: post.id,
          parent_id: parent,
          content: "reply",
        })
        .await
        .unwrap();
      parent = Some(comment.id);
      ids.push(comment.id);
    }

    assert_eq!(tx.comment_depth(ids[0]).await.unwrap(), 0);
    assert_eq!(tx.comment_depth(ids[2]).await.unwrap(), 2);
  }

  #[tokio::test]
  async fn revoke_karma_removes_one_transaction() {
    let store = MemoryStore::new();
    let mut tx = store.begin().await.unwrap();
    let user = tx.insert_user("dave", "!").await.unwrap().unwrap();
    let post = tx.insert_post(user.id, "hello").await.unwrap();
    let target = LikeTarget::Post(post.id);

    for _ in 0..2 {
      tx.insert_karma(InsertKarma {
        recipient: user.id,
        target,
        points: target.reward(),
      })
      .await
      .unwrap();
    }

    assert!(tx.revoke_karma(user.id, target).await.unwrap().is_some());
    tx.commit().await.unwrap();

    assert_eq!(store.karma_of(user.id).await.unwrap(), 5);
  }
}
