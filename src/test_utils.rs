use crate::{
  auth::Claims,
  config,
  database::{MemoryStore, Store},
  schema::{LikeTarget, User},
  services::{CreateComment, CreatePost, ToggleLike},
  types::{self, comment::CommentNode, id::CommentId, id::PostId, post::Post},
  App,
};

/// Builds an [`App`] backed by a fresh [`MemoryStore`], also returned
/// to inspect or tweak the stored data directly.
pub fn build_test_app() -> (App, MemoryStore) {
  build_test_app_with(|_| {})
}

pub fn build_test_app_with(tweak: impl FnOnce(&mut config::Server)) -> (App, MemoryStore) {
  crate::logging::init_for_tests();

  let mut config = config::Server::for_tests();
  tweak(&mut config);

  let store = MemoryStore::new();
  let app = App::with_store(config, store.clone());
  (app, store)
}

/// Creates a user that cannot log in.
pub async fn create_user(app: &App, name: &str) -> User {
  let mut tx = app.store().begin().await.unwrap();
  let user = tx
    .insert_user(name, User::UNUSABLE_PASSWORD)
    .await
    .unwrap()
    .unwrap_or_else(|| panic!("user {name:?} already exists"));
  tx.commit().await.unwrap();
  user
}

pub fn token_for(app: &App, user: &User) -> String {
  Claims::new(user.id, &app.config.auth)
    .encode(&app.config.auth)
    .unwrap()
}

pub async fn create_post(app: &App, author: &User, content: &str) -> Post {
  CreatePost { content }.perform(app, author).await.unwrap()
}

pub async fn create_comment(
  app: &App,
  author: &User,
  post: PostId,
  parent: Option<CommentId>,
  content: &str,
) -> CommentNode {
  CreateComment {
    post,
    parent,
    content,
  }
  .perform(app, author)
  .await
  .unwrap()
}

pub async fn toggle(app: &App, user: &User, target: LikeTarget) -> bool {
  ToggleLike { target }
    .perform(app, user)
    .await
    .unwrap()
    .is_liked()
}

pub async fn karma_of(app: &App, user: &User) -> i64 {
  app.store().karma_of(user.id).await.unwrap()
}

pub trait TestResultExt {
  /// Unwraps the error and returns its kind.
  fn expect_error_type(self) -> types::Error;
}

impl<T: std::fmt::Debug> TestResultExt for Result<T, crate::error::Error> {
  #[track_caller]
  fn expect_error_type(self) -> types::Error {
    match self {
      Ok(value) => panic!("expected an error, got {value:?}"),
      Err(error) => error.into_type(),
    }
  }
}
