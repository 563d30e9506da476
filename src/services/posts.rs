use thiserror::Error;
use validator::ValidateError;

use crate::config;
use crate::error::{Error, Result};
use crate::schema::User;
use crate::services::build_comment_tree;
use crate::types::{
  id::PostId,
  post::{Post, PostDetail},
  user::Author,
  validation::check_content,
};
use crate::App;

#[derive(Debug)]
pub struct CreatePost<'a> {
  pub content: &'a str,
}

impl CreatePost<'_> {
  #[tracing::instrument(skip_all, fields(user.id = %author.id), name = "services.posts.create")]
  pub async fn perform(self, app: &App, author: &User) -> Result<Post> {
    let mut fields = ValidateError::field_builder();
    fields.insert(
      "content",
      check_content(self.content, app.config.posts.max_content_chars.get()),
    );
    fields.build().into_result()?;

    app.ensure_writable()?;

    let mut tx = app.store().begin().await?;
    let post = tx.insert_post(author.id, self.content).await?;
    tx.commit().await?;

    Ok(Post {
      id: post.id,
      author: Author::from(author),
      content: post.content,
      created_at: post.created_at,
      like_count: 0,
    })
  }
}

/// Posts from newest to oldest. Every post is listed unless
/// `limit` is set.
#[derive(Debug, Default)]
pub struct ListPosts {
  /// Only lists posts older than this one.
  pub before: Option<PostId>,
  /// Clamped between 1 and [`config::Posts::LIST_MAX_LIMIT`].
  pub limit: Option<u32>,
}

impl ListPosts {
  #[tracing::instrument(skip(app), name = "services.posts.list")]
  pub async fn perform(self, app: &App) -> Result<Vec<Post>> {
    let limit = self
      .limit
      .map(|limit| limit.clamp(1, config::Posts::LIST_MAX_LIMIT));

    let posts = app.store().list_posts(self.before, limit).await?;
    Ok(posts.into_iter().map(Post::from).collect())
  }
}

#[derive(Debug, Error)]
#[error("Post not found")]
struct PostNotFound;

#[derive(Debug)]
pub struct GetPost {
  pub id: PostId,
}

impl GetPost {
  #[tracing::instrument(skip(app), name = "services.posts.get")]
  pub async fn perform(self, app: &App) -> Result<PostDetail> {
    let Some(post) = app.store().post_view(self.id).await? else {
      return Err(Error::not_found(PostNotFound));
    };

    let comments = app.store().comment_views(self.id).await?;
    Ok(PostDetail {
      post: Post::from(post),
      comments: build_comment_tree(comments),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::schema::LikeTarget;
  use crate::test_utils::{self, TestResultExt};
  use crate::types;

  #[tokio::test]
  async fn rejects_empty_content() {
    let (app, _) = test_utils::build_test_app();
    let alice = test_utils::create_user(&app, "alice").await;

    for content in ["", "   \n\t"] {
      let error = CreatePost { content }
        .perform(&app, &alice)
        .await
        .expect_error_type();

      match error {
        types::Error::InvalidFormBody(error) => assert!(error.field("content").is_some()),
        error => panic!("unexpected error: {error:?}"),
      }
    }
  }

  #[tokio::test]
  async fn rejects_content_over_the_limit() {
    let (app, _) = test_utils::build_test_app_with(|config| {
      config.posts.max_content_chars = std::num::NonZeroUsize::new(5).unwrap();
    });
    let alice = test_utils::create_user(&app, "alice").await;

    let error = CreatePost {
      content: "I'm a weirdo. #weirdo",
    }
    .perform(&app, &alice)
    .await
    .expect_error_type();
    assert!(matches!(error, types::Error::InvalidFormBody(..)));

    CreatePost { content: "héllo" }
      .perform(&app, &alice)
      .await
      .unwrap();
  }

  #[tokio::test]
  async fn lists_newest_first() {
    let (app, _) = test_utils::build_test_app();
    let alice = test_utils::create_user(&app, "alice").await;

    let mut ids = Vec::new();
    for n in 0..3 {
      ids.push(test_utils::create_post(&app, &alice, &format!("post {n}")).await.id);
    }

    let posts = ListPosts::default().perform(&app).await.unwrap();
    let listed = posts.iter().map(|v| v.id).collect::<Vec<_>>();
    assert_eq!(listed, vec![ids[2], ids[1], ids[0]]);
    assert!(posts.iter().all(|v| v.author.username == "alice"));

    let posts = ListPosts {
      before: Some(ids[2]),
      limit: Some(1),
    }
    .perform(&app)
    .await
    .unwrap();
    let listed = posts.iter().map(|v| v.id).collect::<Vec<_>>();
    assert_eq!(listed, vec![ids[1]]);
  }

  #[tokio::test]
  async fn lists_every_post_unless_limited() {
    let (app, _) = test_utils::build_test_app();
    let alice = test_utils::create_user(&app, "alice").await;
    for n in 0..120 {
      test_utils::create_post(&app, &alice, &format!("post {n}")).await;
    }

    let posts = ListPosts::default().perform(&app).await.unwrap();
    assert_eq!(posts.len(), 120);

    let posts = ListPosts {
      before: None,
      limit: Some(500),
    }
    .perform(&app)
    .await
    .unwrap();
    assert_eq!(posts.len(), config::Posts::LIST_MAX_LIMIT as usize);

    // pages chained with `before` cover every post exactly once
    let mut seen = Vec::new();
    let mut before = None;
    loop {
      let page = ListPosts {
        before,
        limit: Some(7),
      }
      .perform(&app)
      .await
      .unwrap();
      let Some(last) = page.last() else { break };
      before = Some(last.id);
      seen.extend(page.iter().map(|v| v.id));
    }
    let all = posts_ids(&ListPosts::default().perform(&app).await.unwrap());
    assert_eq!(seen, all);
  }

  fn posts_ids(posts: &[Post]) -> Vec<PostId> {
    posts.iter().map(|v| v.id).collect()
  }

  #[tokio::test]
  async fn gets_post_with_comment_tree() {
    let (app, _) = test_utils::build_test_app();
    let alice = test_utils::create_user(&app, "alice").await;
    let bob = test_utils::create_user(&app, "bob").await;

    let post = test_utils::create_post(&app, &alice, "hello").await;
    let c1 = test_utils::create_comment(&app, &bob, post.id, None, "first").await;
    let c2 = test_utils::create_comment(&app, &alice, post.id, Some(c1.id), "reply").await;
    test_utils::toggle(&app, &bob, LikeTarget::Post(post.id)).await;

    let detail = GetPost { id: post.id }.perform(&app).await.unwrap();
    assert_eq!(detail.post.like_count, 1);
    assert_eq!(detail.comments.len(), 1);
    assert_eq!(detail.comments[0].id, c1.id);
    assert_eq!(detail.comments[0].replies.len(), 1);
    assert_eq!(detail.comments[0].replies[0].id, c2.id);
  }

  #[tokio::test]
  async fn missing_posts_are_not_found() {
    let (app, _) = test_utils::build_test_app();
    let error = GetPost {
      id: PostId::new(404),
    }
    .perform(&app)
    .await
    .expect_error_type();
    assert_eq!(error, types::Error::NotFound);
  }
}
