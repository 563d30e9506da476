use validator::ValidateError;

use crate::error::Result;
use crate::schema::{InsertComment, User};
use crate::types::{
  comment::CommentNode,
  id::{CommentId, PostId},
  user::Author,
  validation::check_content,
};
use crate::App;

/// Comments on a post, or replies to `parent` if it is set.
///
/// The parent has to belong to the same post and may not already be
/// at the maximum nesting depth (`comments.max_depth`).
#[derive(Debug)]
pub struct CreateComment<'a> {
  pub post: PostId,
  pub parent: Option<CommentId>,
  pub content: &'a str,
}

impl CreateComment<'_> {
  #[tracing::instrument(skip_all, fields(user.id = %author.id, post.id = %self.post), name = "services.comments.create")]
  pub async fn perform(self, app: &App, author: &User) -> Result<CommentNode> {
    let config = &app.config.comments;

    let mut fields = ValidateError::field_builder();
    fields.insert(
      "content",
      check_content(self.content, config.max_content_chars.get()),
    );

    app.ensure_writable()?;
    let mut tx = app.store().begin().await?;

    if tx.post_by_id(self.post).await?.is_none() {
      fields.insert_message("post", "Post does not exist");
    } else if let Some(parent_id) = self.parent {
      match tx.comment_by_id(parent_id).await? {
        Some(parent) if parent.post_id == self.post => {
          let depth = tx.comment_depth(parent.id).await?;
          if depth >= config.max_depth {
            fields.insert_message(
              "parent",
              format!("Replies cannot be nested deeper than {}", config.max_depth),
            );
          }
        }
        _ => fields.insert_message("parent", "Parent comment does not exist in this post"),
      }
    }
    fields.build().into_result()?;

    let comment = tx
      .insert_comment(InsertComment {
        author_id: author.id,
        post_id: self.post,
        parent_id: self.parent,
        content: self.content,
      })
      .await?;
    tx.commit().await?;

    Ok(CommentNode {
      id: comment.id,
      author: Author::from(author),
      content: comment.content,
      created_at: comment.created_at,
      like_count: 0,
      replies: Vec::new(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{self, TestResultExt};
  use crate::types;

  fn expect_field_error(error: types::Error, field: &str) {
    match error {
      types::Error::InvalidFormBody(error) => {
        assert!(error.field(field).is_some(), "{field} has no error: {error:?}");
      }
      error => panic!("unexpected error: {error:?}"),
    }
  }

  #[tokio::test]
  async fn creates_replies() {
    let (app, _) = test_utils::build_test_app();
    let alice = test_utils::create_user(&app, "alice").await;
    let post = test_utils::create_post(&app, &alice, "hello").await;

    let c1 = test_utils::create_comment(&app, &alice, post.id, None, "top").await;
    let c2 = test_utils::create_comment(&app, &alice, post.id, Some(c1.id), "reply").await;

    let view = app.store().comment_view(c2.id).await.unwrap().unwrap();
    assert_eq!(view.parent_id, Some(c1.id));
    assert_eq!(view.post_id, post.id);
    assert_eq!(c2.author.username, "alice");
  }

  #[tokio::test]
  async fn rejects_parents_from_other_posts() {
    let (app, _) = test_utils::build_test_app();
    let alice = test_utils::create_user(&app, "alice").await;
    let first = test_utils::create_post(&app, &alice, "first").await;
    let second = test_utils::create_post(&app, &alice, "second").await;
    let comment = test_utils::create_comment(&app, &alice, first.id, None, "on first").await;

    let error = CreateComment {
      post: second.id,
      parent: Some(comment.id),
      content: "sneaky",
    }
    .perform(&app, &alice)
    .await
    .expect_error_type();
    expect_field_error(error, "parent");

    let error = CreateComment {
      post: second.id,
      parent: Some(CommentId::new(9999)),
      content: "ghost",
    }
    .perform(&app, &alice)
    .await
    .expect_error_type();
    expect_field_error(error, "parent");
  }

  #[tokio::test]
  async fn rejects_missing_posts() {
    let (app, _) = test_utils::build_test_app();
    let alice = test_utils::create_user(&app, "alice").await;

    let error = CreateComment {
      post: PostId::new(9999),
      parent: None,
      content: "anyone?",
    }
    .perform(&app, &alice)
    .await
    .expect_error_type();
    expect_field_error(error, "post");
  }

  #[tokio::test]
  async fn rejects_replies_past_the_depth_limit() {
    let (app, _) = test_utils::build_test_app_with(|config| {
      config.comments.max_depth = 2;
    });
    let alice = test_utils::create_user(&app, "alice").await;
    let post = test_utils::create_post(&app, &alice, "hello").await;

    let c0 = test_utils::create_comment(&app, &alice, post.id, None, "depth 0").await;
    let c1 = test_utils::create_comment(&app, &alice, post.id, Some(c0.id), "depth 1").await;
    let c2 = test_utils::create_comment(&app, &alice, post.id, Some(c1.id), "depth 2").await;

    let error = CreateComment {
      post: post.id,
      parent: Some(c2.id),
      content: "depth 3",
    }
    .perform(&app, &alice)
    .await
    .expect_error_type();
    expect_field_error(error, "parent");
  }

  #[tokio::test]
  async fn rejects_empty_content() {
    let (app, _) = test_utils::build_test_app();
    let alice = test_utils::create_user(&app, "alice").await;
    let post = test_utils::create_post(&app, &alice, "hello").await;

    let error = CreateComment {
      post: post.id,
      parent: None,
      content: " ",
    }
    .perform(&app, &alice)
    .await
    .expect_error_type();
    expect_field_error(error, "content");
  }
}
