use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{comment::CommentNode, id::PostId, user::Author};
use crate::schema;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Post {
  pub id: PostId,
  pub author: Author,
  pub content: String,
  pub created_at: DateTime<Utc>,
  pub like_count: i64,
}

impl From<schema::PostView> for Post {
  fn from(view: schema::PostView) -> Self {
    Self {
      id: view.id,
      author: Author {
        id: view.author_id,
        username: view.author_username,
      },
      content: view.content,
      created_at: view.created_at,
      like_count: view.like_count,
    }
  }
}

/// A post together with the reply tree of its comments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PostDetail {
  #[serde(flatten)]
  pub post: Post,
  pub comments: Vec<CommentNode>,
}
