use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{id::CommentId, user::Author};
use crate::schema;

/// A comment with its direct replies, each of them carrying
/// their own replies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CommentNode {
  pub id: CommentId,
  pub author: Author,
  pub content: String,
  pub created_at: DateTime<Utc>,
  pub like_count: i64,
  pub replies: Vec<CommentNode>,
}

impl CommentNode {
  #[must_use]
  pub fn new(view: schema::CommentView, replies: Vec<CommentNode>) -> Self {
    Self {
      id: view.id,
      author: Author {
        id: view.author_id,
        username: view.author_username,
      },
      content: view.content,
      created_at: view.created_at,
      like_count: view.like_count,
      replies,
    }
  }
}
