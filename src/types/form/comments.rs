use serde::Deserialize;

use crate::types::id::{CommentId, PostId};

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
  pub post: PostId,
  #[serde(default)]
  pub parent: Option<CommentId>,
  pub content: String,
}
