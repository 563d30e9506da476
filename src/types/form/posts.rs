use serde::Deserialize;

use crate::types::id::PostId;

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
  pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
  pub before: Option<PostId>,
  pub limit: Option<u32>,
}
