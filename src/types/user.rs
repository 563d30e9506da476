use serde::{Deserialize, Serialize};

use crate::{schema, types::id::UserId};

/// Public information of a user attached to posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Author {
  pub id: UserId,
  pub username: String,
}

impl From<&schema::User> for Author {
  fn from(user: &schema::User) -> Self {
    Self {
      id: user.id,
      username: user.username.clone(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
  pub id: UserId,
  pub username: String,
  pub karma: i64,
}
