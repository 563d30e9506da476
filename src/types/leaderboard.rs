use serde::{Deserialize, Serialize};

use super::id::UserId;
use crate::schema::KarmaTotal;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LeaderboardEntry {
  pub user_id: UserId,
  pub username: String,
  pub karma: i64,
}

impl From<KarmaTotal> for LeaderboardEntry {
  fn from(total: KarmaTotal) -> Self {
    Self {
      user_id: total.user_id,
      username: total.username,
      karma: total.karma,
    }
  }
}
