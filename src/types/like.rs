use serde::{Deserialize, Serialize};

/// Response of toggling a like. `success` reflects the new state,
/// `true` if the target is now liked by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct LikeResponse {
  pub success: bool,
}
