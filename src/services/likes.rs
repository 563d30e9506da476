use thiserror::Error;

use crate::error::{Error, Result};
use crate::schema::{InsertKarma, LikeTarget, User};
use crate::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeOutcome {
  Liked,
  Unliked,
}

impl LikeOutcome {
  #[must_use]
  pub const fn is_liked(self) -> bool {
    matches!(self, Self::Liked)
  }
}

#[derive(Debug, Error)]
#[error("Like target does not exist")]
struct TargetNotFound;

/// Likes the target if the user has not liked it yet, otherwise takes
/// the like back.
///
/// Liking credits the author of the target with [`LikeTarget::reward`]
/// karma points and unliking revokes them. Everything happens in one
/// transaction holding the target locked, so concurrent toggles on the
/// same target are applied one after another.
#[derive(Debug)]
pub struct ToggleLike {
  pub target: LikeTarget,
}

impl ToggleLike {
  #[tracing::instrument(skip(app, user), fields(user.id = %user.id), name = "services.likes.toggle")]
  pub async fn perform(self, app: &App, user: &User) -> Result<LikeOutcome> {
    app.ensure_writable()?;

    let mut tx = app.store().begin().await?;
    let Some(author) = tx.lock_target(self.target).await? else {
      return Err(Error::not_found(TargetNotFound));
    };

    let (like, created) = tx.find_or_create_like(user.id, self.target).await?;
    let outcome = if created {
      tx.insert_karma(InsertKarma {
        recipient: author,
        target: self.target,
        points: self.target.reward(),
      })
      .await?;

      LikeOutcome::Liked
    } else {
      tx.delete_like(like.id).await?;
      if tx.revoke_karma(author, self.target).await?.is_none() {
        tracing::warn!(like.id = %like.id, "found no karma transaction to revoke");
      }
      LikeOutcome::Unliked
    };

    tx.commit().await?;
    tracing::debug!(?outcome, "toggled like");

    Ok(outcome)
  }
}
