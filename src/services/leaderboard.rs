use chrono::{Duration, Utc};

use crate::error::Result;
use crate::types::leaderboard::LeaderboardEntry;
use crate::App;

/// Users with the most karma earned within the last `window`. A window
/// reaching past the earliest representable time covers every
/// transaction.
#[derive(Debug)]
pub struct LeaderboardRecent {
  pub window: Duration,
  pub limit: u32,
}

impl LeaderboardRecent {
  #[tracing::instrument(skip(app), name = "services.leaderboard.recent")]
  pub async fn perform(self, app: &App) -> Result<Vec<LeaderboardEntry>> {
    let since = Utc::now().checked_sub_signed(self.window);
    let totals = app.store().karma_totals(since, self.limit).await?;
    Ok(totals.into_iter().map(LeaderboardEntry::from).collect())
  }
}

/// Users with the most karma of all time.
#[derive(Debug)]
pub struct LeaderboardAllTime {
  pub limit: u32,
}

impl LeaderboardAllTime {
  #[tracing::instrument(skip(app), name = "services.leaderboard.all_time")]
  pub async fn perform(self, app: &App) -> Result<Vec<LeaderboardEntry>> {
    let totals = app.store().karma_totals(None, self.limit).await?;
    Ok(totals.into_iter().map(LeaderboardEntry::from).collect())
  }
}

/// The leaderboard shown to clients: the recent one with the window
/// and limit from the configuration, or the all-time leaderboard if
/// nobody earned karma recently.
#[derive(Debug)]
pub struct GetLeaderboard;

impl GetLeaderboard {
  #[tracing::instrument(skip_all, name = "services.leaderboard.get")]
  pub async fn perform(self, app: &App) -> Result<Vec<LeaderboardEntry>> {
    let config = &app.config.leaderboard;
    let limit = config.limit.get();

    let recent = LeaderboardRecent {
      window: config.window(),
      limit,
    }
    .perform(app)
    .await?;

    if !recent.is_empty() {
      return Ok(recent);
    }

    tracing::debug!("no recent karma, falling back to the all-time leaderboard");
    LeaderboardAllTime { limit }.perform(app).await
  }
}
