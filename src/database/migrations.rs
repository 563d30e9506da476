use error_stack::{Result, ResultExt};
use sqlx::migrate::Migrator;
use thiserror::Error;
use tokio::time::Instant;

use super::Pool;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Debug, Error)]
#[error("could not perform database migrations")]
pub struct MigrationError;

#[tracing::instrument(skip_all, name = "db.migrations.run_pending")]
pub async fn run_pending(pool: &Pool) -> Result<(), MigrationError> {
  let now = Instant::now();
  tracing::info!("Performing database migrations... (this may take a while)");

  MIGRATOR
    .run(pool.inner())
    .await
    .change_context(MigrationError)?;

  let elapsed = now.elapsed();
  tracing::info!("Successfully performed database migrations! took {elapsed:.2?}");

  Ok(())
}
