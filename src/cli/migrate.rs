use clap::Parser;
use error_stack::{Report, Result, ResultExt};
use karmafeed::{config, database::PgStore, logging};
use thiserror::Error;

/// Apply pending database migrations, then exit
#[derive(Debug, Parser)]
pub struct MigrateCommand {}

#[derive(Debug, Error)]
#[error("Failed to migrate the database")]
pub struct MigrateError;

pub fn run(_args: MigrateCommand) -> Result<(), MigrateError> {
  let config = config::Server::load().change_context(MigrateError)?;
  logging::init(&config.logging).change_context(MigrateError)?;

  let Some(db) = config.db else {
    return Err(
      Report::new(MigrateError).attach_printable("missing `db` section in the configuration"),
    );
  };

  tokio::runtime::Builder::new_current_thread()
    .enable_all()
    .build()
    .change_context(MigrateError)
    .attach_printable("could not build tokio runtime")?
    .block_on(async move {
      let store = PgStore::connect(&db).await.change_context(MigrateError)?;
      store.run_migrations().await.change_context(MigrateError)
    })
}
