use error_stack::{Report, Result, ResultExt};
use std::sync::Arc;
use thiserror::Error;

use crate::{
  config,
  database::{self, MemoryStore, PgStore, Store},
};

/// State shared by every request handler and service.
#[derive(Clone)]
pub struct App {
  pub config: Arc<config::Server>,
  store: Arc<dyn Store>,
}

#[derive(Debug, Error)]
#[error("Failed to initialize App struct")]
pub struct AppError;

impl App {
  /// Connects to the configured PostgreSQL database, applying pending
  /// migrations first if `db.run_migrations` is set.
  #[tracing::instrument(skip_all, name = "app.init")]
  pub async fn new(cfg: config::Server) -> Result<Self, AppError> {
    let Some(db) = cfg.db.as_ref() else {
      return Err(
        Report::new(AppError).attach_printable("missing `db` section in the configuration"),
      );
    };

    let store = PgStore::connect(db).await.change_context(AppError)?;
    if db.run_migrations {
      store.run_migrations().await.change_context(AppError)?;
    }

    Ok(Self::with_store(cfg, store))
  }

  /// Uses a store that lives in memory. Everything is lost once
  /// the process exits.
  #[must_use]
  pub fn in_memory(cfg: config::Server) -> Self {
    Self::with_store(cfg, MemoryStore::new())
  }

  #[must_use]
  pub fn with_store(cfg: config::Server, store: impl Store) -> Self {
    Self {
      config: Arc::new(cfg),
      store: Arc::new(store),
    }
  }
}

impl App {
  #[must_use]
  pub fn store(&self) -> &dyn Store {
    self.store.as_ref()
  }

  /// Fails with [`database::Error::Readonly`] if the primary database
  /// is configured to be read-only.
  pub fn ensure_writable(&self) -> database::Result<()> {
    let readonly = self
      .config
      .db
      .as_ref()
      .is_some_and(|db| db.primary.readonly);

    if readonly {
      Err(Report::new(database::Error::Readonly))
    } else {
      Ok(())
    }
  }
}

impl std::fmt::Debug for App {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("App")
      .field("config", &self.config)
      .field("store", &self.store.name())
      .finish()
  }
}
