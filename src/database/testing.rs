use sqlx::testing::{TestArgs, TestSupport};
use sqlx::{ConnectOptions, Connection, Postgres};
use std::future::Future;
use std::time::Duration;

use super::{migrations::MIGRATOR, PgStore, Pool};

/// Runs `callback` against a [`PgStore`] over a fresh database with
/// every migration applied.
///
/// Does nothing if `DATABASE_URL` is not set. Its credentials must be
/// allowed to create and drop databases.
pub async fn with_pg_store<F, C>(path: &'static str, callback: C)
where
  F: Future<Output = ()>,
  C: FnOnce(PgStore) -> F,
{
  crate::logging::init_for_tests();
  if dotenvy::var("DATABASE_URL").is_err() {
    tracing::warn!("DATABASE_URL is not set, skipping {path}");
    return;
  }

  let args = TestArgs {
    test_path: path,
    migrator: Some(&MIGRATOR),
    fixtures: &[],
  };

  let test_context = Postgres::test_context(&args)
    .await
    .expect("failed to setup test database");

  let mut conn = test_context
    .connect_opts
    .connect()
    .await
    .expect("failed to connect to the test database");

  MIGRATOR
    .run_direct(&mut conn)
    .await
    .expect("failed to apply migrations");

  conn
    .close()
    .await
    .expect("failed to close setup connection");

  let pool = test_context
    .pool_opts
    .connect_with(test_context.connect_opts)
    .await
    .expect("failed to connect to test pool");

  callback(PgStore::from_pool(Pool::from_inner(pool.clone()))).await;

  let close_timed_out = tokio::time::timeout(Duration::from_secs(10), pool.close())
    .await
    .is_err();

  if close_timed_out {
    tracing::warn!("test {path} held onto the pool after exiting");
  }
}
