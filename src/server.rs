use actix_web::{web, HttpServer};
use error_stack::{Result, ResultExt};
use thiserror::Error;
use tracing_actix_web::TracingLogger;

use crate::http::{self, util::QuieterRootSpanBuilder};
use crate::App;

#[derive(Debug, Error)]
#[error("Failed to run the HTTP server")]
pub struct StartServerError;

/// Serves the API until the server is told to stop.
pub async fn run(app: App) -> Result<(), StartServerError> {
  let ip = app.config.http.ip;
  let port = app.config.http.port;
  let workers = app.config.http.workers;
  tracing::debug!(store = %app.store().name(), "using store");

  let mut server = HttpServer::new(move || {
    actix_web::App::new()
      .app_data(web::Data::new(app.clone()))
      .wrap(TracingLogger::<QuieterRootSpanBuilder>::new())
      .configure(http::configure)
  });

  if let Some(workers) = workers {
    server = server.workers(workers.get());
  }

  let server = server
    .bind((ip, port))
    .change_context(StartServerError)
    .attach_printable_lazy(|| format!("could not bind server to {ip}:{port}"))?;

  tracing::info!("listening at http://{ip}:{port}");
  server.run().await.change_context(StartServerError)
}
