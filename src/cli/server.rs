use clap::Parser;
use error_stack::{Result, ResultExt};
use karmafeed::{config, logging, server::StartServerError, App};
use std::net::IpAddr;
use std::num::NonZeroUsize;

/// Expose the karmafeed API over HTTP
#[derive(Debug, Parser)]
pub struct ServerCommand {
  #[clap(long)]
  pub address: Option<IpAddr>,
  #[clap(long)]
  pub port: Option<u16>,
  #[clap(long)]
  pub workers: Option<NonZeroUsize>,
  /// Keep everything in memory instead of connecting to a database.
  /// Nothing survives a restart. Writes run one at a time even on
  /// unrelated posts. Reads are not blocked by them.
  #[clap(long)]
  pub in_memory: bool,
}

pub fn run(args: ServerCommand) -> Result<(), StartServerError> {
  let mut config = config::Server::load().change_context(StartServerError)?;
  args.override_config(&mut config);

  logging::init(&config.logging).change_context(StartServerError)?;

  let mut runtime = tokio::runtime::Builder::new_multi_thread();
  runtime.enable_all();
  if let Some(workers) = config.http.workers {
    runtime.worker_threads(workers.get());
  }

  runtime
    .build()
    .change_context(StartServerError)
    .attach_printable("could not build tokio runtime")?
    .block_on(async move {
      let app = if args.in_memory {
        tracing::warn!("running with an in-memory store, data will be lost on exit");
        App::in_memory(config)
      } else {
        App::new(config).await.change_context(StartServerError)?
      };
      karmafeed::server::run(app).await
    })
}

impl ServerCommand {
  fn override_config(&self, config: &mut config::Server) {
    // override server configurations if set by the cli
    if let Some(address) = self.address {
      config.http.ip = address;
    }

    if let Some(port) = self.port {
      config.http.port = port;
    }

    if let Some(workers) = self.workers {
      config.http.workers = Some(workers);
    }
  }
}
