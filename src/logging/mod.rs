use error_stack::{Result, ResultExt};
use std::io::IsTerminal;
use thiserror::Error;
use tracing::{level_filters::LevelFilter, Subscriber};
use tracing_error::ErrorLayer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

use crate::config::{self, LoggingStyle};

mod formatter;
use self::formatter::Formatter;

#[derive(Debug, Error)]
#[error("Failed to initialize tracing")]
pub struct TracingInitError;

/// Installs the global subscriber writing to stderr.
pub fn init(config: &config::Logging) -> Result<(), TracingInitError> {
  let ansi = std::io::stderr().is_terminal();
  let registry = tracing_subscriber::Registry::default()
    .with(ErrorLayer::default())
    .with(common_layer(std::io::stderr, ansi, config.style, &config.targets));

  tracing::subscriber::set_global_default(registry)
    .change_context(TracingInitError)
    .attach_printable("already initialized tracing")?;

  Ok(())
}

/// Installs a subscriber capturing logs for the test harness. It
/// is fine to call this more than once.
#[cfg(test)]
pub fn init_for_tests() {
  static INIT: std::sync::Once = std::sync::Once::new();
  INIT.call_once(|| {
    let targets = std::env::var("RUST_LOG").unwrap_or_default();
    let layer = common_layer(
      tracing_subscriber::fmt::TestWriter::new(),
      false,
      LoggingStyle::Full,
      &targets,
    );

    let registry = tracing_subscriber::Registry::default()
      .with(ErrorLayer::default())
      .with(layer);

    // another test harness may have installed one already
    let _ = tracing::subscriber::set_global_default(registry);
  });
}

fn common_layer<S>(
  maker: impl for<'w> MakeWriter<'w> + Sync + Send + 'static,
  ansi: bool,
  style: LoggingStyle,
  targets: &str,
) -> Box<dyn Layer<S> + Send + Sync + 'static>
where
  S: Subscriber + for<'a> LookupSpan<'a>,
{
  if let Some(formatter) = Formatter::from_style(style, ansi) {
    tracing_subscriber::fmt::layer()
      .with_ansi(ansi)
      .event_format(formatter)
      .with_writer(maker)
      .with_filter(make_env_filter(targets))
      .boxed()
  } else {
    tracing_subscriber::fmt::layer()
      .json()
      .flatten_event(true)
      .with_span_list(true)
      .with_writer(maker)
      .with_filter(make_env_filter(targets))
      .boxed()
  }
}

fn make_env_filter(targets: &str) -> EnvFilter {
  let default_level = if cfg!(debug_assertions) {
    LevelFilter::DEBUG
  } else {
    LevelFilter::INFO
  };

  EnvFilter::builder()
    .with_default_directive(default_level.into())
    .parse_lossy(targets)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn env_filter_accepts_directives() {
    let filter = make_env_filter("karmafeed=trace,sqlx=warn");
    assert!(filter.to_string().contains("karmafeed=trace"));
  }
}
