use error_stack::{Context, Report};
use thiserror::Error as ThisError;
use tracing_error::SpanTrace;

use crate::types;

mod impls;

pub type Result<T> = std::result::Result<T, Error>;

/// Context every report carried by [`Error`] ends with.
#[derive(Debug, ThisError)]
#[error("Failed to process request")]
pub struct RequestError;

/// An error that is sent back to the client. Only the [kind](types::Error)
/// is visible to the client, the report and the span trace are logged
/// if the error is unexpected.
pub struct Error {
  error_type: types::Error,
  report: Report<RequestError>,
  trace: SpanTrace,
}

impl Error {
  #[must_use]
  pub fn from_context(error_type: types::Error, context: impl Context) -> Self {
    Self::from_report(error_type, Report::new(context))
  }

  #[must_use]
  pub fn from_report(error_type: types::Error, report: Report<impl Context>) -> Self {
    Self {
      error_type,
      report: report.change_context(RequestError),
      trace: SpanTrace::capture(),
    }
  }

  #[must_use]
  pub fn not_found(context: impl Context) -> Self {
    Self::from_context(types::Error::NotFound, context)
  }

  #[must_use]
  pub fn unauthorized(context: impl Context) -> Self {
    Self::from_context(types::Error::Unauthorized, context)
  }

  #[must_use]
  pub fn internal(report: Report<impl Context>) -> Self {
    Self::from_report(types::Error::Internal, report)
  }
}

impl Error {
  #[must_use]
  pub fn as_type(&self) -> &types::Error {
    &self.error_type
  }

  #[must_use]
  pub fn into_type(self) -> types::Error {
    self.error_type
  }

  #[must_use]
  pub fn change_type(mut self, error_type: types::Error) -> Self {
    self.error_type = error_type;
    self
  }

  #[must_use]
  pub fn downcast_ref<F: Context>(&self) -> Option<&F> {
    self.report.downcast_ref::<F>()
  }
}

impl std::fmt::Debug for Error {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Error")
      .field("type", &self.error_type)
      .field("report", &self.report)
      .field("trace", &self.trace)
      .finish()
  }
}

impl std::fmt::Display for Error {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}: ", &self.error_type)?;
    writeln!(f, "{:?}", self.report)?;
    std::fmt::Display::fmt(&self.trace, f)
  }
}
