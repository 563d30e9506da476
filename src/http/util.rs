use actix_web::{
  body::MessageBody,
  dev::{ServiceRequest, ServiceResponse},
  error::{JsonPayloadError, PathError, QueryPayloadError},
  HttpRequest, HttpResponse,
};
use thiserror::Error;
use tracing::Span;
use tracing_actix_web::{DefaultRootSpanBuilder, RootSpanBuilder};
use validator::ValidateError;

use crate::error::Error;

/// Same as [`DefaultRootSpanBuilder`] but request spans are
/// only visible with the `debug` level.
pub struct QuieterRootSpanBuilder;

impl RootSpanBuilder for QuieterRootSpanBuilder {
  fn on_request_start(request: &ServiceRequest) -> Span {
    tracing_actix_web::root_span!(level = tracing::Level::DEBUG, request)
  }

  fn on_request_end<B: MessageBody>(
    span: Span,
    outcome: &Result<ServiceResponse<B>, actix_web::Error>,
  ) {
    DefaultRootSpanBuilder::on_request_end(span, outcome);
  }
}

pub fn json_error_handler(error: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  tracing::debug!(%error, "rejected request body");
  Error::from(ValidateError::message(error.to_string())).into()
}

pub fn query_error_handler(error: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
  tracing::debug!(%error, "rejected query string");
  Error::from(ValidateError::message(error.to_string())).into()
}

#[derive(Debug, Error)]
#[error("Invalid path parameter")]
struct InvalidPath;

pub fn path_error_handler(error: PathError, _req: &HttpRequest) -> actix_web::Error {
  tracing::debug!(%error, "rejected path parameters");
  Error::not_found(InvalidPath).into()
}

#[derive(Debug, Error)]
#[error("Route not found")]
struct RouteNotFound;

pub async fn not_found() -> Result<HttpResponse, Error> {
  Err(Error::not_found(RouteNotFound))
}
