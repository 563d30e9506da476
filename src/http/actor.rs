use actix_web::{http::header, web, FromRequest};
use futures::future::{ready, LocalBoxFuture};
use thiserror::Error;

use crate::{
  auth::Claims,
  error::Error,
  schema::User,
  services::ResolveGuest,
  App,
};

/// Whoever sent the request.
///
/// Requests with an `Authorization: Bearer <token>` header act as the
/// user the token was issued to. Requests without it are guests.
#[derive(Debug)]
pub enum Actor {
  Guest,
  User(User),
}

#[derive(Debug, Error)]
#[error("Invalid access token")]
struct InvalidToken;

impl Actor {
  /// Returns the user behind the request. Guests are resolved to the
  /// guest account, or rejected if guests are not allowed.
  pub async fn into_user(self, app: &App) -> Result<User, Error> {
    match self {
      Self::User(user) => Ok(user),
      Self::Guest => ResolveGuest.perform(app).await,
    }
  }
}

impl FromRequest for Actor {
  type Error = Error;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(
    req: &actix_web::HttpRequest,
    _payload: &mut actix_web::dev::Payload,
  ) -> Self::Future {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
      return Box::pin(ready(Ok(Actor::Guest)));
    };

    let token = value
      .to_str()
      .ok()
      .and_then(|v| v.strip_prefix("Bearer "))
      .map(str::trim);

    let Some(token) = token else {
      return Box::pin(ready(Err(Error::unauthorized(InvalidToken))));
    };

    let Some(app) = req.app_data::<web::Data<App>>() else {
      #[derive(Debug, Error)]
      #[error("The web app has no available configuration")]
      struct NoConfig;
      return Box::pin(ready(Err(Error::from_context(
        crate::types::Error::Internal,
        NoConfig,
      ))));
    };

    let claims = match Claims::decode(token, &app.config.auth) {
      Ok(claims) => claims,
      Err(report) => {
        tracing::debug!(?report, "rejected access token");
        return Box::pin(ready(Err(Error::unauthorized(InvalidToken))));
      }
    };

    let app = app.clone();
    Box::pin(async move {
      match app.store().user_by_id(claims.sub).await? {
        Some(user) => Ok(Actor::User(user)),
        None => Err(Error::unauthorized(InvalidToken)),
      }
    })
  }
}
