use thiserror::Error;
use validator::{Validate, ValidateError};

use crate::auth::{password, Claims};
use crate::error::{Error, Result};
use crate::schema::User;
use crate::types::{
  form::users::{login, register},
  id::UserId,
  user::Profile,
};
use crate::App;

#[derive(Debug)]
pub struct RegisterUser<'a> {
  pub form: &'a register::Request,
}

impl RegisterUser<'_> {
  #[tracing::instrument(skip_all, fields(username = %self.form.username), name = "services.users.register")]
  pub async fn perform(self, app: &App) -> Result<User> {
    self.form.validate()?;

    let username = self.form.username.as_str();
    if app.config.auth.is_guest_username(username) {
      let mut fields = ValidateError::field_builder();
      fields.insert_message("username", "This username is reserved");
      return Err(fields.build().into());
    }

    app.ensure_writable()?;

    let password_hash = password::hash_blocking(self.form.password.as_str().to_string())
      .await
      .map_err(Error::internal)?;

    let mut tx = app.store().begin().await?;
    let Some(user) = tx.insert_user(username, &password_hash).await? else {
      let mut fields = ValidateError::field_builder();
      fields.insert_message("username", "This username is already taken");
      return Err(fields.build().into());
    };
    tx.commit().await?;

    tracing::info!(user.id = %user.id, "registered a new user");
    Ok(user)
  }
}

#[derive(Debug, Error)]
#[error("Invalid username or password")]
struct InvalidCredentials;

#[derive(Debug)]
pub struct LoginUser<'a> {
  pub form: &'a login::Request,
}

impl LoginUser<'_> {
  #[tracing::instrument(skip_all, fields(username = %self.form.username), name = "services.users.login")]
  pub async fn perform(self, app: &App) -> Result<login::Response> {
    self.form.validate()?;

    let user = app.store().user_by_name(&self.form.username).await?;
    let Some(user) = user.filter(User::has_usable_password) else {
      return Err(Error::unauthorized(InvalidCredentials));
    };

    let is_matched = password::verify_blocking(
      self.form.password.as_str().to_string(),
      user.password_hash.clone(),
    )
    .await
    .map_err(Error::internal)?;

    if !is_matched {
      return Err(Error::unauthorized(InvalidCredentials));
    }

    let token = Claims::new(user.id, &app.config.auth)
      .encode(&app.config.auth)
      .map_err(Error::internal)?;

    Ok(login::Response {
      id: user.id,
      token: token.into(),
    })
  }
}

#[derive(Debug, Error)]
#[error("User not found")]
struct UserNotFound;

#[derive(Debug)]
pub struct GetUser {
  pub id: UserId,
}

impl GetUser {
  #[tracing::instrument(skip(app), name = "services.users.get")]
  pub async fn perform(self, app: &App) -> Result<Profile> {
    let Some(user) = app.store().user_by_id(self.id).await? else {
      return Err(Error::not_found(UserNotFound));
    };

    let karma = app.store().karma_of(user.id).await?;
    Ok(Profile {
      id: user.id,
      username: user.username,
      karma,
    })
  }
}

#[derive(Debug, Error)]
#[error("Guests are not allowed to do this")]
struct GuestsNotAllowed;

/// Returns the account guests act as, creating it if needed.
/// Fails with [`Unauthorized`](crate::types::Error::Unauthorized)
/// if guests are not allowed.
#[derive(Debug)]
pub struct ResolveGuest;

impl ResolveGuest {
  #[tracing::instrument(skip_all, name = "services.users.resolve_guest")]
  pub async fn perform(self, app: &App) -> Result<User> {
    let auth = &app.config.auth;
    if !auth.allow_guests {
      return Err(Error::unauthorized(GuestsNotAllowed));
    }

    if let Some(user) = app.store().user_by_name(&auth.guest_username).await? {
      return Ok(user);
    }

    app.ensure_writable()?;

    let mut tx = app.store().begin().await?;
    let user = tx
      .get_or_create_user(&auth.guest_username, User::UNUSABLE_PASSWORD)
      .await?;
    tx.commit().await?;

    Ok(user)
  }
}
