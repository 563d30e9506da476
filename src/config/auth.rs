use serde::Deserialize;
use std::num::NonZeroU64;
use validator::{Validate, ValidateError};

use crate::types::validation::is_valid_username;
use crate::util::Sensitive;

#[derive(Debug, Deserialize)]
pub struct Auth {
  /// Secret key used to sign and verify JSON Web Tokens (HS512).
  ///
  /// It must be at least 32 characters long.
  ///
  /// **Environment variables**:
  /// - `KARMAFEED_AUTH_JWT_SECRET`
  pub jwt_secret: Sensitive<String>,
  /// How long issued tokens stay valid. Defaults to 7 days.
  ///
  /// **Environment variables**:
  /// - `KARMAFEED_AUTH_TOKEN_TTL_SECS`
  #[serde(default = "Auth::default_token_ttl_secs")]
  pub token_ttl_secs: NonZeroU64,
  /// Lets requests without a token act as the guest account.
  ///
  /// **Environment variables**:
  /// - `KARMAFEED_AUTH_ALLOW_GUESTS`
  #[serde(default = "Auth::default_allow_guests")]
  pub allow_guests: bool,
  /// Username of the account guests act as. It is created once
  /// needed and nobody can log in to it.
  ///
  /// **Environment variables**:
  /// - `KARMAFEED_AUTH_GUEST_USERNAME`
  #[serde(default = "Auth::default_guest_username")]
  pub guest_username: String,
}

impl Auth {
  pub const JWT_SECRET_MIN: usize = 32;
  pub const JWT_SECRET_MAX: usize = 1024;

  const DEFAULT_TOKEN_TTL_SECS: u64 = 60 * 60 * 24 * 7;

  const fn default_token_ttl_secs() -> NonZeroU64 {
    match NonZeroU64::new(Self::DEFAULT_TOKEN_TTL_SECS) {
      Some(n) => n,
      None => panic!("DEFAULT_TOKEN_TTL_SECS is accidentally set to 0"),
    }
  }

  const fn default_allow_guests() -> bool {
    true
  }

  fn default_guest_username() -> String {
    "guest".into()
  }

  /// Whether `username` refers to the guest account.
  #[must_use]
  pub fn is_guest_username(&self, username: &str) -> bool {
    self.guest_username.eq_ignore_ascii_case(username)
  }
}

impl Validate for Auth {
  fn validate(&self) -> Result<(), ValidateError> {
    let mut fields = ValidateError::field_builder();
    let secret_ok = validator::extras::validate_length(
      &self.jwt_secret,
      Some(Self::JWT_SECRET_MIN),
      Some(Self::JWT_SECRET_MAX),
    );
    if !secret_ok {
      fields.insert_message("jwt_secret", "Invalid JWT secret key");
    }
    if !is_valid_username(&self.guest_username) {
      fields.insert_message("guest_username", "Invalid username");
    }
    fields.build().into_result()
  }
}
