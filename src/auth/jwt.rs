use chrono::Utc;
use error_stack::{Result, ResultExt};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{config, types::id::UserId};

/// Claims of an access token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Claims {
  pub sub: UserId,
  pub iat: i64,
  pub exp: i64,
}

#[derive(Debug, Error)]
#[error("Failed to create access token")]
pub struct EncodeTokenError;

#[derive(Debug, Error)]
#[error("Invalid or expired access token")]
pub struct DecodeTokenError;

impl Claims {
  #[must_use]
  pub fn new(user: UserId, config: &config::Auth) -> Self {
    let iat = Utc::now().timestamp();
    let ttl = i64::try_from(config.token_ttl_secs.get()).unwrap_or(i64::MAX);
    Self {
      sub: user,
      iat,
      exp: iat.saturating_add(ttl),
    }
  }

  #[tracing::instrument(skip_all, name = "auth.jwt.encode")]
  pub fn encode(&self, config: &config::Auth) -> Result<String, EncodeTokenError> {
    let header = Header::new(Algorithm::HS512);
    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    jsonwebtoken::encode(&header, self, &key).change_context(EncodeTokenError)
  }

  #[tracing::instrument(skip_all, name = "auth.jwt.decode")]
  pub fn decode(token: &str, config: &config::Auth) -> Result<Self, DecodeTokenError> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
    let validation = Validation::new(Algorithm::HS512);
    jsonwebtoken::decode::<Self>(token, &key, &validation)
      .map(|v| v.claims)
      .change_context(DecodeTokenError)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::id::UserId;

  #[test]
  fn encode_then_decode() {
    let config = config::Server::for_tests();
    let claims = Claims::new(UserId::new(42), &config.auth);
    let token = claims.encode(&config.auth).unwrap();

    let decoded = Claims::decode(&token, &config.auth).unwrap();
    assert_eq!(decoded, claims);
  }

  #[test]
  fn rejects_expired_tokens() {
    let config = config::Server::for_tests();
    let mut claims = Claims::new(UserId::new(42), &config.auth);
    claims.iat -= 7200;
    claims.exp = claims.iat + 60;

    let token = claims.encode(&config.auth).unwrap();
    assert!(Claims::decode(&token, &config.auth).is_err());
  }

  #[test]
  fn rejects_tokens_from_other_secrets() {
    let config = config::Server::for_tests();
    let token = Claims::new(UserId::new(42), &config.auth)
      .encode(&config.auth)
      .unwrap();

    let mut other = config::Server::for_tests();
    other.auth.jwt_secret = "another-secret-with-enough-characters".to_string().into();
    assert!(Claims::decode(&token, &other.auth).is_err());
    assert!(Claims::decode("garbage", &config.auth).is_err());
  }
}
