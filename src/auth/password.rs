use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use error_stack::{Result, ResultExt};
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use thiserror::Error;

static CONTEXT: Lazy<Argon2<'static>> = Lazy::new(|| {
  Argon2::new(
    argon2::Algorithm::Argon2id,
    argon2::Version::V0x13,
    argon2::Params::DEFAULT,
  )
});

#[derive(Debug, Error)]
#[error("Failed to generate password hash")]
pub struct HashPasswordError;

pub fn hash(password: impl AsRef<[u8]>) -> Result<String, HashPasswordError> {
  let salt = SaltString::generate(&mut OsRng);
  let password_hash = CONTEXT
    .hash_password(password.as_ref(), &salt)
    .map_err(|e| error_stack::Report::new(HashPasswordError).attach_printable(e.to_string()))?;

  Ok(password_hash.to_string())
}

#[derive(Debug, Error)]
#[error("Failed to verify password")]
pub struct VerifyPasswordError;

/// Hashing is expensive, so this runs [`hash`] on the blocking
/// thread pool.
pub async fn hash_blocking(password: String) -> Result<String, HashPasswordError> {
  tokio::task::spawn_blocking(move || hash(password))
    .await
    .change_context(HashPasswordError)?
}

pub fn verify(password: &[u8], hash: &str) -> Result<bool, VerifyPasswordError> {
  let hash = PasswordHash::new(hash)
    .map_err(|e| error_stack::Report::new(VerifyPasswordError).attach_printable(e.to_string()))
    .attach_printable("could not parse password hash")?;

  match CONTEXT.verify_password(password, &hash) {
    Ok(..) => Ok(true),
    Err(argon2::password_hash::Error::Password) => Ok(false),
    Err(error) => {
      Err(error_stack::Report::new(VerifyPasswordError).attach_printable(error.to_string()))
    }
  }
}

pub async fn verify_blocking(password: String, hash: String) -> Result<bool, VerifyPasswordError> {
  tokio::task::spawn_blocking(move || verify(password.as_bytes(), &hash))
    .await
    .change_context(VerifyPasswordError)?
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn hash_and_verify() {
    let hash = hash("correct horse").unwrap();
    assert!(hash.starts_with("$argon2id$"));
    assert!(verify(b"correct horse", &hash).unwrap());
    assert!(!verify(b"battery staple", &hash).unwrap());
  }

  #[test]
  fn unusable_hashes_are_rejected() {
    assert!(verify(b"anything", crate::schema::User::UNUSABLE_PASSWORD).is_err());
  }
}
