use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Kinds of errors exposed to API clients.
#[derive(Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Error {
  Internal,
  InvalidFormBody(validator::ValidateError),
  NotFound,
  ReadonlyMode,
  Unauthorized,
}

impl Display for Error {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Error::Internal => f.write_str("Failed to perform request"),
      Error::InvalidFormBody(..) => f.write_str("User performed request with invalid body"),
      Error::NotFound => f.write_str("Could not find the requested resource"),
      Error::ReadonlyMode => f.write_str("Attempt to write read-only database"),
      Error::Unauthorized => f.write_str("Attempt to access user-only route"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use validator::ValidateError;

  #[test]
  fn test_serde_unit_variants() {
    assert_eq!(
      serde_json::to_value(Error::Internal).unwrap(),
      json!({ "type": "internal" })
    );
    assert_eq!(
      serde_json::to_value(Error::ReadonlyMode).unwrap(),
      json!({ "type": "readonly_mode" })
    );
    assert_eq!(
      serde_json::to_value(Error::NotFound).unwrap(),
      json!({ "type": "not_found" })
    );
    assert_eq!(
      serde_json::to_value(Error::Unauthorized).unwrap(),
      json!({ "type": "unauthorized" })
    );
  }

  #[test]
  fn test_serde_invalid_form_body() {
    let mut fields = ValidateError::field_builder();
    fields.insert_message("content", "Content must not be empty");

    let error = Error::InvalidFormBody(fields.build());
    let value = serde_json::to_value(&error).unwrap();
    assert_eq!(
      value,
      json!({
        "type": "invalid_form_body",
        "data": { "content": { "_errors": ["Content must not be empty"] } },
      })
    );

    let roundtrip: Error = serde_json::from_value(value).unwrap();
    assert_eq!(roundtrip, error);
  }
}
