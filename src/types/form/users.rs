pub mod register {
  use serde::{Deserialize, Serialize};
  use validator::{Validate, ValidateError};

  use crate::{
    types::{
      id::UserId,
      validation::{self, is_valid_username},
    },
    util::Sensitive,
  };

  #[derive(Debug, Deserialize, Serialize)]
  pub struct Request {
    pub username: String,
    pub password: Sensitive<String>,
  }

  impl Validate for Request {
    fn validate(&self) -> Result<(), ValidateError> {
      let mut fields = ValidateError::field_builder();
      if !is_valid_username(&self.username) {
        fields.insert_message("username", "Invalid username");
      }

      fields.insert("password", {
        // All passwords must have no trailing or leading whitespaces
        let mut error = ValidateError::msg_builder();
        let password = self.password.as_str().trim();
        if self.password.len() != password.len() {
          error.insert("Passwords must not have starting or ending with spaces");
        } else if self.password.len() > validation::PASSWORD_MAX {
          error.insert("Passwords must not be too big");
        } else if self.password.len() < validation::PASSWORD_MIN {
          error.insert("Passwords must not be too short");
        }
        error.build()
      });

      fields.build().into_result()
    }
  }

  #[derive(Debug, Deserialize, Serialize)]
  pub struct Response {
    pub id: UserId,
    pub username: String,
  }

  #[cfg(test)]
  mod tests {
    use super::*;

    #[track_caller]
    fn must_fail<T: Validate>(value: &T, args: std::fmt::Arguments<'_>) {
      assert!(
        value.validate().is_err(),
        "expected to fail but passed (entry = {args})"
      );
    }

    #[test]
    fn test_password_fields() {
      static INVALID_PASSWORDS: &[&str] = &[
        "\thelloworld",
        "    hello",
        "world    ",
        "short",
        "we_dont_accept_tabs\t",
        concat!(
          "thisistoolongpleasedontactuallydothisathhomeotherwiseyoulldiefromtypingtoomuch",
          "imeanitdoyouknowaboutrsi?nope,ok.12345678901234567890"
        ),
      ];

      for combination in INVALID_PASSWORDS {
        let form = Request {
          username: "memothelemo".to_string(),
          password: combination.to_string().into(),
        };
        must_fail(&form, format_args!("{combination:?}"));
      }

      let form = Request {
        username: "memothelemo".to_string(),
        password: "correct horse".to_string().into(),
      };
      assert!(form.validate().is_ok());
    }

    #[test]
    fn test_username_field() {
      let form = Request {
        username: "not valid!".to_string(),
        password: "correct horse".to_string().into(),
      };
      let error = form.validate().unwrap_err();
      assert!(error.field("username").is_some());
      assert!(error.field("password").is_none());
    }
  }
}

pub mod login {
  use serde::{Deserialize, Serialize};
  use validator::{extras::validate_length, Validate, ValidateError};

  use crate::{
    types::{id::UserId, validation},
    util::Sensitive,
  };

  #[derive(Debug, Deserialize, Serialize)]
  pub struct Request {
    pub username: String,
    pub password: Sensitive<String>,
  }

  impl Validate for Request {
    fn validate(&self) -> Result<(), ValidateError> {
      let mut fields = ValidateError::field_builder();
      if !validate_length(self.username.as_str(), Some(1), Some(validation::USERNAME_MAX)) {
        fields.insert_message("username", "Invalid username");
      }
      if !validate_length(
        self.password.as_str(),
        Some(1),
        Some(validation::PASSWORD_MAX),
      ) {
        fields.insert_message("password", "Invalid password");
      }
      fields.build().into_result()
    }
  }

  #[derive(Debug, Deserialize, Serialize)]
  pub struct Response {
    pub id: UserId,
    pub token: Sensitive<String>,
  }
}
