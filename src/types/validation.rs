use once_cell::sync::Lazy;
use regex::Regex;
use validator::{HasLength, ValidateError};

pub const USERNAME_MAX: usize = 30;
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 128;

#[allow(clippy::expect_used)]
static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"^[A-Za-z0-9]$|^[A-Za-z0-9_][A-Za-z0-9\.\-_]*[A-Za-z0-9]$")
    .expect("compile username regex")
});

pub fn is_valid_username(name: &str) -> bool {
  name.len() <= USERNAME_MAX && USERNAME_REGEX.is_match(name)
}

/// Checks the body of a post or a comment. Content must have
/// something other than whitespace and must not exceed `max_chars`
/// characters.
pub fn check_content(content: &str, max_chars: usize) -> ValidateError {
  let mut error = ValidateError::msg_builder();
  if content.trim().is_empty() {
    error.insert("Content must not be empty");
  } else if content.length() > max_chars {
    error.insert(format!("Content must not exceed {max_chars} characters"));
  }
  error.build()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_is_valid_username() {
    assert!(is_valid_username("memothelemo"));
    assert!(is_valid_username("mark.robes"));
    assert!(is_valid_username("salmon-ella"));
    assert!(is_valid_username("crossword_puzzle"));
    assert!(is_valid_username("1-taylor.swift.fan"));
    assert!(is_valid_username("_apple"));
    assert!(is_valid_username("x"));

    assert!(!is_valid_username(""));
    assert!(!is_valid_username("_"));
    assert!(!is_valid_username("trailing."));
    assert!(!is_valid_username(".leading"));
    assert!(!is_valid_username("has space"));
    assert!(!is_valid_username(&"a".repeat(USERNAME_MAX + 1)));
  }

  #[test]
  fn test_check_content() {
    assert!(check_content("hello", 5).is_empty());
    assert!(check_content("héllo", 5).is_empty());
    assert!(!check_content("hello!", 5).is_empty());
    assert!(!check_content("", 5).is_empty());
    assert!(!check_content(" \n\t ", 5).is_empty());
  }
}
