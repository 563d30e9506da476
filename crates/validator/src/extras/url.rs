use url::Url;

#[must_use]
pub fn validate_url(url: &str) -> bool {
  Url::parse(url).is_ok()
}

#[cfg(test)]
mod tests {
  use super::validate_url;

  #[test]
  fn test_validate_url() {
    assert!(validate_url("postgres://karmafeed@localhost/karmafeed"));
    assert!(!validate_url("not a url"));
  }
}
