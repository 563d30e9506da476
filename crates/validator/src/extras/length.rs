use crate::HasLength;

/// Checks if the length of the value is within the range
/// of `min` and `max` (both are inclusive).
#[must_use]
pub fn validate_length<T: HasLength + ?Sized>(
  value: &T,
  min: Option<usize>,
  max: Option<usize>,
) -> bool {
  let length = value.length();
  if min.is_some_and(|min| length < min) {
    return false;
  }
  !max.is_some_and(|max| length > max)
}

#[cfg(test)]
mod tests {
  use super::validate_length;

  #[test]
  fn test_validate_length() {
    assert!(validate_length("hello", Some(1), Some(5)));
    assert!(!validate_length("hello", Some(6), None));
    assert!(!validate_length("hello", None, Some(4)));
    assert!(validate_length("", None, None));

    // counts characters, not bytes
    assert!(validate_length("héllo", None, Some(5)));
  }
}
