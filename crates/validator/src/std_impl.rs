use crate::{HasLength, Validate, ValidateError};

impl HasLength for String {
  fn length(&self) -> usize {
    self.chars().count()
  }
}

impl<'a> HasLength for &'a str {
  fn length(&self) -> usize {
    self.chars().count()
  }
}

impl HasLength for str {
  fn length(&self) -> usize {
    self.chars().count()
  }
}

// ------------------------------------------------ //

impl<T: Validate> Validate for Option<T> {
  fn validate(&self) -> Result<(), ValidateError> {
    match self {
      Some(value) => value.validate(),
      None => Ok(()),
    }
  }
}

impl<T: Validate + ?Sized> Validate for &T {
  fn validate(&self) -> Result<(), ValidateError> {
    (**self).validate()
  }
}
