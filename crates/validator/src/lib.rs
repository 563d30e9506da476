#![cfg_attr(test, allow(clippy::unwrap_used))]

mod error;
mod std_impl;

pub use error::*;
pub mod extras;

/// Checks whether the data inside of a value is valid.
///
/// Implementors are expected to collect every problem they find
/// instead of bailing out after the first one, so that a caller can
/// report all of the invalid fields at once.
pub trait Validate {
  fn validate(&self) -> Result<(), ValidateError>;
}

pub trait HasLength {
  fn length(&self) -> usize;
}
