use serde::Deserialize;
use std::num::{NonZeroU32, NonZeroUsize};
use validator::{Validate, ValidateError};

#[derive(Debug, Deserialize)]
pub struct Leaderboard {
  /// Size of the recent leaderboard window in hours.
  ///
  /// **Environment variables**:
  /// - `KARMAFEED_LEADERBOARD_WINDOW_HOURS`
  #[serde(default = "Leaderboard::default_window_hours")]
  pub window_hours: NonZeroU32,
  /// **Environment variables**:
  /// - `KARMAFEED_LEADERBOARD_LIMIT`
  #[serde(default = "Leaderboard::default_limit")]
  pub limit: NonZeroU32,
}

impl Leaderboard {
  /// A hundred years.
  pub const WINDOW_HOURS_MAX: u32 = 24 * 365 * 100;

  const fn default_window_hours() -> NonZeroU32 {
    match NonZeroU32::new(24) {
      Some(n) => n,
      None => panic!("window_hours is accidentally set to 0"),
    }
  }

  const fn default_limit() -> NonZeroU32 {
    match NonZeroU32::new(5) {
      Some(n) => n,
      None => panic!("limit is accidentally set to 0"),
    }
  }

  #[must_use]
  pub fn window(&self) -> chrono::Duration {
    chrono::Duration::hours(i64::from(self.window_hours.get()))
  }
}

impl Validate for Leaderboard {
  fn validate(&self) -> Result<(), ValidateError> {
    let mut fields = ValidateError::field_builder();
    if self.window_hours.get() > Self::WINDOW_HOURS_MAX {
      fields.insert_message(
        "window_hours",
        format!("Window must not be longer than {} hours", Self::WINDOW_HOURS_MAX),
      );
    }
    fields.build().into_result()
  }
}

impl Default for Leaderboard {
  fn default() -> Self {
    Self {
      window_hours: Self::default_window_hours(),
      limit: Self::default_limit(),
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct Posts {
  /// **Environment variables**:
  /// - `KARMAFEED_POSTS_MAX_CONTENT_CHARS`
  #[serde(default = "Posts::default_max_content_chars")]
  pub max_content_chars: NonZeroUsize,
}

impl Posts {
  pub const LIST_MAX_LIMIT: u32 = 100;

  const fn default_max_content_chars() -> NonZeroUsize {
    match NonZeroUsize::new(10_000) {
      Some(n) => n,
      None => panic!("max_content_chars is accidentally set to 0"),
    }
  }
}

impl Default for Posts {
  fn default() -> Self {
    Self {
      max_content_chars: Self::default_max_content_chars(),
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct Comments {
  /// **Environment variables**:
  /// - `KARMAFEED_COMMENTS_MAX_CONTENT_CHARS`
  #[serde(default = "Posts::default_max_content_chars")]
  pub max_content_chars: NonZeroUsize,
  /// How many ancestors a comment may have.
  ///
  /// **Environment variables**:
  /// - `KARMAFEED_COMMENTS_MAX_DEPTH`
  #[serde(default = "Comments::default_max_depth")]
  pub max_depth: u32,
}

impl Comments {
  /// Comment trees are built and serialized recursively, one level
  /// at a time, so the depth needs a ceiling.
  pub const MAX_DEPTH_LIMIT: u32 = 255;

  const fn default_max_depth() -> u32 {
    32
  }
}

impl Validate for Comments {
  fn validate(&self) -> Result<(), ValidateError> {
    let mut fields = ValidateError::field_builder();
    if self.max_depth > Self::MAX_DEPTH_LIMIT {
      fields.insert_message(
        "max_depth",
        format!("Depth must not be greater than {}", Self::MAX_DEPTH_LIMIT),
      );
    }
    fields.build().into_result()
  }
}

impl Default for Comments {
  fn default() -> Self {
    Self {
      max_content_chars: Posts::default_max_content_chars(),
      max_depth: Self::default_max_depth(),
    }
  }
}
