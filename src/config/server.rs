use error_stack::{Report, Result, ResultExt};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::num::NonZeroUsize;
use validator::{Validate, ValidateError};

use super::ParseError;
use crate::util::{figment::FigmentErrorAttachable, validator::IntoValidatorReport};

#[derive(Debug, Deserialize)]
pub struct Server {
  #[serde(default)]
  pub http: Http,
  /// Required unless the server runs with the in-memory store.
  pub db: Option<super::Database>,
  pub auth: super::Auth,
  #[serde(default)]
  pub logging: super::Logging,
  #[serde(default)]
  pub leaderboard: super::Leaderboard,
  #[serde(default)]
  pub posts: super::Posts,
  #[serde(default)]
  pub comments: super::Comments,
}

#[derive(Debug, Deserialize)]
pub struct Http {
  /// **Environment variables**:
  /// - `KARMAFEED_HTTP_IP`
  #[serde(default = "Http::default_ip")]
  pub ip: IpAddr,
  /// **Environment variables**:
  /// - `KARMAFEED_HTTP_PORT` or `PORT`
  #[serde(default = "Http::default_port")]
  pub port: u16,
  /// Amount of HTTP workers. It defaults to the number of
  /// physical CPU cores if not set.
  ///
  /// **Environment variables**:
  /// - `KARMAFEED_HTTP_WORKERS`
  pub workers: Option<NonZeroUsize>,
}

impl Http {
  const fn default_ip() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
  }

  const fn default_port() -> u16 {
    8080
  }
}

impl Default for Http {
  fn default() -> Self {
    Self {
      ip: Self::default_ip(),
      port: Self::default_port(),
      workers: None,
    }
  }
}

impl Validate for Server {
  fn validate(&self) -> std::result::Result<(), ValidateError> {
    let mut fields = ValidateError::field_builder();
    fields.insert_result("db", self.db.validate());
    fields.insert_result("auth", self.auth.validate());
    fields.insert_result("leaderboard", self.leaderboard.validate());
    fields.insert_result("comments", self.comments.validate());
    fields.build().into_result()
  }
}

impl Server {
  pub fn load() -> Result<Self, ParseError> {
    dotenvy::dotenv().ok();

    let config = Self::figment()
      .extract::<Self>()
      .map_err(|e| Report::new(ParseError).attach_figment_error(e))?;

    config
      .validate()
      .into_validator_report()
      .change_context(ParseError)?;

    Ok(config)
  }

  /// Configuration with every default value and a fixed JWT secret.
  #[cfg(test)]
  pub(crate) fn for_tests() -> Self {
    Self {
      http: Http::default(),
      db: None,
      auth: super::Auth {
        jwt_secret: "this-is-a-secret-only-used-for-tests".to_string().into(),
        token_ttl_secs: std::num::NonZeroU64::new(3600).unwrap(),
        allow_guests: true,
        guest_username: "guest".into(),
      },
      logging: super::Logging::default(),
      leaderboard: super::Leaderboard::default(),
      posts: super::Posts::default(),
      comments: super::Comments::default(),
    }
  }
}

impl Server {
  const DEFAULT_CONFIG_FILE: &'static str = "karmafeed.toml";

  /// Creates a default [`Figment`] object to load server
  /// configuration. This function is there for implementing
  /// [`Server::load`] and testing.
  pub(crate) fn figment() -> figment::Figment {
    use figment::{
      providers::{Env, Format, Toml},
      Figment,
    };

    Figment::new()
      .merge(Toml::file(Self::DEFAULT_CONFIG_FILE))
      // One big con about figment (env provider to be specific) especially
      // these fields with underscore in it.
      .merge(Env::prefixed("KARMAFEED_").map(|v| match v.as_str() {
        "DB_PRIMARY_MIN_IDLE" => "db.primary.min_idle".into(),
        "DB_PRIMARY_POOL_SIZE" => "db.primary.pool_size".into(),

        "DB_REPLICA_MIN_IDLE" => "db.replica.min_idle".into(),
        "DB_REPLICA_POOL_SIZE" => "db.replica.pool_size".into(),

        "DB_ENFORCE_TLS" => "db.enforce_tls".into(),
        "DB_TIMEOUT_SECS" => "db.timeout_secs".into(),
        "DB_RUN_MIGRATIONS" => "db.run_migrations".into(),

        "AUTH_JWT_SECRET" => "auth.jwt_secret".into(),
        "AUTH_TOKEN_TTL_SECS" => "auth.token_ttl_secs".into(),
        "AUTH_ALLOW_GUESTS" => "auth.allow_guests".into(),
        "AUTH_GUEST_USERNAME" => "auth.guest_username".into(),

        "LEADERBOARD_WINDOW_HOURS" => "leaderboard.window_hours".into(),
        "POSTS_MAX_CONTENT_CHARS" => "posts.max_content_chars".into(),
        "COMMENTS_MAX_CONTENT_CHARS" => "comments.max_content_chars".into(),
        "COMMENTS_MAX_DEPTH" => "comments.max_depth".into(),

        _ => v.as_str().replace('_', ".").into(),
      }))
      // Environment variable aliases
      .merge(
        Env::raw()
          .only(&["DATABASE_URL", "PORT", "RUST_LOG"])
          .map(|v| match v.as_str() {
            "DATABASE_URL" => "db.primary.url".into(),
            "PORT" => "http.port".into(),
            "RUST_LOG" => "logging.targets".into(),
            _ => v.into(),
          }),
      )
  }
}
