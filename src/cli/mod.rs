use clap::Parser;
use error_stack::{Result, ResultExt};
use thiserror::Error;

mod migrate;
mod server;

/// Command line options for karmafeed.
#[derive(Debug, Parser)]
#[command(about = "Backend of karmafeed, a social feed with karma", version, author)]
pub struct Cli {
  #[clap(subcommand)]
  pub subcommand: Subcommand,
}

#[derive(Debug, Error)]
#[error("Failed to run command")]
pub struct CommandError;

impl Cli {
  pub fn run(self) -> Result<(), CommandError> {
    match self.subcommand {
      Subcommand::Server(args) => self::server::run(args).change_context(CommandError),
      Subcommand::Migrate(args) => self::migrate::run(args).change_context(CommandError),
    }
  }
}

#[derive(Debug, Parser)]
pub enum Subcommand {
  Server(self::server::ServerCommand),
  Migrate(self::migrate::MigrateCommand),
}
