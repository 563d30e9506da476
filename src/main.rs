use clap::Parser;
use std::process::ExitCode;

mod cli;

fn main() -> ExitCode {
  let cli = self::cli::Cli::parse();
  if let Err(error) = cli.run() {
    eprintln!("{error:?}");
    return ExitCode::FAILURE;
  }
  ExitCode::SUCCESS
}
