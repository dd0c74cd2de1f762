use clap::Parser;
use commented_config::file::{ConfigFileHelper, FormatOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
  name = "commented-config",
  about = "Normalize a YAML config file in place without losing its comments",
  version,
  author
)]
struct Cli {
  /// Path to the YAML config file
  file: PathBuf,

  /// Separate entries by single newlines only
  #[arg(short, long)]
  compact: bool,

  /// Only load the file and report how many comments it has
  #[arg(long)]
  check: bool,

  /// Verbose output (-v for verbose, -vv for very verbose)
  #[arg(short, long, action = clap::ArgAction::Count)]
  verbose: u8,
}

fn setup_tracing(verbose: u8) {
  use tracing_subscriber::fmt;
  use tracing_subscriber::prelude::*;

  let log_level = match verbose {
    1 => "debug",
    2 => "trace",
    _ => "info",
  };

  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(tracing_subscriber::EnvFilter::new(
      std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
    ))
    .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
  let cli = Cli::parse();

  setup_tracing(cli.verbose);

  let document = if cli.check {
    ConfigFileHelper::load(&cli.file)?
  } else {
    ConfigFileHelper::format_with_options(FormatOptions {
      path: cli.file,
      compact: cli.compact,
    })?
  };

  println!(
    "{}: {} comments",
    document.path().display(),
    document.comment_count()
  );

  Ok(())
}
