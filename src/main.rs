use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use log::{debug, LevelFilter};
use keys::config::App;
use keys::error::exit_code;
use keys::{check_file, Report};

#[derive(Parser, Debug)]
#[command(author, version, about = "Checks that every item in a diff export derives a unique key")]
struct Cli {
  /// Diff export to check [default: output/diff.json]
  file: Option<PathBuf>,

  #[arg(short, long, help = "Enables verbose logging")]
  verbose: bool
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  match run(cli) {
    Ok(report) => {
      println!("{report}");
      ExitCode::SUCCESS
    },
    Err(err) => {
      eprintln!("{} {:#}", "error:".red().bold(), err);
      ExitCode::from(exit_code(&err))
    }
  }
}

fn run(cli: Cli) -> Result<Report> {
  let app = App::new()?;
  init_logging(cli.verbose || app.verbose);

  let path = cli.file.unwrap_or(app.export_path);
  debug!("Checking diff export at {}", path.display());
  check_file(&path)
}

fn init_logging(verbose: bool) {
  let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
  env_logger::builder()
    .filter_level(level)
    .format_target(false)
    .parse_default_env()
    .init();
  debug!("Verbose logging enabled");
}
