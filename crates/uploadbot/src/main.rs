use std::{convert::Infallible, path::PathBuf};

use clap::{builder::ArgAction, Parser, Subcommand};
use config::Config;
use console::{style, Emoji};
use errors::UploadbotErrors;
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;
use uploadtitle::{
  batch::{BatchPolicy, NoDuplicates, Outcome, UploadBatch, Uploader},
  sanitize, Metadata, Template, Value,
};

pub mod config;
pub mod errors;
pub mod records;

static BOOKS: Emoji<'_, '_> = Emoji("📚 ", "");
static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "");
static SUCCESS: Emoji<'_, '_> = Emoji("✨ ", "");

#[derive(Parser)]
#[command(author, version, about = "Builds upload-ready wiki titles from media metadata")]
struct Cli {
  /// Verbose mode (-v, -vv, -vvv)
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// JSON file with title templates (defaults to the user config directory)
  #[arg(long, short, global = true)]
  config: Option<PathBuf>,

  /// Template for the fixed start of every title
  #[arg(long, global = true)]
  front: Option<Template>,

  /// Template for the fixed end of every title, before the extension
  #[arg(long, global = true)]
  rear: Option<Template>,

  /// Template for the part of the title that may be shortened
  #[arg(long, global = true)]
  variable: Option<Template>,

  /// Maximum title length in characters
  #[arg(long, global = true)]
  max_length: Option<usize>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build the title for one record given on the command line
  Title {
    /// Metadata field as key=value, repeatable
    #[arg(long = "meta", short, value_parser = parse_meta)]
    meta: Vec<(String, Value)>,
  },
  /// Print the titles a batch would be uploaded under, without uploading
  DryRun {
    /// Glob patterns of JSON record files
    #[arg(required = true)]
    patterns:    Vec<String>,
    /// Skip records with missing or mistyped fields instead of stopping
    #[arg(long)]
    skip_errors: bool,
  },
  /// Sanitize arbitrary text into a legal page name
  Sanitize {
    /// Text to sanitize
    text: String,
  },
}

/// Splits a `key=value` pair at the first `=`, so values may themselves contain `=`.
///
/// Returns `None` when there is no `=` or the key is empty.
fn parse_pair(pair: &str) -> Option<(String, Value)> {
  let (key, value) = pair.split_once('=')?;
  if key.is_empty() {
    return None;
  }
  Some((key.to_owned(), value.parse().unwrap_or_else(|never| match never {})))
}

/// Parses a `--meta key=value` argument.
fn parse_meta(pair: &str) -> Result<(String, Value), String> {
  parse_pair(pair).ok_or_else(|| format!("expected key=value, got {pair:?}"))
}

/// Prints each title instead of uploading it.
struct DryRun;

impl Uploader<Metadata> for DryRun {
  type Error = Infallible;

  fn upload(&mut self, record: &Metadata, title: &str) -> Result<(), Self::Error> {
    trace!("Record fields: {:?}", record.keys().collect::<Vec<_>>());
    println!("= {title} =");
    Ok(())
  }
}

/// Setup logging with the specified verbosity level
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .with_target(true)
    .init();
}

fn main() -> Result<(), UploadbotErrors> {
  let cli = Cli::parse();
  setup_logging(cli.verbose);

  let overrides = Config {
    front:      cli.front,
    rear:       cli.rear,
    variable:   cli.variable,
    max_length: cli.max_length,
  };

  match cli.command {
    Commands::Title { meta } => {
      let builder = Config::load(cli.config.as_deref())?.merge(overrides).into_builder()?;
      let metadata: Metadata = meta.into_iter().collect();
      debug!("Metadata: {:?}", metadata);

      println!("{}", builder.build(&metadata)?);
      Ok(())
    },

    Commands::DryRun { patterns, skip_errors } => {
      let builder = Config::load(cli.config.as_deref())?.merge(overrides).into_builder()?;
      let records = records::read_matching(&patterns)?;
      if records.is_empty() {
        eprintln!("{} No records found", style(WARNING).yellow());
        return Ok(());
      }

      eprintln!(
        "{} Building titles for {} records",
        style(BOOKS).cyan(),
        style(records.len()).yellow()
      );

      let policy = BatchPolicy { skip_format_errors: skip_errors };
      let mut batch = UploadBatch::new(&builder, NoDuplicates, DryRun, policy);
      let report = batch.run(records)?;

      for (index, outcome) in report.outcomes.iter().enumerate() {
        if let Outcome::Skipped { reason } = outcome {
          println!(
            "{} Skipped record {}: {}",
            style(WARNING).yellow(),
            style(index).yellow(),
            style(reason).red()
          );
        }
      }

      println!(
        "{} {} titles built, {} skipped",
        style(SUCCESS).green(),
        style(report.uploaded()).yellow(),
        style(report.skipped()).yellow()
      );
      Ok(())
    },

    Commands::Sanitize { text } => {
      println!("{}", sanitize(&text));
      Ok(())
    },
  }
}
