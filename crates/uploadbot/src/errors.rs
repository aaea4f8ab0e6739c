//! Error types for the uploadbot CLI application.
//!
//! This module wraps every failure the CLI can hit into one type:
//! - Title construction errors from the uploadtitle library
//! - A batch stopped by a fatal record
//! - Reading configuration and record files
//! - Expanding input glob patterns
//!
//! The wrapped errors are transparent so the original message reaches the user unchanged.

use std::convert::Infallible;

use thiserror::Error;
use uploadtitle::batch::BatchError;

/// Errors that can occur during CLI operations.
#[derive(Error, Debug)]
pub enum UploadbotErrors {
  /// Errors from building a single title
  #[error(transparent)]
  Title(#[from] uploadtitle::TitleError),

  /// A batch aborted on one of its records
  #[error(transparent)]
  Batch(#[from] BatchError<Infallible>),

  /// File system and IO operation errors
  #[error(transparent)]
  IO(#[from] std::io::Error),

  /// Configuration or record files that are not valid JSON of the expected shape
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// Glob pattern syntax errors
  #[error(transparent)]
  Pattern(#[from] glob::PatternError),

  /// A path matched by a glob could not be read
  #[error(transparent)]
  Glob(#[from] glob::GlobError),

  /// Neither the configuration file nor the command line supplied a template
  #[error("No {0} template configured, pass --{0} or set `{0}` in the config file")]
  MissingTemplate(&'static str),
}
