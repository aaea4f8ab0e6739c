//! Title templates loaded from a JSON configuration file.
//!
//! ```json
//! {
//!   "front": "%(collection)s - ",
//!   "rear": " - %(id)s",
//!   "variable": "%(description)s",
//!   "max_length": 240
//! }
//! ```
//!
//! Every field is optional in the file; values given on the command line take precedence.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;
use uploadtitle::{Template, TitleBuilder};

use crate::errors::UploadbotErrors;

/// Title settings, each of which may come from the config file or the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
  /// Fixed prefix template
  pub front:      Option<Template>,
  /// Fixed suffix template
  pub rear:       Option<Template>,
  /// Truncatable middle template
  pub variable:   Option<Template>,
  /// Bound on title length
  pub max_length: Option<usize>,
}

impl Config {
  /// Default config location in the user's configuration directory.
  pub fn default_path() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("uploadbot").join("config.json")
  }

  /// Loads the configuration.
  ///
  /// An explicitly given `path` must exist. Without one, the [default path](Self::default_path)
  /// is read if present and an empty configuration is used otherwise.
  pub fn load(path: Option<&Path>) -> Result<Self, UploadbotErrors> {
    let path = match path {
      Some(path) => path.to_path_buf(),
      None => {
        let path = Self::default_path();
        if !path.exists() {
          debug!("No config file at {}", path.display());
          return Ok(Self::default());
        }
        path
      },
    };

    debug!("Reading config from {}", path.display());
    let contents = std::fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&contents)?)
  }

  /// Overlays the values set in `overrides` onto `self`.
  pub fn merge(self, overrides: Config) -> Config {
    Config {
      front:      overrides.front.or(self.front),
      rear:       overrides.rear.or(self.rear),
      variable:   overrides.variable.or(self.variable),
      max_length: overrides.max_length.or(self.max_length),
    }
  }

  /// Builds the title builder, failing if any template is still unset.
  pub fn into_builder(self) -> Result<TitleBuilder, UploadbotErrors> {
    let front = self.front.ok_or(UploadbotErrors::MissingTemplate("front"))?;
    let rear = self.rear.ok_or(UploadbotErrors::MissingTemplate("rear"))?;
    let variable = self.variable.ok_or(UploadbotErrors::MissingTemplate("variable"))?;

    let builder = TitleBuilder::new(front, rear, variable)?;
    Ok(match self.max_length {
      Some(max_length) => builder.with_max_length(max_length)?,
      None => builder,
    })
  }
}
