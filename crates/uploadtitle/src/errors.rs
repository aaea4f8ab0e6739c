//! Error types for the uploadtitle library.
//!
//! Title construction has exactly two ways to go wrong at run time, and they mean very different
//! things to a batch driver:
//! - A template refers to metadata that a record does not carry (or carries with the wrong shape).
//!   This is reported per record and the driver may choose to skip that record.
//! - The fixed front and rear parts of a title leave no room for the variable part. The same
//!   templates apply to every record in a batch, so this is a configuration defect and the batch
//!   should halt.
//!
//! Malformed template syntax is caught earlier, when a [`Template`](crate::template::Template) is
//! parsed.
//!
//! # Examples
//!
//! ```
//! use uploadtitle::{build_title, errors::TitleError, Metadata, Template, MAX_LENGTH};
//!
//! # fn example() -> Result<(), TitleError> {
//! let front = Template::parse("%(collection)s - ")?;
//! let rear = Template::parse(" - %(id)s")?;
//! let variable = Template::parse("%(description)s")?;
//!
//! match build_title(&Metadata::new(), &front, &rear, &variable, MAX_LENGTH) {
//!   Err(TitleError::MissingKey { key }) => println!("record lacks `{key}`"),
//!   Err(e) if e.is_fatal() => return Err(e),
//!   Err(e) => println!("skipping record: {e}"),
//!   Ok(title) => println!("{title}"),
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

/// Errors that can occur while building a title.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TitleError {
  /// A format string could not be parsed into a template.
  ///
  /// This occurs when:
  /// - A `%(` placeholder is never closed
  /// - A placeholder has an empty name
  /// - A placeholder is missing its conversion character, or uses one other than `s` or `d`
  /// - A lone `%` is not followed by `(` or another `%`
  ///
  /// `position` is the character offset of the offending `%` in `template`.
  #[error("Malformed template {template:?} at character {position}: {reason}")]
  MalformedTemplate {
    /// The format string as given
    template: String,
    /// Character offset of the offending placeholder
    position: usize,
    /// What was wrong with it
    reason:   &'static str,
  },

  /// A template references a metadata key that the record does not have.
  #[error("Metadata has no value for template key `{key}`")]
  MissingKey {
    /// The placeholder name that could not be resolved
    key: String,
  },

  /// A `%(key)d` placeholder resolved to a value that is not a number.
  #[error("Metadata value for template key `{key}` is not a number")]
  NotAnInteger {
    /// The placeholder name whose value was rejected
    key: String,
  },

  /// The fixed parts of the title alone leave no room for the variable part.
  ///
  /// `fixed_length` counts the characters of the front and rear parts (the rear already
  /// including its extension). Truncating the variable part cannot fix this.
  #[error("Fixed title parts are {fixed_length} characters, which leaves no room within {max_length}")]
  TitleLength {
    /// Characters taken by the front and rear parts
    fixed_length: usize,
    /// The bound the title had to fit in
    max_length:   usize,
  },
}

impl TitleError {
  /// Whether this error should stop a whole batch rather than a single record.
  ///
  /// Only [`TitleError::TitleLength`] qualifies: the same templates are applied to every record,
  /// so once the fixed parts overflow for one record they are almost certainly a configuration
  /// problem for all of them.
  pub fn is_fatal(&self) -> bool { matches!(self, TitleError::TitleLength { .. }) }

  /// Whether this error came from resolving a template against one record's metadata.
  pub fn is_format_error(&self) -> bool {
    matches!(self, TitleError::MissingKey { .. } | TitleError::NotAnInteger { .. })
  }
}
