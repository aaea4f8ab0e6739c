//! Composition of the assembler, truncator and sanitizer into finished titles.

use super::*;

/// Upper bound on the length of a finished title, in characters.
pub const MAX_LENGTH: usize = 240;

/// Builds the final page title for one metadata record.
///
/// The templates are rendered (see [`assemble`](crate::assemble::assemble)), the variable part is
/// shortened to fit `max_length` (see [`truncate`](crate::truncate::truncate)) and the result is
/// made into a legal page name (see [`sanitize`](crate::sanitize::sanitize)).
///
/// # Errors
///
/// Returns the assembler's [`TitleError::MissingKey`] / [`TitleError::NotAnInteger`], or the
/// truncator's [`TitleError::TitleLength`].
///
/// # Examples
///
/// ```
/// use uploadtitle::{build_title, Metadata, Template, Value, MAX_LENGTH};
///
/// let metadata = Metadata::from_iter([
///   ("description", Value::from("View of the <old> harbour")),
///   ("year", Value::Integer(1900)),
///   ("_ext", Value::from("JPG")),
/// ]);
/// let title = build_title(
///   &metadata,
///   &Template::parse("")?,
///   &Template::parse(" (%(year)s)")?,
///   &Template::parse("%(description)s")?,
///   MAX_LENGTH,
/// )?;
/// assert_eq!(title, "View_of_the_(old)_harbour_(1900).jpg");
/// # Ok::<(), uploadtitle::TitleError>(())
/// ```
pub fn build_title(
  metadata: &Metadata,
  front: &Template,
  rear: &Template,
  variable: &Template,
  max_length: usize,
) -> Result<String, TitleError> {
  let parts = assemble(metadata, front, rear, variable)?;
  let raw = truncate(&parts.front, &parts.variable, &parts.rear, max_length)?;
  let title = sanitize(&raw);
  debug!("Built title {title:?} from {raw:?}");
  Ok(title)
}

/// The three title templates of a batch together with the length bound.
///
/// Holds no other state, so one builder can be shared across threads and records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleBuilder {
  /// Fixed prefix template
  front:      Template,
  /// Fixed suffix template, followed by `.` and the extension
  rear:       Template,
  /// Template of the truncatable middle
  variable:   Template,
  /// Bound on the finished title
  max_length: usize,
}

impl TitleBuilder {
  /// Creates a builder bounded by [`MAX_LENGTH`].
  ///
  /// # Errors
  ///
  /// Returns [`TitleError::TitleLength`] if the literal text of `front` and `rear` alone, plus
  /// the dot before the extension, already exceeds the bound.
  pub fn new(front: Template, rear: Template, variable: Template) -> Result<Self, TitleError> {
    Self { front, rear, variable, max_length: MAX_LENGTH }.checked()
  }

  /// Replaces the length bound.
  ///
  /// # Errors
  ///
  /// As for [`TitleBuilder::new`].
  pub fn with_max_length(self, max_length: usize) -> Result<Self, TitleError> {
    Self { max_length, ..self }.checked()
  }

  /// The bound titles are held to.
  pub fn max_length(&self) -> usize { self.max_length }

  /// Builds the title for `metadata`, see [`build_title`].
  pub fn build(&self, metadata: &Metadata) -> Result<String, TitleError> {
    build_title(metadata, &self.front, &self.rear, &self.variable, self.max_length)
  }

  /// Rejects bounds that no record could ever satisfy.
  fn checked(self) -> Result<Self, TitleError> {
    let fixed_length = self.front.literal_len() + self.rear.literal_len() + 1;
    if fixed_length > self.max_length {
      return Err(TitleError::TitleLength { fixed_length, max_length: self.max_length });
    }
    Ok(self)
  }
}
