//! Renders the three title templates against one metadata record.

use super::*;

/// The rendered, not yet bounded, parts of a title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleParts {
  /// Fixed prefix
  pub front:    String,
  /// The only part that may be shortened
  pub variable: String,
  /// Fixed suffix, already ending in `.` and the extension
  pub rear:     String,
}

/// Renders the front, variable and rear templates for `metadata`.
///
/// The rear part gets a literal `.` and the record's extension (see [`Metadata::extension`])
/// appended after its rendered text.
///
/// # Errors
///
/// Returns [`TitleError::MissingKey`] or [`TitleError::NotAnInteger`] when a template cannot be
/// resolved against `metadata`. These are never defaulted; the caller decides whether to skip the
/// record or abort.
///
/// # Examples
///
/// ```
/// use uploadtitle::{assemble::assemble, Metadata, Template, Value};
///
/// let metadata = Metadata::from_iter([("id", Value::Integer(42)), ("_ext", Value::Null)]);
/// let parts = assemble(
///   &metadata,
///   &Template::parse("Photo ")?,
///   &Template::parse(" (%(id)s)")?,
///   &Template::parse("untitled")?,
/// )?;
/// assert_eq!(parts.rear, " (42).none");
/// # Ok::<(), uploadtitle::TitleError>(())
/// ```
pub fn assemble(
  metadata: &Metadata,
  front: &Template,
  rear: &Template,
  variable: &Template,
) -> Result<TitleParts, TitleError> {
  let front = front.render(metadata)?;
  let extension = metadata.extension();
  let rear = format!("{}.{extension}", rear.render(metadata)?);
  let variable = variable.render(metadata)?;
  Ok(TitleParts { front, variable, rear })
}
