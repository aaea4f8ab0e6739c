//! Named-placeholder templates for the parts of a title.
//!
//! Title formats are written in the percent style used by existing upload configurations:
//! `%(name)s` inserts the metadata field `name`, `%(name)d` inserts it as an integer and `%%` is a
//! literal percent sign. The format string is parsed once, up front, so syntax errors surface when
//! a batch is configured rather than halfway through it.
//!
//! # Examples
//!
//! ```
//! use uploadtitle::{Metadata, Template, Value};
//!
//! let template = Template::parse("%(place)s, %(year)d (100%%)")?;
//! assert_eq!(template.placeholders().collect::<Vec<_>>(), ["place", "year"]);
//!
//! // Text that merely looks numeric is not an integer.
//! let metadata: Metadata = [("place", "Leiden"), ("year", "1900")].into_iter().collect();
//! assert!(template.render(&metadata).is_err());
//!
//! let metadata = Metadata::from_iter([("place", Value::from("Leiden")), ("year", Value::Integer(1900))]);
//! assert_eq!(template.render(&metadata)?, "Leiden, 1900 (100%)");
//! # Ok::<(), uploadtitle::TitleError>(())
//! ```

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::*;

/// How a placeholder's value is converted to text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Conversion {
  /// `s`: the value's display form
  Display,
  /// `d`: the value as a whole number
  Integer,
}

/// One parsed piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
  /// Text copied verbatim, with `%%` already unescaped
  Literal(String),
  /// A `%(key)s` or `%(key)d` reference
  Placeholder { key: String, conversion: Conversion },
}

/// A parsed title format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
  /// The format string as written
  source:   String,
  /// The parsed pieces, in order
  segments: Vec<Segment>,
}

impl Template {
  /// Parses a percent-style format string.
  ///
  /// # Errors
  ///
  /// Returns [`TitleError::MalformedTemplate`] for an unterminated or empty placeholder, a
  /// missing or unsupported conversion character, or a lone `%`.
  pub fn parse(source: &str) -> Result<Self, TitleError> {
    let malformed = |position, reason| TitleError::MalformedTemplate {
      template: source.to_owned(),
      position,
      reason,
    };

    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = source.chars().enumerate();

    while let Some((position, c)) = chars.next() {
      if c != '%' {
        literal.push(c);
        continue;
      }
      match chars.next() {
        Some((_, '%')) => literal.push('%'),
        Some((_, '(')) => {
          let mut key = String::new();
          loop {
            match chars.next() {
              Some((_, ')')) => break,
              Some((_, c)) => key.push(c),
              None => return Err(malformed(position, "unterminated placeholder")),
            }
          }
          if key.is_empty() {
            return Err(malformed(position, "empty placeholder name"));
          }
          let conversion = match chars.next() {
            Some((_, 's')) => Conversion::Display,
            Some((_, 'd')) => Conversion::Integer,
            Some(_) => return Err(malformed(position, "unsupported conversion, expected `s` or `d`")),
            None => return Err(malformed(position, "missing conversion after placeholder")),
          };
          if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
          }
          segments.push(Segment::Placeholder { key, conversion });
        },
        _ => return Err(malformed(position, "`%` must start a placeholder or be written `%%`")),
      }
    }
    if !literal.is_empty() {
      segments.push(Segment::Literal(literal));
    }

    Ok(Self { source: source.to_owned(), segments })
  }

  /// The format string this template was parsed from.
  pub fn as_str(&self) -> &str { &self.source }

  /// Number of characters the template contributes on its own, placeholders excluded.
  pub fn literal_len(&self) -> usize {
    self
      .segments
      .iter()
      .map(|segment| match segment {
        Segment::Literal(text) => text.chars().count(),
        Segment::Placeholder { .. } => 0,
      })
      .sum()
  }

  /// Names of the metadata fields this template references, in order of appearance.
  pub fn placeholders(&self) -> impl Iterator<Item = &str> {
    self.segments.iter().filter_map(|segment| match segment {
      Segment::Placeholder { key, .. } => Some(key.as_str()),
      Segment::Literal(_) => None,
    })
  }

  /// Checks that `metadata` has a field for every placeholder.
  ///
  /// # Errors
  ///
  /// Returns [`TitleError::MissingKey`] for the first placeholder without a field.
  pub fn validate(&self, metadata: &Metadata) -> Result<(), TitleError> {
    match self.placeholders().find(|key| !metadata.contains_key(key)) {
      Some(key) => Err(TitleError::MissingKey { key: key.to_owned() }),
      None => Ok(()),
    }
  }

  /// Substitutes `metadata` into the template.
  ///
  /// # Errors
  ///
  /// Returns [`TitleError::MissingKey`] if a placeholder has no field, or
  /// [`TitleError::NotAnInteger`] if a `%(key)d` field is not numeric.
  pub fn render(&self, metadata: &Metadata) -> Result<String, TitleError> {
    self.validate(metadata)?;

    let mut rendered = String::with_capacity(self.source.len());
    for segment in &self.segments {
      match segment {
        Segment::Literal(text) => rendered.push_str(text),
        Segment::Placeholder { key, conversion } => {
          let value =
            metadata.get(key).ok_or_else(|| TitleError::MissingKey { key: key.clone() })?;
          match conversion {
            Conversion::Display => rendered.push_str(&value.to_string()),
            Conversion::Integer => {
              let number =
                value.as_integer().ok_or_else(|| TitleError::NotAnInteger { key: key.clone() })?;
              rendered.push_str(&number.to_string());
            },
          }
        },
      }
    }
    Ok(rendered)
  }
}

impl FromStr for Template {
  type Err = TitleError;

  fn from_str(s: &str) -> Result<Self, Self::Err> { Template::parse(s) }
}

impl fmt::Display for Template {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.source) }
}

impl Serialize for Template {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.source)
  }
}

impl<'de> Deserialize<'de> for Template {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let source = String::deserialize(deserializer)?;
    Template::parse(&source).map_err(serde::de::Error::custom)
  }
}
