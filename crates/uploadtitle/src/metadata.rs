//! Metadata records describing a single media file.
//!
//! A record maps field names to values, typically deserialized from the JSON produced by a
//! metadata harvester. One key is reserved: `_ext` holds the file extension that ends up after
//! the final dot of the title.
//!
//! # Examples
//!
//! ```
//! use uploadtitle::metadata::{Metadata, Value};
//!
//! let metadata: Metadata = serde_json::from_str(r#"{"title": "Harbour", "year": 1900, "_ext": "JPG"}"#)?;
//! assert_eq!(metadata.get("year"), Some(&Value::Integer(1900)));
//! assert_eq!(metadata.extension(), "jpg");
//! # Ok::<(), serde_json::Error>(())
//! ```

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Reserved metadata key holding the file extension.
pub const EXTENSION_KEY: &str = "_ext";

/// Extension used when a record carries none.
pub const DEFAULT_EXTENSION: &str = "none";

/// A single metadata value.
///
/// Harvested records are mostly scalars, but they may also carry booleans, lists and nested
/// objects. Those are kept so a record with fields the templates never reference still loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
  /// A whole number, such as a year or an inventory number
  Integer(i64),
  /// A fractional number
  Float(f64),
  /// A flag
  Bool(bool),
  /// Free text
  Text(String),
  /// A list of values
  List(Vec<Value>),
  /// A nested object
  Map(BTreeMap<String, Value>),
  /// An explicitly empty field
  Null,
}

impl Value {
  /// Returns the value as an integer, truncating floats toward zero.
  ///
  /// Booleans count as `0` and `1`.
  pub fn as_integer(&self) -> Option<i64> {
    match self {
      Value::Integer(i) => Some(*i),
      Value::Float(f) if f.is_finite() => Some(f.trunc() as i64),
      Value::Bool(b) => Some(i64::from(*b)),
      _ => None,
    }
  }

  /// Returns `true` for [`Value::Null`].
  pub fn is_null(&self) -> bool { matches!(self, Value::Null) }

  /// Writes the value the way it appears inside a list or object: text is quoted.
  fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Text(s) if s.contains('\'') && !s.contains('"') => write!(f, "\"{s}\""),
      Value::Text(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
      other => write!(f, "{other}"),
    }
  }
}

/// Formats a float with the shortest digits that round-trip, switching to exponent notation
/// below `1e-4` and from `1e16` on. Exponents carry a sign and at least two digits.
fn format_float(x: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
  if x.is_nan() {
    return f.write_str("nan");
  }
  if x.is_infinite() {
    return f.write_str(if x > 0.0 { "inf" } else { "-inf" });
  }

  let scientific = format!("{x:e}");
  let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
  let exponent: i32 = exponent.parse().unwrap_or(0);
  if (-4..16).contains(&exponent) {
    let fixed = x.to_string();
    if fixed.contains('.') {
      f.write_str(&fixed)
    } else {
      write!(f, "{fixed}.0")
    }
  } else {
    let sign = if exponent < 0 { '-' } else { '+' };
    write!(f, "{mantissa}e{sign}{:02}", exponent.unsigned_abs())
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Integer(i) => write!(f, "{i}"),
      Value::Float(x) => format_float(*x, f),
      Value::Bool(true) => f.write_str("True"),
      Value::Bool(false) => f.write_str("False"),
      Value::Text(s) => f.write_str(s),
      Value::List(items) => {
        f.write_str("[")?;
        for (i, item) in items.iter().enumerate() {
          if i > 0 {
            f.write_str(", ")?;
          }
          item.fmt_nested(f)?;
        }
        f.write_str("]")
      },
      Value::Map(fields) => {
        f.write_str("{")?;
        for (i, (key, value)) in fields.iter().enumerate() {
          if i > 0 {
            f.write_str(", ")?;
          }
          Value::Text(key.clone()).fmt_nested(f)?;
          f.write_str(": ")?;
          value.fmt_nested(f)?;
        }
        f.write_str("}")
      },
      Value::Null => f.write_str("None"),
    }
  }
}

impl FromStr for Value {
  type Err = std::convert::Infallible;

  /// Canonical integers parse as [`Value::Integer`]; everything else is kept as text.
  ///
  /// Strings such as `"007"` or `"+12"` stay text, so rendering them gives back what was typed.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Ok(match s.parse::<i64>() {
      Ok(i) if i.to_string() == s => Value::Integer(i),
      _ => Value::Text(s.to_owned()),
    })
  }
}

impl From<&str> for Value {
  fn from(s: &str) -> Self { Value::Text(s.to_owned()) }
}

impl From<String> for Value {
  fn from(s: String) -> Self { Value::Text(s) }
}

impl From<i64> for Value {
  fn from(i: i64) -> Self { Value::Integer(i) }
}

impl From<f64> for Value {
  fn from(x: f64) -> Self { Value::Float(x) }
}

impl From<bool> for Value {
  fn from(b: bool) -> Self { Value::Bool(b) }
}

impl<T: Into<Value>> From<Option<T>> for Value {
  fn from(value: Option<T>) -> Self { value.map_or(Value::Null, Into::into) }
}

/// The metadata of one media file, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, Value>);

impl Metadata {
  /// Creates an empty record.
  pub fn new() -> Self { Self::default() }

  /// Sets `key` to `value`, returning the previous value if there was one.
  pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
    self.0.insert(key.into(), value.into())
  }

  /// Looks up a field.
  pub fn get(&self, key: &str) -> Option<&Value> { self.0.get(key) }

  /// Whether the record has a field named `key`, even if it is null.
  pub fn contains_key(&self, key: &str) -> bool { self.0.contains_key(key) }

  /// Field names in sorted order.
  pub fn keys(&self) -> impl Iterator<Item = &str> { self.0.keys().map(String::as_str) }

  /// Resolves the file extension from the reserved `_ext` field.
  ///
  /// The extension is lowercased. A missing or null field yields [`DEFAULT_EXTENSION`].
  pub fn extension(&self) -> String {
    match self.get(EXTENSION_KEY) {
      Some(value) if !value.is_null() => value.to_string().to_lowercase(),
      _ => DEFAULT_EXTENSION.to_owned(),
    }
  }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Metadata {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Metadata(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_extension_resolution() {
    let mut metadata = Metadata::new();
    assert_eq!(metadata.extension(), "none");

    metadata.insert(EXTENSION_KEY, Value::Null);
    assert_eq!(metadata.extension(), "none");

    metadata.insert(EXTENSION_KEY, "TIFF");
    assert_eq!(metadata.extension(), "tiff");

    metadata.insert(EXTENSION_KEY, Option::<&str>::None);
    assert_eq!(metadata.extension(), "none");
  }

  #[test]
  fn test_deserialize_mixed_values() {
    let metadata: Metadata =
      serde_json::from_str(r#"{"a": "text", "b": 12, "c": 1.5, "_ext": null}"#).unwrap();
    assert_eq!(metadata.get("a"), Some(&Value::Text("text".into())));
    assert_eq!(metadata.get("b"), Some(&Value::Integer(12)));
    assert_eq!(metadata.get("c"), Some(&Value::Float(1.5)));
    assert_eq!(metadata.get("_ext"), Some(&Value::Null));
    assert!(metadata.contains_key("_ext"));
    assert_eq!(metadata.extension(), "none");
  }

  #[test]
  fn test_deserialize_booleans_and_nested_values() {
    let metadata: Metadata = serde_json::from_str(
      r#"{"title": "Dam", "public": true, "tags": ["dam", 3], "source": {"id": 7}, "_ext": "jpg"}"#,
    )
    .unwrap();
    assert_eq!(metadata.get("public"), Some(&Value::Bool(true)));
    assert_eq!(metadata.get("public").map(ToString::to_string).as_deref(), Some("True"));
    assert_eq!(metadata.get("tags").map(ToString::to_string).as_deref(), Some("['dam', 3]"));
    assert_eq!(metadata.get("source").map(ToString::to_string).as_deref(), Some("{'id': 7}"));
    assert_eq!(metadata.get("title"), Some(&Value::Text("Dam".into())));
    assert_eq!(metadata.extension(), "jpg");
  }

  #[test]
  fn test_value_display() {
    assert_eq!(Value::Integer(1900).to_string(), "1900");
    assert_eq!(Value::Text("Harbour".into()).to_string(), "Harbour");
    assert_eq!(Value::Bool(false).to_string(), "False");
    assert_eq!(Value::Null.to_string(), "None");
  }

  #[test]
  fn test_float_display() {
    assert_eq!(Value::Float(2.0).to_string(), "2.0");
    assert_eq!(Value::Float(1.5).to_string(), "1.5");
    assert_eq!(Value::Float(0.0001).to_string(), "0.0001");
    assert_eq!(Value::Float(1e15).to_string(), "1000000000000000.0");
    assert_eq!(Value::Float(1e16).to_string(), "1e+16");
    assert_eq!(Value::Float(1e-5).to_string(), "1e-05");
    assert_eq!(Value::Float(-2.5e-7).to_string(), "-2.5e-07");
    assert_eq!(Value::Float(1.5e300).to_string(), "1.5e+300");
    assert_eq!(Value::Float(f64::INFINITY).to_string(), "inf");
  }

  #[test]
  fn test_parse_keeps_non_canonical_integers_as_text() {
    assert_eq!("1900".parse::<Value>(), Ok(Value::Integer(1900)));
    assert_eq!("-3".parse::<Value>(), Ok(Value::Integer(-3)));
    assert_eq!("007".parse::<Value>(), Ok(Value::Text("007".into())));
    assert_eq!("+12".parse::<Value>(), Ok(Value::Text("+12".into())));
    assert_eq!("-0".parse::<Value>(), Ok(Value::Text("-0".into())));
    assert_eq!("1.5".parse::<Value>(), Ok(Value::Text("1.5".into())));
  }

  #[test]
  fn test_as_integer() {
    assert_eq!(Value::Float(-2.7).as_integer(), Some(-2));
    assert_eq!(Value::Bool(true).as_integer(), Some(1));
    assert_eq!(Value::Text("12".into()).as_integer(), None);
    assert_eq!(Value::List(vec![]).as_integer(), None);
  }
}
