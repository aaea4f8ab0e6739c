//! Loading metadata records from JSON files.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, warn};
use uploadtitle::Metadata;

use crate::errors::UploadbotErrors;

/// A record file holds either one record or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum RecordFile {
  /// A single JSON object
  One(Metadata),
  /// A JSON array of objects
  Many(Vec<Metadata>),
}

/// Reads the records in one file.
pub fn read_records(path: &Path) -> Result<Vec<Metadata>, UploadbotErrors> {
  let contents = std::fs::read_to_string(path)?;
  let records = match serde_json::from_str(&contents)? {
    RecordFile::One(record) => vec![record],
    RecordFile::Many(records) => records,
  };
  debug!("Read {} records from {}", records.len(), path.display());
  Ok(records)
}

/// Reads the records of every file matching any of `patterns`, in pattern then path order.
pub fn read_matching(patterns: &[String]) -> Result<Vec<Metadata>, UploadbotErrors> {
  let mut records = Vec::new();
  for pattern in patterns {
    let mut matched = false;
    for path in glob::glob(pattern)? {
      records.extend(read_records(&path?)?);
      matched = true;
    }
    if !matched {
      warn!("Pattern {pattern:?} matched no files");
    }
  }
  Ok(records)
}

#[cfg(test)]
mod tests {
  use uploadtitle::Value;

  use super::*;

  #[test]
  fn test_read_single_and_list() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("a.json"), r#"{"title": "Dam", "year": 1890}"#)?;
    std::fs::write(dir.path().join("b.json"), r#"[{"title": "Canal"}, {"title": "Lock"}]"#)?;

    let pattern = dir.path().join("*.json").display().to_string();
    let records = read_matching(&[pattern])?;

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].get("year"), Some(&Value::Integer(1890)));
    assert_eq!(records[2].get("title"), Some(&Value::Text("Lock".into())));
    Ok(())
  }

  #[test]
  fn test_invalid_json() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "[1, 2")?;

    assert!(matches!(read_records(&path), Err(UploadbotErrors::Json(_))));
    Ok(())
  }
}
