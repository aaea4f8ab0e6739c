//! Driving a batch of records through title construction and upload.
//!
//! The title builder itself knows nothing about where files come from or where they go. A batch
//! composes it with two capabilities supplied by the caller:
//! - a [`DuplicateFinder`], asked first whether a record is already uploaded
//! - an [`Uploader`], handed the record and its finished title
//!
//! Per-record template failures are skipped or abort the run depending on [`BatchPolicy`]; a
//! [`TitleError::TitleLength`] always aborts, since the same templates would fail again.
//!
//! # Examples
//!
//! ```
//! use std::convert::Infallible;
//!
//! use uploadtitle::{
//!   batch::{BatchPolicy, NoDuplicates, UploadBatch, Uploader},
//!   Metadata, Template, TitleBuilder, Value,
//! };
//!
//! struct Collect(Vec<String>);
//!
//! impl Uploader<Metadata> for Collect {
//!   type Error = Infallible;
//!
//!   fn upload(&mut self, _record: &Metadata, title: &str) -> Result<(), Self::Error> {
//!     self.0.push(title.to_owned());
//!     Ok(())
//!   }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let builder = TitleBuilder::new(
//!   Template::parse("")?,
//!   Template::parse("")?,
//!   Template::parse("%(name)s")?,
//! )?;
//! let mut batch = UploadBatch::new(&builder, NoDuplicates, Collect(Vec::new()), BatchPolicy::default());
//! let report = batch.run([Metadata::from_iter([("name", Value::from("Harbour"))])])?;
//!
//! assert_eq!(report.uploaded(), 1);
//! assert_eq!(batch.into_uploader().0, ["Harbour.none"]);
//! # Ok(())
//! # }
//! ```

use std::error::Error as StdError;

use super::*;

/// A media item that carries metadata.
pub trait MediaRecord {
  /// The record's metadata fields.
  fn metadata(&self) -> &Metadata;
}

impl MediaRecord for Metadata {
  fn metadata(&self) -> &Metadata { self }
}

/// Looks for already uploaded copies of a record.
pub trait DuplicateFinder<R> {
  /// Names of existing files that duplicate `record`; empty when there are none.
  fn find_duplicates(&self, record: &R) -> Vec<String>;
}

/// A finder that never reports duplicates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDuplicates;

impl<R> DuplicateFinder<R> for NoDuplicates {
  fn find_duplicates(&self, _record: &R) -> Vec<String> { Vec::new() }
}

/// Sends a record to its destination under a given title.
pub trait Uploader<R> {
  /// Why an upload failed.
  type Error: StdError + 'static;

  /// Uploads `record` as `title`.
  fn upload(&mut self, record: &R, title: &str) -> Result<(), Self::Error>;
}

/// How a batch treats records whose templates cannot be resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchPolicy {
  /// Log and skip records with missing or mistyped fields instead of aborting.
  pub skip_format_errors: bool,
}

/// What happened to a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  /// The record was uploaded under this title
  Uploaded {
    /// The title used
    title: String,
  },
  /// The record already exists remotely; nothing was built or uploaded
  Duplicate {
    /// The first existing copy reported by the finder
    existing: String,
  },
  /// The record's metadata did not fit the templates
  Skipped {
    /// The error that caused the skip
    reason: TitleError,
  },
}

/// Per-record outcomes of a finished batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
  /// One entry per record
  pub outcomes: Vec<Outcome>,
}

impl BatchReport {
  /// Number of uploaded records.
  pub fn uploaded(&self) -> usize { self.count(|o| matches!(o, Outcome::Uploaded { .. })) }

  /// Number of records found to be duplicates.
  pub fn duplicates(&self) -> usize { self.count(|o| matches!(o, Outcome::Duplicate { .. })) }

  /// Number of skipped records.
  pub fn skipped(&self) -> usize { self.count(|o| matches!(o, Outcome::Skipped { .. })) }

  /// Counts outcomes matching `predicate`.
  fn count(&self, predicate: impl Fn(&Outcome) -> bool) -> usize {
    self.outcomes.iter().filter(|o| predicate(o)).count()
  }
}

/// Errors that stop a batch.
#[derive(Error, Debug)]
pub enum BatchError<E: StdError + 'static> {
  /// Title construction failed in a way the policy does not allow skipping
  #[error("Title construction failed for record {index}: {source}")]
  Title {
    /// Zero-based position of the record in the batch
    index:  usize,
    /// The underlying error
    source: TitleError,
  },

  /// The uploader rejected a record
  #[error("Upload failed for record {index}")]
  Upload {
    /// Zero-based position of the record in the batch
    index:  usize,
    /// The uploader's error
    source: E,
  },
}

/// A title builder composed with duplicate detection and an uploader.
pub struct UploadBatch<'a, D, U> {
  /// Templates and bound shared by every record
  builder:    &'a TitleBuilder,
  /// Asked before anything is built
  duplicates: D,
  /// Receives finished titles
  uploader:   U,
  /// Treatment of per-record template failures
  policy:     BatchPolicy,
}

impl<'a, D, U> UploadBatch<'a, D, U> {
  /// Composes a batch.
  pub fn new(builder: &'a TitleBuilder, duplicates: D, uploader: U, policy: BatchPolicy) -> Self {
    Self { builder, duplicates, uploader, policy }
  }

  /// Gives the uploader back, typically to inspect what it did.
  pub fn into_uploader(self) -> U { self.uploader }

  /// Processes `records` in order.
  ///
  /// For each record the duplicate finder is consulted first; a duplicate is reported with the
  /// first existing name and nothing else happens to it. Otherwise the title is built and the
  /// record uploaded.
  ///
  /// # Errors
  ///
  /// Stops at the first [`BatchError`]: an upload failure, a [`TitleError::TitleLength`], or a
  /// template failure when [`BatchPolicy::skip_format_errors`] is off.
  pub fn run<R, I>(
    &mut self,
    records: I,
  ) -> Result<BatchReport, BatchError<<U as Uploader<R>>::Error>>
  where
    R: MediaRecord,
    I: IntoIterator<Item = R>,
    D: DuplicateFinder<R>,
    U: Uploader<R>, {
    let mut report = BatchReport::default();

    for (index, record) in records.into_iter().enumerate() {
      if let Some(existing) = self.duplicates.find_duplicates(&record).into_iter().next() {
        info!("Skipping duplicate of {existing:?}");
        report.outcomes.push(Outcome::Duplicate { existing });
        continue;
      }

      let title = match self.builder.build(record.metadata()) {
        Ok(title) => title,
        Err(e) if e.is_format_error() && self.policy.skip_format_errors => {
          warn!("Skipping record {index}: {e}");
          report.outcomes.push(Outcome::Skipped { reason: e });
          continue;
        },
        Err(source) => return Err(BatchError::Title { index, source }),
      };

      self
        .uploader
        .upload(&record, &title)
        .map_err(|source| BatchError::Upload { index, source })?;
      info!("Uploaded record {index} as {title:?}");
      report.outcomes.push(Outcome::Uploaded { title });
    }

    Ok(report)
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::Cell, fmt};

  use super::*;

  /// Records every upload, failing on a chosen title.
  #[derive(Default)]
  struct Recorder {
    titles:  Vec<String>,
    fail_on: Option<String>,
  }

  #[derive(Debug)]
  struct Rejected;

  impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("rejected") }
  }

  impl StdError for Rejected {}

  impl Uploader<Metadata> for Recorder {
    type Error = Rejected;

    fn upload(&mut self, _record: &Metadata, title: &str) -> Result<(), Self::Error> {
      if self.fail_on.as_deref() == Some(title) {
        return Err(Rejected);
      }
      self.titles.push(title.to_owned());
      Ok(())
    }
  }

  /// Treats records with a `known` field as already uploaded and counts lookups.
  #[derive(Default)]
  struct KnownField {
    lookups: Cell<usize>,
  }

  impl DuplicateFinder<Metadata> for KnownField {
    fn find_duplicates(&self, record: &Metadata) -> Vec<String> {
      self.lookups.set(self.lookups.get() + 1);
      match record.get("known") {
        Some(Value::Text(name)) => vec![name.clone(), "other.jpg".into()],
        _ => Vec::new(),
      }
    }
  }

  fn builder() -> TitleBuilder {
    TitleBuilder::new(
      Template::parse("").unwrap(),
      Template::parse(" (%(year)s)").unwrap(),
      Template::parse("%(name)s").unwrap(),
    )
    .unwrap()
  }

  fn record(name: &str, year: i64) -> Metadata {
    Metadata::from_iter([("name", Value::from(name)), ("year", Value::from(year))])
  }

  #[test]
  fn test_uploads_in_order() {
    let builder = builder();
    let mut batch =
      UploadBatch::new(&builder, NoDuplicates, Recorder::default(), BatchPolicy::default());
    let report = batch.run([record("Dam", 1890), record("Canal", 1905)]).unwrap();

    assert_eq!(report.uploaded(), 2);
    assert_eq!(batch.into_uploader().titles, ["Dam_(1890).none", "Canal_(1905).none"]);
  }

  #[test]
  fn test_duplicate_short_circuits() {
    let builder = builder();
    let finder = KnownField::default();
    let mut duplicate = Metadata::new();
    duplicate.insert("known", "Existing.jpg");

    let mut batch = UploadBatch::new(&builder, finder, Recorder::default(), BatchPolicy::default());
    // The duplicate has no `name`, so building a title for it would fail.
    let report = batch.run([duplicate, record("Dam", 1890)]).unwrap();

    assert_eq!(report.outcomes[0], Outcome::Duplicate { existing: "Existing.jpg".into() });
    assert_eq!(report.duplicates(), 1);
    assert_eq!(report.uploaded(), 1);
    assert_eq!(batch.duplicates.lookups.get(), 2);
  }

  #[test]
  fn test_format_error_policy() {
    let builder = builder();
    let records = || [record("Dam", 1890), Metadata::from_iter([("name", "No year")])];

    let mut strict =
      UploadBatch::new(&builder, NoDuplicates, Recorder::default(), BatchPolicy::default());
    match strict.run(records()) {
      Err(BatchError::Title { index: 1, source }) => {
        assert_eq!(source, TitleError::MissingKey { key: "year".into() })
      },
      other => panic!("expected a title error, got {other:?}"),
    }

    let policy = BatchPolicy { skip_format_errors: true };
    let mut lenient = UploadBatch::new(&builder, NoDuplicates, Recorder::default(), policy);
    let report = lenient.run(records()).unwrap();
    assert_eq!(report.uploaded(), 1);
    assert_eq!(report.skipped(), 1);
  }

  #[test]
  fn test_title_length_always_aborts() {
    let builder = TitleBuilder::new(
      Template::parse("").unwrap(),
      Template::parse("%(id)s").unwrap(),
      Template::parse("%(name)s").unwrap(),
    )
    .unwrap()
    .with_max_length(10)
    .unwrap();
    let long_id = Metadata::from_iter([("id", "0123456789"), ("name", "x")]);

    let policy = BatchPolicy { skip_format_errors: true };
    let mut batch = UploadBatch::new(&builder, NoDuplicates, Recorder::default(), policy);
    match batch.run([long_id]) {
      Err(BatchError::Title { index: 0, source }) => assert!(source.is_fatal()),
      other => panic!("expected a fatal title error, got {other:?}"),
    }
  }

  #[test]
  fn test_upload_failure_stops_batch() {
    let builder = builder();
    let uploader = Recorder { fail_on: Some("Dam_(1890).none".into()), ..Default::default() };
    let mut batch = UploadBatch::new(&builder, NoDuplicates, uploader, BatchPolicy::default());

    let result = batch.run([record("Canal", 1905), record("Dam", 1890), record("Lock", 1911)]);
    assert!(matches!(result, Err(BatchError::Upload { index: 1, .. })));
    assert_eq!(batch.into_uploader().titles, ["Canal_(1905).none"]);
  }
}
