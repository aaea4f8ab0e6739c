//! A library for building wiki page titles for batch media uploads.
//!
//! A title is made of three templated parts rendered against a file's metadata: a fixed front,
//! a variable middle and a fixed rear followed by the file extension. The middle is shortened at
//! word boundaries so the whole title fits within [`MAX_LENGTH`] characters, and the result is
//! normalized into a legal page name.
//!
//! # Example
//! ```rust
//! use uploadtitle::{Metadata, Template, TitleBuilder, Value};
//!
//! fn main() -> Result<(), uploadtitle::TitleError> {
//!   let builder = TitleBuilder::new(
//!     Template::parse("%(collection)s - ")?,
//!     Template::parse(" - %(id)s")?,
//!     Template::parse("%(description)s")?,
//!   )?;
//!
//!   let metadata = Metadata::from_iter([
//!     ("collection", Value::from("Nationaal Archief")),
//!     ("description", Value::from("Opening of the lock at IJmuiden")),
//!     ("id", Value::Integer(2_904)),
//!     ("_ext", Value::from("JPG")),
//!   ]);
//!   assert_eq!(
//!     builder.build(&metadata)?,
//!     "Nationaal_Archief_-_Opening_of_the_lock_at_IJmuiden_-_2904.jpg"
//!   );
//!
//!   Ok(())
//! }
//! ```

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, info, trace, warn};
#[cfg(test)] use tracing_test::traced_test;

pub mod assemble;
pub mod batch;
pub mod builder;
pub mod errors;
pub mod metadata;
pub mod sanitize;
pub mod template;
pub mod truncate;

pub use assemble::{assemble, TitleParts};
pub use builder::{build_title, TitleBuilder, MAX_LENGTH};
pub use errors::TitleError;
pub use metadata::{Metadata, Value};
pub use sanitize::sanitize;
pub use template::Template;
pub use truncate::truncate;
