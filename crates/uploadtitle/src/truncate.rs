//! Word-preserving truncation of the variable part of a title.
//!
//! Only the middle of a title may shrink. Whole words are dropped from its end, one more per
//! step, and `...` marks the cut. The step-by-step behaviour is deliberate: other tools reproduce
//! titles made this way, so which words survive must not change.
//!
//! # Examples
//!
//! ```
//! use uploadtitle::truncate::truncate;
//!
//! let title = truncate("File:", "A rather long description", ".jpg", 20)?;
//! assert_eq!(title, "File:A rather....jpg");
//! # Ok::<(), uploadtitle::TitleError>(())
//! ```

use super::*;

/// Marker appended to a shortened variable part.
pub const ELLIPSIS: &str = "...";

/// Joins `front`, `variable` and `rear` into a title of at most `max_length` characters.
///
/// While the variable part is too long, it is rebuilt from the leading words of the original
/// (split on whitespace and joined with single spaces) followed by [`ELLIPSIS`], dropping one
/// more trailing word each time. A word is never split. Lengths are counted in characters.
///
/// # Errors
///
/// Returns [`TitleError::TitleLength`] when even an empty variable part followed by the ellipsis
/// cannot fit next to `front` and `rear`. This points at the templates, not at the record.
pub fn truncate(
  front: &str,
  variable: &str,
  rear: &str,
  max_length: usize,
) -> Result<String, TitleError> {
  let fixed_length = char_len(front) + char_len(rear);
  let available = max_length.checked_sub(fixed_length);
  let fits = |text: &str| available.is_some_and(|available| char_len(text) <= available);

  let words: Vec<&str> = variable.split_whitespace().collect();
  let mut shortened = variable.to_owned();
  let mut dropped = 1;
  while !fits(&shortened) {
    if dropped > words.len() {
      return Err(TitleError::TitleLength { fixed_length, max_length });
    }
    shortened = format!("{}{ELLIPSIS}", words[..words.len() - dropped].join(" "));
    dropped += 1;
  }
  if dropped > 1 {
    trace!("Dropped {} trailing words from {variable:?}", dropped - 1);
  }

  let title = format!("{front}{shortened}{rear}");
  debug_assert!(char_len(&title) <= max_length);
  Ok(title)
}

/// Length of `text` in characters.
pub(crate) fn char_len(text: &str) -> usize { text.chars().count() }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_short_variable_untouched() {
    assert_eq!(truncate("File:", "Harbour", ".jpg", 240).unwrap(), "File:Harbour.jpg");
    assert_eq!(truncate("", "", "", 0).unwrap(), "");
  }

  #[test]
  fn test_long_description() {
    let title = truncate(
      "File:",
      "A very long description with many repeated words many times over",
      "_(1900).jpg",
      40,
    )
    .unwrap();
    assert_eq!(title, "File:A very long..._(1900).jpg");
    assert!(title.chars().count() <= 40);
    assert!(title.ends_with("..._(1900).jpg"));
  }

  #[test]
  fn test_drops_one_word_at_a_time() {
    // "one two three" is 13 characters; 12 leaves room for "one two..." (10).
    assert_eq!(truncate("", "one two three", "", 12).unwrap(), "one two...");
    assert_eq!(truncate("", "one two three", "", 9).unwrap(), "one...");
    assert_eq!(truncate("", "one two three", "", 3).unwrap(), "...");
  }

  #[test]
  fn test_whitespace_runs_become_single_spaces() {
    assert_eq!(truncate("", "a  b\tc   d", "", 8).unwrap(), "a b c...");
  }

  #[test]
  fn test_counts_characters_not_bytes() {
    // Eight characters, sixteen bytes.
    assert_eq!(truncate("", "ÅÅÅÅ ÖÖÖ", "", 8).unwrap(), "ÅÅÅÅ ÖÖÖ");
  }

  #[test]
  fn test_no_room_is_an_error() {
    assert_eq!(
      truncate("0123456789", "word", "0123456789", 15),
      Err(TitleError::TitleLength { fixed_length: 20, max_length: 15 })
    );
    // Room for the fixed parts but not for the ellipsis.
    assert_eq!(
      truncate("ab", "word", "cd", 6),
      Err(TitleError::TitleLength { fixed_length: 4, max_length: 6 })
    );
    // An empty variable part still has to leave the fixed parts within bounds.
    assert!(truncate("abc", "", "def", 5).unwrap_err().is_fatal());
  }

  #[test]
  fn test_result_is_bounded_and_whole_words() {
    let variable = "the quick brown fox jumps over the lazy dog near the riverbank";
    let words: Vec<&str> = variable.split_whitespace().collect();
    for max_length in 10..=80 {
      let title = truncate("[", variable, "].png", max_length).unwrap();
      assert!(title.chars().count() <= max_length, "{title} > {max_length}");

      let middle = &title[1..title.len() - "].png".len()];
      if middle != variable {
        let kept = middle.strip_suffix(ELLIPSIS).unwrap();
        let kept_words: Vec<&str> = kept.split_whitespace().collect();
        assert_eq!(kept_words, words[..kept_words.len()]);
      }
    }
  }
}
