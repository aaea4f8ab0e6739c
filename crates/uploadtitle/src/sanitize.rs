//! Normalization of titles into legal wiki page names.
//!
//! MediaWiki rejects or mangles page names containing brackets, braces, some punctuation and
//! control characters. [`sanitize`] rewrites a title through a fixed sequence of substitutions so
//! the result is always acceptable. The rules are order dependent: each sees the output of the one
//! before, and several only make sense after an earlier rule has run (the separator collapsing
//! rules clean up after the punctuation replacements, for instance).
//!
//! # Examples
//!
//! ```
//! use uploadtitle::sanitize::sanitize;
//!
//! assert_eq!(sanitize("a <b> c"), "a_(b)_c");
//! assert_eq!(sanitize("Hello   World\n\n"), "Hello_World");
//! assert_eq!(sanitize("Rotterdam: harbour & docks?"), "Rotterdam,_harbour_^_docks");
//! ```

use super::*;

/// One step of the sanitization pipeline.
struct Rule {
  /// Short name used in trace output
  name:        &'static str,
  /// What to look for
  pattern:     Regex,
  /// Replacement text, may refer to capture groups as `${1}`
  replacement: &'static str,
}

impl Rule {
  /// Compiles a rule. Patterns are fixed at compile time, so failure is a programming error.
  fn new(name: &'static str, pattern: &str, replacement: &'static str) -> Self {
    Self { name, pattern: Regex::new(pattern).unwrap(), replacement }
  }

  /// A rule matching `needle` literally.
  fn literal(name: &'static str, needle: &str, replacement: &'static str) -> Self {
    Self::new(name, &regex::escape(needle), replacement)
  }
}

lazy_static! {
  /// The ordered pipeline applied after trimming.
  static ref RULES: Vec<Rule> = vec![
    Rule::new("leading dash", r"^- ", ""),
    Rule::new("leading spaced dash", r"^ - ", ""),
    Rule::new("open brackets", r"[<{\[]", "("),
    Rule::new("close brackets", r"[>}\]]", ")"),
    Rule::new("exclamation marker", r"[ _]?\(!\)", ""),
    Rule::new("comma colon", r",:[ _]", ", "),
    Rule::new("semicolon or colon", r"[;:][ _]", ", "),
    Rule::new("tab newline space runs", r"[\t\n ]+", " "),
    Rule::new("carriage return runs", r"[\r\n ]+", " "),
    Rule::new("newline runs", r"\n+", ""),
    Rule::new("question or exclamation at end", r#"[?!]([."]|$)"#, "${1}"),
    Rule::new("reserved punctuation", r"[&#%?!]", "^"),
    Rule::new("semicolon", r";", ","),
    Rule::new("path separators", r"[/+\\:]", "-"),
    Rule::new("dash runs", r"--+", "-"),
    Rule::new("comma runs", r",,+", ","),
    Rule::new("space before commas", r" ,+", ","),
    Rule::new("separator at end", r"[-,^]([.]|$)", "${1}"),
    Rule::literal("double space", "  ", " "),
    Rule::literal("spaces", " ", "_"),
    Rule::literal("dash underscore dash", "-_-", "-"),
  ];
}

/// Rewrites `title` into a legal page name.
///
/// Never fails. After trimming surrounding whitespace, the rules are applied in this order:
/// 1. strip one leading `"- "`, then one leading `" - "`
/// 2. `<`, `{`, `[` become `(` and `>`, `}`, `]` become `)`
/// 3. drop a `(!)` marker together with one preceding space or underscore
/// 4. `,:` followed by a space or underscore, then `;` or `:` followed by one, become `", "`
/// 5. collapse runs of tabs, newlines and spaces into one space, then the same for carriage
///    returns, then drop any remaining newlines
/// 6. drop a `?` or `!` that comes right before `.`, `"` or the end
/// 7. `&`, `#`, `%`, `?`, `!` become `^`; `;` becomes `,`; `/`, `+`, `\`, `:` become `-`
/// 8. collapse runs of `-` and of `,`, and a space before commas
/// 9. drop a `-`, `,` or `^` right before `.` or the end
/// 10. collapse a double space, turn spaces into `_`, and `-_-` into `-`
pub fn sanitize(title: &str) -> String {
  RULES.iter().fold(title.trim().to_owned(), |title, rule| {
    let rewritten = rule.pattern.replace_all(&title, rule.replacement).into_owned();
    if rewritten != title {
      trace!("Sanitizer rule `{}` rewrote {title:?} to {rewritten:?}", rule.name);
    }
    rewritten
  })
}
