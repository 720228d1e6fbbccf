//! Joins recognizer patterns into one scanning regex.
//!
//! The code alternatives come first so that a link inside a fenced block or an
//! inline code span is consumed as code before any recognizer can see it. The
//! regex crate picks the leftmost match and, at one position, the first
//! alternative that matches, so this ordering decides precedence.

use regex::Regex;

use super::error::PatternError;

pub(crate) const FENCED_CODE: &str = "fenced_code";
pub(crate) const INLINE_CODE: &str = "inline_code";

const CODE_ALTERNATIVES: &str = r"
    (?P<fenced_code>```[\w\W]*?```$)
    |
    (?P<inline_code>`[\w\W]*?`)
";

/// Compile the code alternatives followed by every sub-pattern, in order.
pub(crate) fn combine<'a>(
    patterns: impl IntoIterator<Item = &'a str>,
) -> Result<Regex, PatternError> {
    let alternatives: Vec<String> = patterns
        .into_iter()
        .map(|pattern| format!("(?:{pattern}\n)"))
        .collect();

    let source = if alternatives.is_empty() {
        format!("(?xm){CODE_ALTERNATIVES}")
    } else {
        format!(
            "(?xm){CODE_ALTERNATIVES}|(?:\n{}\n)",
            alternatives.join("\n|\n")
        )
    };

    Ok(Regex::new(&source)?)
}
