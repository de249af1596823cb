//! Identifier normalization for catalog codes.
//!
//! Request files carry codes the way people type them:
//! ```text
//! jufd-948
//! mism091
//! jufd 948
//! mvbd-078 102 116 122 142
//! ```
//! Each term is turned into one or more canonical `PREFIX-NUMBER` keys,
//! upper-cased and ready for an exact-code lookup.

use crate::types::{Category, Query};

/// Separator between a code's prefix and its number.
pub const SEPARATOR: char = '-';

/// Normalize a raw code term into canonical, upper-cased query keys.
///
/// The output is never empty and keeps left-to-right order; duplicates are
/// not removed. Malformed input is not an error: at worst the whole term
/// becomes a single key.
///
/// # Examples
///
/// ```
/// use magpick_core::normalize::normalize;
///
/// assert_eq!(normalize("mism091"), vec!["MISM-091"]);
/// assert_eq!(normalize("jufd 948"), vec!["JUFD-948"]);
/// assert_eq!(
///     normalize("mvbd-078 102 116"),
///     vec!["MVBD-078", "MVBD-102", "MVBD-116"],
/// );
/// ```
pub fn normalize(term: &str) -> Vec<String> {
    let term = term.trim();
    let separated = if term.contains(SEPARATOR) {
        term.to_string()
    } else {
        insert_separator(term)
    };

    let split = separated
        .split_once(SEPARATOR)
        .or_else(|| separated.split_once(' '));

    let keys = match split {
        Some((prefix, remainder)) => {
            let prefix = prefix.trim_end();
            let mut tokens = remainder.split_whitespace().peekable();
            if tokens.peek().is_none() {
                vec![format!("{}{}{}", prefix, SEPARATOR, remainder)]
            } else {
                tokens
                    .map(|token| format!("{}{}{}", prefix, SEPARATOR, token))
                    .collect()
            }
        }
        None => vec![separated],
    };

    keys.into_iter().map(|k| k.to_uppercase()).collect()
}

/// Insert a separator before every digit that directly follows a letter.
///
/// Recovers `mism-091` from `mism091`. Strings with no letter→digit boundary
/// are returned unchanged.
fn insert_separator(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    let mut prev: Option<char> = None;

    for ch in term.chars() {
        if ch.is_ascii_digit() && prev.is_some_and(|p| p.is_ascii_alphabetic()) {
            out.push(SEPARATOR);
        }
        out.push(ch);
        prev = Some(ch);
    }

    out
}

/// Build the store queries for one request term.
pub fn queries_for(category: Category, term: &str) -> Vec<Query> {
    let term = term.trim();
    match category {
        Category::Fanhao => normalize(term).into_iter().map(Query::ExactCode).collect(),
        Category::Series => vec![Query::SeriesPrefix(term.to_string())],
        Category::Title => vec![Query::TitleKeyword(term.to_string())],
        Category::Actress => vec![Query::ActorExact(term.to_string())],
    }
}

#[cfg(test)]
#[path = "tests/normalize_tests.rs"]
mod tests;
