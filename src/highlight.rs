use regex::{Regex, RegexBuilder};
use tracing::warn;

/// Markup wrapped around matched substrings in rendered results.
pub const MARK_OPEN: &str = "<mark>";
pub const MARK_CLOSE: &str = "</mark>";

/// Regex metacharacters escaped before user text enters a pattern.
const METACHARACTERS: &[char] = &[
    '.', '+', '?', '^', '$', '{', '}', '(', ')', '|', '[', ']', '\\',
];

/// A compiled highlighter for the terms of one query.
#[derive(Debug, Clone)]
pub struct Highlighter {
    pattern: Option<Regex>,
}

impl Highlighter {
    /// Build a case-insensitive highlighter for the given query terms.
    ///
    /// Metacharacters in the terms are escaped, and a literal `*`
    /// becomes "any run of word characters". Terms with no literal
    /// content are dropped, so a bare `*` can never match everywhere.
    /// If nothing usable remains, or the pattern fails to compile,
    /// highlighting is a no-op.
    pub fn new<'a, I>(terms: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let fragments: Vec<String> =
            terms.into_iter().filter_map(term_pattern).collect();
        if fragments.is_empty() {
            return Self { pattern: None };
        }

        let joined = fragments.join("|");
        let pattern = match RegexBuilder::new(&joined)
            .case_insensitive(true)
            .build()
        {
            Ok(re) => Some(re),
            Err(err) => {
                warn!(
                    pattern = %joined,
                    error = %err,
                    "highlight pattern failed to compile, rendering without highlights"
                );
                None
            }
        };

        Self { pattern }
    }

    /// Wrap every occurrence of a query term in the highlight marker.
    ///
    /// The matched text is spliced back literally; a `$` in the source
    /// is never treated as a substitution sequence.
    pub fn apply(&self, text: &str) -> String {
        match &self.pattern {
            Some(re) => re
                .replace_all(text, |caps: &regex::Captures<'_>| {
                    format!("{MARK_OPEN}{}{MARK_CLOSE}", &caps[0])
                })
                .into_owned(),
            None => text.to_string(),
        }
    }
}

/// Translate one query term into a pattern fragment, or `None` when the
/// term has no literal content to anchor on.
fn term_pattern(term: &str) -> Option<String> {
    if term.chars().all(|c| c == '*') {
        return None;
    }

    let mut out = String::with_capacity(term.len() + 8);
    for c in term.chars() {
        if c == '*' {
            out.push_str("\\w*");
        } else if METACHARACTERS.contains(&c) {
            out.push('\\');
            out.push(c);
        } else {
            out.push(c);
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_matches_in_the_marker() {
        let highlighter = Highlighter::new(["install"]);
        assert_eq!(
            highlighter.apply("Run npm install now"),
            "Run npm <mark>install</mark> now"
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        let highlighter = Highlighter::new(["install"]);
        assert_eq!(
            highlighter.apply("Install Guide"),
            "<mark>Install</mark> Guide"
        );
    }

    #[test]
    fn every_occurrence_is_wrapped() {
        let highlighter = Highlighter::new(["a"]);
        assert_eq!(
            highlighter.apply("a b a"),
            "<mark>a</mark> b <mark>a</mark>"
        );
    }

    #[test]
    fn metacharacters_match_literally() {
        let highlighter = Highlighter::new(["a(b"]);
        assert_eq!(highlighter.apply("see a(b here"), "see <mark>a(b</mark> here");
        assert_eq!(highlighter.apply("plain ab"), "plain ab");

        // None of these may panic or match everything.
        for term in [".+?", "x[", "a{2", "^$", "\\"] {
            let _ = Highlighter::new([term]).apply("some text");
        }
    }

    #[test]
    fn wildcard_matches_a_word_character_run() {
        let highlighter = Highlighter::new(["instal*"]);
        assert_eq!(
            highlighter.apply("the installation step"),
            "the <mark>installation</mark> step"
        );

        let infix = Highlighter::new(["x*y"]);
        assert_eq!(infix.apply("see xzzy go"), "see <mark>xzzy</mark> go");
    }

    #[test]
    fn wildcard_stops_at_word_boundaries() {
        let highlighter = Highlighter::new(["npm*"]);
        assert_eq!(
            highlighter.apply("npm install"),
            "<mark>npm</mark> install"
        );
    }

    #[test]
    fn bare_wildcards_highlight_nothing() {
        for terms in [vec!["*"], vec!["**"], vec!["*", "***"]] {
            let highlighter = Highlighter::new(terms);
            assert_eq!(highlighter.apply("anything at all"), "anything at all");
        }
    }

    #[test]
    fn no_terms_means_no_highlighting() {
        let highlighter = Highlighter::new([]);
        assert_eq!(highlighter.apply("left alone"), "left alone");
    }

    #[test]
    fn dollar_signs_in_the_source_stay_literal() {
        let highlighter = Highlighter::new(["price"]);
        assert_eq!(
            highlighter.apply("Price: $5 total"),
            "<mark>Price</mark>: $5 total"
        );
    }

    #[test]
    fn multiple_terms_highlight_independently() {
        let highlighter = Highlighter::new(["npm", "now"]);
        assert_eq!(
            highlighter.apply("Run npm install now"),
            "Run <mark>npm</mark> install <mark>now</mark>"
        );
    }
}
