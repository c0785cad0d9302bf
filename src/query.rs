use crate::config::SearchConfig;

/// What to do with one raw input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryDecision {
    /// Nothing to search for.
    Empty,
    /// Below the minimum effective length; no query is issued.
    TooShort,
    /// A query the adapter should run.
    Run(NormalizedQuery),
}

/// Raw input with whitespace collapsed, ready for query shaping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    text: String,
}

impl NormalizedQuery {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The words of the query. Normalization guarantees single-space
    /// separation, so this never yields an empty word.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.text.split(' ')
    }
}

/// Normalize raw input text and decide whether it is worth a query.
///
/// Runs of whitespace collapse to single spaces and the ends are
/// trimmed. The effective length is counted over alphanumeric characters
/// only, across all words, so `a(b` is two characters towards the
/// minimum, not three. Empty or whitespace-only input is simply
/// [`QueryDecision::Empty`].
pub fn normalize(raw: &str, config: &SearchConfig) -> QueryDecision {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return QueryDecision::Empty;
    }

    let effective =
        collapsed.chars().filter(|c| c.is_alphanumeric()).count();
    if effective < config.min_query_len {
        return QueryDecision::TooShort;
    }

    QueryDecision::Run(NormalizedQuery { text: collapsed })
}
