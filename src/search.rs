use crate::{
    bundle::IndexBundle,
    config::QueryMode,
    query::NormalizedQuery,
    term_index::MatchResult,
};

/// Shape a normalized query for the index according to the active mode.
///
/// Substring-tolerant mode stars every word so partial words match;
/// literal mode passes the words through and relies on the index's
/// native multi-term matching.
pub fn shape_query(query: &NormalizedQuery, mode: QueryMode) -> String {
    match mode {
        QueryMode::PrefixWildcard => query
            .words()
            .map(|word| format!("{word}*"))
            .collect::<Vec<_>>()
            .join(" "),
        QueryMode::Literal => query.as_str().to_string(),
    }
}

/// Run an already shaped query against the bundle's index.
///
/// A thin pass-through: ranking and ordering are properties of the
/// index, not of this adapter.
pub fn execute(bundle: &IndexBundle, shaped: &str) -> Vec<MatchResult> {
    bundle.index.search(shaped)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::{config::SearchConfig, query, term_index::IndexBuilder};

    fn normalized(raw: &str) -> NormalizedQuery {
        match query::normalize(raw, &SearchConfig::default()) {
            query::QueryDecision::Run(q) => q,
            other => panic!("expected a runnable query, got {other:?}"),
        }
    }

    #[test]
    fn wildcard_mode_stars_every_word() {
        let shaped =
            shape_query(&normalized("foo bar"), QueryMode::PrefixWildcard);
        assert_eq!(shaped, "foo* bar*");
    }

    #[test]
    fn literal_mode_passes_words_through() {
        let shaped = shape_query(&normalized("foo bar"), QueryMode::Literal);
        assert_eq!(shaped, "foo bar");
    }

    #[test]
    fn execute_is_a_pass_through_to_the_index() {
        let mut builder = IndexBuilder::new();
        builder.add_document(
            "install.md",
            "Install Guide",
            "Run npm install now",
        );
        let bundle = IndexBundle {
            index: builder.build(),
            docs: BTreeMap::new(),
        };

        let matches = execute(&bundle, "instal*");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].document_id, "install.md");

        assert!(execute(&bundle, "zzz").is_empty());
    }
}
