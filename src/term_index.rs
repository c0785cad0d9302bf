use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    ops::Bound,
};

use serde::{Deserialize, Serialize};

/// Current serialized index format version.
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// BM25 tuning parameters.
const BM25_K1: f32 = 1.2;
const BM25_B: f32 = 0.75;

/// How much a title hit counts over a body hit.
const TITLE_WEIGHT: f32 = 2.0;

/// One document's term frequencies for a single token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    /// Document id, as used in the bundle's document table.
    pub doc: String,
    #[serde(default)]
    pub title_tf: u32,
    #[serde(default)]
    pub body_tf: u32,
}

/// Token counts of one document, per field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DocLength {
    pub title: u32,
    pub body: u32,
}

/// A ranked hit for a query.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub document_id: String,
    pub score: f32,
}

/// A serializable inverted index with BM25 ranking and trailing-`*`
/// prefix expansion.
///
/// The term dictionary is an ordered map so prefix terms expand with a
/// range scan instead of a full pass. Posting lists hold one entry per
/// document, sorted by document id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermIndex {
    #[serde(default = "default_version")]
    pub version: u32,
    pub total_docs: u32,
    pub avg_title_len: f32,
    pub avg_body_len: f32,
    pub terms: BTreeMap<String, Vec<Posting>>,
    pub doc_lens: BTreeMap<String, DocLength>,
}

fn default_version() -> u32 {
    INDEX_FORMAT_VERSION
}

impl TermIndex {
    /// Evaluate a query against the index.
    ///
    /// The query is a whitespace-separated list of terms; a trailing `*`
    /// marks a prefix term that expands to every indexed token sharing
    /// the prefix. Terms combine with OR semantics and per-document
    /// scores sum across terms and expansions. Results come back ordered
    /// by descending score, ties broken by ascending document id.
    pub fn search(&self, query: &str) -> Vec<MatchResult> {
        let mut scores: HashMap<&str, f32> = HashMap::new();

        for raw in query.split_whitespace() {
            let (text, prefix) = match raw.strip_suffix('*') {
                Some(stem) => (stem, true),
                None => (raw, false),
            };
            let Some(term) = normalize_term(text) else {
                continue;
            };

            if prefix {
                for postings in self.terms_with_prefix(&term) {
                    self.score_postings(postings, &mut scores);
                }
            } else if let Some(postings) = self.terms.get(&term) {
                self.score_postings(postings, &mut scores);
            }
        }

        let mut results: Vec<MatchResult> = scores
            .into_iter()
            .map(|(doc, score)| MatchResult {
                document_id: doc.to_string(),
                score,
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.document_id.cmp(&b.document_id))
        });

        results
    }

    fn terms_with_prefix<'a, 'p>(
        &'a self,
        prefix: &'p str,
    ) -> impl Iterator<Item = &'a [Posting]> {
        self.terms
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(token, _)| token.starts_with(prefix))
            .map(|(_, postings)| postings.as_slice())
    }

    fn score_postings<'a>(
        &'a self,
        postings: &'a [Posting],
        scores: &mut HashMap<&'a str, f32>,
    ) {
        // One posting per document, so the list length is the document
        // frequency.
        let df = postings.len() as f32;
        let n = self.total_docs as f32;
        let idf = (1.0 + (n - df + 0.5) / (df + 0.5)).ln();

        for posting in postings {
            let Some(lens) = self.doc_lens.get(&posting.doc) else {
                continue;
            };
            let title =
                field_score(posting.title_tf, lens.title, self.avg_title_len);
            let body =
                field_score(posting.body_tf, lens.body, self.avg_body_len);
            *scores.entry(posting.doc.as_str()).or_insert(0.0) +=
                idf * (TITLE_WEIGHT * title + body);
        }
    }
}

/// BM25 score of a term within one field of one document.
fn field_score(tf: u32, field_len: u32, avg_len: f32) -> f32 {
    if tf == 0 {
        return 0.0;
    }
    let tf = tf as f32;
    let norm = 1.0 - BM25_B + BM25_B * field_len as f32 / avg_len.max(1.0);
    tf * (BM25_K1 + 1.0) / (tf + BM25_K1 * norm)
}

/// Normalize one query term: trim leading/trailing non-alphanumerics
/// (mirroring the build tokenizer) and lowercase. Returns `None` when
/// nothing remains.
fn normalize_term(raw: &str) -> Option<String> {
    let trimmed = raw.trim_matches(|c: char| !c.is_alphanumeric());
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_lowercase())
}

/// Split text into lowercase alphanumeric tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(|token| token.to_lowercase())
        .collect()
}

/// Accumulates documents and emits a finished [`TermIndex`].
///
/// Used by the offline bundle builder and by tests; the dialog side only
/// ever consumes an already-built index.
#[derive(Debug, Default)]
pub struct IndexBuilder {
    docs: BTreeMap<String, (Vec<String>, Vec<String>)>,
}

impl IndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document. Re-adding an id replaces the earlier document.
    pub fn add_document(&mut self, id: &str, title: &str, body: &str) {
        self.docs
            .insert(id.to_string(), (tokenize(title), tokenize(body)));
    }

    pub fn build(self) -> TermIndex {
        let total_docs = self.docs.len() as u32;
        let mut terms: BTreeMap<String, Vec<Posting>> = BTreeMap::new();
        let mut doc_lens = BTreeMap::new();
        let mut title_total = 0u64;
        let mut body_total = 0u64;

        for (id, (title_tokens, body_tokens)) in &self.docs {
            title_total += title_tokens.len() as u64;
            body_total += body_tokens.len() as u64;
            doc_lens.insert(
                id.clone(),
                DocLength {
                    title: title_tokens.len() as u32,
                    body: body_tokens.len() as u32,
                },
            );

            let mut tfs: BTreeMap<&str, (u32, u32)> = BTreeMap::new();
            for token in title_tokens {
                tfs.entry(token).or_default().0 += 1;
            }
            for token in body_tokens {
                tfs.entry(token).or_default().1 += 1;
            }

            // Postings come out sorted by document id because `docs` is
            // iterated in id order.
            for (token, (title_tf, body_tf)) in tfs {
                terms.entry(token.to_string()).or_default().push(Posting {
                    doc: id.clone(),
                    title_tf,
                    body_tf,
                });
            }
        }

        TermIndex {
            version: INDEX_FORMAT_VERSION,
            total_docs,
            avg_title_len: average(title_total, total_docs),
            avg_body_len: average(body_total, total_docs),
            terms,
            doc_lens,
        }
    }
}

fn average(total: u64, count: u32) -> f32 {
    if count == 0 {
        0.0
    } else {
        total as f32 / count as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> TermIndex {
        let mut builder = IndexBuilder::new();
        builder.add_document(
            "rust.md",
            "The Rust Programming Language",
            "Rust is a systems programming language focused on safety \
             and speed.",
        );
        builder.add_document(
            "python.md",
            "Introduction to Python",
            "Python is an interpreted programming language known for \
             readability.",
        );
        builder.add_document(
            "pasta.md",
            "How to Cook Pasta",
            "Boil water, add salt, cook until al dente.",
        );
        builder.build()
    }

    #[test]
    fn exact_term_finds_matching_documents() {
        let index = sample_index();
        let results = index.search("rust");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document_id, "rust.md");
        assert!(results[0].score > 0.0);
    }

    #[test]
    fn multi_term_queries_use_or_semantics() {
        let index = sample_index();
        let results = index.search("rust python");
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn title_hits_outrank_body_hits() {
        let mut builder = IndexBuilder::new();
        builder.add_document("a.md", "Widget Overview", "Everything else.");
        builder.add_document(
            "b.md",
            "Something Else",
            "A widget appears in the body.",
        );
        let index = builder.build();

        let results = index.search("widget");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].document_id, "a.md");
    }

    #[test]
    fn prefix_terms_expand_over_the_dictionary() {
        let mut builder = IndexBuilder::new();
        builder.add_document(
            "install.md",
            "Install Guide",
            "Run the installer to finish the installation.",
        );
        builder.add_document("other.md", "Unrelated", "Nothing to see.");
        let index = builder.build();

        let results = index.search("instal*");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document_id, "install.md");
    }

    #[test]
    fn prefix_expansions_accumulate_score() {
        let mut builder = IndexBuilder::new();
        builder.add_document(
            "rich.md",
            "Install",
            "install installer installation",
        );
        builder.add_document("poor.md", "Other", "installing elsewhere");
        let index = builder.build();

        let results = index.search("instal*");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].document_id, "rich.md");
    }

    #[test]
    fn ties_break_by_document_id() {
        let mut builder = IndexBuilder::new();
        builder.add_document("b.md", "Same Thing", "identical body");
        builder.add_document("a.md", "Same Thing", "identical body");
        let index = builder.build();

        let results = index.search("identical");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].document_id, "a.md");
        assert_eq!(results[1].document_id, "b.md");
    }

    #[test]
    fn scores_are_descending() {
        let index = sample_index();
        let results = index.search("programming language");
        assert!(results.len() >= 2);
        for window in results.windows(2) {
            assert!(
                window[0].score >= window[1].score,
                "scores should be in descending order"
            );
        }
    }

    #[test]
    fn readding_a_document_replaces_it() {
        let mut builder = IndexBuilder::new();
        builder.add_document("doc.md", "First", "original text");
        builder.add_document("doc.md", "Second", "replacement text");
        let index = builder.build();

        assert_eq!(index.total_docs, 1);
        assert!(index.search("original").is_empty());
        assert_eq!(index.search("replacement").len(), 1);
    }

    #[test]
    fn unknown_terms_match_nothing() {
        let index = sample_index();
        assert!(index.search("xyzzy_nonexistent").is_empty());
    }

    #[test]
    fn empty_queries_match_nothing() {
        let index = sample_index();
        assert!(index.search("").is_empty());
        assert!(index.search("   ").is_empty());
        assert!(index.search("*").is_empty());
    }

    #[test]
    fn query_terms_ignore_case_and_edge_punctuation() {
        let index = sample_index();
        let results = index.search("RUST!");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document_id, "rust.md");
    }

    #[test]
    fn tokenizer_splits_on_non_alphanumerics() {
        assert_eq!(
            tokenize("Hello, world! It's 2-fast"),
            vec!["hello", "world", "it", "s", "2", "fast"]
        );
        assert!(tokenize("...").is_empty());
    }

    #[test]
    fn serialized_index_round_trips() {
        let index = sample_index();
        let json = serde_json::to_string(&index).unwrap();
        let restored: TermIndex = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.version, INDEX_FORMAT_VERSION);
        assert_eq!(
            index.search("programming"),
            restored.search("programming")
        );
    }
}
