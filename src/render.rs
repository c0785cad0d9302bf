use tracing::debug;

use crate::{
    bundle::IndexBundle,
    highlight::Highlighter,
    term_index::MatchResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Url,
    Title,
    Body,
    Score,
    Parent,
}

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Slot(Slot),
}

/// A result template parsed into literal chunks and placeholder slots.
///
/// Parsing once makes filling a single pass: values are spliced between
/// the literal chunks and never rescanned, so a `$` or a stray `{BODY}`
/// inside a document stays literal in the output.
#[derive(Debug, Clone)]
pub struct ResultTemplate {
    segments: Vec<Segment>,
}

impl ResultTemplate {
    /// Parse a template fragment. Every occurrence of a known
    /// placeholder becomes a slot; everything else, unrecognized braces
    /// included, is literal text.
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = source;

        while !rest.is_empty() {
            match next_placeholder(rest) {
                Some((at, len, slot)) => {
                    literal.push_str(&rest[..at]);
                    if !literal.is_empty() {
                        segments
                            .push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot(slot));
                    rest = &rest[at + len..];
                }
                None => {
                    literal.push_str(rest);
                    rest = "";
                }
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { segments }
    }

    /// Fill the template with the values of one result.
    pub fn fill(&self, ctx: &RenderContext<'_>) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(Slot::Url) => out.push_str(ctx.url),
                Segment::Slot(Slot::Title) => out.push_str(&ctx.title),
                Segment::Slot(Slot::Body) => out.push_str(&ctx.body),
                Segment::Slot(Slot::Score) => {
                    out.push_str(&format!("{:.3}", ctx.score));
                }
                Segment::Slot(Slot::Parent) => {
                    out.push_str(ctx.parent.unwrap_or(""));
                }
            }
        }
        out
    }
}

/// Find the leftmost placeholder occurrence in `text`.
fn next_placeholder(text: &str) -> Option<(usize, usize, Slot)> {
    let mut found: Option<(usize, usize, Slot)> = None;
    for (name, slot) in [
        ("{URL}", Slot::Url),
        ("{TITLE}", Slot::Title),
        ("{BODY}", Slot::Body),
        ("{SCORE}", Slot::Score),
        ("{PARENT}", Slot::Parent),
    ] {
        if let Some(at) = text.find(name)
            && found.is_none_or(|(best, _, _)| at < best)
        {
            found = Some((at, name.len(), slot));
        }
    }
    found
}

/// Values substituted into a [`ResultTemplate`] for one match.
#[derive(Debug)]
pub struct RenderContext<'a> {
    pub url: &'a str,
    pub title: String,
    pub body: String,
    pub score: f32,
    pub parent: Option<&'a str>,
}

/// One materialized result node.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedResult {
    pub document_id: String,
    pub score: f32,
    pub html: String,
}

/// Holds the rendered nodes of the most recent search.
///
/// Renders are wholesale: every pass clears the previous nodes before
/// appending, so the container always reflects exactly the latest
/// query's matches.
#[derive(Debug, Default)]
pub struct ResultsContainer {
    nodes: Vec<RenderedResult>,
}

impl ResultsContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn push(&mut self, node: RenderedResult) {
        self.nodes.push(node);
    }

    pub fn nodes(&self) -> &[RenderedResult] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Render ranked matches into the container.
///
/// Clears the container, then for each match in rank order looks up the
/// document record, highlights the query terms in its title and body,
/// and appends the filled template. A match whose id is missing from
/// the document table is skipped, never an error. Returns the number of
/// nodes appended.
pub fn render_results(
    container: &mut ResultsContainer,
    template: &ResultTemplate,
    bundle: &IndexBundle,
    matches: &[MatchResult],
    highlighter: &Highlighter,
) -> usize {
    container.clear();

    for result in matches {
        let Some(record) = bundle.document(&result.document_id) else {
            debug!(
                id = %result.document_id,
                "match references a document missing from the table, skipping"
            );
            continue;
        };

        let ctx = RenderContext {
            url: record.location_url(&result.document_id),
            title: highlighter.apply(&record.title),
            body: highlighter.apply(&record.body),
            score: result.score,
            parent: record.parent.as_deref(),
        };
        container.push(RenderedResult {
            document_id: result.document_id.clone(),
            score: result.score,
            html: template.fill(&ctx),
        });
    }

    container.len()
}
