use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::OnceCell;
use tracing::debug;

use crate::{
    bundle::IndexBundle,
    config::{SearchConfig, ShortQueryPolicy},
    error::{Error, Result},
    highlight::Highlighter,
    loader::IndexSource,
    query::{self, QueryDecision},
    render::{self, RenderedResult, ResultTemplate, ResultsContainer},
    search,
};

/// Where a dialog is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    /// No index yet; input is inert.
    Unloaded,
    /// The bundle fetch is in flight.
    Loading,
    /// Bundle loaded, input live.
    Ready,
}

/// The dialog's visibility collaborator.
///
/// The host owns the actual modal; the controller only says when it
/// should become visible. `show` runs on every successful
/// [`SearchDialog::open`], first and subsequent.
pub trait DialogSurface {
    fn show(&self);
}

/// What came of one input event.
#[derive(Debug, PartialEq)]
pub enum SearchOutcome {
    /// The index is not loaded yet; the event was ignored.
    NotReady,
    /// Input was empty or below the minimum effective length; the
    /// short-query policy decided what happened to prior results.
    TooShort,
    /// A query ran. The container now holds `rendered` nodes for
    /// `matches` ranked matches.
    Searched { matches: usize, rendered: usize },
}

/// One in-page search dialog instance.
///
/// Owns everything with dialog lifetime: the config, the parsed result
/// template, the results container, and the index bundle once loaded.
/// The bundle sits in a once-cell, so it is fetched at most once per
/// instance and reopening never refetches. Queries cannot observe a
/// partial index: the bundle is only visible after it deserialized
/// completely.
pub struct SearchDialog<L, S> {
    source: L,
    surface: S,
    config: SearchConfig,
    template: ResultTemplate,
    container: ResultsContainer,
    bundle: OnceCell<IndexBundle>,
    loading: AtomicUsize,
}

impl<L: IndexSource, S: DialogSurface> SearchDialog<L, S> {
    pub fn new(
        source: L,
        surface: S,
        config: SearchConfig,
        template: ResultTemplate,
    ) -> Self {
        Self {
            source,
            surface,
            config,
            template,
            container: ResultsContainer::new(),
            bundle: OnceCell::new(),
            loading: AtomicUsize::new(0),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DialogState {
        if self.bundle.initialized() {
            DialogState::Ready
        } else if self.loading.load(Ordering::SeqCst) > 0 {
            DialogState::Loading
        } else {
            DialogState::Unloaded
        }
    }

    /// The rendered nodes of the most recent search.
    pub fn results(&self) -> &[RenderedResult] {
        self.container.nodes()
    }

    /// Open the dialog, loading the index bundle first if this instance
    /// has not loaded it yet.
    ///
    /// Calls arriving while the fetch is in flight coalesce into it and
    /// complete together. On success the surface is shown; on failure
    /// the dialog stays unloaded and hidden, the error goes to the
    /// caller, and nothing is retried until the next `open` call.
    pub async fn open(&self) -> Result<()> {
        self.bundle
            .get_or_try_init(|| async {
                let _guard = LoadingGuard::enter(&self.loading);
                let bundle = self.source.load().await?;
                debug!(docs = bundle.docs.len(), "index bundle loaded");
                Ok::<_, Error>(bundle)
            })
            .await?;

        self.surface.show();
        Ok(())
    }

    /// Feed one input event through normalize, search, and render.
    ///
    /// Never fails: before the bundle is ready the event is ignored,
    /// and short input falls back to the configured short-query policy.
    pub fn handle_input(&mut self, raw: &str) -> SearchOutcome {
        let Some(bundle) = self.bundle.get() else {
            return SearchOutcome::NotReady;
        };

        match query::normalize(raw, &self.config) {
            QueryDecision::Empty | QueryDecision::TooShort => {
                if self.config.short_query == ShortQueryPolicy::Clear {
                    self.container.clear();
                }
                SearchOutcome::TooShort
            }
            QueryDecision::Run(normalized) => {
                let shaped =
                    search::shape_query(&normalized, self.config.mode);
                let matches = search::execute(bundle, &shaped);
                let highlighter = Highlighter::new(shaped.split(' '));
                let rendered = render::render_results(
                    &mut self.container,
                    &self.template,
                    bundle,
                    &matches,
                    &highlighter,
                );
                SearchOutcome::Searched {
                    matches: matches.len(),
                    rendered,
                }
            }
        }
    }
}

impl<L: IndexSource, S: DialogSurface> std::fmt::Debug for SearchDialog<L, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchDialog")
            .field("state", &self.state())
            .field("results", &self.container.len())
            .finish_non_exhaustive()
    }
}

/// Keeps the in-flight counter honest even when an open future is
/// dropped mid-fetch.
struct LoadingGuard<'a> {
    counter: &'a AtomicUsize,
}

impl<'a> LoadingGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self { counter }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}
