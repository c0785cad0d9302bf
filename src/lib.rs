//! docsift - incremental full-text search for static documentation sites.
//!
//! docsift builds a self-contained JSON index bundle from a directory of
//! markdown and text files, and drives an in-page search dialog over it:
//! the bundle is fetched lazily on first open, queries are scored with
//! BM25, and results come back as HTML fragments with matched terms
//! wrapped in `<mark>` tags.
//!
//! # Quick start
//!
//! ```no_run
//! use docsift::{
//!     DialogSurface, SearchConfig, SearchDialog, SearchOutcome,
//!     loader::HttpIndexSource, render::ResultTemplate,
//! };
//!
//! struct Modal;
//!
//! impl DialogSurface for Modal {
//!     fn show(&self) {
//!         println!("dialog visible");
//!     }
//! }
//!
//! # async fn demo() -> docsift::Result<()> {
//! let template = ResultTemplate::parse(
//!     r#"<li><a href="{URL}">{TITLE}</a><p>{BODY}</p></li>"#,
//! );
//! let source = HttpIndexSource::new("https://docs.example.com/search.json");
//! let mut dialog =
//!     SearchDialog::new(source, Modal, SearchConfig::default(), template);
//!
//! dialog.open().await?;
//! if let SearchOutcome::Searched { matches, .. } = dialog.handle_input("install")
//! {
//!     println!("{matches} match(es)");
//!     for node in dialog.results() {
//!         println!("{}", node.html);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod bundle;
pub mod cli;
pub mod config;
pub mod dialog;
pub mod error;
pub mod highlight;
pub mod ingest;
pub mod loader;
pub mod query;
pub mod render;
pub mod search;
pub mod term_index;
pub mod walker;

pub use bundle::{DocumentRecord, IndexBundle};
pub use config::SearchConfig;
pub use dialog::{DialogState, DialogSurface, SearchDialog, SearchOutcome};
pub use error::{Error, Result};
pub use term_index::{IndexBuilder, MatchResult, TermIndex};
