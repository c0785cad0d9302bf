use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    term_index::{INDEX_FORMAT_VERSION, TermIndex},
};

/// One searchable document as delivered in the bundle.
///
/// Records are produced by the site build and are read-only here. The
/// document id is the key of the bundle's `docs` map, so it is not
/// repeated inside the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub title: String,
    pub body: String,
    /// Label of the enclosing page or section, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Location URL of the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<String>,
}

impl DocumentRecord {
    /// URL a result for this record links to. Falls back to the document
    /// id when the record carries no explicit location.
    pub fn location_url<'a>(&'a self, id: &'a str) -> &'a str {
        self.loc.as_deref().unwrap_or(id)
    }
}

/// The fetched unit of search data: a serialized index plus the document
/// table it refers to. Immutable once loaded, owned by one dialog
/// instance for that instance's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexBundle {
    pub index: TermIndex,
    pub docs: BTreeMap<String, DocumentRecord>,
}

impl IndexBundle {
    /// Parse a bundle from its JSON wire form, rejecting index versions
    /// newer than this build understands.
    pub fn from_json(payload: &[u8]) -> Result<Self> {
        let bundle: IndexBundle = serde_json::from_slice(payload)?;
        if bundle.index.version > INDEX_FORMAT_VERSION {
            return Err(Error::IndexFormat {
                found: bundle.index.version,
                supported: INDEX_FORMAT_VERSION,
            });
        }
        Ok(bundle)
    }

    /// Look up a document by id.
    pub fn document(&self, id: &str) -> Option<&DocumentRecord> {
        self.docs.get(id)
    }
}
