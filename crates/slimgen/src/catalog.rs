//! Symbol Catalog
//!
//! The authoritative availability table: canonical intrinsic name to its
//! declared signature. Built once by folding header sources in order with
//! [`CatalogBuilder`], then frozen into a read-only [`SymbolCatalog`].
//!
//! # Alias ordering
//!
//! An alias copies whatever its target's entry is *at the moment the alias
//! is folded*. Aliasing a name that has not been catalogued yet leaves the
//! alias [`CatalogEntry::Unresolved`]; it is not revisited when the target
//! shows up later. Source order therefore matters.

use crate::error::GenError;
use crate::extract::{self, HeaderFacts, Prototype};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Declared metadata of an entry point.
///
/// Not consulted by synthesis today.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    pub return_type: String,
    pub calling_convention: Option<String>,
}

/// One catalog slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEntry {
    /// Declared directly, through a wrapper macro, or by a resolved alias
    Declared(Signature),
    /// Alias whose target was not catalogued when the alias was seen
    Unresolved { target: String },
}

/// Frozen name -> entry table
#[derive(Debug, Clone, Default)]
pub struct SymbolCatalog {
    entries: HashMap<String, CatalogEntry>,
}

impl SymbolCatalog {
    /// Catalog in which every given name is declared with an empty signature
    pub fn from_entry_points<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = names
            .into_iter()
            .map(|name| (name.into(), CatalogEntry::Declared(Signature::default())))
            .collect();
        SymbolCatalog { entries }
    }

    /// Is `name` an available entry point?
    ///
    /// Unresolved aliases are not available.
    pub fn present(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(CatalogEntry::Declared(_)))
    }

    pub fn entry(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(name)
    }

    /// Number of slots, unresolved aliases included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of available entry points
    pub fn declared_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| matches!(e, CatalogEntry::Declared(_)))
            .count()
    }
}

/// Mutable fold state used while header sources are being read
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    entries: HashMap<String, CatalogEntry>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        CatalogBuilder::default()
    }

    fn declare(&mut self, proto: Prototype) {
        debug!(name = %proto.name, ret = %proto.return_type, "declared");
        self.entries.insert(
            proto.name,
            CatalogEntry::Declared(Signature {
                return_type: proto.return_type,
                calling_convention: proto.calling_convention,
            }),
        );
    }

    /// Fold one source's facts: prototypes, then aliases, then wrapped
    /// declarations. Later writes to the same name win.
    pub fn fold_facts(&mut self, facts: HeaderFacts) {
        for proto in facts.prototypes {
            self.declare(proto);
        }

        for alias in facts.aliases {
            let resolved = match self.entries.get(&alias.target) {
                Some(CatalogEntry::Declared(sig)) => {
                    debug!(alias = %alias.name, target = %alias.target, "alias resolved");
                    CatalogEntry::Declared(sig.clone())
                }
                _ => {
                    debug!(alias = %alias.name, target = %alias.target, "unresolved alias");
                    CatalogEntry::Unresolved {
                        target: alias.target,
                    }
                }
            };
            self.entries.insert(alias.name, resolved);
        }

        for proto in facts.wrapped {
            self.declare(proto);
        }
    }

    /// Extract and fold one header's text, returning how many declarations
    /// were recognized
    pub fn fold_source(&mut self, text: &str) -> usize {
        let facts = extract::extract(text);
        let count = facts.len();
        self.fold_facts(facts);
        count
    }

    pub fn build(self) -> SymbolCatalog {
        SymbolCatalog {
            entries: self.entries,
        }
    }
}

/// Build the catalog from `sources` (file names, in order) under `dir`.
///
/// A source that cannot be read aborts the whole build; a source with no
/// recognizable declarations is only worth a warning.
pub fn load_catalog(dir: &Path, sources: &[String]) -> Result<SymbolCatalog, GenError> {
    let mut builder = CatalogBuilder::new();

    for source in sources {
        let path = dir.join(source);
        let text = fs::read_to_string(&path).map_err(|e| GenError::io(&path, e))?;
        let count = builder.fold_source(&text);
        if count == 0 {
            warn!("No intrinsic declarations found in {}", path.display());
        } else {
            info!("{}: {} declarations", path.display(), count);
        }
    }

    let catalog = builder.build();
    info!(
        "Catalog: {} entry points available, {} unresolved",
        catalog.declared_count(),
        catalog.len() - catalog.declared_count()
    );
    Ok(catalog)
}
