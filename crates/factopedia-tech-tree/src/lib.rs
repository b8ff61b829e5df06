//! Technology tree layout.
//!
//! A [`TechGraph`] maps each tech to the set of techs it requires. Calling
//! [`TechGraph::layout`] layers the graph topologically and assigns every
//! tech a grid cell and a pixel position:
//!
//! - techs with no prerequisites fill the first rows;
//! - each following layer holds every tech whose prerequisites are all in
//!   earlier layers, wrapped at [`LayoutConfig::columns_per_row`];
//! - techs that can never be reached (cycles, unknown prerequisites) are
//!   reported in [`TechLayout::unplaced`] instead of stalling the layout.

pub mod config;
pub mod layout;

pub use config::LayoutConfig;
pub use layout::{EdgeAnchor, TechEdge, TechLayout, TechNode};

use factopedia_data::{Catalog, DataLoadError, Record};
use std::collections::{BTreeMap, BTreeSet};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while building a graph or reading layout config.
#[derive(Debug, thiserror::Error)]
pub enum TechTreeError {
    #[error("technology '{0}' lists itself as a prerequisite")]
    SelfPrerequisite(String),

    #[error("invalid layout config: {0}")]
    InvalidConfig(&'static str),

    #[error(transparent)]
    Config(#[from] DataLoadError),
}

// ---------------------------------------------------------------------------
// TechGraph
// ---------------------------------------------------------------------------

/// Tech name to prerequisite names.
#[derive(Debug, Clone, Default)]
pub struct TechGraph {
    prerequisites: BTreeMap<String, BTreeSet<String>>,
}

impl TechGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// The enabled techs of a catalog. Prerequisites naming disabled or
    /// unknown techs are kept, so their dependents end up unplaced.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let prerequisites = catalog
            .techs()
            .filter(|tech| tech.enabled)
            .map(|tech| (tech.name().to_string(), tech.prerequisites.clone()))
            .collect();
        Self { prerequisites }
    }

    /// Add or replace a tech.
    pub fn insert<I>(&mut self, name: &str, prerequisites: I) -> Result<(), TechTreeError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let prerequisites: BTreeSet<String> = prerequisites.into_iter().map(Into::into).collect();
        if prerequisites.contains(name) {
            return Err(TechTreeError::SelfPrerequisite(name.to_string()));
        }
        self.prerequisites.insert(name.to_string(), prerequisites);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.prerequisites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prerequisites.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.prerequisites.contains_key(name)
    }

    /// Tech names, ascending.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.prerequisites.keys().map(String::as_str)
    }

    pub fn prerequisites(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.prerequisites.get(name)
    }

    /// One `prerequisite -> tech` edge per prerequisite, ordered by tech
    /// then prerequisite.
    pub fn edges(&self) -> Vec<TechEdge> {
        self.prerequisites
            .iter()
            .flat_map(|(tech, prereqs)| {
                prereqs.iter().map(move |p| TechEdge {
                    from: p.clone(),
                    to: tech.clone(),
                })
            })
            .collect()
    }
}
