//! Urval av personer att visa: hela trädet eller en radie kring en fokusperson

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::services::index::TreeIndex;
use crate::services::relations::{RelationshipService, MAX_GENERATION_DEPTH};

/// Visningsläge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ViewMode {
    /// Hela datamängden
    Full,
    /// Förfäder, ättlingar och partners kring en person
    Focus {
        focal_id: String,
        ancestor_depth: usize,
        descendant_depth: usize,
    },
}

impl ViewMode {
    /// Fokusläge med en generation åt vardera hållet
    pub fn focus(focal_id: impl Into<String>) -> Self {
        Self::focus_with_depth(focal_id, 1, 1)
    }

    /// Djupen begränsas till [`MAX_GENERATION_DEPTH`]
    pub fn focus_with_depth(focal_id: impl Into<String>, up: usize, down: usize) -> Self {
        Self::Focus {
            focal_id: focal_id.into(),
            ancestor_depth: up.min(MAX_GENERATION_DEPTH),
            descendant_depth: down.min(MAX_GENERATION_DEPTH),
        }
    }

    pub fn focal_id(&self) -> Option<&str> {
        match self {
            Self::Full => None,
            Self::Focus { focal_id, .. } => Some(focal_id.as_str()),
        }
    }

    /// Visa ytterligare en generation förfäder
    pub fn expand_ancestors(&mut self) {
        if let Self::Focus { ancestor_depth, .. } = self {
            *ancestor_depth = (*ancestor_depth + 1).min(MAX_GENERATION_DEPTH);
        }
    }

    /// Visa ytterligare en generation ättlingar
    pub fn expand_descendants(&mut self) {
        if let Self::Focus {
            descendant_depth, ..
        } = self
        {
            *descendant_depth = (*descendant_depth + 1).min(MAX_GENERATION_DEPTH);
        }
    }
}

pub struct VisibleSetBuilder<'a> {
    index: &'a TreeIndex,
    relations: RelationshipService<'a>,
}

impl<'a> VisibleSetBuilder<'a> {
    pub fn new(index: &'a TreeIndex) -> Self {
        Self {
            index,
            relations: RelationshipService::new(index),
        }
    }

    pub fn build(&self, mode: &ViewMode) -> IndexSet<String> {
        match mode {
            ViewMode::Full => self.index.people().map(|p| p.id.clone()).collect(),
            ViewMode::Focus {
                focal_id,
                ancestor_depth,
                descendant_depth,
            } => self.focus(focal_id, *ancestor_depth, *descendant_depth),
        }
    }

    fn focus(&self, focal_id: &str, up: usize, down: usize) -> IndexSet<String> {
        let mut visible: IndexSet<String> = IndexSet::new();
        if !self.index.contains(focal_id) {
            return visible;
        }
        visible.insert(focal_id.to_string());

        let up = up.min(MAX_GENERATION_DEPTH);
        let down = down.min(MAX_GENERATION_DEPTH);

        // Varje riktning breddas från fokuspersonen, inte från varandra
        for level in self.relations.ancestors(focal_id, up) {
            visible.extend(level.into_iter().map(|p| p.id.clone()));
        }
        for level in self.relations.descendants(focal_id, down) {
            visible.extend(level.into_iter().map(|p| p.id.clone()));
        }

        // Partners till alla hittills insamlade, ej rekursivt
        let collected: Vec<String> = visible.iter().cloned().collect();
        for id in &collected {
            for spouse in self.relations.spouses(id) {
                visible.insert(spouse.id.clone());
            }
        }

        visible
    }
}
