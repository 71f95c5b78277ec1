//! Härstamningskedja för brödsmulor och markering av väg till roten

use indexmap::IndexSet;
use serde::Serialize;
use tracing::debug;

use crate::services::index::TreeIndex;
use crate::services::relations::RelationshipService;

/// Max antal steg uppåt vid vandring mot roten
pub const ANCESTRY_HOP_LIMIT: usize = 12;

/// Kedja från rot till vald person. Sista elementet är alltid personen själv.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AncestryChain {
    pub ids: Vec<String>,
    /// Sant om steggränsen nåddes innan en rot hittades
    pub exhausted: bool,
}

impl AncestryChain {
    pub fn root(&self) -> Option<&str> {
        self.ids.first().map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|c| c == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

pub struct PathResolver<'a> {
    index: &'a TreeIndex,
    relations: RelationshipService<'a>,
}

impl<'a> PathResolver<'a> {
    pub fn new(index: &'a TreeIndex) -> Self {
        Self {
            index,
            relations: RelationshipService::new(index),
        }
    }

    /// Vandra uppåt via första föräldern tills ingen förälder finns, en person
    /// skulle upprepas eller `max_hops` steg har tagits.
    ///
    /// Första föräldern är den första i [`RelationshipService::parents`], dvs.
    /// relationernas inläsningsordning, inte födelseordning.
    pub fn ancestry_chain(&self, id: &str, max_hops: usize) -> AncestryChain {
        let mut chain: Vec<String> = vec![id.to_string()];
        let mut exhausted = false;
        let mut cursor = id.to_string();

        loop {
            let parents = self.relations.parents(&cursor);
            let Some(first) = parents.first() else {
                break;
            };
            if chain.len() > max_hops {
                exhausted = true;
                break;
            }
            if chain.iter().any(|c| *c == first.id) {
                debug!("Cykel i härstamning vid {}", first.id);
                break;
            }
            chain.push(first.id.clone());
            cursor = first.id.clone();
        }

        chain.reverse();
        AncestryChain {
            ids: chain,
            exhausted,
        }
    }

    /// Kedjan som mängd, för att tona ned personer utanför vägen
    pub fn path_set(&self, id: &str) -> IndexSet<String> {
        self.ancestry_chain(id, ANCESTRY_HOP_LIMIT)
            .ids
            .into_iter()
            .collect()
    }

    /// Fäll ut vägen till personen i översikten, samt personens barn
    pub fn expand_path_to(&self, id: &str, expanded: &mut IndexSet<String>) {
        if !self.index.contains(id) {
            return;
        }
        for pid in self.ancestry_chain(id, ANCESTRY_HOP_LIMIT).ids {
            expanded.insert(pid);
        }
        for child in self.relations.children(id) {
            expanded.insert(child.id.clone());
        }
    }
}
