//! Generationsdjup per synlig person (layoutkolumn)

use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::{debug, warn};

use crate::services::index::TreeIndex;
use crate::services::relations::RelationshipService;
use crate::services::visible::ViewMode;

/// Övre gräns för antal djupändringar vid djuptilldelning. Rötter och noder
/// utan barn kostar ingenting, så gränsen slår bara till vid långa kedjor av
/// omtilldelningar.
pub const DEPTH_ITERATION_LIMIT: usize = 200_000;

/// Resultat av djuptilldelning
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DepthAssignment {
    /// Djup per person, i synlighetsordning
    pub depths: IndexMap<String, i32>,
    /// Antal gånger en nod fick nytt djup
    pub iterations: usize,
    /// Sant om iterationsgränsen avbröt traverseringen
    pub exhausted: bool,
}

impl DepthAssignment {
    pub fn depth(&self, id: &str) -> Option<i32> {
        self.depths.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }
}

pub struct DepthAssigner<'a> {
    index: &'a TreeIndex,
    relations: RelationshipService<'a>,
    max_iterations: usize,
}

impl<'a> DepthAssigner<'a> {
    pub fn new(index: &'a TreeIndex) -> Self {
        Self {
            index,
            relations: RelationshipService::new(index),
            max_iterations: DEPTH_ITERATION_LIMIT,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn assign(&self, mode: &ViewMode, visible: &IndexSet<String>) -> DepthAssignment {
        match mode {
            ViewMode::Full => self.assign_full(visible),
            ViewMode::Focus { focal_id, .. } => self.assign_focus(focal_id, visible),
        }
    }

    /// Längsta väg från någon rot. Rötter är synliga personer utan registrerad
    /// förälder. En nod som nås via en längre väg får nytt djup och köas om.
    ///
    /// Vid cykler blir resultatet begränsat men ungefärligt: djup större än
    /// antalet synliga noder kan bara uppstå i en cykel och avvisas.
    pub fn assign_full(&self, visible: &IndexSet<String>) -> DepthAssignment {
        let mut result = DepthAssignment::default();
        if visible.is_empty() {
            return result;
        }

        let ceiling = visible.len() as i32;
        let mut depths: IndexMap<&str, i32> = IndexMap::new();
        let mut queue: VecDeque<&str> = VecDeque::new();

        for id in visible {
            if !self.index.has_parents(id) {
                depths.insert(id.as_str(), 0);
                queue.push_back(id.as_str());
            }
        }

        if queue.is_empty() {
            debug!("Inga rötter bland synliga noder, startar från första noden");
        }

        'outer: loop {
            while let Some(id) = queue.pop_front() {
                let next = depths[id] + 1;
                if next >= ceiling {
                    continue;
                }

                for child in self.index.child_ids(id) {
                    let Some(child) = visible.get(child) else {
                        continue;
                    };
                    if depths.get(child.as_str()).is_some_and(|&d| d >= next) {
                        continue;
                    }
                    if result.iterations >= self.max_iterations {
                        warn!(
                            "Djuptilldelning avbruten efter {} iterationer",
                            result.iterations
                        );
                        result.exhausted = true;
                        break 'outer;
                    }
                    result.iterations += 1;
                    depths.insert(child.as_str(), next);
                    queue.push_back(child.as_str());
                }
            }

            // Komponenter utan rot (cykler) får en startpunkt på djup 0
            match visible.iter().find(|id| !depths.contains_key(id.as_str())) {
                Some(id) => {
                    depths.insert(id.as_str(), 0);
                    queue.push_back(id.as_str());
                }
                None => break,
            }
        }

        result.depths = visible
            .iter()
            .filter_map(|id| depths.get(id.as_str()).map(|&d| (id.clone(), d)))
            .collect();
        result
    }

    /// Bredden först från fokuspersonen: föräldrar −1, barn +1, partners samma.
    /// Första tilldelningen gäller.
    pub fn assign_focus(&self, focal_id: &str, visible: &IndexSet<String>) -> DepthAssignment {
        let mut result = DepthAssignment::default();
        if !visible.contains(focal_id) {
            return result;
        }

        let mut depths: IndexMap<String, i32> = IndexMap::new();
        let mut queue: VecDeque<String> = VecDeque::new();
        depths.insert(focal_id.to_string(), 0);
        queue.push_back(focal_id.to_string());

        'outer: while let Some(id) = queue.pop_front() {
            let depth = depths[&id];
            let neighbours = self
                .relations
                .parents(&id)
                .into_iter()
                .map(|p| (p, depth - 1))
                .chain(self.relations.children(&id).into_iter().map(|c| (c, depth + 1)))
                .chain(self.relations.spouses(&id).into_iter().map(|s| (s, depth)));

            for (person, d) in neighbours {
                if !visible.contains(person.id.as_str()) || depths.contains_key(&person.id) {
                    continue;
                }
                if result.iterations >= self.max_iterations {
                    warn!(
                        "Djuptilldelning avbruten efter {} iterationer",
                        result.iterations
                    );
                    result.exhausted = true;
                    break 'outer;
                }
                result.iterations += 1;
                depths.insert(person.id.clone(), d);
                queue.push_back(person.id.clone());
            }
        }

        result.depths = visible
            .iter()
            .filter_map(|id| depths.get(id).map(|&d| (id.clone(), d)))
            .collect();
        result
    }
}
