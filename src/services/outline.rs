//! Utfällbar översikt (pre-order) över trädet under en rotperson

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::Person;
use crate::services::index::TreeIndex;

/// Max antal personer som "fäll ut alla" får fälla ut
pub const MAX_EXPAND_NODES: usize = 500;

/// En rad i översikten. Djupet börjar på 1 för roten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineRow {
    pub id: String,
    pub depth: usize,
    /// Styr om raden visar en utfällningsknapp
    pub has_children: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Outline {
    pub rows: Vec<OutlineRow>,
    /// Sant om fler rader fanns än radgränsen tillät
    pub truncated: bool,
}

impl Outline {
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Levnadsstatus att filtrera på
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifeStatus {
    #[default]
    Any,
    Alive,
    Deceased,
}

/// Filter som tillämpas på översiktens rader efter traversering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineFilter {
    /// Delsträng i relationstexten, skiftlägesokänslig
    pub relation: Option<String>,
    pub status: LifeStatus,
    pub has_photo: bool,
    pub has_note: bool,
}

impl OutlineFilter {
    pub fn is_active(&self) -> bool {
        self.relation.as_deref().is_some_and(|r| !r.trim().is_empty())
            || self.status != LifeStatus::Any
            || self.has_photo
            || self.has_note
    }

    pub fn matches(&self, person: &Person) -> bool {
        if let Some(needle) = self.relation.as_deref().map(str::trim) {
            if !needle.is_empty() {
                let relation = person.relation.as_deref().unwrap_or("").to_lowercase();
                if !relation.contains(&needle.to_lowercase()) {
                    return false;
                }
            }
        }

        match self.status {
            LifeStatus::Alive if !person.is_alive() => return false,
            LifeStatus::Deceased if person.is_alive() => return false,
            _ => {}
        }

        (!self.has_photo || person.photo.is_some()) && (!self.has_note || person.note.is_some())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpandAllResult {
    pub expanded: IndexSet<String>,
    /// Sant om den nåbara översikten var större än budgeten
    pub truncated: bool,
}

pub struct OutlineService<'a> {
    index: &'a TreeIndex,
}

impl<'a> OutlineService<'a> {
    pub fn new(index: &'a TreeIndex) -> Self {
        Self { index }
    }

    /// Vald person i grenläge, annars `selfId`, annars första personen
    pub fn root_id(&self, selected: Option<&str>, branch_only: bool) -> Option<String> {
        match selected {
            Some(id) if branch_only => Some(id.to_string()),
            _ => self
                .index
                .self_id()
                .or_else(|| self.index.first_person_id())
                .map(str::to_string),
        }
    }

    pub fn has_children(&self, id: &str) -> bool {
        self.index.child_ids(id).next().is_some()
    }

    /// Översikt där bara utfällda personers barn visas
    pub fn build(&self, root: &str, expanded: &IndexSet<String>, max_rows: usize) -> Outline {
        self.traverse(root, Some(expanded), max_rows)
    }

    /// Översikt med alla barn oavsett utfällning
    pub fn build_all(&self, root: &str, max_rows: usize) -> Outline {
        self.traverse(root, None, max_rows)
    }

    fn traverse(
        &self,
        root: &str,
        expanded: Option<&IndexSet<String>>,
        max_rows: usize,
    ) -> Outline {
        let mut outline = Outline::default();
        if !self.index.contains(root) {
            return outline;
        }

        // Stack i omvänd ordning så att barn besöks i indexordning
        let mut stack: Vec<(&str, usize)> = vec![(root, 1)];
        let mut path: Vec<&str> = Vec::new();

        while let Some((id, depth)) = stack.pop() {
            path.truncate(depth - 1);
            if path.contains(&id) {
                debug!("Cykel i översikten vid {}", id);
                continue;
            }

            if outline.rows.len() >= max_rows {
                outline.truncated = true;
                break;
            }
            outline.rows.push(OutlineRow {
                id: id.to_string(),
                depth,
                has_children: self.has_children(id),
            });
            path.push(id);

            let open = expanded.map_or(true, |set| set.contains(id));
            if open {
                let children: Vec<&str> = self
                    .index
                    .child_ids(id)
                    .filter(|c| self.index.contains(c))
                    .collect();
                stack.extend(children.into_iter().rev().map(|c| (c, depth + 1)));
            }
        }

        outline
    }

    /// Ta bort rader som inte matchar filtret
    pub fn filter(&self, rows: Vec<OutlineRow>, filter: &OutlineFilter) -> Vec<OutlineRow> {
        if !filter.is_active() {
            return rows;
        }
        rows.into_iter()
            .filter(|row| self.index.person(&row.id).is_some_and(|p| filter.matches(p)))
            .collect()
    }

    /// Fäll ut de första `budget` personerna i den fullständiga översikten
    pub fn expand_all(&self, root: &str, budget: usize) -> ExpandAllResult {
        let outline = self.build_all(root, budget);
        let result = ExpandAllResult {
            expanded: outline.rows.into_iter().map(|r| r.id).collect(),
            truncated: outline.truncated,
        };

        if result.truncated {
            info!("Utfällning begränsad till {} noder", budget);
        }

        result
    }

    /// Fäll ihop allt utom roten
    pub fn collapse_all(&self, root: &str) -> IndexSet<String> {
        let mut expanded = IndexSet::new();
        if self.index.contains(root) {
            expanded.insert(root.to_string());
        }
        expanded
    }
}

/// Radens position i översikten
pub fn row_index(rows: &[OutlineRow], id: &str) -> Option<usize> {
    rows.iter().position(|r| r.id == id)
}
