//! Relationsindex byggda från en normaliserad datamängd
//!
//! Indexen byggs om i sin helhet vid varje inläsning och är därefter
//! oföränderliga. Alla frågor tar `&TreeIndex`.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::{info, warn};

use crate::models::{Dataset, Person, Union};

/// En förälderreferens: vilken relation barnet kom från och dess föräldrar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParentRef {
    pub union_id: Option<String>,
    /// Endast föräldrar som finns i persontabellen
    pub parent_ids: Vec<String>,
}

/// Icke-fatala dataproblem som upptäcktes vid indexering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexDiagnostics {
    /// Personposter utan id
    pub skipped_people: usize,
    /// Id som förekom mer än en gång (senare post vann)
    pub duplicate_ids: usize,
    pub dangling_partners: usize,
    pub dangling_children: usize,
    pub invalid_birth_dates: usize,
    pub invalid_death_dates: usize,
    /// `selfId` som inte pekar på någon person
    pub dangling_self_id: bool,
}

impl IndexDiagnostics {
    pub fn issue_count(&self) -> usize {
        self.skipped_people
            + self.duplicate_ids
            + self.dangling_partners
            + self.dangling_children
            + self.invalid_birth_dates
            + self.invalid_death_dates
            + usize::from(self.dangling_self_id)
    }

    pub fn is_clean(&self) -> bool {
        self.issue_count() == 0
    }
}

/// Oföränderliga relationsindex
#[derive(Debug, Clone, Default)]
pub struct TreeIndex {
    people: IndexMap<String, Person>,
    unions: Vec<Union>,
    self_id: Option<String>,
    parents_by_child: HashMap<String, Vec<ParentRef>>,
    children_by_parent: HashMap<String, IndexSet<String>>,
    spouses_by_person: HashMap<String, IndexSet<String>>,
    name_counts: HashMap<String, usize>,
    diagnostics: IndexDiagnostics,
}

impl TreeIndex {
    /// Bygg alla index i ett linjärt pass över personer och relationer
    pub fn build(dataset: Dataset) -> Self {
        let Dataset {
            people,
            unions,
            self_id,
            skipped_people,
        } = dataset;

        let mut index = TreeIndex {
            diagnostics: IndexDiagnostics {
                skipped_people,
                ..Default::default()
            },
            ..Default::default()
        };

        for person in people {
            if person.birth.is_some() && person.birth_date().is_none() {
                warn!("Ogiltigt födelsedatum för {}: {:?}", person.id, person.birth);
                index.diagnostics.invalid_birth_dates += 1;
            }
            if person.death.is_some() && person.death_date().is_none() {
                warn!("Ogiltigt dödsdatum för {}: {:?}", person.id, person.death);
                index.diagnostics.invalid_death_dates += 1;
            }

            // Senare dubbletter skriver över tidigare men behåller positionen
            if let Some(previous) = index.people.insert(person.id.clone(), person) {
                warn!("Dubblett av person-id {}, senaste posten används", previous.id);
                index.diagnostics.duplicate_ids += 1;
            }
        }

        for person in index.people.values() {
            *index.name_counts.entry(person.name.clone()).or_default() += 1;
        }

        for union in &unions {
            index.index_union(union);
        }
        index.unions = unions;

        index.self_id = match self_id {
            Some(id) if index.people.contains_key(&id) => Some(id),
            Some(id) => {
                warn!("selfId {} finns inte bland personerna", id);
                index.diagnostics.dangling_self_id = true;
                None
            }
            None => None,
        };

        info!(
            "Index byggt: {} personer, {} relationer, {} dataproblem",
            index.people.len(),
            index.unions.len(),
            index.diagnostics.issue_count()
        );

        index
    }

    fn index_union(&mut self, union: &Union) {
        let mut partners: Vec<String> = Vec::with_capacity(2);
        for pid in union.partners() {
            if !self.people.contains_key(pid) {
                warn!("Relation {} saknar partner {}", union.label(), pid);
                self.diagnostics.dangling_partners += 1;
            } else if !partners.iter().any(|p| p == pid) {
                partners.push(pid.to_string());
            }
        }

        if let [a, b] = partners.as_slice() {
            self.spouses_by_person
                .entry(a.clone())
                .or_default()
                .insert(b.clone());
            self.spouses_by_person
                .entry(b.clone())
                .or_default()
                .insert(a.clone());
        }

        for child_id in &union.children {
            if !self.people.contains_key(child_id) {
                warn!("Relation {} saknar barn {}", union.label(), child_id);
                self.diagnostics.dangling_children += 1;
                continue;
            }

            self.parents_by_child
                .entry(child_id.clone())
                .or_default()
                .push(ParentRef {
                    union_id: union.id.clone(),
                    parent_ids: partners.clone(),
                });

            for pid in &partners {
                self.children_by_parent
                    .entry(pid.clone())
                    .or_default()
                    .insert(child_id.clone());
            }
        }
    }

    pub fn person(&self, id: &str) -> Option<&Person> {
        self.people.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.people.contains_key(id)
    }

    /// Alla personer i datamängdens ordning
    pub fn people(&self) -> impl Iterator<Item = &Person> {
        self.people.values()
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn unions(&self) -> &[Union] {
        &self.unions
    }

    pub fn self_id(&self) -> Option<&str> {
        self.self_id.as_deref()
    }

    pub fn first_person_id(&self) -> Option<&str> {
        self.people.keys().next().map(String::as_str)
    }

    pub fn parent_refs(&self, child_id: &str) -> &[ParentRef] {
        self.parents_by_child
            .get(child_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Har personen minst en registrerad förälder?
    pub fn has_parents(&self, id: &str) -> bool {
        self.parent_refs(id)
            .iter()
            .any(|r| !r.parent_ids.is_empty())
    }

    pub fn child_ids(&self, parent_id: &str) -> impl Iterator<Item = &str> {
        self.children_by_parent
            .get(parent_id)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn spouse_ids(&self, person_id: &str) -> impl Iterator<Item = &str> {
        self.spouses_by_person
            .get(person_id)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Antal personer med exakt detta namn
    pub fn name_count(&self, name: &str) -> usize {
        self.name_counts.get(name).copied().unwrap_or(0)
    }

    pub fn name_counts(&self) -> &HashMap<String, usize> {
        &self.name_counts
    }

    pub fn diagnostics(&self) -> &IndexDiagnostics {
        &self.diagnostics
    }
}
