//! Frågor om föräldrar, partners, barn, förfäder och ättlingar

use indexmap::IndexSet;

use crate::models::Person;
use crate::services::index::TreeIndex;

/// Högsta antal generationer som visas uppåt eller nedåt
pub const MAX_GENERATION_DEPTH: usize = 4;

/// Relationsfrågor mot ett färdigbyggt index.
///
/// Alla svar är deterministiska: dubbletter tas bort med första förekomsten
/// kvar, så samma index ger alltid samma ordning.
#[derive(Clone, Copy)]
pub struct RelationshipService<'a> {
    index: &'a TreeIndex,
}

impl<'a> RelationshipService<'a> {
    pub fn new(index: &'a TreeIndex) -> Self {
        Self { index }
    }

    /// Alla föräldrar från alla relationer där personen är barn
    pub fn parents(&self, id: &str) -> Vec<&'a Person> {
        let ids = self
            .index
            .parent_refs(id)
            .iter()
            .flat_map(|r| r.parent_ids.iter().map(String::as_str));
        self.resolve(ids)
    }

    pub fn spouses(&self, id: &str) -> Vec<&'a Person> {
        self.resolve(self.index.spouse_ids(id))
    }

    pub fn children(&self, id: &str) -> Vec<&'a Person> {
        self.resolve(self.index.child_ids(id))
    }

    /// Förfäder per generation; nivå 0 är föräldrarna
    pub fn ancestors(&self, id: &str, depth: usize) -> Vec<Vec<&'a Person>> {
        self.widen(id, depth, |pid| self.parents(pid))
    }

    /// Ättlingar per generation; nivå 0 är barnen
    pub fn descendants(&self, id: &str, depth: usize) -> Vec<Vec<&'a Person>> {
        self.widen(id, depth, |pid| self.children(pid))
    }

    /// Bredda nivå för nivå. Dubbletter tas bort inom en nivå; antalet nivåer
    /// begränsas av `depth`, så även cykler i datan ger ett ändligt svar.
    fn widen<F>(&self, id: &str, depth: usize, step: F) -> Vec<Vec<&'a Person>>
    where
        F: Fn(&str) -> Vec<&'a Person>,
    {
        let mut levels: Vec<Vec<&'a Person>> = Vec::new();
        let mut current: Vec<&str> = vec![id];

        for _ in 0..depth {
            let mut next: IndexSet<&'a str> = IndexSet::new();
            for &cid in &current {
                for p in step(cid) {
                    next.insert(p.id.as_str());
                }
            }

            if next.is_empty() {
                break;
            }

            levels.push(
                next.iter()
                    .filter_map(|pid| self.index.person(pid))
                    .collect(),
            );
            current = next.into_iter().collect();
        }

        levels
    }

    /// Slå upp id i persontabellen; okända id och dubbletter försvinner
    fn resolve<'i, I>(&self, ids: I) -> Vec<&'a Person>
    where
        I: IntoIterator<Item = &'i str>,
    {
        let mut seen: IndexSet<&str> = IndexSet::new();
        let mut out = Vec::new();
        for pid in ids {
            if let Some(person) = self.index.person(pid) {
                if seen.insert(person.id.as_str()) {
                    out.push(person);
                }
            }
        }
        out
    }
}

/// Hjälpfunktion för tester och utskrift: id per nivå
pub fn level_ids(levels: &[Vec<&Person>]) -> Vec<Vec<String>> {
    levels
        .iter()
        .map(|level| level.iter().map(|p| p.id.clone()).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dataset, Union};
    use crate::services::fixtures;

    fn ids(people: &[&Person]) -> Vec<String> {
        people.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_abcd_example() {
        let index = fixtures::abcd();
        let rel = RelationshipService::new(&index);

        assert_eq!(ids(&rel.parents("C")), vec!["A", "B"]);
        assert_eq!(ids(&rel.children("A")), vec!["C"]);
        assert_eq!(ids(&rel.spouses("A")), vec!["B"]);

        assert_eq!(
            level_ids(&rel.ancestors("D", 2)),
            vec![vec!["C".to_string()], vec!["A".to_string(), "B".to_string()]]
        );
        assert_eq!(
            level_ids(&rel.descendants("A", 2)),
            vec![vec!["C".to_string()], vec!["D".to_string()]]
        );
    }

    #[test]
    fn test_levels_stop_when_empty() {
        let index = fixtures::abcd();
        let rel = RelationshipService::new(&index);

        assert_eq!(rel.ancestors("D", 4).len(), 2);
        assert_eq!(rel.descendants("A", 4).len(), 2);
        assert!(rel.ancestors("A", 3).is_empty());
        assert!(rel.ancestors("D", 0).is_empty());
        assert!(rel.ancestors("saknas", 2).is_empty());
    }

    #[test]
    fn test_parents_deduplicated_across_unions() {
        let people = vec![
            Person::new("p", "P"),
            Person::new("m", "M"),
            Person::new("c", "C"),
        ];
        // Samma par registrerat två gånger för samma barn
        let unions = vec![
            Union::new("u1", Some("p"), Some("m"), &["c"]),
            Union::new("u2", Some("m"), Some("p"), &["c"]),
        ];
        let index = TreeIndex::build(Dataset::new(people, unions));
        let rel = RelationshipService::new(&index);

        assert_eq!(ids(&rel.parents("c")), vec!["p", "m"]);
        assert_eq!(ids(&rel.spouses("p")), vec!["m"]);
    }

    #[test]
    fn test_cycle_does_not_loop() {
        let people = vec![Person::new("x", "X"), Person::new("y", "Y")];
        let unions = vec![
            Union::new("u1", Some("x"), None, &["y"]),
            Union::new("u2", Some("y"), None, &["x"]),
        ];
        let index = TreeIndex::build(Dataset::new(people, unions));
        let rel = RelationshipService::new(&index);

        // Cykeln upprepas men djupet sätter gränsen
        let levels = rel.ancestors("x", MAX_GENERATION_DEPTH);
        assert_eq!(levels.len(), MAX_GENERATION_DEPTH);
        assert_eq!(level_ids(&levels[..2]), vec![vec!["y".to_string()], vec!["x".to_string()]]);
    }

    #[test]
    fn test_family_generations() {
        let index = fixtures::family();
        let rel = RelationshipService::new(&index);

        assert_eq!(
            level_ids(&rel.ancestors("g1", 3)),
            vec![
                vec!["s1".to_string(), "w1".to_string()],
                vec!["f1".to_string(), "m1".to_string()],
                vec!["gp1".to_string(), "gp2".to_string()],
            ]
        );
        assert_eq!(
            level_ids(&rel.descendants("gp1", 2)),
            vec![
                vec!["f1".to_string(), "a1".to_string()],
                vec!["s1".to_string(), "s2".to_string(), "n1".to_string()],
            ]
        );
    }
}
