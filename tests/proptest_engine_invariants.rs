//! Egenskapstester för relationsindex, djup, härstamning och översikt.
//!
//! 1. Relationsfrågor ger aldrig okända id eller dubbletter
//! 2. Varje förfädersnivå är föräldrarna till föregående nivå
//! 3. Djup i helläge: barn ligger minst en kolumn efter varje förälder
//! 4. Härstamningskedjan slutar i personen och håller steggränsen
//! 5. Virtuellt fönster ligger inom gränserna och utfyllnaden går jämnt ut
//! 6. "Fäll ut alla" håller budgeten och flaggar exakt vid överskott

use std::collections::HashSet;

use genlib_tree::services::depth::DepthAssigner;
use genlib_tree::services::outline::OutlineService;
use genlib_tree::services::path::PathResolver;
use genlib_tree::services::relations::RelationshipService;
use genlib_tree::services::virtualize::Viewport;
use genlib_tree::services::visible::{ViewMode, VisibleSetBuilder};
use genlib_tree::{Dataset, Person, TreeIndex, Union};
use proptest::prelude::*;

// ── Strategier ──────────────────────────────────────────────────────────

/// Rå relation: partnerindex och barnindex i persontabellen
type RawUnion = (usize, Option<usize>, Vec<usize>);

fn pid(i: usize) -> String {
    format!("p{}", i)
}

fn build(n: usize, unions: &[RawUnion], ghost: bool) -> TreeIndex {
    let people: Vec<Person> = (0..n)
        .map(|i| Person::new(pid(i), format!("Person {}", i % 5)))
        .collect();
    let mut list: Vec<Union> = unions
        .iter()
        .enumerate()
        .map(|(u, (a, b, kids))| {
            let a = pid(*a);
            let b = (*b).map(pid);
            let kids: Vec<String> = kids.iter().map(|k| pid(*k)).collect();
            let kids: Vec<&str> = kids.iter().map(String::as_str).collect();
            Union::new(format!("u{}", u), Some(a.as_str()), b.as_deref(), &kids)
        })
        .collect();
    if ghost {
        list.push(Union::new("spöke", Some("saknas"), Some("p0"), &["p0", "borta"]));
    }
    TreeIndex::build(Dataset::new(people, list))
}

/// Godtycklig graf, cykler tillåtna
fn any_graph() -> impl Strategy<Value = (usize, Vec<RawUnion>, bool)> {
    (1usize..25).prop_flat_map(|n| {
        let union = (0..n, proptest::option::of(0..n), prop::collection::vec(0..n, 0..4));
        (Just(n), prop::collection::vec(union, 0..20), any::<bool>())
    })
}

/// Acyklisk graf: barn har alltid högre index än båda föräldrarna
fn acyclic_graph() -> impl Strategy<Value = (usize, Vec<RawUnion>)> {
    any_graph().prop_map(|(n, unions, _)| {
        let unions = unions
            .into_iter()
            .map(|(a, b, kids)| {
                let floor = a.max(b.unwrap_or(0));
                let kids = kids.into_iter().filter(|k| *k > floor).collect();
                (a, b, kids)
            })
            .collect();
        (n, unions)
    })
}

fn ids(people: &[&Person]) -> Vec<String> {
    people.iter().map(|p| p.id.clone()).collect()
}

fn assert_clean(index: &TreeIndex, people: &[&Person]) -> Result<(), TestCaseError> {
    let mut seen = HashSet::new();
    for p in people {
        prop_assert!(index.contains(&p.id), "okänt id {}", p.id);
        prop_assert!(seen.insert(p.id.clone()), "dubblett {}", p.id);
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
// 1–2. Relationsfrågor
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn relation_queries_are_clean((n, unions, ghost) in any_graph()) {
        let index = build(n, &unions, ghost);
        let rel = RelationshipService::new(&index);

        for i in 0..n {
            let id = pid(i);
            assert_clean(&index, &rel.parents(&id))?;
            assert_clean(&index, &rel.spouses(&id))?;
            assert_clean(&index, &rel.children(&id))?;
        }
    }

    #[test]
    fn ancestor_levels_follow_parents((n, unions, ghost) in any_graph(), depth in 0usize..5) {
        let index = build(n, &unions, ghost);
        let rel = RelationshipService::new(&index);

        for i in 0..n {
            let id = pid(i);
            let levels = rel.ancestors(&id, depth);
            prop_assert!(levels.len() <= depth);

            let mut previous = vec![id.clone()];
            for level in &levels {
                prop_assert!(!level.is_empty());
                assert_clean(&index, level)?;

                let mut expected: Vec<String> = Vec::new();
                for member in &previous {
                    for parent in ids(&rel.parents(member)) {
                        if !expected.contains(&parent) {
                            expected.push(parent);
                        }
                    }
                }
                prop_assert_eq!(ids(level), expected);
                previous = ids(level);
            }

            if levels.len() < depth {
                // Listan tog slut för att nästa nivå var tom
                let more = previous.iter().any(|m| !rel.parents(m).is_empty());
                prop_assert!(!more);
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Djup i helläge
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn full_depth_places_children_after_parents((n, unions) in acyclic_graph()) {
        let index = build(n, &unions, false);
        let rel = RelationshipService::new(&index);
        let visible = VisibleSetBuilder::new(&index).build(&ViewMode::Full);
        let result = DepthAssigner::new(&index).assign(&ViewMode::Full, &visible);

        prop_assert!(!result.exhausted);
        prop_assert_eq!(result.len(), visible.len());

        for id in &visible {
            let child_depth = result.depth(id).unwrap();
            for parent in rel.parents(id) {
                let parent_depth = result.depth(&parent.id).unwrap();
                prop_assert!(
                    child_depth >= parent_depth + 1,
                    "{}={} men förälder {}={}", id, child_depth, parent.id, parent_depth
                );
            }
        }
    }

    #[test]
    fn full_depth_terminates_on_any_graph((n, unions, ghost) in any_graph()) {
        let index = build(n, &unions, ghost);
        let visible = VisibleSetBuilder::new(&index).build(&ViewMode::Full);
        let result = DepthAssigner::new(&index).assign(&ViewMode::Full, &visible);

        for (_, depth) in &result.depths {
            prop_assert!(*depth >= 0 && (*depth as usize) < visible.len().max(1));
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Härstamningskedja
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn ancestry_chain_ends_with_person((n, unions, ghost) in any_graph(), hops in 0usize..15) {
        let index = build(n, &unions, ghost);
        let resolver = PathResolver::new(&index);

        for i in 0..n {
            let id = pid(i);
            let chain = resolver.ancestry_chain(&id, hops);
            prop_assert_eq!(chain.ids.last(), Some(&id));
            prop_assert!(chain.len() <= hops + 1);

            let unique: HashSet<&String> = chain.ids.iter().collect();
            prop_assert_eq!(unique.len(), chain.len());
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Virtuellt fönster
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn window_is_bounded_and_spacers_add_up(
        total in 0usize..5000,
        row_height in 0u32..200,
        container in 0u32..2000,
        scroll in 0u32..400_000,
        overscan in 0usize..20,
    ) {
        let window = Viewport::new(row_height, container)
            .with_scroll(scroll)
            .with_overscan(overscan)
            .window(total);

        prop_assert!(window.start <= window.end);
        prop_assert!(window.end <= total);

        let h = u64::from(row_height.max(1));
        prop_assert_eq!(
            window.top_spacer + (window.end - window.start) as u64 * h + window.bottom_spacer,
            total as u64 * h
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 6. Fäll ut alla
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn expand_all_respects_budget((n, unions, ghost) in any_graph(), budget in 1usize..30) {
        let index = build(n, &unions, ghost);
        let service = OutlineService::new(&index);

        let result = service.expand_all("p0", budget);
        prop_assert!(result.expanded.len() <= budget);

        let reachable = service.build_all("p0", 1_000);
        prop_assert_eq!(result.truncated, reachable.len() > budget);
    }
}
