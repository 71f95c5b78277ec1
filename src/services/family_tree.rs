//! Familjeträd-tjänst: synlig mängd → djup → rutnätslayout

use std::collections::{BTreeMap, HashSet};

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::debug;

use crate::models::{LayoutConfig, Person};
use crate::services::depth::{DepthAssigner, DepthAssignment, DEPTH_ITERATION_LIMIT};
use crate::services::index::TreeIndex;
use crate::services::relations::RelationshipService;
use crate::services::visible::{ViewMode, VisibleSetBuilder};

/// En nod i familjeträdet
#[derive(Debug, Clone, Serialize)]
pub struct FamilyTreeNode {
    pub person: Person,
    pub x: f32,
    pub y: f32,
    pub column: usize,
    pub row: usize,
    pub generation: i32, // fokusläge: 0 = fokusperson, negativ = förfäder
}

/// En länk förälder → barn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyTreeLink {
    pub from_id: String,
    pub to_id: String,
}

/// Familjeträd med alla noder och länkar
#[derive(Debug, Clone, Default, Serialize)]
pub struct FamilyTree {
    pub nodes: IndexMap<String, FamilyTreeNode>,
    pub links: Vec<FamilyTreeLink>,
    pub focus_person_id: Option<String>,
    pub node_width: f32,
    pub node_height: f32,
    /// Canvasens bredd och höjd inklusive marginal
    pub width: f32,
    pub height: f32,
    /// Sant om djuptilldelningen avbröts av iterationsgränsen
    pub exhausted: bool,
}

impl FamilyTree {
    /// Hämta nod för person
    pub fn get_node(&self, person_id: &str) -> Option<&FamilyTreeNode> {
        self.nodes.get(person_id)
    }

    /// Beräkna bounding box (min_x, min_y, max_x, max_y) över nodernas ytor
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        if self.nodes.is_empty() {
            return (0.0, 0.0, 0.0, 0.0);
        }

        let mut min_x = f32::MAX;
        let mut min_y = f32::MAX;
        let mut max_x = f32::MIN;
        let mut max_y = f32::MIN;

        for node in self.nodes.values() {
            min_x = min_x.min(node.x);
            min_y = min_y.min(node.y);
            max_x = max_x.max(node.x + self.node_width);
            max_y = max_y.max(node.y + self.node_height);
        }

        (min_x, min_y, max_x, max_y)
    }
}

/// Tjänst för att bygga familjeträd
pub struct FamilyTreeService<'a> {
    index: &'a TreeIndex,
    config: LayoutConfig,
    max_iterations: usize,
}

impl<'a> FamilyTreeService<'a> {
    pub fn new(index: &'a TreeIndex) -> Self {
        Self {
            index,
            config: LayoutConfig::default(),
            max_iterations: DEPTH_ITERATION_LIMIT,
        }
    }

    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Bygg ett familjeträd för visningsläget
    pub fn build_tree(&self, mode: &ViewMode) -> FamilyTree {
        let visible = VisibleSetBuilder::new(self.index).build(mode);
        let depths = DepthAssigner::new(self.index)
            .with_max_iterations(self.max_iterations)
            .assign(mode, &visible);

        let mut tree = self.layout(&depths, &visible);
        tree.focus_person_id = mode
            .focal_id()
            .filter(|id| self.index.contains(id))
            .map(str::to_string);
        tree
    }

    /// Placera noder med tilldelat djup i ett rutnät: en kolumn per djup,
    /// en rad per person sorterad på födelseår, namn och id.
    pub fn layout(&self, depths: &DepthAssignment, visible: &IndexSet<String>) -> FamilyTree {
        let config = &self.config;
        let mut tree = FamilyTree {
            node_width: config.node_width,
            node_height: config.node_height,
            exhausted: depths.exhausted,
            ..Default::default()
        };

        // Gruppera noder per djup, sorterat på djup
        let mut generations: BTreeMap<i32, Vec<&Person>> = BTreeMap::new();
        for id in visible {
            let (Some(depth), Some(person)) = (depths.depth(id), self.index.person(id)) else {
                continue;
            };
            generations.entry(depth).or_default().push(person);
        }

        for (column, (generation, mut people)) in generations.into_iter().enumerate() {
            people.sort_by(|a, b| {
                a.birth_year_key()
                    .cmp(&b.birth_year_key())
                    .then_with(|| a.name.cmp(&b.name))
                    .then_with(|| a.id.cmp(&b.id))
            });

            let x = column as f32 * config.column_spacing + config.padding;
            for (row, person) in people.into_iter().enumerate() {
                tree.nodes.insert(
                    person.id.clone(),
                    FamilyTreeNode {
                        person: person.clone(),
                        x,
                        y: row as f32 * config.row_spacing + config.padding,
                        column,
                        row,
                        generation,
                    },
                );
            }
        }

        tree.links = self.links(&tree, visible);

        let (_, _, max_x, max_y) = tree.bounds();
        if tree.nodes.is_empty() {
            tree.width = 2.0 * config.padding;
            tree.height = 2.0 * config.padding;
        } else {
            tree.width = max_x + config.padding;
            tree.height = max_y + config.padding;
        }

        debug!(
            "Layout: {} noder, {} länkar, {}x{}",
            tree.nodes.len(),
            tree.links.len(),
            tree.width,
            tree.height
        );

        tree
    }

    /// En länk per (förälder, barn) där båda är placerade
    fn links(&self, tree: &FamilyTree, visible: &IndexSet<String>) -> Vec<FamilyTreeLink> {
        let relations = RelationshipService::new(self.index);
        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        let mut links = Vec::new();

        for child_id in visible {
            if !tree.nodes.contains_key(child_id) {
                continue;
            }
            for parent in relations.parents(child_id) {
                if !tree.nodes.contains_key(&parent.id) {
                    continue;
                }
                if seen.insert((parent.id.as_str(), child_id.as_str())) {
                    links.push(FamilyTreeLink {
                        from_id: parent.id.clone(),
                        to_id: child_id.clone(),
                    });
                }
            }
        }

        links
    }
}
