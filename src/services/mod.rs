//! Tjänster för Genlib Tree
//!
//! Innehåller motorn: normalisering, relationsindex, frågor och layout.

pub mod depth;
pub mod family_tree;
pub mod index;
pub mod insights;
pub mod normalize;
pub mod outline;
pub mod path;
pub mod relations;
pub mod virtualize;
pub mod visible;

#[cfg(test)]
pub(crate) mod fixtures;

pub use depth::{DepthAssigner, DepthAssignment};
pub use family_tree::{FamilyTree, FamilyTreeLink, FamilyTreeNode, FamilyTreeService};
pub use index::{IndexDiagnostics, ParentRef, TreeIndex};
pub use insights::{InsightsService, TreeStats, UpcomingBirthday};
pub use normalize::{GenderInference, HonorificInfix, NoInference, Normalizer};
pub use outline::{
    row_index, ExpandAllResult, LifeStatus, Outline, OutlineFilter, OutlineRow, OutlineService,
};
pub use path::{AncestryChain, PathResolver};
pub use relations::RelationshipService;
pub use virtualize::{RowWindow, Viewport};
pub use visible::{ViewMode, VisibleSetBuilder};
