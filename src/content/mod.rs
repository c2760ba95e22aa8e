mod fetch;
mod hierarchy;
mod model;
mod nav;
mod order;
#[cfg(test)]
mod testutil;

pub use fetch::{Api, RequestError};
pub use hierarchy::{build_hierarchy, BranchFailure, Hierarchy};
pub use model::{
    active_sorted, ChapterNode, ContentSource, Entity, Level, Status, SubjectNode, TopicNode,
    UnitNode,
};
pub use nav::{resolve_path, universal_nav, NavContext, NavItem, PathStep, ResolvedPath, UniversalNav};
pub use order::{next_order_number, renumber};
