use anyhow::Context;
use serde::Serialize;

use super::model::{
    active_sorted, ChapterNode, ContentSource, Entity, Level, SubjectNode, TopicNode, UnitNode,
};

/// A built sidebar tree. `incomplete` lists branches whose child fetch failed;
/// those parents carry an empty child vec, so callers can tell "no data" from
/// "fetch failed".
#[derive(Debug, Serialize)]
pub struct Hierarchy {
    pub subjects: Vec<SubjectNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub incomplete: Vec<BranchFailure>,
}

impl Hierarchy {
    pub fn is_complete(&self) -> bool {
        self.incomplete.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BranchFailure {
    pub level: Level,
    /// slug of the parent whose children could not be fetched
    pub parent: String,
    pub error: String,
}

/// Assembles the Active, order-sorted Subject→Unit→Chapter→Topic tree for one
/// exam. Every call re-fetches everything; there is no cache.
pub fn build_hierarchy(source: &impl ContentSource, exam_id: &str) -> anyhow::Result<Hierarchy> {
    let rows = source
        .children(Level::Subject, exam_id)
        .context(format!("failed to fetch subjects of exam '{}'", exam_id))?;

    let mut incomplete = Vec::new();
    let mut subjects = Vec::new();

    for subject in active_sorted(rows) {
        let mut units = Vec::new();
        for unit in branch(source, Level::Unit, &subject, &mut incomplete) {
            let mut chapters = Vec::new();
            for chapter in branch(source, Level::Chapter, &unit, &mut incomplete) {
                let topics = branch(source, Level::Topic, &chapter, &mut incomplete)
                    .into_iter()
                    .map(|t| TopicNode {
                        id: t.id,
                        name: t.name,
                        slug: t.slug,
                    })
                    .collect();
                chapters.push(ChapterNode {
                    id: chapter.id,
                    name: chapter.name,
                    slug: chapter.slug,
                    topics,
                });
            }
            units.push(UnitNode {
                id: unit.id,
                name: unit.name,
                slug: unit.slug,
                chapters,
            });
        }
        subjects.push(SubjectNode {
            id: subject.id,
            name: subject.name,
            slug: subject.slug,
            units,
        });
    }

    Ok(Hierarchy {
        subjects,
        incomplete,
    })
}

/// One per-parent fetch. A failure empties the branch and records it instead
/// of aborting the whole build.
fn branch(
    source: &impl ContentSource,
    level: Level,
    parent: &Entity,
    incomplete: &mut Vec<BranchFailure>,
) -> Vec<Entity> {
    match source.children(level, &parent.id) {
        Ok(rows) => active_sorted(rows),
        Err(e) => {
            incomplete.push(BranchFailure {
                level,
                parent: parent.slug.clone(),
                error: format!("{:#}", e),
            });
            Vec::new()
        }
    }
}
