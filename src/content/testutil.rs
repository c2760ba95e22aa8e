use std::collections::{HashMap, HashSet};

use super::model::{ContentSource, Entity, Level, Status};

/// In-memory stand-in for the REST API, keyed by (level, parent id).
#[derive(Default)]
pub struct MemorySource {
    exams: Vec<Entity>,
    children: HashMap<(Level, String), Vec<Entity>>,
    broken: HashSet<(Level, String)>,
}

impl MemorySource {
    pub fn add_exam(&mut self, exam: Entity) {
        self.exams.push(exam);
    }

    pub fn add(&mut self, level: Level, parent_id: &str, rows: Vec<Entity>) {
        self.children.insert((level, parent_id.to_string()), rows);
    }

    /// Makes every fetch of `level` under `parent_id` fail.
    pub fn break_branch(&mut self, level: Level, parent_id: &str) {
        self.broken.insert((level, parent_id.to_string()));
    }
}

impl ContentSource for MemorySource {
    fn exam(&self, slug_or_id: &str) -> anyhow::Result<Option<Entity>> {
        Ok(self
            .exams
            .iter()
            .find(|e| e.slug == slug_or_id || e.id == slug_or_id)
            .cloned())
    }

    fn children(&self, level: Level, parent_id: &str) -> anyhow::Result<Vec<Entity>> {
        if self.broken.contains(&(level, parent_id.to_string())) {
            anyhow::bail!(
                "simulated fetch failure: {} of '{}'",
                level.collection(),
                parent_id
            );
        }
        Ok(self
            .children
            .get(&(level, parent_id.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

/// Active entity; slug is the id.
pub fn ent(id: &str, name: &str, order: i64) -> Entity {
    Entity::new(
        id.to_string(),
        name.to_string(),
        Some(id.to_string()),
        Status::Active,
        order,
    )
}

pub fn inactive(id: &str, name: &str, order: i64) -> Entity {
    Entity::new(
        id.to_string(),
        name.to_string(),
        Some(id.to_string()),
        Status::Inactive,
        order,
    )
}
