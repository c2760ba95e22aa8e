use serde::Serialize;

/// The seven fixed tiers of the content tree, shallowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Exam,
    Subject,
    Unit,
    Chapter,
    Topic,
    Subtopic,
    Definition,
}

impl Level {
    /// REST collection name, e.g. `subjects` for `GET /api/subjects`.
    pub fn collection(&self) -> &'static str {
        match self {
            Level::Exam => "exams",
            Level::Subject => "subjects",
            Level::Unit => "units",
            Level::Chapter => "chapters",
            Level::Topic => "topics",
            Level::Subtopic => "subtopics",
            Level::Definition => "definitions",
        }
    }

    /// Query parameter naming this level's parent, e.g. `examId` for subjects.
    pub fn parent_key(&self) -> &'static str {
        match self {
            Level::Exam => "",
            Level::Subject => "examId",
            Level::Unit => "subjectId",
            Level::Chapter => "unitId",
            Level::Topic => "chapterId",
            Level::Subtopic => "topicId",
            Level::Definition => "subtopicId",
        }
    }

    pub fn child(&self) -> Option<Level> {
        match self {
            Level::Exam => Some(Level::Subject),
            Level::Subject => Some(Level::Unit),
            Level::Unit => Some(Level::Chapter),
            Level::Chapter => Some(Level::Topic),
            Level::Topic => Some(Level::Subtopic),
            Level::Subtopic => Some(Level::Definition),
            Level::Definition => None,
        }
    }

    pub fn parent(&self) -> Option<Level> {
        match self {
            Level::Exam => None,
            Level::Subject => Some(Level::Exam),
            Level::Unit => Some(Level::Subject),
            Level::Chapter => Some(Level::Unit),
            Level::Topic => Some(Level::Chapter),
            Level::Subtopic => Some(Level::Topic),
            Level::Definition => Some(Level::Subtopic),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Level::Exam => "Exam",
            Level::Subject => "Subject",
            Level::Unit => "Unit",
            Level::Chapter => "Chapter",
            Level::Topic => "Topic",
            Level::Subtopic => "Subtopic",
            Level::Definition => "Definition",
        }
    }
}

/// Visibility flag; only Active entities are navigable publicly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "inactive")]
    Inactive,
}

impl Status {
    /// The API sends status as a string. Absent or unrecognized values are
    /// treated as Active since public endpoints pre-filter and omit the field.
    pub fn parse(raw: Option<&str>) -> Status {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("inactive") => Status::Inactive,
            _ => Status::Active,
        }
    }
}

/// The common row shape shared by every collection.
#[derive(Debug, Clone, Serialize)]
pub struct Entity {
    /// opaque identifier, stable and unique within its collection
    pub id: String,

    /// display label
    pub name: String,

    /// URL segment; already falls back to `id` when the API omits it
    pub slug: String,

    pub status: Status,

    /// position among siblings; ties keep fetch order
    pub order_number: i64,
}

impl Entity {
    pub fn new(id: String, name: String, slug: Option<String>, status: Status, order_number: i64) -> Self {
        let slug = match slug {
            Some(s) if !s.is_empty() => s,
            _ => id.clone(),
        };
        Self {
            id,
            name,
            slug,
            status,
            order_number,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }
}

/// Seam between the HTTP client and the hierarchy/navigation logic. Tests
/// substitute an in-memory fixture.
pub trait ContentSource {
    /// Single exam lookup by slug or id. `Ok(None)` strictly means not found;
    /// transport failures are errors.
    fn exam(&self, slug_or_id: &str) -> anyhow::Result<Option<Entity>>;

    /// Raw rows of `level` under `parent_id`, unfiltered and in server order.
    fn children(&self, level: Level, parent_id: &str) -> anyhow::Result<Vec<Entity>>;
}

/// The shared ordering convention: Active rows only, stable-sorted by
/// order_number so equal orders keep their fetch position.
pub fn active_sorted(rows: Vec<Entity>) -> Vec<Entity> {
    let mut rows: Vec<Entity> = rows.into_iter().filter(Entity::is_active).collect();
    rows.sort_by_key(|e| e.order_number);
    rows
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectNode {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub units: Vec<UnitNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitNode {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub chapters: Vec<ChapterNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChapterNode {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub topics: Vec<TopicNode>,
}

/// Leaf of the sidebar tree; topics carry no children there.
#[derive(Debug, Clone, Serialize)]
pub struct TopicNode {
    pub id: String,
    pub name: String,
    pub slug: String,
}
