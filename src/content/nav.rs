use super::model::{active_sorted, ContentSource, Entity, Level};

/// Prefix-consistent slug path identifying the current node. A slug is only
/// meaningful when every shallower slug is present.
#[derive(Debug, Clone, Default)]
pub struct NavContext {
    pub exam: String,
    pub subject: Option<String>,
    pub unit: Option<String>,
    pub chapter: Option<String>,
    pub topic: Option<String>,
    pub subtopic: Option<String>,
    pub definition: Option<String>,
}

impl NavContext {
    pub fn new(exam: &str) -> Self {
        Self {
            exam: exam.to_string(),
            ..Default::default()
        }
    }

    /// Parses an `exam/subject/unit/...` slash path.
    pub fn from_path(path: &str) -> anyhow::Result<Self> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let exam = segments
            .next()
            .ok_or_else(|| anyhow::anyhow!("path must start with an exam slug"))?;

        let mut ctx = NavContext::new(exam);
        {
            let slots = [
                &mut ctx.subject,
                &mut ctx.unit,
                &mut ctx.chapter,
                &mut ctx.topic,
                &mut ctx.subtopic,
                &mut ctx.definition,
            ];
            let mut slots = slots.into_iter();
            for segment in segments {
                match slots.next() {
                    Some(slot) => *slot = Some(segment.to_string()),
                    None => anyhow::bail!("path '{}' is deeper than the content tree", path),
                }
            }
        }
        Ok(ctx)
    }

    /// Provided sub-exam slugs in depth order, stopping at the first gap.
    fn slugs(&self) -> Vec<&str> {
        [
            &self.subject,
            &self.unit,
            &self.chapter,
            &self.topic,
            &self.subtopic,
            &self.definition,
        ]
        .iter()
        .map_while(|s| s.as_deref())
        .collect()
    }
}

/// One resolved level: the Active, ordered sibling set and the position of the
/// node on the path within it.
#[derive(Debug)]
pub struct PathStep {
    pub level: Level,
    pub siblings: Vec<Entity>,
    pub index: usize,
}

impl PathStep {
    pub fn node(&self) -> &Entity {
        &self.siblings[self.index]
    }
}

/// Explicit path stack from the exam down to the deepest slug that matched.
#[derive(Debug)]
pub struct ResolvedPath {
    pub exam: Entity,
    pub steps: Vec<PathStep>,
}

impl ResolvedPath {
    /// Deepest resolved node; the exam itself when no sub-exam slug matched.
    pub fn current(&self) -> (Level, &Entity) {
        match self.steps.last() {
            Some(step) => (step.level, step.node()),
            None => (Level::Exam, &self.exam),
        }
    }

    /// Exam slug plus the slugs of the first `depth` steps.
    fn slugs_to(&self, depth: usize) -> Vec<String> {
        let mut slugs = vec![self.exam.slug.clone()];
        slugs.extend(self.steps[..depth].iter().map(|s| s.node().slug.clone()));
        slugs
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: String,
    pub href: String,
}

/// Previous/next links in depth-first pre-order over the Active tree. `None`
/// at either end of the exam; both `None` when the exam itself is unresolved.
#[derive(Debug, Default)]
pub struct UniversalNav {
    pub prev: Option<NavItem>,
    pub next: Option<NavItem>,
}

/// Resolves the context's slugs level by level against Active, ordered
/// children. A slug with no Active match halts resolution at the shallower
/// level rather than erroring. `Ok(None)` means the exam itself is unknown.
pub fn resolve_path(
    source: &impl ContentSource,
    ctx: &NavContext,
) -> anyhow::Result<Option<ResolvedPath>> {
    let exam = match source.exam(&ctx.exam)? {
        Some(exam) if !exam.id.is_empty() => exam,
        _ => return Ok(None),
    };

    let mut steps: Vec<PathStep> = Vec::new();
    let mut level = Level::Subject;

    for slug in ctx.slugs() {
        let parent_id = steps
            .last()
            .map(|s| s.node().id.clone())
            .unwrap_or_else(|| exam.id.clone());

        let siblings = active_sorted(source.children(level, &parent_id)?);
        match siblings.iter().position(|e| e.slug == slug) {
            Some(index) => steps.push(PathStep {
                level,
                siblings,
                index,
            }),
            None => break,
        }

        level = match level.child() {
            Some(next) => next,
            None => break,
        };
    }

    Ok(Some(ResolvedPath { exam, steps }))
}

pub fn universal_nav(
    source: &impl ContentSource,
    ctx: &NavContext,
) -> anyhow::Result<UniversalNav> {
    let path = match resolve_path(source, ctx)? {
        Some(path) => path,
        None => return Ok(UniversalNav::default()),
    };

    Ok(UniversalNav {
        prev: prev_item(source, &path)?,
        next: next_item(source, &path)?,
    })
}

/// First Active child if any, else the nearest next Active sibling walking up
/// the path. Exhausting the exam level means the end of the tree.
fn next_item(
    source: &impl ContentSource,
    path: &ResolvedPath,
) -> anyhow::Result<Option<NavItem>> {
    let (level, node) = path.current();

    if let Some(child_level) = level.child() {
        let children = active_sorted(source.children(child_level, &node.id)?);
        if let Some(first) = children.first() {
            let mut slugs = path.slugs_to(path.steps.len());
            slugs.push(first.slug.clone());
            return Ok(Some(nav_item(first, &slugs)));
        }
    }

    for depth in (0..path.steps.len()).rev() {
        let step = &path.steps[depth];
        if let Some(sibling) = step.siblings.get(step.index + 1) {
            let mut slugs = path.slugs_to(depth);
            slugs.push(sibling.slug.clone());
            return Ok(Some(nav_item(sibling, &slugs)));
        }
    }

    Ok(None)
}

/// Deepest last Active descendant of the previous sibling, or the parent when
/// there is no earlier sibling. The exam root carries no nav link, so the
/// first Subject's prev is `None`.
fn prev_item(
    source: &impl ContentSource,
    path: &ResolvedPath,
) -> anyhow::Result<Option<NavItem>> {
    let step = match path.steps.last() {
        Some(step) => step,
        None => return Ok(None),
    };

    if step.index == 0 {
        if path.steps.len() == 1 {
            return Ok(None);
        }
        let parent_depth = path.steps.len() - 1;
        let parent = path.steps[parent_depth - 1].node();
        let slugs = path.slugs_to(parent_depth);
        return Ok(Some(nav_item(parent, &slugs)));
    }

    let mut node = step.siblings[step.index - 1].clone();
    let mut level = step.level;
    let mut slugs = path.slugs_to(path.steps.len() - 1);
    slugs.push(node.slug.clone());

    // land on the deepest last content under the previous sibling
    while let Some(child_level) = level.child() {
        let children = active_sorted(source.children(child_level, &node.id)?);
        match children.last() {
            Some(last) => {
                node = last.clone();
                level = child_level;
                slugs.push(node.slug.clone());
            }
            None => break,
        }
    }

    Ok(Some(nav_item(&node, &slugs)))
}

fn nav_item(entity: &Entity, slugs: &[String]) -> NavItem {
    NavItem {
        label: entity.name.clone(),
        href: format!("/exam/{}", slugs.join("/")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::testutil::{ent, inactive, MemorySource};

    // jee
    // └── physics (1)            chemistry (2)
    //     ├── mechanics (1)      (no units)
    //     │   └── kinematics
    //     │       └── motion
    //     │           └── velocity
    //     │               ├── speed (1)
    //     │               └── acceleration (2)
    //     └── optics (2, no chapters)
    fn jee() -> MemorySource {
        let mut source = MemorySource::default();
        source.add_exam(ent("jee", "JEE", 1));
        source.add(
            Level::Subject,
            "jee",
            vec![ent("physics", "Physics", 1), ent("chemistry", "Chemistry", 2)],
        );
        source.add(
            Level::Unit,
            "physics",
            vec![ent("mechanics", "Mechanics", 1), ent("optics", "Optics", 2)],
        );
        source.add(
            Level::Chapter,
            "mechanics",
            vec![ent("kinematics", "Kinematics", 1)],
        );
        source.add(Level::Topic, "kinematics", vec![ent("motion", "Motion", 1)]);
        source.add(Level::Subtopic, "motion", vec![ent("velocity", "Velocity", 1)]);
        source.add(
            Level::Definition,
            "velocity",
            vec![
                ent("speed", "Speed", 1),
                ent("acceleration", "Acceleration", 2),
            ],
        );
        source
    }

    fn ctx(path: &str) -> NavContext {
        NavContext::from_path(path).unwrap()
    }

    fn item(label: &str, href: &str) -> NavItem {
        NavItem {
            label: label.to_string(),
            href: href.to_string(),
        }
    }

    #[test]
    fn from_path_fills_levels_in_order() {
        let ctx = ctx("jee/physics/mechanics");
        assert_eq!(ctx.exam, "jee");
        assert_eq!(ctx.subject.as_deref(), Some("physics"));
        assert_eq!(ctx.unit.as_deref(), Some("mechanics"));
        assert!(ctx.chapter.is_none());

        assert!(NavContext::from_path("").is_err());
        assert!(NavContext::from_path("a/b/c/d/e/f/g/h").is_err());
    }

    #[test]
    fn subject_with_children_descends_for_next() {
        let source = jee();
        let nav = universal_nav(&source, &ctx("jee/physics")).unwrap();
        assert_eq!(nav.next, Some(item("Mechanics", "/exam/jee/physics/mechanics")));
        // first subject: parent is the exam, which has no nav link
        assert_eq!(nav.prev, None);
    }

    #[test]
    fn exam_root_points_at_first_subject() {
        let source = jee();
        let nav = universal_nav(&source, &ctx("jee")).unwrap();
        assert_eq!(nav.next, Some(item("Physics", "/exam/jee/physics")));
        assert_eq!(nav.prev, None);
    }

    #[test]
    fn last_definition_ascends_to_the_next_unit() {
        let source = jee();
        let nav = universal_nav(
            &source,
            &ctx("jee/physics/mechanics/kinematics/motion/velocity/acceleration"),
        )
        .unwrap();
        assert_eq!(nav.next, Some(item("Optics", "/exam/jee/physics/optics")));
        assert_eq!(
            nav.prev,
            Some(item(
                "Speed",
                "/exam/jee/physics/mechanics/kinematics/motion/velocity/speed"
            ))
        );
    }

    #[test]
    fn first_definition_steps_up_to_its_subtopic() {
        let source = jee();
        let nav = universal_nav(
            &source,
            &ctx("jee/physics/mechanics/kinematics/motion/velocity/speed"),
        )
        .unwrap();
        assert_eq!(
            nav.prev,
            Some(item(
                "Velocity",
                "/exam/jee/physics/mechanics/kinematics/motion/velocity"
            ))
        );
        assert_eq!(
            nav.next,
            Some(item(
                "Acceleration",
                "/exam/jee/physics/mechanics/kinematics/motion/velocity/acceleration"
            ))
        );
    }

    #[test]
    fn prev_of_a_sibling_lands_on_its_deepest_last_descendant() {
        let source = jee();
        let nav = universal_nav(&source, &ctx("jee/physics/optics")).unwrap();
        assert_eq!(
            nav.prev,
            Some(item(
                "Acceleration",
                "/exam/jee/physics/mechanics/kinematics/motion/velocity/acceleration"
            ))
        );
        // optics is childless, so next ascends to physics' next sibling
        assert_eq!(nav.next, Some(item("Chemistry", "/exam/jee/chemistry")));
    }

    #[test]
    fn end_of_the_tree_has_no_next() {
        let source = jee();
        let nav = universal_nav(&source, &ctx("jee/chemistry")).unwrap();
        assert_eq!(nav.next, None);
        // the childless previous subject is its own deepest descendant... of
        // its last unit, which is optics
        assert_eq!(nav.prev, Some(item("Optics", "/exam/jee/physics/optics")));
    }

    #[test]
    fn prev_next_are_symmetric_on_a_fixed_snapshot() {
        let source = jee();
        let walk = [
            "jee/physics",
            "jee/physics/mechanics",
            "jee/physics/mechanics/kinematics",
            "jee/physics/mechanics/kinematics/motion",
            "jee/physics/mechanics/kinematics/motion/velocity",
            "jee/physics/mechanics/kinematics/motion/velocity/speed",
            "jee/physics/mechanics/kinematics/motion/velocity/acceleration",
            "jee/physics/optics",
            "jee/chemistry",
        ];
        for pair in walk.windows(2) {
            let here = universal_nav(&source, &ctx(pair[0])).unwrap();
            let there = universal_nav(&source, &ctx(pair[1])).unwrap();
            let next_href = here.next.as_ref().map(|i| i.href.as_str());
            assert_eq!(
                next_href,
                Some(format!("/exam/{}", pair[1]).as_str()),
                "next of {}",
                pair[0]
            );
            let prev_href = there.prev.as_ref().map(|i| i.href.as_str());
            assert_eq!(
                prev_href,
                Some(format!("/exam/{}", pair[0]).as_str()),
                "prev of {}",
                pair[1]
            );
        }
    }

    #[test]
    fn inactive_nodes_are_invisible_to_traversal() {
        let mut source = MemorySource::default();
        source.add_exam(ent("neet", "NEET", 1));
        source.add(
            Level::Subject,
            "neet",
            vec![
                inactive("astro", "Astronomy", 0),
                ent("biology", "Biology", 1),
                inactive("geology", "Geology", 2),
                ent("zoology", "Zoology", 3),
            ],
        );

        let nav = universal_nav(&source, &ctx("neet")).unwrap();
        assert_eq!(nav.next, Some(item("Biology", "/exam/neet/biology")));

        let nav = universal_nav(&source, &ctx("neet/biology")).unwrap();
        assert_eq!(nav.next, Some(item("Zoology", "/exam/neet/zoology")));

        // an inactive slug never resolves, so the path halts at the exam
        let nav = universal_nav(&source, &ctx("neet/geology")).unwrap();
        assert_eq!(nav.next, Some(item("Biology", "/exam/neet/biology")));
    }

    #[test]
    fn unknown_slug_halts_resolution_one_level_shallower() {
        let source = jee();
        let path = resolve_path(&source, &ctx("jee/physics/bogus"))
            .unwrap()
            .unwrap();
        let (level, node) = path.current();
        assert_eq!(level, Level::Subject);
        assert_eq!(node.slug, "physics");

        let nav = universal_nav(&source, &ctx("jee/physics/bogus")).unwrap();
        assert_eq!(nav.next, Some(item("Mechanics", "/exam/jee/physics/mechanics")));
    }

    #[test]
    fn unresolvable_exam_yields_the_empty_pair() {
        let source = jee();
        let nav = universal_nav(&source, &ctx("upsc/history")).unwrap();
        assert_eq!(nav.prev, None);
        assert_eq!(nav.next, None);
        assert!(resolve_path(&source, &ctx("upsc")).unwrap().is_none());
    }

    #[test]
    fn exam_resolves_by_id_as_well_as_slug() {
        let mut source = MemorySource::default();
        source.add_exam(Entity::new(
            "x1".into(),
            "GATE".into(),
            Some("gate".into()),
            crate::content::Status::Active,
            1,
        ));
        source.add(Level::Subject, "x1", vec![ent("cs", "Computer Science", 1)]);

        let by_slug = universal_nav(&source, &ctx("gate")).unwrap();
        assert_eq!(by_slug.next, Some(item("Computer Science", "/exam/gate/cs")));

        let by_id = universal_nav(&source, &ctx("x1")).unwrap();
        assert_eq!(by_id.next.unwrap().label, "Computer Science");
    }
}
