//! Read-only domain graph with bidirectional relationship navigation.
//!
//! A [`DomainGraph`] is built once from a [`GraphSnapshot`] and never mutated
//! afterwards. Entity collections are kept in natural id order and every
//! relationship has a precomputed reverse index, so reports can traverse in
//! either direction without scanning.

use super::types::{Comment, EntityId, Project, Tag, Task, Team, User};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Plain serialized form of a domain graph.
///
/// Every collection is optional in JSON and defaults to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub teams: Vec<Team>,
}

/// In-memory, read-only project-management graph.
///
/// Traversal of an absent relationship yields an empty iterator (or `None`
/// for to-one relationships). Dangling ids are skipped during traversal, the
/// graph does not validate referential integrity; see
/// [`validate_snapshot`](crate::validation::validate_snapshot).
#[derive(Debug, Clone, Default)]
pub struct DomainGraph {
    projects: BTreeMap<EntityId, Project>,
    users: BTreeMap<EntityId, User>,
    tags: BTreeMap<EntityId, Tag>,
    tasks: BTreeMap<EntityId, Task>,
    comments: BTreeMap<EntityId, Comment>,
    teams: BTreeMap<EntityId, Team>,

    tasks_by_project: HashMap<EntityId, Vec<EntityId>>,
    teams_by_project: HashMap<EntityId, Vec<EntityId>>,
    projects_by_member: HashMap<EntityId, Vec<EntityId>>,
    tasks_by_creator: HashMap<EntityId, Vec<EntityId>>,
    tasks_by_assignee: HashMap<EntityId, Vec<EntityId>>,
    tasks_by_tag: HashMap<EntityId, Vec<EntityId>>,
    comments_by_task: HashMap<EntityId, Vec<EntityId>>,
    comments_by_author: HashMap<EntityId, Vec<EntityId>>,
    teams_by_member: HashMap<EntityId, Vec<EntityId>>,
}

/// Resolve a list of ids against an entity map, skipping unknown ids.
fn resolve<'a, T>(
    entities: &'a BTreeMap<EntityId, T>,
    ids: Option<&'a Vec<EntityId>>,
) -> impl Iterator<Item = &'a T> + 'a {
    ids.into_iter()
        .flatten()
        .filter_map(move |id| entities.get(id))
}

fn index_by<T>(
    entities: &BTreeMap<EntityId, T>,
    keys: impl Fn(&T) -> Vec<EntityId>,
) -> HashMap<EntityId, Vec<EntityId>> {
    let mut index: HashMap<EntityId, Vec<EntityId>> = HashMap::new();
    // BTreeMap iteration keeps every index bucket in ascending id order
    for (id, entity) in entities {
        for key in keys(entity) {
            index.entry(key).or_default().push(*id);
        }
    }
    index
}

impl DomainGraph {
    /// Build the graph and its reverse indexes from a snapshot.
    ///
    /// When an id occurs more than once within one collection the last entry wins.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Self {
        fn keyed<T>(items: Vec<T>, id: impl Fn(&T) -> EntityId) -> BTreeMap<EntityId, T> {
            items.into_iter().map(|item| (id(&item), item)).collect()
        }

        let projects = keyed(snapshot.projects, |p| p.id);
        let users = keyed(snapshot.users, |u| u.id);
        let tags = keyed(snapshot.tags, |t| t.id);
        let tasks = keyed(snapshot.tasks, |t| t.id);
        let comments = keyed(snapshot.comments, |c| c.id);
        let teams = keyed(snapshot.teams, |t| t.id);

        Self {
            tasks_by_project: index_by(&tasks, |t| vec![t.project_id]),
            teams_by_project: index_by(&teams, |t| vec![t.project_id]),
            projects_by_member: index_by(&projects, |p| p.member_ids.clone()),
            tasks_by_creator: index_by(&tasks, |t| vec![t.creator_id]),
            tasks_by_assignee: index_by(&tasks, |t| t.assignee_id.into_iter().collect()),
            tasks_by_tag: index_by(&tasks, |t| t.tag_ids.clone()),
            comments_by_task: index_by(&comments, |c| vec![c.task_id]),
            comments_by_author: index_by(&comments, |c| vec![c.author_id]),
            teams_by_member: index_by(&teams, |t| t.member_ids.clone()),
            projects,
            users,
            tags,
            tasks,
            comments,
            teams,
        }
    }

    /// Serialize the graph back into its snapshot form (id order).
    pub fn to_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            projects: self.projects.values().cloned().collect(),
            users: self.users.values().cloned().collect(),
            tags: self.tags.values().cloned().collect(),
            tasks: self.tasks.values().cloned().collect(),
            comments: self.comments.values().cloned().collect(),
            teams: self.teams.values().cloned().collect(),
        }
    }

    // === Collections (natural id order) ===

    pub fn projects(&self) -> impl Iterator<Item = &Project> + '_ {
        self.projects.values()
    }

    pub fn users(&self) -> impl Iterator<Item = &User> + '_ {
        self.users.values()
    }

    pub fn tags(&self) -> impl Iterator<Item = &Tag> + '_ {
        self.tags.values()
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.values()
    }

    pub fn comments(&self) -> impl Iterator<Item = &Comment> + '_ {
        self.comments.values()
    }

    pub fn teams(&self) -> impl Iterator<Item = &Team> + '_ {
        self.teams.values()
    }

    // === Lookup by id ===

    pub fn project(&self, id: EntityId) -> Option<&Project> {
        self.projects.get(&id)
    }

    pub fn user(&self, id: EntityId) -> Option<&User> {
        self.users.get(&id)
    }

    pub fn tag(&self, id: EntityId) -> Option<&Tag> {
        self.tags.get(&id)
    }

    pub fn task(&self, id: EntityId) -> Option<&Task> {
        self.tasks.get(&id)
    }

    pub fn comment(&self, id: EntityId) -> Option<&Comment> {
        self.comments.get(&id)
    }

    pub fn team(&self, id: EntityId) -> Option<&Team> {
        self.teams.get(&id)
    }

    // === Project relationships ===

    /// Tasks owned by a project
    pub fn project_tasks(&self, project_id: EntityId) -> impl Iterator<Item = &Task> + '_ {
        resolve(&self.tasks, self.tasks_by_project.get(&project_id))
    }

    /// Users listed as members of a project
    pub fn project_members(&self, project_id: EntityId) -> impl Iterator<Item = &User> + '_ {
        resolve(&self.users, self.project(project_id).map(|p| &p.member_ids))
    }

    /// Teams referencing a project
    pub fn project_teams(&self, project_id: EntityId) -> impl Iterator<Item = &Team> + '_ {
        resolve(&self.teams, self.teams_by_project.get(&project_id))
    }

    // === Task relationships ===

    pub fn task_project(&self, task_id: EntityId) -> Option<&Project> {
        self.task(task_id).and_then(|t| self.project(t.project_id))
    }

    pub fn task_creator(&self, task_id: EntityId) -> Option<&User> {
        self.task(task_id).and_then(|t| self.user(t.creator_id))
    }

    pub fn task_assignee(&self, task_id: EntityId) -> Option<&User> {
        self.task(task_id)
            .and_then(|t| t.assignee_id)
            .and_then(|id| self.user(id))
    }

    /// Comments on a task, in comment id order
    pub fn task_comments(&self, task_id: EntityId) -> impl Iterator<Item = &Comment> + '_ {
        resolve(&self.comments, self.comments_by_task.get(&task_id))
    }

    /// Tags on a task, in the task's membership order
    pub fn task_tags(&self, task_id: EntityId) -> impl Iterator<Item = &Tag> + '_ {
        resolve(&self.tags, self.task(task_id).map(|t| &t.tag_ids))
    }

    /// True when any tag on the task carries exactly this name.
    pub fn task_has_tag_named(&self, task_id: EntityId, name: &str) -> bool {
        self.task_tags(task_id).any(|tag| tag.name == name)
    }

    // === User relationships ===

    pub fn created_tasks(&self, user_id: EntityId) -> impl Iterator<Item = &Task> + '_ {
        resolve(&self.tasks, self.tasks_by_creator.get(&user_id))
    }

    pub fn assigned_tasks(&self, user_id: EntityId) -> impl Iterator<Item = &Task> + '_ {
        resolve(&self.tasks, self.tasks_by_assignee.get(&user_id))
    }

    pub fn authored_comments(&self, user_id: EntityId) -> impl Iterator<Item = &Comment> + '_ {
        resolve(&self.comments, self.comments_by_author.get(&user_id))
    }

    pub fn user_teams(&self, user_id: EntityId) -> impl Iterator<Item = &Team> + '_ {
        resolve(&self.teams, self.teams_by_member.get(&user_id))
    }

    pub fn user_projects(&self, user_id: EntityId) -> impl Iterator<Item = &Project> + '_ {
        resolve(&self.projects, self.projects_by_member.get(&user_id))
    }

    // === Comment, tag and team relationships ===

    pub fn comment_task(&self, comment_id: EntityId) -> Option<&Task> {
        self.comment(comment_id).and_then(|c| self.task(c.task_id))
    }

    pub fn comment_author(&self, comment_id: EntityId) -> Option<&User> {
        self.comment(comment_id).and_then(|c| self.user(c.author_id))
    }

    pub fn tag_tasks(&self, tag_id: EntityId) -> impl Iterator<Item = &Task> + '_ {
        resolve(&self.tasks, self.tasks_by_tag.get(&tag_id))
    }

    pub fn team_project(&self, team_id: EntityId) -> Option<&Project> {
        self.team(team_id).and_then(|t| self.project(t.project_id))
    }

    pub fn team_members(&self, team_id: EntityId) -> impl Iterator<Item = &User> + '_ {
        resolve(&self.users, self.team(team_id).map(|t| &t.member_ids))
    }
}

impl From<GraphSnapshot> for DomainGraph {
    fn from(snapshot: GraphSnapshot) -> Self {
        Self::from_snapshot(snapshot)
    }
}

/// Fluent constructor for graphs, used by provisioning code and tests.
///
/// # Example
///
/// ```
/// use pmreport::domain::{GraphBuilder, Project, Task, User};
///
/// let graph = GraphBuilder::new()
///     .user(User::new(1, "Ann", "ann@example.com"))
///     .project(Project::new(1, "Alpha"))
///     .task(Task::new(1, "Write docs", 1, 1))
///     .build();
///
/// assert_eq!(graph.project_tasks(1).count(), 1);
/// assert_eq!(graph.created_tasks(1).count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    snapshot: GraphSnapshot,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(mut self, project: Project) -> Self {
        self.snapshot.projects.push(project);
        self
    }

    pub fn user(mut self, user: User) -> Self {
        self.snapshot.users.push(user);
        self
    }

    pub fn tag(mut self, tag: Tag) -> Self {
        self.snapshot.tags.push(tag);
        self
    }

    pub fn task(mut self, task: Task) -> Self {
        self.snapshot.tasks.push(task);
        self
    }

    pub fn comment(mut self, comment: Comment) -> Self {
        self.snapshot.comments.push(comment);
        self
    }

    pub fn team(mut self, team: Team) -> Self {
        self.snapshot.teams.push(team);
        self
    }

    /// Finish without indexing, e.g. to write the snapshot to disk
    pub fn snapshot(self) -> GraphSnapshot {
        self.snapshot
    }

    pub fn build(self) -> DomainGraph {
        DomainGraph::from_snapshot(self.snapshot)
    }
}
