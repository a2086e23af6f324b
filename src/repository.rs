//! In-memory entity repository over one loaded snapshot.
//!
//! The repository decodes the store once on open, serves lookups and
//! mutations from memory, and writes everything back only on an explicit
//! [`Repository::commit`]. Nothing is ever removed from a collection.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{Entity, EntityId, NewProject, Project, Task, TaskRecord, User};
use crate::storage::{Snapshot, Store};

/// Append-ordered records with an id index.
///
/// Ids are assumed unique; if a hand-edited store repeats one, lookups see
/// the first occurrence, as a front-to-back scan would.
#[derive(Debug, Clone)]
struct Collection<T> {
    items: Vec<T>,
    index: HashMap<EntityId, usize>,
}

impl<T: Entity> Collection<T> {
    fn from_vec(items: Vec<T>) -> Self {
        let mut index = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            index.entry(item.id()).or_insert(position);
        }
        Self { items, index }
    }

    /// One past the largest id, or `None` once the id space is used up
    fn next_id(&self) -> Option<EntityId> {
        self.items
            .iter()
            .map(Entity::id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
    }

    fn push(&mut self, item: T) {
        self.index.entry(item.id()).or_insert(self.items.len());
        self.items.push(item);
    }

    fn all(&self) -> &[T] {
        &self.items
    }

    fn get(&self, id: EntityId) -> Option<&T> {
        self.index.get(&id).map(|&position| &self.items[position])
    }

    /// Replace the record with the same id. Returns false if there is none.
    fn replace(&mut self, item: T) -> bool {
        match self.index.get(&item.id()) {
            Some(&position) => {
                self.items[position] = item;
                true
            }
            None => false,
        }
    }
}

/// Users, projects and tasks loaded from one [`Store`]
#[derive(Debug, Clone)]
pub struct Repository {
    store: Store,
    users: Collection<User>,
    projects: Collection<Project>,
    tasks: Collection<Task>,
}

impl Repository {
    /// Ensure the store exists, then load and decode every collection.
    ///
    /// Fails with `InvalidStatus` if any stored task carries an unknown status.
    pub fn open(store: Store) -> Result<Self> {
        store.initialize()?;
        let snapshot = store.load()?;
        Self::from_snapshot(store, snapshot)
    }

    /// Build a repository from an already loaded snapshot
    pub fn from_snapshot(store: Store, snapshot: Snapshot) -> Result<Self> {
        let tasks = snapshot
            .tasks
            .into_iter()
            .map(Task::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            store,
            users: Collection::from_vec(snapshot.users),
            projects: Collection::from_vec(snapshot.projects),
            tasks: Collection::from_vec(tasks),
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Encode the current in-memory state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            users: self.users.all().to_vec(),
            projects: self.projects.all().to_vec(),
            tasks: self.tasks.all().iter().map(TaskRecord::from).collect(),
        }
    }

    /// Write the current in-memory state back to the store
    pub fn commit(&self) -> Result<()> {
        self.store.save(&self.snapshot())
    }

    fn next_id<T: Entity>(&self, collection: &Collection<T>) -> Result<EntityId> {
        collection.next_id().ok_or_else(|| Error::CorruptStore {
            path: self.store.path().to_path_buf(),
            reason: format!("no {} ids left after {}", T::KIND, EntityId::MAX),
        })
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub fn next_user_id(&self) -> Result<EntityId> {
        self.next_id(&self.users)
    }

    pub fn create_user(
        &mut self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<User> {
        let user = User {
            id: self.next_user_id()?,
            name: name.into(),
            email: email.into(),
        };
        self.users.push(user.clone());
        debug!(kind = User::KIND, id = user.id, "created entity");
        Ok(user)
    }

    pub fn users(&self) -> &[User] {
        self.users.all()
    }

    pub fn user(&self, id: EntityId) -> Option<&User> {
        self.users.get(id)
    }

    /// Name of the referenced user, or `None` when the reference is empty or
    /// points at a user that does not exist
    pub fn user_name(&self, id: Option<EntityId>) -> Option<&str> {
        id.and_then(|id| self.users.get(id))
            .map(|user| user.name.as_str())
    }

    // =========================================================================
    // Projects
    // =========================================================================

    pub fn next_project_id(&self) -> Result<EntityId> {
        self.next_id(&self.projects)
    }

    pub fn create_project(&mut self, fields: NewProject) -> Result<Project> {
        let project = Project {
            id: self.next_project_id()?,
            title: fields.title,
            description: fields.description,
            due_date: fields.due_date,
            owner_id: fields.owner_id,
        };
        self.projects.push(project.clone());
        debug!(kind = Project::KIND, id = project.id, "created entity");
        Ok(project)
    }

    pub fn projects(&self) -> &[Project] {
        self.projects.all()
    }

    pub fn project(&self, id: EntityId) -> Option<&Project> {
        self.projects.get(id)
    }

    /// Replace the stored project that has the same id
    pub fn update_project(&mut self, project: &Project) -> Result<()> {
        if !self.projects.replace(project.clone()) {
            return Err(Error::ProjectNotFound(project.id.to_string()));
        }
        debug!(kind = Project::KIND, id = project.id, "updated entity");
        Ok(())
    }

    pub fn projects_owned_by(&self, user_id: EntityId) -> Vec<&Project> {
        self.projects
            .all()
            .iter()
            .filter(|project| project.owner_id == Some(user_id))
            .collect()
    }

    // =========================================================================
    // Tasks
    // =========================================================================

    pub fn next_task_id(&self) -> Result<EntityId> {
        self.next_id(&self.tasks)
    }

    pub fn create_task(
        &mut self,
        title: impl Into<String>,
        project_id: EntityId,
        assigned_to: Option<EntityId>,
    ) -> Result<Task> {
        let task = Task::new(self.next_task_id()?, title, project_id, assigned_to);
        self.tasks.push(task.clone());
        debug!(kind = Task::KIND, id = task.id, project_id, "created entity");
        Ok(task)
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.all()
    }

    pub fn task(&self, id: EntityId) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Replace the stored task that has the same id
    pub fn update_task(&mut self, task: &Task) -> Result<()> {
        if !self.tasks.replace(task.clone()) {
            return Err(Error::TaskNotFound(task.id.to_string()));
        }
        debug!(kind = Task::KIND, id = task.id, status = %task.status(), "updated entity");
        Ok(())
    }

    pub fn tasks_for_project(&self, project_id: EntityId) -> Vec<&Task> {
        self.tasks
            .all()
            .iter()
            .filter(|task| task.project_id == project_id)
            .collect()
    }
}
