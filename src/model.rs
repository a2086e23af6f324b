//! Entity records for project-tracker.
//!
//! Users and projects are plain records. Tasks guard their `status` field:
//! a task value can only hold one of [`TaskStatus::ALL`], whether it was built
//! in memory or decoded from the store through [`TaskRecord`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Numeric identity shared by every entity type
pub type EntityId = u64;

/// Common shape of the stored entity types
pub trait Entity {
    /// Collection name used in logs and messages
    const KIND: &'static str;

    fn id(&self) -> EntityId;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub email: String,
}

impl Entity for User {
    const KIND: &'static str = "user";

    fn id(&self) -> EntityId {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// ISO-8601 calendar date (`YYYY-MM-DD`)
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub owner_id: Option<EntityId>,
}

impl Entity for Project {
    const KIND: &'static str = "project";

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Fields of a project that does not have an id yet
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub owner_id: Option<EntityId>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Todo,
    Doing,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::Doing, TaskStatus::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::Doing => "doing",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| Error::InvalidStatus(s.to_string()))
    }
}

/// A task. `status` and `contributors` are only reachable through methods
/// that keep them valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: EntityId,
    pub title: String,
    pub project_id: EntityId,
    status: TaskStatus,
    pub assigned_to: Option<EntityId>,
    contributors: Vec<EntityId>,
}

impl Task {
    pub fn new(
        id: EntityId,
        title: impl Into<String>,
        project_id: EntityId,
        assigned_to: Option<EntityId>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            project_id,
            status: TaskStatus::default(),
            assigned_to,
            contributors: Vec::new(),
        }
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Set the status from user-supplied text. On error the previous status
    /// is kept.
    pub fn set_status(&mut self, value: &str) -> Result<()> {
        self.status = value.parse()?;
        Ok(())
    }

    pub fn complete(&mut self) {
        self.status = TaskStatus::Done;
    }

    pub fn contributors(&self) -> &[EntityId] {
        &self.contributors
    }

    /// Add a contributor. Returns false if the user was already listed.
    pub fn add_contributor(&mut self, user_id: EntityId) -> bool {
        if self.contributors.contains(&user_id) {
            return false;
        }
        self.contributors.push(user_id);
        true
    }
}

impl Entity for Task {
    const KIND: &'static str = "task";

    fn id(&self) -> EntityId {
        self.id
    }
}

/// Stored shape of a task, before the status guard is applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: EntityId,
    pub title: String,
    pub project_id: EntityId,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub assigned_to: Option<EntityId>,
    #[serde(default)]
    pub contributors: Vec<EntityId>,
}

impl Entity for TaskRecord {
    const KIND: &'static str = "task";

    fn id(&self) -> EntityId {
        self.id
    }
}

fn default_status() -> String {
    TaskStatus::default().as_str().to_string()
}

impl TryFrom<TaskRecord> for Task {
    type Error = Error;

    fn try_from(record: TaskRecord) -> Result<Self> {
        let mut task = Task::new(record.id, record.title, record.project_id, record.assigned_to);
        task.set_status(&record.status)?;
        for user_id in record.contributors {
            task.add_contributor(user_id);
        }
        Ok(task)
    }
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        TaskRecord {
            id: task.id,
            title: task.title.clone(),
            project_id: task.project_id,
            status: task.status.as_str().to_string(),
            assigned_to: task.assigned_to,
            contributors: task.contributors.clone(),
        }
    }
}
