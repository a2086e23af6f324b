//! Storage layer for project-tracker
//!
//! All state lives in one JSON file holding three named collections:
//!
//! ```text
//! {
//!   "users":    [ { "id": 1, "name": "...", "email": "..." } ],
//!   "projects": [ { "id": 1, "title": "...", "description": ..., "due_date": ..., "owner_id": ... } ],
//!   "tasks":    [ { "id": 1, "title": "...", "project_id": 1, "status": "todo", ... } ]
//! }
//! ```
//!
//! The file is read in full on load and rewritten in full on save. Writes go
//! through a temp file in the same directory followed by a rename, so a
//! reader never observes a partially-written store.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{Entity, Project, TaskRecord, User};

pub const USERS: &str = "users";
pub const PROJECTS: &str = "projects";
pub const TASKS: &str = "tasks";

/// Default pretty-print indent for the store file
pub const DEFAULT_INDENT: usize = 2;

/// Complete contents of the store at a point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub users: Vec<User>,
    pub projects: Vec<Project>,
    pub tasks: Vec<TaskRecord>,
}

impl Snapshot {
    /// Snapshot with all three collections empty
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Handle on the backing JSON file
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    /// Written by `initialize` and reported by `read_raw` when no file exists
    defaults: Snapshot,
    indent: usize,
}

impl Store {
    /// Create a store for `path`, seeding new files with `defaults`
    pub fn new(path: impl Into<PathBuf>, defaults: Snapshot) -> Self {
        Self {
            path: path.into(),
            defaults,
            indent: DEFAULT_INDENT,
        }
    }

    /// Set the pretty-print indent used on save
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Ensure the backing file exists. Returns true if it had to be created.
    pub fn initialize(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        self.save(&self.defaults)?;
        debug!(path = %self.path.display(), "initialized store");
        Ok(true)
    }

    /// Read and decode the full store
    pub fn load(&self) -> Result<Snapshot> {
        let mut object = self.read_object()?;
        let snapshot = Snapshot {
            users: self.take_collection(&mut object, USERS)?,
            projects: self.take_collection(&mut object, PROJECTS)?,
            tasks: self.take_collection(&mut object, TASKS)?,
        };
        debug!(
            path = %self.path.display(),
            users = snapshot.users.len(),
            projects = snapshot.projects.len(),
            tasks = snapshot.tasks.len(),
            "loaded store"
        );
        Ok(snapshot)
    }

    /// Serialize all collections and atomically replace the backing file
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let data = self.to_pretty_json(snapshot)?;
        write_atomic(&self.path, &data)?;
        debug!(
            path = %self.path.display(),
            users = snapshot.users.len(),
            projects = snapshot.projects.len(),
            tasks = snapshot.tasks.len(),
            "saved store"
        );
        Ok(())
    }

    /// Read the file as-is for diagnostics. Never creates the file; a missing
    /// file reads as the default snapshot.
    pub fn read_raw(&self) -> Result<Value> {
        if !self.path.exists() {
            return Ok(serde_json::to_value(&self.defaults)?);
        }
        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|err| self.corrupt(err.to_string()))
    }

    fn read_object(&self) -> Result<Map<String, Value>> {
        let content = fs::read_to_string(&self.path)?;
        let value: Value =
            serde_json::from_str(&content).map_err(|err| self.corrupt(err.to_string()))?;
        match value {
            Value::Object(object) => Ok(object),
            other => Err(self.corrupt(format!(
                "expected a JSON object at the top level, found {}",
                json_type_name(&other)
            ))),
        }
    }

    fn take_collection<T: DeserializeOwned + Entity>(
        &self,
        object: &mut Map<String, Value>,
        name: &str,
    ) -> Result<Vec<T>> {
        let value = object.remove(name).ok_or_else(|| Error::MissingCollection {
            path: self.path.clone(),
            collection: name.to_string(),
        })?;
        let items: Vec<T> = serde_json::from_value(value)
            .map_err(|err| self.corrupt(format!("{name}: {err}")))?;

        // Ids are positive; assignment starts at 1
        if let Some(position) = items.iter().position(|item| item.id() == 0) {
            return Err(self.corrupt(format!(
                "{name}[{position}]: {} ids must be positive, found 0",
                T::KIND
            )));
        }
        Ok(items)
    }

    fn to_pretty_json(&self, snapshot: &Snapshot) -> Result<Vec<u8>> {
        let indent = " ".repeat(self.indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut buffer = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        snapshot.serialize(&mut serializer)?;
        Ok(buffer)
    }

    fn corrupt(&self, reason: String) -> Error {
        Error::CorruptStore {
            path: self.path.clone(),
            reason,
        }
    }
}

/// Write data atomically using temp file + rename
pub fn write_atomic(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Temp file must live in the same directory for the rename to be atomic
    let temp_path = path.with_extension(format!(
        "{}.tmp.{}",
        path.extension().and_then(|e| e.to_str()).unwrap_or(""),
        std::process::id()
    ));

    let written = File::create(&temp_path)
        .and_then(|mut temp_file| {
            temp_file.write_all(data)?;
            temp_file.sync_all()
        })
        .and_then(|()| fs::rename(&temp_path, path));

    if let Err(err) = written {
        if let Err(cleanup) = fs::remove_file(&temp_path) {
            debug!(path = %temp_path.display(), error = %cleanup, "failed to remove temp file");
        }
        return Err(err.into());
    }

    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
