//! Task command implementations.
//!
//! Every lookup runs before the first mutation, so a failed command leaves
//! the store untouched.

use tabled::Tabled;

use super::{load_context, GlobalOptions, TrackerContext};
use crate::error::{Error, Result};
use crate::model::{EntityId, Task, TaskStatus};
use crate::output::{emit_success, render_table, HumanOutput};
use crate::repository::Repository;

pub struct AddOptions {
    pub project: String,
    pub title: String,
    pub assigned_to: Option<String>,
}

pub struct ListOptions {
    pub project: Option<String>,
    pub status: Option<TaskStatus>,
}

#[derive(serde::Serialize)]
struct TaskListOutput<'a> {
    total: usize,
    tasks: Vec<&'a Task>,
}

#[derive(serde::Serialize)]
struct TaskChangeOutput<'a> {
    task: &'a Task,
    changed: bool,
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Project")]
    project: String,
    #[tabled(rename = "Status")]
    status: TaskStatus,
    #[tabled(rename = "Assigned")]
    assigned: String,
    #[tabled(rename = "Contributors")]
    contributors: String,
}

impl TaskRow {
    fn new(task: &Task, repo: &Repository, marker: &str) -> Self {
        let contributors = if task.contributors().is_empty() {
            marker.to_string()
        } else {
            task.contributors()
                .iter()
                .map(|&id| repo.user_name(Some(id)).unwrap_or(marker))
                .collect::<Vec<_>>()
                .join(", ")
        };
        Self {
            id: task.id,
            title: task.title.clone(),
            project: repo
                .project(task.project_id)
                .map(|project| project.title.clone())
                .unwrap_or_else(|| marker.to_string()),
            status: task.status(),
            assigned: repo.user_name(task.assigned_to).unwrap_or(marker).to_string(),
            contributors,
        }
    }
}

pub fn run_add(options: AddOptions, globals: &GlobalOptions) -> Result<()> {
    let mut ctx = load_context(globals)?;
    let project = ctx.repo.find_project_by_title(&options.project)?.clone();
    let assigned_to = match options.assigned_to.as_deref() {
        Some(identity) => Some(ctx.repo.find_user_by_identity(identity)?.id),
        None => None,
    };

    let task = ctx.repo.create_task(options.title, project.id, assigned_to)?;
    ctx.repo.commit()?;

    let mut human = HumanOutput::new(format!(
        "Created task #{} in project '{}'",
        task.id, project.title
    ));
    if let Some(name) = ctx.repo.user_name(task.assigned_to) {
        human.push_summary("Assigned", name);
    }
    human.push_next_step(format!(
        "project-tracker set-status --task-id {} --status doing",
        task.id
    ));
    emit_success(globals.output(), "add-task", &task, Some(&human))
}

pub fn run_list(options: ListOptions, globals: &GlobalOptions) -> Result<()> {
    let ctx = load_context(globals)?;
    let repo = &ctx.repo;

    let project_id = match options.project.as_deref() {
        Some(title) => Some(repo.find_project_by_title(title)?.id),
        None => None,
    };
    let tasks: Vec<&Task> = repo
        .tasks()
        .iter()
        .filter(|task| project_id.map_or(true, |id| task.project_id == id))
        .filter(|task| options.status.map_or(true, |status| task.status() == status))
        .collect();

    let marker = ctx.none_marker();
    let rows = tasks
        .iter()
        .map(|task| TaskRow::new(task, repo, marker))
        .collect();
    let mut human = HumanOutput::new(format!("Tasks ({})", tasks.len()));
    human.set_table(render_table(rows, "No tasks found."));

    emit_success(
        globals.output(),
        "list-tasks",
        &TaskListOutput {
            total: tasks.len(),
            tasks,
        },
        Some(&human),
    )
}

pub fn run_complete(task_id: EntityId, globals: &GlobalOptions) -> Result<()> {
    let mut ctx = load_context(globals)?;
    let mut task = find_task(&ctx, task_id)?;
    let changed = task.status() != TaskStatus::Done;

    task.complete();
    save_task(&mut ctx, &task)?;

    let human = HumanOutput::new(format!("Completed task #{}: {}", task.id, task.title));
    emit_change(globals, "complete-task", &task, changed, human)
}

pub fn run_set_status(task_id: EntityId, status: &str, globals: &GlobalOptions) -> Result<()> {
    let mut ctx = load_context(globals)?;
    let mut task = find_task(&ctx, task_id)?;
    let previous = task.status();

    task.set_status(status)?;
    save_task(&mut ctx, &task)?;

    let mut human = HumanOutput::new(format!("Updated task #{}: {}", task.id, task.title));
    human.push_summary("Status", format!("{previous} -> {}", task.status()));
    emit_change(globals, "set-status", &task, previous != task.status(), human)
}

pub fn run_assign(task_id: EntityId, identity: &str, globals: &GlobalOptions) -> Result<()> {
    let mut ctx = load_context(globals)?;
    let mut task = find_task(&ctx, task_id)?;
    let user = ctx.repo.find_user_by_identity(identity)?.clone();
    let changed = task.assigned_to != Some(user.id);

    task.assigned_to = Some(user.id);
    save_task(&mut ctx, &task)?;

    let human = HumanOutput::new(format!("Assigned task #{} to {}", task.id, user.name));
    emit_change(globals, "assign-task", &task, changed, human)
}

pub fn run_add_contributor(
    task_id: EntityId,
    identity: &str,
    globals: &GlobalOptions,
) -> Result<()> {
    let mut ctx = load_context(globals)?;
    let mut task = find_task(&ctx, task_id)?;
    let user = ctx.repo.find_user_by_identity(identity)?.clone();

    let changed = task.add_contributor(user.id);
    save_task(&mut ctx, &task)?;

    let mut human = HumanOutput::new(format!(
        "Added contributor {} to task #{}",
        user.name, task.id
    ));
    if !changed {
        human.push_summary("Note", "already a contributor");
    }
    emit_change(globals, "add-contributor", &task, changed, human)
}

fn find_task(ctx: &TrackerContext, task_id: EntityId) -> Result<Task> {
    ctx.repo
        .task(task_id)
        .cloned()
        .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))
}

fn save_task(ctx: &mut TrackerContext, task: &Task) -> Result<()> {
    ctx.repo.update_task(task)?;
    ctx.repo.commit()
}

fn emit_change(
    globals: &GlobalOptions,
    command: &str,
    task: &Task,
    changed: bool,
    human: HumanOutput,
) -> Result<()> {
    emit_success(
        globals.output(),
        command,
        &TaskChangeOutput { task, changed },
        Some(&human),
    )
}
