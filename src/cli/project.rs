//! Project command implementations.

use tabled::Tabled;

use super::{load_context, GlobalOptions};
use crate::error::{Error, Result};
use crate::model::{EntityId, NewProject, Project};
use crate::output::{emit_success, render_table, HumanOutput};
use crate::validate::parse_due_date;

pub struct AddOptions {
    pub user: String,
    pub title: String,
    pub description: String,
    pub due: Option<String>,
}

pub struct ListOptions {
    pub user: Option<String>,
    pub search: Option<String>,
}

pub struct EditOptions {
    pub project_id: EntityId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due: Option<String>,
}

#[derive(serde::Serialize)]
struct ProjectSummary<'a> {
    #[serde(flatten)]
    project: &'a Project,
    owner: Option<&'a str>,
    task_count: usize,
}

#[derive(serde::Serialize)]
struct ProjectListOutput<'a> {
    total: usize,
    projects: Vec<ProjectSummary<'a>>,
}

#[derive(serde::Serialize)]
struct ProjectChangeOutput<'a> {
    project: &'a Project,
    changed: bool,
}

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "#Tasks")]
    tasks: usize,
}

pub fn run_add(options: AddOptions, globals: &GlobalOptions) -> Result<()> {
    let mut ctx = load_context(globals)?;
    let owner = ctx.repo.find_user_by_identity(&options.user)?.clone();
    let due_date = options.due.as_deref().map(parse_due_date).transpose()?;

    let project = ctx.repo.create_project(NewProject {
        title: options.title,
        description: Some(options.description),
        due_date,
        owner_id: Some(owner.id),
    })?;
    ctx.repo.commit()?;

    let mut human = HumanOutput::new(format!(
        "Created project #{} for {}: {} (due {})",
        project.id,
        owner.name,
        project.title,
        project.due_date.as_deref().unwrap_or(ctx.none_marker())
    ));
    human.push_next_step(format!(
        "project-tracker add-task --project {:?} --title <title>",
        project.title
    ));
    emit_success(globals.output(), "add-project", &project, Some(&human))
}

pub fn run_list(options: ListOptions, globals: &GlobalOptions) -> Result<()> {
    let ctx = load_context(globals)?;
    let repo = &ctx.repo;

    let candidates = match options.user.as_deref() {
        Some(identity) => repo.projects_owned_by(repo.find_user_by_identity(identity)?.id),
        None => repo.projects().iter().collect(),
    };
    let query = options.search.as_deref().map(str::to_lowercase);

    let projects: Vec<&Project> = candidates
        .into_iter()
        .filter(|project| match &query {
            Some(query) => matches_search(project, query),
            None => true,
        })
        .collect();

    let summaries: Vec<ProjectSummary> = projects
        .into_iter()
        .map(|project| ProjectSummary {
            project,
            owner: repo.user_name(project.owner_id),
            task_count: repo.tasks_for_project(project.id).len(),
        })
        .collect();

    let marker = ctx.none_marker();
    let rows = summaries
        .iter()
        .map(|summary| ProjectRow {
            id: summary.project.id,
            title: summary.project.title.clone(),
            owner: summary.owner.unwrap_or(marker).to_string(),
            due: summary
                .project
                .due_date
                .as_deref()
                .unwrap_or(marker)
                .to_string(),
            tasks: summary.task_count,
        })
        .collect();
    let mut human = HumanOutput::new(format!("Projects ({})", summaries.len()));
    human.set_table(render_table(rows, "No projects found."));

    emit_success(
        globals.output(),
        "list-projects",
        &ProjectListOutput {
            total: summaries.len(),
            projects: summaries,
        },
        Some(&human),
    )
}

pub fn run_edit(options: EditOptions, globals: &GlobalOptions) -> Result<()> {
    let mut ctx = load_context(globals)?;
    let mut project = ctx
        .repo
        .project(options.project_id)
        .cloned()
        .ok_or_else(|| Error::ProjectNotFound(options.project_id.to_string()))?;
    let before = project.clone();

    if let Some(title) = options.title.filter(|title| !title.is_empty()) {
        project.title = title;
    }
    if let Some(description) = options.description {
        project.description = Some(description);
    }
    if let Some(due) = options.due {
        project.due_date = if due.is_empty() {
            None
        } else {
            Some(parse_due_date(&due)?)
        };
    }

    ctx.repo.update_project(&project)?;
    ctx.repo.commit()?;

    let changed = project != before;
    let mut human = HumanOutput::new(format!("Updated project #{}", project.id));
    if !changed {
        human.push_summary("Changes", "none");
    }
    emit_success(
        globals.output(),
        "edit-project",
        &ProjectChangeOutput {
            project: &project,
            changed,
        },
        Some(&human),
    )
}

fn matches_search(project: &Project, query: &str) -> bool {
    project.title.to_lowercase().contains(query)
        || project
            .description
            .as_deref()
            .unwrap_or("")
            .to_lowercase()
            .contains(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(title: &str, description: Option<&str>) -> Project {
        Project {
            id: 1,
            title: title.to_string(),
            description: description.map(str::to_string),
            due_date: None,
            owner_id: None,
        }
    }

    #[test]
    fn search_matches_title_or_description_case_insensitively() {
        assert!(matches_search(&project("CLI Tool", None), "cli"));
        assert!(matches_search(
            &project("Website", Some("Marketing SITE")),
            "site"
        ));
        assert!(!matches_search(&project("Website", None), "cli"));
    }
}
