//! Shared output formatting for project-tracker commands.

use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::error::{Error, JsonError, Result};

pub const SCHEMA_VERSION: &str = "project-tracker.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    table: Option<String>,
    next_steps: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            summary: Vec::new(),
            table: None,
            next_steps: Vec::new(),
        }
    }

    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    pub fn set_table(&mut self, table: String) {
        self.table = Some(table);
    }

    pub fn push_next_step(&mut self, value: impl Into<String>) {
        self.next_steps.push(value.into());
    }
}

/// Render rows as a rounded table, or a placeholder line when empty
pub fn render_table<T: Tabled>(rows: Vec<T>, empty: &str) -> String {
    if rows.is_empty() {
        return empty.to_string();
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        let next_steps = human.map(|h| h.next_steps.clone()).unwrap_or_default();

        #[derive(Serialize)]
        struct Envelope<'a, T: Serialize> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            data: &'a T,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            next_steps: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data,
            next_steps,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if options.quiet {
        return Ok(());
    }

    if let Some(human) = human {
        println!("{}", format_human(human));
    }

    Ok(())
}

pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let next_steps = error_next_steps(err);
    if json {
        #[derive(Serialize)]
        struct Envelope<'a> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            kind: &'static str,
            error: JsonError,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            next_steps: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            kind: error_kind(err),
            error: JsonError::from(err),
            next_steps,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Some(hint) = next_steps.first() {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

pub fn format_human(output: &HumanOutput) -> String {
    let mut lines = Vec::new();
    lines.push(output.header.clone());

    if !output.summary.is_empty() {
        lines.push(String::new());
        for (key, value) in &output.summary {
            lines.push(format!("  {key}: {value}"));
        }
    }

    if let Some(table) = &output.table {
        lines.push(table.clone());
    }

    if !output.next_steps.is_empty() {
        lines.push(String::new());
        lines.push("Next steps:".to_string());
        for step in &output.next_steps {
            lines.push(format!("- {step}"));
        }
    }

    lines.join("\n")
}

/// Best-effort subcommand name for error envelopes, read before clap parsing
pub fn infer_command_name_from_args() -> String {
    infer_command_name(std::env::args().skip(1))
}

fn infer_command_name(args: impl Iterator<Item = String>) -> String {
    let mut args = args;
    while let Some(arg) = args.next() {
        if matches!(arg.as_str(), "--store" | "--config") {
            args.next();
            continue;
        }
        if arg.starts_with('-') {
            continue;
        }
        return arg;
    }
    "project-tracker".to_string()
}

fn error_kind(err: &Error) -> &'static str {
    match err.exit_code() {
        1 => "user_error",
        _ => "store_failed",
    }
}

fn error_next_steps(err: &Error) -> Vec<String> {
    match err {
        Error::UserNotFound(_) => vec!["project-tracker list-users".to_string()],
        Error::ProjectNotFound(_) => vec!["project-tracker list-projects".to_string()],
        Error::TaskNotFound(_) => vec!["project-tracker list-tasks".to_string()],
        Error::InvalidStatus(_) => vec!["use one of: todo, doing, done".to_string()],
        Error::CorruptStore { path, .. } | Error::MissingCollection { path, .. } => {
            vec![format!("repair or move aside {}", path.display())]
        }
        Error::InvalidConfig(_) | Error::TomlParse(_) => {
            vec!["fix config.toml then retry".to_string()]
        }
        _ => Vec::new(),
    }
}
