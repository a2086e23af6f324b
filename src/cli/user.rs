//! User command implementations.

use tabled::Tabled;

use super::{load_context, GlobalOptions};
use crate::error::Result;
use crate::model::User;
use crate::output::{emit_success, render_table, HumanOutput};
use crate::validate::{ensure_email, ensure_name};

pub struct AddOptions {
    pub name: String,
    pub email: String,
}

#[derive(serde::Serialize)]
struct UserListOutput<'a> {
    total: usize,
    users: &'a [User],
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
}

pub fn run_add(options: AddOptions, globals: &GlobalOptions) -> Result<()> {
    ensure_name(&options.name)?;
    ensure_email(&options.email)?;

    let mut ctx = load_context(globals)?;
    let user = ctx.repo.create_user(options.name, options.email)?;
    ctx.repo.commit()?;

    let mut human = HumanOutput::new(format!(
        "Created user #{}: {} <{}>",
        user.id, user.name, user.email
    ));
    human.push_next_step(format!(
        "project-tracker add-project --user {} --title <title>",
        user.email
    ));
    emit_success(globals.output(), "add-user", &user, Some(&human))
}

pub fn run_list(globals: &GlobalOptions) -> Result<()> {
    let ctx = load_context(globals)?;
    let users = ctx.repo.users();

    let rows = users
        .iter()
        .map(|user| UserRow {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        })
        .collect();
    let mut human = HumanOutput::new(format!("Users ({})", users.len()));
    human.set_table(render_table(rows, "No users found."));

    emit_success(
        globals.output(),
        "list-users",
        &UserListOutput {
            total: users.len(),
            users,
        },
        Some(&human),
    )
}
