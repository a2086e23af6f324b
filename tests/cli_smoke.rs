use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn help_works() {
    Command::cargo_bin("project-tracker")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("manage users, projects, and tasks"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "add-user",
        "list-users",
        "add-project",
        "list-projects",
        "add-task",
        "list-tasks",
        "complete-task",
        "set-status",
        "assign-task",
        "add-contributor",
        "edit-project",
        "dump-data",
    ];

    for cmd in subcommands {
        Command::cargo_bin("project-tracker")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn missing_subcommand_is_rejected() {
    Command::cargo_bin("project-tracker")
        .expect("binary")
        .assert()
        .failure();
}
