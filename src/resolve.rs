//! Identity resolution: human-typed names, emails and titles to entities.
//!
//! Matching is exact and case-insensitive. Users are matched on email across
//! the whole collection before any name is considered, so a user whose email
//! matches always wins over a different user whose name matches.

use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{Project, User};
use crate::repository::Repository;

impl Repository {
    /// Resolve a user by email, falling back to name
    pub fn find_user_by_identity(&self, identity: &str) -> Result<&User> {
        let needle = identity.to_lowercase();
        let users = self.users();

        users
            .iter()
            .find(|user| user.email.to_lowercase() == needle)
            .or_else(|| users.iter().find(|user| user.name.to_lowercase() == needle))
            .ok_or_else(|| {
                debug!(identity, "no user matched identity");
                Error::UserNotFound(identity.to_string())
            })
    }

    /// Resolve a project by title; the first match in collection order wins
    pub fn find_project_by_title(&self, title: &str) -> Result<&Project> {
        let needle = title.to_lowercase();

        self.projects()
            .iter()
            .find(|project| project.title.to_lowercase() == needle)
            .ok_or_else(|| {
                debug!(title, "no project matched title");
                Error::ProjectNotFound(title.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewProject;
    use crate::storage::{Snapshot, Store};
    use tempfile::TempDir;

    fn empty_repo(temp: &TempDir) -> Repository {
        let store = Store::new(temp.path().join("store.json"), Snapshot::empty());
        Repository::open(store).unwrap()
    }

    #[test]
    fn email_match_is_case_insensitive() {
        let temp = TempDir::new().unwrap();
        let mut repo = empty_repo(&temp);
        let alex = repo.create_user("Alex", "alex@example.com").unwrap();

        let found = repo.find_user_by_identity("ALEX@Example.com").unwrap();
        assert_eq!(found.id, alex.id);
    }

    #[test]
    fn name_match_is_used_when_no_email_matches() {
        let temp = TempDir::new().unwrap();
        let mut repo = empty_repo(&temp);
        repo.create_user("Sam", "sam@example.com").unwrap();
        let alex = repo.create_user("Alex", "alex@example.com").unwrap();

        let found = repo.find_user_by_identity("alex").unwrap();
        assert_eq!(found.id, alex.id);
    }

    #[test]
    fn email_pass_wins_over_earlier_name_match() {
        let temp = TempDir::new().unwrap();
        let mut repo = empty_repo(&temp);
        // Earlier in the collection, but only its name matches
        repo.create_user("a@x.com", "named@x.com").unwrap();
        let by_email = repo.create_user("Someone", "a@x.com").unwrap();

        let found = repo.find_user_by_identity("a@x.com").unwrap();
        assert_eq!(found.id, by_email.id);
    }

    #[test]
    fn first_match_wins_within_a_pass() {
        let temp = TempDir::new().unwrap();
        let mut repo = empty_repo(&temp);
        let first = repo.create_user("Alex", "alex1@example.com").unwrap();
        repo.create_user("alex", "alex2@example.com").unwrap();

        assert_eq!(repo.find_user_by_identity("ALEX").unwrap().id, first.id);
    }

    #[test]
    fn unknown_identity_is_not_found() {
        let temp = TempDir::new().unwrap();
        let repo = empty_repo(&temp);

        let err = repo.find_user_by_identity("nobody@example.com").unwrap_err();
        assert!(matches!(err, Error::UserNotFound(ref v) if v == "nobody@example.com"));
        assert_eq!(err.to_string(), "User not found: nobody@example.com");
    }

    #[test]
    fn project_title_match_is_case_insensitive_and_first_wins() {
        let temp = TempDir::new().unwrap();
        let mut repo = empty_repo(&temp);
        let first = repo
            .create_project(NewProject {
                title: "CLI Tool".to_string(),
                ..NewProject::default()
            })
            .unwrap();
        repo
            .create_project(NewProject {
                title: "cli tool".to_string(),
                ..NewProject::default()
            })
            .unwrap();

        assert_eq!(repo.find_project_by_title("Cli TOOL").unwrap().id, first.id);
    }

    #[test]
    fn unknown_project_title_is_not_found() {
        let temp = TempDir::new().unwrap();
        let repo = empty_repo(&temp);

        let err = repo.find_project_by_title("Nope").unwrap_err();
        assert!(matches!(err, Error::ProjectNotFound(ref v) if v == "Nope"));
    }
}
