#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use project_tracker::{Repository, Snapshot, Store};
use serde_json::Value;
use tempfile::TempDir;

/// Scratch directory holding a store file and an (empty) config file
pub struct TestStore {
    dir: TempDir,
}

impl TestStore {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        fs::write(dir.path().join("config.toml"), "").expect("write config");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("data").join("store.json")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub fn write_config(&self, contents: &str) {
        fs::write(self.config_path(), contents).expect("write config");
    }

    pub fn write_store(&self, contents: &str) {
        let path = self.store_path();
        fs::create_dir_all(path.parent().expect("parent")).expect("create data dir");
        fs::write(path, contents).expect("write store");
    }

    pub fn read_store_bytes(&self) -> Vec<u8> {
        fs::read(self.store_path()).expect("read store")
    }

    pub fn read_store(&self) -> Value {
        serde_json::from_slice(&self.read_store_bytes()).expect("store json")
    }

    pub fn store(&self) -> Store {
        Store::new(self.store_path(), Snapshot::empty())
    }

    pub fn open(&self) -> Repository {
        Repository::open(self.store()).expect("open repository")
    }

    /// The binary, pointed at this store and config
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("project-tracker").expect("binary");
        cmd.current_dir(self.path())
            .env("TRACKER_STORE", self.store_path())
            .env("TRACKER_CONFIG", self.config_path())
            .env_remove("RUST_LOG");
        cmd
    }

    /// Run a command with `--json` and return the `data` payload
    pub fn run_json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let value: Value = serde_json::from_slice(&output).expect("json output");
        assert_eq!(value["status"], "success");
        value["data"].clone()
    }
}
