//! Integration tests for rezup

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    fn rezup() -> Command {
        cargo_bin_cmd!("rezup")
    }

    /// A command pointed at a throwaway store, with Action input
    /// variables cleared so the host environment cannot leak in.
    fn rezup_in(store: &TempDir) -> Command {
        let mut cmd = rezup();
        cmd.env("REZUP_CACHE_DIR", store.path())
            .env_remove("INPUT_SOURCE")
            .env_remove("INPUT_REF")
            .env_remove("INPUT_BINDS")
            .env_remove("INPUT_MAKEPACKAGESPATHS")
            .env_remove("GITHUB_ENV")
            .env_remove("GITHUB_PATH");
        cmd
    }

    #[test]
    fn help_displays() {
        rezup()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("install"))
            .stdout(predicate::str::contains("cache"));
    }

    #[test]
    fn version_displays() {
        rezup()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("rezup"));
    }

    #[test]
    fn install_requires_source() {
        let store = TempDir::new().unwrap();
        rezup_in(&store)
            .args(["install", "--ref", "v1.0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--source"));
    }

    #[test]
    fn install_requires_ref() {
        let store = TempDir::new().unwrap();
        rezup_in(&store)
            .args(["install", "--source", "acme/tool"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--ref"));
    }

    #[test]
    fn cache_list_empty() {
        let store = TempDir::new().unwrap();
        rezup_in(&store)
            .args(["cache", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No cached installs"));
    }

    #[test]
    fn cache_list_shows_seeded_entry() {
        let store = TempDir::new().unwrap();
        std::fs::create_dir_all(store.path().join("acme").join("tool").join("v1.0")).unwrap();

        rezup_in(&store)
            .args(["cache", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("acme/tool"))
            .stdout(predicate::str::contains("v1.0"));
    }

    #[test]
    fn cache_list_json_is_valid() {
        let store = TempDir::new().unwrap();
        std::fs::create_dir_all(store.path().join("acme").join("tool").join("v1.0")).unwrap();

        let output = rezup_in(&store)
            .args(["cache", "list", "--format", "json"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed[0]["repository"], "acme/tool");
        assert_eq!(parsed[0]["git_ref"], "v1.0");
    }

    #[test]
    fn cache_list_plain_one_per_line() {
        let store = TempDir::new().unwrap();
        std::fs::create_dir_all(store.path().join("acme").join("tool").join("v1.0")).unwrap();

        rezup_in(&store)
            .args(["cache", "list", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains("acme/tool@v1.0"));
    }

    #[test]
    fn cache_clear_yes_removes_entries() {
        let store = TempDir::new().unwrap();
        let entry = store.path().join("acme").join("tool").join("v1.0");
        std::fs::create_dir_all(&entry).unwrap();

        rezup_in(&store)
            .args(["cache", "clear", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("cleared 1 install(s)"));

        assert!(!entry.exists());

        rezup_in(&store)
            .args(["cache", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No cached installs"));
    }

    #[test]
    fn cache_clear_empty_store() {
        let store = TempDir::new().unwrap();
        rezup_in(&store)
            .args(["cache", "clear", "--yes"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No cached installs to clear"));
    }

    #[test]
    fn invalid_config_is_reported() {
        let store = TempDir::new().unwrap();
        let config = store.path().join("config.toml");
        std::fs::write(&config, "not valid [ toml").unwrap();

        rezup_in(&store)
            .args(["cache", "list"])
            .arg("--config")
            .arg(&config)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    fn unknown_subcommand_fails() {
        rezup().arg("frobnicate").assert().failure();
    }
}
