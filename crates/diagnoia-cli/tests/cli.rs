//! CLI integration tests for diagnoia
//!
//! Only commands that do not need Neo4j or Ollama are exercised here.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command with an isolated config directory and no inherited overrides
#[allow(deprecated)]
fn diagnoia_cmd(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("diagnoia").unwrap();
    cmd.env("DIAGNOIA_CONFIG_DIR", config_dir.path());
    for var in [
        "DIAGNOIA_NEO4J_URI",
        "DIAGNOIA_NEO4J_DATABASE",
        "DIAGNOIA_NEO4J_USER",
        "DIAGNOIA_OLLAMA_URL",
        "DIAGNOIA_OLLAMA_MODEL",
        "DIAGNOIA_NEO4J_PASSWORD",
        "NEO4J_PASSWORD",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    diagnoia_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("priority"))
        .stdout(predicate::str::contains("doctor"));
}

#[test]
fn test_config_path_uses_config_dir() {
    let dir = TempDir::new().unwrap();
    diagnoia_cmd(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_get_default_model() {
    let dir = TempDir::new().unwrap();
    diagnoia_cmd(&dir)
        .args(["config", "get", "llm.model"])
        .assert()
        .success()
        .stdout(predicate::str::contains("llama3.2:3b"));
}

#[test]
fn test_config_set_then_get() {
    let dir = TempDir::new().unwrap();
    diagnoia_cmd(&dir)
        .args(["config", "set", "graph.database", "clinica"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set graph.database = clinica"));

    assert!(dir.path().join("config.toml").exists());

    diagnoia_cmd(&dir)
        .args(["config", "get", "graph.database"])
        .assert()
        .success()
        .stdout(predicate::str::contains("clinica"));
}

#[test]
fn test_config_set_keeps_env_overrides_out_of_file() {
    let dir = TempDir::new().unwrap();
    diagnoia_cmd(&dir)
        .env("DIAGNOIA_NEO4J_URI", "https://aura.example:7473")
        .env("DIAGNOIA_OLLAMA_URL", "http://gpu-box:11434")
        .args(["config", "set", "llm.model", "tinyllama"])
        .assert()
        .success();

    let saved = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(saved.contains("tinyllama"));
    assert!(!saved.contains("aura.example"));
    assert!(!saved.contains("gpu-box"));
    assert!(saved.contains("http://localhost:7474"));

    diagnoia_cmd(&dir)
        .env("DIAGNOIA_NEO4J_URI", "https://aura.example:7473")
        .args(["config", "get", "graph.uri"])
        .assert()
        .success()
        .stdout(predicate::str::contains("aura.example"));
}

#[test]
fn test_config_rejects_password() {
    let dir = TempDir::new().unwrap();
    diagnoia_cmd(&dir)
        .args(["config", "set", "graph.password", "secret"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NEO4J_PASSWORD"));
}

#[test]
fn test_config_rejects_unknown_mode() {
    let dir = TempDir::new().unwrap();
    diagnoia_cmd(&dir)
        .args(["config", "set", "assistant.dashboard_mode", "loud"])
        .assert()
        .failure();
}

#[test]
fn test_config_list_redacts_password() {
    let dir = TempDir::new().unwrap();
    diagnoia_cmd(&dir)
        .env("DIAGNOIA_NEO4J_PASSWORD", "super-secret")
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("graph.password = ********"))
        .stdout(predicate::str::contains("super-secret").not());
}

#[test]
fn test_ask_rejects_empty_question() {
    let dir = TempDir::new().unwrap();
    diagnoia_cmd(&dir)
        .args(["ask", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("vacía"));
}
