//! Integration tests for the yacman subcommands.

mod common;

use common::TestEnv;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_show_prints_yaml() {
    let env = TestEnv::new();
    let file = env.write_file("conf.yaml", "x: 5\nnested:\n  y: text\n");

    env.command()
        .arg("show")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("x: 5"))
        .stdout(predicate::str::contains("y: text"));
}

#[test]
fn test_show_json() {
    let env = TestEnv::new();
    let file = env.write_file("conf.yaml", "x: 5\n2: two\n");

    let output = env
        .command()
        .args(["show", "--format", "json"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["x"], 5);
    assert_eq!(parsed["2"], "two");
}

#[test]
fn test_show_expand() {
    let env = TestEnv::new();
    let file = env.write_file("conf.yaml", "dir: $YACMAN_CLI_TEST_DIR/data\n");

    env.command()
        .env("YACMAN_CLI_TEST_DIR", "/srv")
        .args(["show", "--expand"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("/srv/data"));

    env.command()
        .env("YACMAN_CLI_TEST_DIR", "/srv")
        .arg("show")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("$YACMAN_CLI_TEST_DIR/data"));
}

#[test]
fn test_get_nested_key() {
    let env = TestEnv::new();
    let file = env.write_file("conf.yaml", "a:\n  b:\n    c: deep\n");
    assert_eq!(env.get(&file, "a.b.c"), "deep");
}

#[test]
fn test_get_numeric_key() {
    let env = TestEnv::new();
    let file = env.write_file("conf.yaml", "2: two\n");
    assert_eq!(env.get(&file, "2"), "two");
}

#[test]
fn test_set_then_get() {
    let env = TestEnv::new();
    let file = env.write_file("conf.yaml", "x: 5\n");

    env.command()
        .args(["set"])
        .arg(&file)
        .args(["y", "10"])
        .assert()
        .success();

    assert_eq!(env.get(&file, "y"), "10");
    assert_eq!(env.get(&file, "x"), "5");
    assert!(!env.sentinel("conf.yaml").exists());

    let text = env.read_file("conf.yaml");
    assert_eq!(text, "x: 5\ny: 10\n");
}

#[test]
fn test_set_creates_nested_and_parses_yaml() {
    let env = TestEnv::new();
    let file = env.write_file("conf.yaml", "{}\n");

    env.command()
        .arg("set")
        .arg(&file)
        .args(["server.tags", "[a, b]"])
        .assert()
        .success();

    let text = env.read_file("conf.yaml");
    assert!(text.contains("server:"));
    assert!(text.contains("- a"));
}

#[test]
fn test_set_create_flag() {
    let env = TestEnv::new();
    let file = env.path().join("new.yaml");

    env.command()
        .arg("set")
        .arg(&file)
        .args(["k", "v"])
        .assert()
        .failure()
        .code(3);
    assert!(!file.exists());

    env.command()
        .arg("set")
        .arg(&file)
        .args(["k", "v", "--create"])
        .assert()
        .success();
    assert_eq!(env.get(&file, "k"), "v");
}

#[test]
fn test_unset() {
    let env = TestEnv::new();
    let file = env.write_file("conf.yaml", "a: 1\nb: 2\n");

    env.command()
        .arg("unset")
        .arg(&file)
        .arg("a")
        .assert()
        .success();
    assert_eq!(env.read_file("conf.yaml"), "b: 2\n");

    env.command()
        .arg("unset")
        .arg(&file)
        .arg("a")
        .assert()
        .failure()
        .code(6);
    assert!(!env.sentinel("conf.yaml").exists());
}

#[test]
fn test_validate() {
    let env = TestEnv::new();
    let file = env.write_file("conf.yaml", "port: 8080\n");
    let schema = env.write_file(
        "schema.yaml",
        "type: object\nproperties:\n  port:\n    type: integer\nrequired: [port]\n",
    );

    env.command()
        .arg("validate")
        .arg(&file)
        .arg("--schema")
        .arg(&schema)
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));

    fs::write(&file, "port: eighty\n").unwrap();
    env.command()
        .arg("validate")
        .arg(&file)
        .arg("--schema")
        .arg(&schema)
        .assert()
        .failure()
        .code(7);
}

#[test]
fn test_lock_status_and_unlock() {
    let env = TestEnv::new();
    let file = env.write_file("conf.yaml", "a: 1\n");

    env.command()
        .arg("lock-status")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("unlocked"));

    // A sentinel left behind by a crashed writer
    fs::write(env.sentinel("conf.yaml"), "").unwrap();
    env.command()
        .arg("lock-status")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("locked"));

    env.command()
        .arg("unlock")
        .arg(&file)
        .assert()
        .success();
    assert!(!env.sentinel("conf.yaml").exists());
}

#[test]
fn test_completions_bash() {
    let env = TestEnv::new();
    env.command()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("yacman"));
}
