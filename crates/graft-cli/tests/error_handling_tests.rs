//! Exit-code contract tests.
//!
//! | Code | Meaning                 |
//! |------|-------------------------|
//! |  2   | User / input error      |
//! |  4   | Configuration error     |

use assert_cmd::Command;
use predicates::prelude::*;

fn graft() -> Command {
    Command::cargo_bin("graft").unwrap()
}

#[test]
fn unknown_subcommand_is_a_user_error() {
    graft().arg("explode").assert().failure().code(2);
}

#[test]
fn unknown_flag_is_a_user_error() {
    graft()
        .args(["steps", "--definitely-not-a-flag"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn unparseable_config_file_exits_with_config_code() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "not valid [ toml").unwrap();

    graft()
        .args(["--config"])
        .arg(&config)
        .arg("steps")
        .assert()
        .failure()
        .code(4);
}

#[test]
fn missing_config_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("missing.toml");

    graft()
        .args(["--config"])
        .arg(&config)
        .args(["steps", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("verify-prerequisites"));
}
