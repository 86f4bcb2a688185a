//! End-to-end checks for the gaia binary that need no network access

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn tools_subcommand_lists_all_adapters() {
    let mut cmd = Command::cargo_bin("gaia").unwrap();
    cmd.arg("tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("calculator[a, b, operation]"))
        .stdout(predicate::str::contains("wiki_search"))
        .stdout(predicate::str::contains("web_search"))
        .stdout(predicate::str::contains("page_extract"))
        .stdout(predicate::str::contains("wolfram"));
}

#[test]
fn no_arguments_is_an_error() {
    let mut cmd = Command::cargo_bin("gaia").unwrap();
    cmd.assert().failure();
}

#[test]
fn question_and_file_together_is_an_error() {
    let mut cmd = Command::cargo_bin("gaia").unwrap();
    cmd.args(["--file", "questions.txt", "what is 1+1?"])
        .assert()
        .failure();
}

#[test]
fn missing_api_key_fails_before_any_run() {
    let mut cmd = Command::cargo_bin("gaia").unwrap();
    cmd.env_remove("OPENROUTER_API_KEY")
        .arg("what is 1+1?")
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENROUTER_API_KEY"));
}
