// Command-line behavior, run against the built binary in a scratch directory

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn desk(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("publishing-desk").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env(
            "PUBLISHING_DESK__STORAGE__PROJECTS_DIR",
            dir.path().join("projects"),
        )
        .env("PUBLISHING_DESK__DELIVERY__PHASE_INTERVAL_MS", "5")
        .env("PUBLISHING_DESK__OBSERVABILITY__LOG_LEVEL", "warn");
    cmd
}

fn created_id(stdout: &[u8]) -> String {
    let text = String::from_utf8_lossy(stdout);
    text.lines()
        .find_map(|line| line.trim().strip_prefix("id: "))
        .map(|id| id.trim().to_string())
        .expect("project id in output")
}

#[test]
fn test_no_subcommand_shows_getting_started() {
    let dir = TempDir::new().unwrap();
    desk(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("To get started"))
        .stdout(predicate::str::contains("publishing-desk project new"));
}

#[test]
fn test_isbn_command_reports_validity() {
    let dir = TempDir::new().unwrap();
    desk(&dir)
        .args(["isbn", "978-0-306-40615-7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Valid ISBN-13"))
        .stdout(predicate::str::contains("9780306406157"));

    desk(&dir)
        .args(["isbn", "9780306406158"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid ISBN-13"));
}

#[test]
fn test_channels_lists_isbn_policy() {
    let dir = TempDir::new().unwrap();
    desk(&dir)
        .arg("channels")
        .assert()
        .success()
        .stdout(predicate::str::contains("ingram-spark"))
        .stdout(predicate::str::contains("literary-agent"));
}

#[test]
fn test_spine_width_for_cream_paper() {
    let dir = TempDir::new().unwrap();
    desk(&dir)
        .args(["spine", "--pages", "300", "--paper", "cream"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.7500 in"))
        .stdout(predicate::str::contains("Wide enough for spine text"));

    desk(&dir)
        .args(["spine", "--pages", "10"])
        .assert()
        .failure();
}

#[test]
fn test_project_lifecycle() {
    let dir = TempDir::new().unwrap();
    let output = desk(&dir)
        .args(["project", "new", "River Index", "--chapter", "Source:2500", "--tag", "essay"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let id = created_id(&output.stdout);

    desk(&dir)
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("River Index"));

    desk(&dir)
        .args(["project", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("2500"))
        .stdout(predicate::str::contains("essay"));

    desk(&dir)
        .args(["project", "delete", &id])
        .assert()
        .success();
    desk(&dir)
        .args(["project", "show", &id])
        .assert()
        .failure();
}

#[test]
fn test_publish_blocked_without_required_isbn() {
    let dir = TempDir::new().unwrap();
    let output = desk(&dir)
        .args(["project", "new", "River Index", "--chapter", "Source:30000"])
        .output()
        .unwrap();
    let id = created_id(&output.stdout);

    desk(&dir)
        .args(["publish", &id, "--channel", "ingram-spark"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("requires a valid ISBN-13"));
}

#[test]
fn test_publish_runs_delivery_to_success() {
    let dir = TempDir::new().unwrap();
    let output = desk(&dir)
        .args(["project", "new", "River Index", "--chapter", "Source:30000"])
        .output()
        .unwrap();
    let id = created_id(&output.stdout);

    desk(&dir)
        .args([
            "publish",
            &id,
            "--channel",
            "ingram-spark",
            "--isbn",
            "9780306406157",
            "--cover",
            "full-wrap=wrap.pdf",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Confirming receipt"))
        .stdout(predicate::str::contains("Published 'River Index'"));

    desk(&dir)
        .args(["project", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("published"));
}
