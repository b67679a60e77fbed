use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn taskpulse(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("taskpulse").unwrap();
    cmd.env("TASKPULSE_HOME", home.path())
        .env_remove("TASKPULSE_DB")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn add_complete_and_summarize() {
    let home = TempDir::new().unwrap();

    taskpulse(&home)
        .args(["add", "Write report", "-e", "60", "--at", "2025-09-01T09:00:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Write report"));
    taskpulse(&home)
        .args(["add", "Review notes", "--at", "2025-09-02"])
        .assert()
        .success();
    taskpulse(&home)
        .args(["complete", "1", "--at", "2025-09-01T10:00:00Z"])
        .assert()
        .success();

    taskpulse(&home)
        .args(["summary", "generate", "2025-09", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"month\": \"2025-09\""))
        .stdout(predicate::str::contains("\"total_tasks\": 2"))
        .stdout(predicate::str::contains("\"completion_rate\": 50"))
        .stdout(predicate::str::contains("\"estimation_accuracy\": 100"));

    taskpulse(&home)
        .args(["summary", "list", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 1"));

    assert!(home.path().join("taskpulse.db").exists());
}

#[test]
fn list_outputs_json() {
    let home = TempDir::new().unwrap();
    taskpulse(&home).args(["add", "Only task"]).assert().success();

    taskpulse(&home)
        .args(["list", "--pending", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 1"))
        .stdout(predicate::str::contains("\"is_completed\": false"));
}

#[test]
fn invalid_month_is_rejected() {
    let home = TempDir::new().unwrap();
    taskpulse(&home)
        .args(["summary", "generate", "2025-13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected YYYY-MM"));
}

#[test]
fn unknown_task_fails() {
    let home = TempDir::new().unwrap();
    taskpulse(&home)
        .args(["complete", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn weekly_chart_for_empty_month() {
    let home = TempDir::new().unwrap();
    taskpulse(&home)
        .args(["chart", "weekly", "2025-09"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks recorded for 2025-09."));
}

#[test]
fn trends_compare_without_summaries() {
    let home = TempDir::new().unwrap();
    taskpulse(&home)
        .args(["trends", "compare", "2025-09"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No comparison available"));
}

#[test]
fn explicit_database_path() {
    let home = TempDir::new().unwrap();
    let db = home.path().join("nested").join("custom.db");

    taskpulse(&home)
        .arg("--db")
        .arg(&db)
        .args(["add", "Elsewhere"])
        .assert()
        .success();

    assert!(db.exists());
    assert!(!home.path().join("taskpulse.db").exists());
}

#[test]
fn config_sets_default_output() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("config.yaml"),
        "general:\n  default_output: json\n",
    )
    .unwrap();

    taskpulse(&home)
        .arg("streak")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"longest\": 0"));
}

#[test]
fn broken_config_reports_error() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("config.yaml"), "stats:\n  tone: shouty\n").unwrap();

    taskpulse(&home)
        .arg("streak")
        .assert()
        .failure()
        .stderr(predicate::str::contains("config.yaml"));
}

#[test]
fn completions_for_bash() {
    let home = TempDir::new().unwrap();
    taskpulse(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("taskpulse"));
}
