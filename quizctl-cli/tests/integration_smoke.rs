//! Smoke tests to verify command wiring and the no-database failure paths

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn write_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_import_help() {
    let mut cmd = Command::cargo_bin("quizctl").unwrap();
    cmd.arg("import").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Input JSON file"));
}

#[test]
fn test_validate_help() {
    let mut cmd = Command::cargo_bin("quizctl").unwrap();
    cmd.arg("validate").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("without touching the database"));
}

#[test]
fn test_validate_reports_counts() {
    let file = write_file(
        r#"[{"theme": "Science", "subtheme": "Physics", "question": "Q1", "answer": "A1"}]"#,
    );

    let mut cmd = Command::cargo_bin("quizctl").unwrap();
    cmd.arg("validate").arg("--in").arg(file.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1 records"));
}

#[test]
fn test_validate_rejects_malformed_json() {
    let file = write_file("// not json\n[");

    let mut cmd = Command::cargo_bin("quizctl").unwrap();
    cmd.arg("validate").arg("--in").arg(file.path());

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("validation failed"));
}

#[test]
fn test_import_missing_file_fails_before_any_connection() {
    let mut cmd = Command::cargo_bin("quizctl").unwrap();
    cmd.arg("import").arg("--in").arg("/nonexistent/questions.json");

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("import failed"));
}

#[test]
fn test_import_dry_run_needs_no_database() {
    let file = write_file(
        r#"[
            {"theme": "Science", "subtheme": "Physics", "question": "Q1", "answer": "A1"},
            {"theme": "Science", "subtheme": "Physics", "question": "Q2", "type": "mcq", "answer": "A2"}
        ]"#,
    );

    let mut cmd = Command::cargo_bin("quizctl").unwrap();
    cmd.arg("import").arg("--in").arg(file.path()).arg("--dry-run");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("dry-run"))
        .stdout(predicate::str::contains("1 themes"))
        .stdout(predicate::str::contains("2 questions"));
}
