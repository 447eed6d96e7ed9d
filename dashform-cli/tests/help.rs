use assert_cmd::cargo::{self};
use predicates::str::contains;

const BLOG_FORM: &str = r#"{"entity": "blogs", "fields": [{"name": "title", "label": "Title", "type": "text"}]}"#;

#[test]
fn prints_help() {
    let mut cmd = cargo::cargo_bin_cmd!("dashform");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(contains("dashform"))
        .stdout(contains("--lang"));
}

#[test]
fn update_mode_requires_an_id() {
    let mut cmd = cargo::cargo_bin_cmd!("dashform");
    cmd.env_remove("DASHFORM_API")
        .args(["--form", BLOG_FORM, "--mode", "update"])
        .assert()
        .failure()
        .stderr(contains("--mode update requires --id"));
}

#[test]
fn invalid_definitions_are_reported_with_pointers() {
    let mut cmd = cargo::cargo_bin_cmd!("dashform");
    cmd.env_remove("DASHFORM_API")
        .args([
            "--form",
            r#"{"entity": "blogs", "fields": [{"name": "x", "label": "X", "type": "markdown"}]}"#,
        ])
        .assert()
        .failure()
        .stderr(contains("/fields/0/type"));
}

#[test]
fn delete_without_api_echoes_the_result() {
    let mut cmd = cargo::cargo_bin_cmd!("dashform");
    cmd.env_remove("DASHFORM_API")
        .env_remove("DASHFORM_LANG")
        .args(["--form", BLOG_FORM, "--delete", "7", "--no-pretty"])
        .assert()
        .success()
        .stdout(contains(r#""deleted":true"#))
        .stderr(contains("Deleted successfully"));
}

#[test]
fn delete_writes_to_output_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deleted.json");
    let mut cmd = cargo::cargo_bin_cmd!("dashform");
    cmd.env_remove("DASHFORM_API")
        .args(["--form", BLOG_FORM, "--delete", "9", "-o"])
        .arg(&path)
        .assert()
        .success();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("\"id\": \"9\""), "{written}");
}
