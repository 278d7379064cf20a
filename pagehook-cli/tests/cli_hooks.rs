use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

fn pagehook() -> Result<Command, Box<dyn std::error::Error>> {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("pagehook")?;
    cmd.env_remove("REPO_API_ROOT").env_remove("REPO_RAW_ROOT");
    Ok(cmd)
}

const PAGE: &str = r##"{
  "owner": "acme",
  "repo": "docs",
  "ref": "main",
  "path": "intro.md",
  "resource": {
    "children": ["<h1>Intro</h1>", "<p>Welcome</p>"],
    "body": "# Intro\n\nWelcome",
    "html": "<h1>Intro</h1>\n<p>Welcome</p>",
    "mdast": {
      "type": "root",
      "position": { "start": { "line": 1 } },
      "children": [{ "type": "heading", "position": { "start": { "line": 1 } } }]
    }
  }
}"##;

#[test]
fn html_without_roots_fills_defaults() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("page.json");
    fs::write(&input, PAGE)?;

    let assert = pagehook()?.arg("html").arg(&input).assert().success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    let value: Value = serde_json::from_str(&stdout)?;
    let resource = &value["resource"];
    assert_eq!(value["contextPath"], "/");
    assert_eq!(resource["children"], serde_json::json!(["<p>Welcome</p>"]));
    assert_eq!(resource["committers"], serde_json::json!([]));
    assert_eq!(
        resource["lastModified"],
        serde_json::json!({ "raw": null, "display": "Unknown" })
    );

    Ok(())
}

#[test]
fn json_strips_positions_from_stdin() -> Result<(), Box<dyn std::error::Error>> {
    let assert = pagehook()?.arg("json").write_stdin(PAGE).assert().success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    assert!(!stdout.contains("\\\"position\\\""));

    let value: Value = serde_json::from_str(&stdout)?;
    assert!(value["resource"].get("body").is_none());
    assert!(value["resource"].get("html").is_none());
    assert!(value["resource"]["mdast"].get("position").is_none());

    let embedded: Value = serde_json::from_str(value["json"].as_str().expect("json string"))?;
    assert_eq!(embedded["resource"]["mdast"]["type"], "root");

    Ok(())
}

#[test]
fn nav_rewrites_links_under_strain() -> Result<(), Box<dyn std::error::Error>> {
    let payload = r#"{
  "strain": "beta",
  "resource": { "children": ["<h1>Nav</h1>", "<a href=\"guide.md\">Guide</a>", "<a href=\"https://x.org/a.md\">X</a>"] }
}"#;

    pagehook()?
        .arg("nav")
        .write_stdin(payload)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"href=\"/beta/guide.html\""#))
        .stdout(predicate::str::contains(r#"href=\"https://x.org/a.md\""#))
        .stdout(predicate::str::contains("<h1>Nav</h1>").not());

    Ok(())
}

#[test]
fn render_splits_top_level_blocks() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("SUMMARY.md");
    fs::write(&input, "# Table of contents\n\n* a\n* [link](link.md)")?;

    let assert = pagehook()?.arg("render").arg(&input).assert().success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    let value: Value = serde_json::from_str(&stdout)?;
    let children = value["children"].as_array().expect("children array");
    assert_eq!(children.len(), 3);
    assert_eq!(children[0], "<h1>Table of contents</h1>");
    assert_eq!(children[1], "\n");

    Ok(())
}

#[test]
fn fetch_failure_prints_error_object() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("hooks.yml"),
        r#"
secrets:
  REPO_API_ROOT: "http://127.0.0.1:1/"
timeout_secs: 5
"#,
    )?;

    let assert = pagehook()?
        .current_dir(dir.path())
        .args(["--config", "hooks.yml", "html"])
        .write_stdin(PAGE)
        .assert()
        .failure()
        .code(1);

    let stdout = String::from_utf8(assert.get_output().stdout.clone())?;
    let value: Value = serde_json::from_str(&stdout)?;
    assert!(value["error"].as_str().is_some());

    Ok(())
}

#[test]
fn missing_config_file_fails() -> Result<(), Box<dyn std::error::Error>> {
    pagehook()?
        .args(["--config", "/nonexistent/hooks.yml", "json"])
        .write_stdin("{}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));

    Ok(())
}
