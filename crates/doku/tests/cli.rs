use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn doku() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("doku").unwrap()
}

#[test]
fn no_command_prints_help() {
    doku()
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("build"));
}

#[test]
fn help_exits_zero() {
    doku().arg("help").assert().success();
    doku().arg("--help").assert().success();
}

#[test]
fn unknown_command_exits_one() {
    doku().arg("frobnicate").assert().code(1);
}

#[test]
fn missing_argument_exits_one() {
    doku().arg("new").assert().code(1);
    doku().args(["compile", "only-input.md"]).assert().code(1);
}

#[test]
fn invalid_format_exits_one() {
    doku().args(["build", ".", "--format", "pdf"]).assert().code(1);
}

#[test]
fn format_names_ignore_case() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let project = dir.path().join("site");
    doku().arg("new").arg(&project).assert().success();

    doku()
        .arg("build")
        .arg(&project)
        .args(["--format", "DOKU"])
        .assert()
        .success();

    let has_doku_index = fs::read_dir(project.join("res"))?
        .filter_map(|e| e.ok())
        .any(|e| e.file_name().to_string_lossy().starts_with("index_doku_build_"));
    assert!(has_doku_index);

    Ok(())
}

#[test]
fn new_then_build() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let project = dir.path().join("site");

    doku()
        .arg("new")
        .arg(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created Doku project"));

    assert!(project.join("src/result.yaml").exists());

    doku()
        .arg("build")
        .arg(&project)
        .args(["--format", "doku"])
        .assert()
        .success()
        .stdout(predicate::str::contains("index_build_"));

    let outputs: Vec<String> = fs::read_dir(project.join("res"))?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert!(outputs.iter().any(|f| f.starts_with("index_build_") && f.ends_with(".html")));
    assert!(outputs.iter().any(|f| f.starts_with("index_build_") && f.ends_with(".js")));
    assert!(outputs.iter().any(|f| f.starts_with("index_doku_build_")));
    assert!(outputs.contains(&"dokujs.js".to_string()));
    assert!(outputs.contains(&"assets-manifest.json".to_string()));

    Ok(())
}

#[test]
fn build_reports_missing_page() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::create_dir_all(dir.path().join("src"))?;
    fs::write(
        dir.path().join("src/result.yaml"),
        "nav:\n  - text: Missing\n    file: missing.md\n",
    )?;

    doku()
        .arg("build")
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing.md"));

    Ok(())
}

#[test]
fn compile_full_and_lite() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("page.doku");
    fs::write(&input, "---\ntitle: Page\n---\n# Heading\n\n- one\n- two\n")?;

    let full = dir.path().join("out/full.html");
    doku().arg("compile").arg(&input).arg(&full).assert().success();
    let html = fs::read_to_string(&full)?;
    assert!(html.contains("<title>Page</title>"));
    assert!(html.contains("<li>one</li>"));

    let lite = dir.path().join("lite.html");
    doku()
        .arg("compile")
        .arg(&input)
        .arg(&lite)
        .args(["--renderer", "Lite"])
        .assert()
        .success();
    let html = fs::read_to_string(&lite)?;
    assert!(html.contains("<title>Page</title>"));
    assert!(html.contains("<li>two</li>"));

    Ok(())
}

#[test]
fn compile_missing_input_fails() {
    let dir = tempdir().unwrap();
    doku()
        .arg("compile")
        .arg(dir.path().join("nope.md"))
        .arg(dir.path().join("out.html"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to read"));
}
