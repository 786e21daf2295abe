// End-to-end checks for the annotation pipeline against real files: the
// library entry points first, then the asset-annotate binary.

use anyhow::Result;
use assert_cmd::Command;
use asset_annotate::{
    annotate_file, check_file, AnnotateConfig, AnnotateError, WriteMode, DEFAULT_ASSET_PATH,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn sample_asset() -> Value {
    json!({
        "attributes": [
            {"name": "brave"},
            {"name": "secret", "hidden": true}
        ],
        "categories": [
            {"name": "home", "lots": [{"desc": "nap", "p": 0.5}, {"desc": "cook", "p": 0.2}]},
            {"name": "street"},
            {"name": "park", "lots": null},
            {"name": "school", "lots": [{"desc": "exam", "p": 0.9}]}
        ]
    })
}

fn write_asset(dir: &Path, value: &Value) -> PathBuf {
    let path = dir.join(DEFAULT_ASSET_PATH);
    fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
    path
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn annotates_file_in_place() -> Result<()> {
    let temp = TempDir::new()?;
    let path = write_asset(temp.path(), &sample_asset());

    let report = annotate_file(&AnnotateConfig::new(&path))?;

    assert_eq!(report.attributes, 2);
    assert_eq!(report.categories, 4);
    assert_eq!(report.lots, 3);
    assert_eq!(
        read_json(&path),
        json!({
            "attributes": [
                {"name": "brave", "id": 0},
                {"name": "secret", "hidden": true, "id": 1}
            ],
            "categories": [
                {"name": "home", "lots": [
                    {"desc": "nap", "p": 0.5, "id": 0},
                    {"desc": "cook", "p": 0.2, "id": 1}
                ], "id": 0},
                {"name": "street", "id": 1},
                {"name": "park", "lots": null, "id": 2},
                {"name": "school", "lots": [{"desc": "exam", "p": 0.9, "id": 2}], "id": 3}
            ]
        })
    );
    assert!(check_file(&path)?.is_empty());
    assert!(fs::read_to_string(&path)?.contains(r#"{"name":"school","lots":[{"desc":"exam","p":0.9,"id":2}],"id":3}"#));
    Ok(())
}

#[test]
fn second_run_does_not_shift_ids() -> Result<()> {
    let temp = TempDir::new()?;
    let path = write_asset(temp.path(), &sample_asset());
    let config = AnnotateConfig::new(&path);

    annotate_file(&config)?;
    let first = fs::read_to_string(&path)?;
    let report = annotate_file(&config)?;
    let second = fs::read_to_string(&path)?;

    assert_eq!(first, second);
    assert_eq!(report.reassigned, 0);
    Ok(())
}

#[test]
fn writes_to_separate_output_atomically() -> Result<()> {
    let temp = TempDir::new()?;
    let input = write_asset(temp.path(), &sample_asset());
    let original = fs::read_to_string(&input)?;
    let output = temp.path().join("out.json");

    let config = AnnotateConfig {
        output: Some(output.clone()),
        pretty: true,
        write_mode: WriteMode::Atomic,
        ..AnnotateConfig::new(&input)
    };
    annotate_file(&config)?;

    assert_eq!(fs::read_to_string(&input)?, original);
    assert!(fs::read_to_string(&output)?.contains('\n'));
    assert!(check_file(&output)?.is_empty());
    Ok(())
}

#[test]
fn malformed_file_is_left_untouched() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join(DEFAULT_ASSET_PATH);
    let truncated = r#"{"attributes": [{"name": "brave"}], "categories": [{"lots": ["#;
    fs::write(&path, truncated)?;

    let err = annotate_file(&AnnotateConfig::new(&path)).unwrap_err();

    assert!(matches!(err, AnnotateError::Parse { .. }));
    assert_eq!(fs::read_to_string(&path)?, truncated);
    Ok(())
}

#[test]
fn missing_categories_is_left_untouched() -> Result<()> {
    let temp = TempDir::new()?;
    let path = write_asset(temp.path(), &json!({"attributes": [{"name": "a"}]}));
    let before = fs::read_to_string(&path)?;

    let err = annotate_file(&AnnotateConfig::new(&path)).unwrap_err();

    assert!(matches!(err, AnnotateError::Shape { .. }));
    assert_eq!(fs::read_to_string(&path)?, before);
    Ok(())
}

#[test]
fn missing_file_is_read_error() {
    let temp = TempDir::new().expect("temp dir");
    let err = annotate_file(&AnnotateConfig::new(temp.path().join("nope.json"))).unwrap_err();
    assert!(matches!(err, AnnotateError::Read { .. }));
}

#[test]
fn cli_defaults_to_core_asset_in_working_dir() -> Result<()> {
    let temp = TempDir::new()?;
    let path = write_asset(temp.path(), &sample_asset());

    Command::cargo_bin("asset-annotate")?
        .current_dir(temp.path())
        .arg("--quiet")
        .assert()
        .success();

    assert!(check_file(&path)?.is_empty());
    assert_eq!(read_json(&path)["categories"][3]["lots"][0]["id"], json!(2));
    Ok(())
}

#[test]
fn cli_check_reports_without_writing() -> Result<()> {
    let temp = TempDir::new()?;
    let path = write_asset(temp.path(), &sample_asset());
    let before = fs::read_to_string(&path)?;

    let output = Command::cargo_bin("asset-annotate")?
        .arg("--check")
        .arg("--quiet")
        .arg(&path)
        .output()?;

    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("/attributes/0: expected id 0, found none"));
    assert!(stdout.contains("/categories/3/lots/0: expected id 2, found none"));
    assert_eq!(fs::read_to_string(&path)?, before);
    Ok(())
}

#[test]
fn cli_check_rejects_write_options() -> Result<()> {
    let temp = TempDir::new()?;
    let path = write_asset(temp.path(), &sample_asset());
    let before = fs::read_to_string(&path)?;

    for flag in ["--pretty", "--atomic"] {
        Command::cargo_bin("asset-annotate")?
            .arg("--check")
            .arg(flag)
            .arg(&path)
            .assert()
            .failure();
    }

    assert_eq!(fs::read_to_string(&path)?, before);
    Ok(())
}

#[cfg(unix)]
#[test]
fn atomic_run_keeps_file_permissions() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new()?;
    let path = write_asset(temp.path(), &sample_asset());
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644))?;

    let config = AnnotateConfig {
        write_mode: WriteMode::Atomic,
        ..AnnotateConfig::new(&path)
    };
    annotate_file(&config)?;

    assert_eq!(fs::metadata(&path)?.permissions().mode() & 0o777, 0o644);
    assert!(check_file(&path)?.is_empty());
    Ok(())
}

#[test]
fn cli_dry_run_prints_instead_of_writing() -> Result<()> {
    let temp = TempDir::new()?;
    let path = write_asset(temp.path(), &sample_asset());
    let before = fs::read_to_string(&path)?;

    let output = Command::cargo_bin("asset-annotate")?
        .arg("--dry-run")
        .arg("--quiet")
        .arg(&path)
        .output()?;

    assert!(output.status.success());
    let printed: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(printed["attributes"][1]["id"], json!(1));
    assert_eq!(fs::read_to_string(&path)?, before);
    Ok(())
}

#[test]
fn cli_fails_on_malformed_json() -> Result<()> {
    let temp = TempDir::new()?;
    let path = temp.path().join(DEFAULT_ASSET_PATH);
    fs::write(&path, "{not json")?;

    Command::cargo_bin("asset-annotate")?
        .arg(&path)
        .assert()
        .failure();

    assert_eq!(fs::read_to_string(&path)?, "{not json");
    Ok(())
}
