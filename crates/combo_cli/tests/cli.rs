//! End-to-end runs of the `combo` binary against files in a temp dir.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};

const CATALOG: &str = r#"[
  {"Attributes":[{"Id":1,"ValueIds":[10]},{"Id":2,"ValueIds":[20]}],"InStock":true},
  {"Attributes":[{"Id":1,"ValueIds":[10]},{"Id":2,"ValueIds":[21]}],"InStock":false}
]"#;
const PRODUCT: &str = r#"{"attributes":[{"id":1,"values":[10,11]},{"id":2,"values":[20,21]}]}"#;

fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
    let p = dir.join(name);
    fs::write(&p, body).unwrap();
    p
}

fn combo() -> Command {
    let mut cmd = Command::cargo_bin("combo").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

struct Fixture {
    dir: tempfile::TempDir,
    catalog: PathBuf,
    product: PathBuf,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let catalog = write(dir.path(), "catalog.json", CATALOG);
    let product = write(dir.path(), "product.json", PRODUCT);
    Fixture { dir, catalog, product }
}

#[test]
fn prints_json_report_for_explicit_paths() {
    let fx = fixture();
    let out = combo()
        .arg("--catalog").arg(&fx.catalog)
        .arg("--product").arg(&fx.product)
        .args(["--select", "1=10"])
        .assert()
        .success()
        .stderr(predicate::str::contains("narrowed pass, 2 enabled, 2 disabled"))
        .get_output()
        .stdout
        .clone();

    let v: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["pass_kind"], "narrowed");
    assert_eq!(v["selection_order"], "declared");
    assert_eq!(v["attributes"][0]["enabled"], json!([10]));
    assert_eq!(v["attributes"][0]["disabled"], json!([11]));
    assert_eq!(v["attributes"][1]["enabled"], json!([20]));
    assert_eq!(v["attributes"][1]["disabled"], json!([21]));
    assert!(v["catalog_id"].as_str().unwrap().starts_with("CAT:"));
}

#[test]
fn manifest_and_out_dir_write_both_renderings() {
    let fx = fixture();
    write(fx.dir.path(), "selection.json", r#"[{"attribute_id":1,"values":[10]}]"#);
    let manifest = write(
        fx.dir.path(),
        "session.json",
        r#"{"catalog_path":"catalog.json","product_path":"product.json","selection_path":"selection.json"}"#,
    );
    let out_dir = fx.dir.path().join("out");

    combo()
        .arg("--manifest").arg(&manifest)
        .arg("--out").arg(&out_dir)
        .args(["--render", "json", "html", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let json_bytes = fs::read(out_dir.join("availability.json")).unwrap();
    assert!(!json_bytes.ends_with(b"\n"));
    let v: Value = serde_json::from_slice(&json_bytes).unwrap();
    assert_eq!(v["attributes"][1]["disabled"], json!([21]));

    let html = fs::read_to_string(out_dir.join("availability.html")).unwrap();
    assert!(html.starts_with("<!doctype html>"));
    assert!(html.contains("Totals: 2 enabled, 2 disabled, 0 untouched."));
}

#[test]
fn unreadable_catalog_disables_everything_once_selection_applies() {
    let fx = fixture();
    fs::write(&fx.catalog, "not json").unwrap();

    let out = combo()
        .arg("--catalog").arg(&fx.catalog)
        .arg("--product").arg(&fx.product)
        .args(["--select", "1=10"])
        .assert()
        .success()
        .stderr(predicate::str::contains("catalog unavailable"))
        .get_output()
        .stdout
        .clone();

    let v: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["pass_kind"], "empty_catalog");
    assert_eq!(v["totals"]["disabled"], 4);
    assert_eq!(v["catalog_id"], Value::Null);
}

#[test]
fn missing_product_is_an_io_failure() {
    let fx = fixture();
    combo()
        .arg("--catalog").arg(&fx.catalog)
        .arg("--product").arg(fx.dir.path().join("nope.json"))
        .assert()
        .code(4);
}

#[test]
fn malformed_product_is_a_validation_failure() {
    let fx = fixture();
    fs::write(&fx.product, "{").unwrap();
    combo()
        .arg("--catalog").arg(&fx.catalog)
        .arg("--product").arg(&fx.product)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("combo: error:"));
}

#[test]
fn unknown_attribute_in_select_is_rejected() {
    let fx = fixture();
    combo()
        .arg("--catalog").arg(&fx.catalog)
        .arg("--product").arg(&fx.product)
        .args(["--select", "9=90"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("selection"));
}

#[test]
fn network_paths_are_rejected() {
    combo()
        .args(["--manifest", "https://example.com/session.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no scheme"));
}

#[test]
fn catalog_digest_mismatch_fails_validation() {
    let fx = fixture();
    let manifest = write(
        fx.dir.path(),
        "session.json",
        &format!(
            r#"{{"catalog_path":"catalog.json","product_path":"product.json","catalog_sha256":"{}"}}"#,
            "0".repeat(64)
        ),
    );
    combo().arg("--manifest").arg(&manifest).assert().code(2);
}
