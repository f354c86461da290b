use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn inspect(source: &str, extra: &[&str]) -> serde_json::Value {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.md");
    fs::write(&input, source).unwrap();

    let mut cmd = cargo_bin_cmd!("mdpipe");
    cmd.current_dir(dir.path()).arg("inspect").arg(&input).args(extra);

    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn inspect_defaults_to_mdast() {
    let tree = inspect("# Hi\n\ntext", &[]);
    assert_eq!(tree["children"][0]["type"], "heading");
    assert_eq!(tree["children"][0]["children"][0]["value"], "Hi");
    assert_eq!(tree["children"][1]["type"], "paragraph");
}

#[test]
fn inspect_hast() {
    let tree = inspect("# Hi", &["hast"]);
    assert_eq!(tree["children"][0]["type"], "element");
    assert_eq!(tree["children"][0]["tagName"], "h1");
}

#[test]
fn inspect_after_parse_has_no_toc() {
    let tree = inspect("# Contents\n\n# A\n", &["parse"]);
    assert_eq!(tree["children"].as_array().unwrap().len(), 2);

    let tree = inspect("# Contents\n\n# A\n", &["toc"]);
    assert_eq!(tree["children"][1]["type"], "list");
}

#[test]
fn inspect_rejects_unknown_target() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.md");
    fs::write(&input, "x").unwrap();

    let mut cmd = cargo_bin_cmd!("mdpipe");
    cmd.current_dir(dir.path())
        .arg("inspect")
        .arg(&input)
        .arg("stringify");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
