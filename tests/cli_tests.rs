mod common;

use regex::Regex;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

struct TestContext {
    data: TempDir,
    config: TempDir,
}

impl TestContext {
    fn new() -> Self {
        let data = tempfile::tempdir().expect("Failed to create temp dir");
        let config = tempfile::tempdir().expect("Failed to create temp dir");
        write(data.path(), "word-freq-top5000.csv", common::CSV_5K);
        write(data.path(), "google-10000-english-usa.txt", common::RANKED_20K);
        write(data.path(), "en.txt", common::FLAT_273K);
        Self { data, config }
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_syllaforge"))
            .args(args)
            .arg("--data-dir")
            .arg(self.data.path())
            .arg("--config-dir")
            .arg(self.config.path())
            .output()
            .expect("Failed to run syllaforge")
    }
}

fn write(dir: &Path, name: &str, text: &str) {
    std::fs::write(dir.join(name), text).unwrap();
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).to_string()
}

#[test]
fn test_suggest_table() {
    let ctx = TestContext::new();
    let out = ctx.run(&["suggest", "ar"]);
    assert!(out.status.success(), "{:?}", out);

    let text = stdout(&out);
    let re = Regex::new(r"'ar' in 5k: (\d+) matches \(by frequency, desc\)").unwrap();
    let caps = re.captures(&text).expect("summary line missing");
    assert_eq!(&caps[1], "5");
    assert!(text.contains("[AR]e"));
}

#[test]
fn test_suggest_json_fallback_sort() {
    let ctx = TestContext::new();
    let out = ctx.run(&["suggest", "ar", "--dict", "273k", "--json"]);
    assert!(out.status.success(), "{:?}", out);

    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["applied"], "length");
    assert_eq!(value["direction"], "descending");
    let words: Vec<&str> = value["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["word"].as_str().unwrap())
        .collect();
    assert_eq!(words, vec!["aardvark", "bizarre", "carpet", "bar"]);
}

#[test]
fn test_suggest_limit() {
    let ctx = TestContext::new();
    let out = ctx.run(&["suggest", "a", "--dict", "20k", "--sort", "length", "--limit", "2"]);
    assert!(out.status.success(), "{:?}", out);
    let text = stdout(&out);
    let re = Regex::new(r"\.\.\. and (\d+) more").unwrap();
    let caps = re.captures(&text).expect("overflow line missing");
    assert_eq!(&caps[1], "4");
}

#[test]
fn test_suggest_unknown_dictionary() {
    let ctx = TestContext::new();
    let out = ctx.run(&["suggest", "ar", "--dict", "1m"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn test_suggest_missing_word_list() {
    let ctx = TestContext::new();
    std::fs::remove_file(ctx.data.path().join("en.txt")).unwrap();
    let out = ctx.run(&["suggest", "ar", "--dict", "273k"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_config_set_persists_and_clamps() {
    let ctx = TestContext::new();

    let out = ctx.run(&["config", "set", "typoChance", "150"]);
    assert!(out.status.success(), "{:?}", out);
    assert!(stdout(&out).contains("typoChance = 100"));

    let out = ctx.run(&["config", "get", "typoChance"]);
    assert!(stdout(&out).contains("typoChance = 100"));

    let out = ctx.run(&["config", "show", "--json"]);
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["typoChance"], 100.0);

    ctx.run(&["config", "reset"]);
    let out = ctx.run(&["config", "get", "typoChance"]);
    assert!(stdout(&out).contains("typoChance = 2"));
}

#[test]
fn test_config_bad_path() {
    let ctx = TestContext::new();
    let out = ctx.run(&["config", "get", "typo.chance"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn test_type_instant_submits_word() {
    let ctx = TestContext::new();
    ctx.run(&["config", "set", "typoChance", "0"]);

    let out = ctx.run(&["type", "cat", "--seed", "7", "--instant"]);
    assert!(out.status.success(), "{:?}", out);
    let text = stdout(&out);
    assert!(text.contains("submit: cat"));
    let re = Regex::new(r"(\d+) keystrokes, (\d+) typos").unwrap();
    let caps = re.captures(&text).expect("stats line missing");
    assert_eq!(&caps[1], "3");
    assert_eq!(&caps[2], "0");
}
