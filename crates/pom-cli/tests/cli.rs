//! End-to-end tests for the pomerge binary.

use std::fs;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pomerge() -> Command {
    cargo_bin_cmd!("pomerge")
}

fn po(entries: &[(&str, &str)]) -> String {
    let mut text = String::from("msgid \"\"\nmsgstr \"\"\n\"Language: de\\n\"\n");
    for (msgid, msgstr) in entries {
        text.push_str(&format!("\nmsgid \"{msgid}\"\nmsgstr \"{msgstr}\"\n"));
    }
    text
}

/// Writes `local.po`, `base.po` and `other.po` into a fresh directory.
struct Repo {
    dir: TempDir,
}

impl Repo {
    fn new(base: &str, local: &str, other: &str) -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("base.po"), base).unwrap();
        fs::write(dir.path().join("local.po"), local).unwrap();
        fs::write(dir.path().join("other.po"), other).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn read(&self, name: &str) -> String {
        fs::read_to_string(self.path(name)).unwrap()
    }

    fn cmd(&self) -> Command {
        let mut cmd = pomerge();
        cmd.arg(self.path("local.po"))
            .arg(self.path("base.po"))
            .arg(self.path("other.po"));
        cmd
    }
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
    pomerge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("merge.merge-po-files.driver"));
}

#[test]
fn version_flag_works() {
    pomerge()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pomerge"));
}

// =============================================================================
// Argument errors
// =============================================================================

#[test]
fn wrong_arity_exits_1() {
    pomerge().args(["a.po", "b.po"]).assert().code(1);
}

#[test]
fn unknown_flag_exits_1() {
    let repo = Repo::new(&po(&[]), &po(&[]), &po(&[]));
    repo.cmd().arg("--frobnicate").assert().code(1);
}

#[test]
fn missing_input_exits_1_without_writing() {
    let repo = Repo::new(&po(&[]), &po(&[]), &po(&[]));
    pomerge()
        .arg(repo.path("local.po"))
        .arg(repo.path("missing.po"))
        .arg(repo.path("other.po"))
        .arg(repo.path("out.po"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing.po"));
    assert!(!repo.path("out.po").exists());
}

// =============================================================================
// Merging
// =============================================================================

#[test]
fn clean_merge_overwrites_local_and_exits_0() {
    let repo = Repo::new(
        &po(&[("greeting", "Hi")]),
        &po(&[("greeting", "Hello")]),
        &po(&[("greeting", "Hi")]),
    );
    repo.cmd().assert().success().stdout(predicate::str::is_empty());
    assert!(repo.read("local.po").contains("msgstr \"Hello\""));
}

#[test]
fn verbose_narrates_stages() {
    let repo = Repo::new(
        &po(&[("greeting", "Hi")]),
        &po(&[("greeting", "Hello")]),
        &po(&[("greeting", "Hi")]),
    );
    repo.cmd()
        .arg("-v")
        .assert()
        .success()
        .stdout(predicate::str::contains("canonicalizing input files ..."))
        .stdout(predicate::str::contains(
            "automatic merge completed successfully, exiting with status 0",
        ));
}

#[test]
fn conflict_exits_1_and_writes_markers() {
    let repo = Repo::new(
        &po(&[("farewell", "Bye")]),
        &po(&[("farewell", "Goodbye")]),
        &po(&[("farewell", "See ya")]),
    );
    repo.cmd()
        .assert()
        .code(1)
        .stdout(predicate::str::contains("automatic merge failed"));

    let merged = repo.read("local.po");
    assert!(merged.contains("#-#-#-#-#"));
    assert!(merged.contains("Goodbye"));
    assert!(merged.contains("See ya"));
}

#[test]
fn deleted_on_both_sides_stays_deleted() {
    let repo = Repo::new(
        &po(&[("kept", "k"), ("unused", "X")]),
        &po(&[("kept", "k")]),
        &po(&[("kept", "k")]),
    );
    repo.cmd().arg(repo.path("out.po")).assert().success();
    let merged = repo.read("out.po");
    assert!(!merged.contains("unused"));
    assert!(merged.contains("kept"));
}

#[test]
fn explicit_output_leaves_local_untouched() {
    let local = po(&[("greeting", "Hello")]);
    let repo = Repo::new(&po(&[("greeting", "Hi")]), &local, &po(&[("greeting", "Hi")]));
    repo.cmd().arg(repo.path("out.po")).assert().success();
    assert_eq!(repo.read("local.po"), local);
    assert!(repo.read("out.po").contains("Hello"));
}

#[test]
fn malformed_input_exits_1_and_leaves_output() {
    let local = po(&[("a", "1")]);
    let repo = Repo::new(&local, &local, "msgid \"a\"\nmsgstr \"unterminated\n");
    repo.cmd()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("other.po"))
        .stderr(predicate::str::contains("line 2"));
    assert_eq!(repo.read("local.po"), local);
}

#[test]
fn json_report() {
    let repo = Repo::new(
        &po(&[("farewell", "Bye")]),
        &po(&[("farewell", "Goodbye")]),
        &po(&[("farewell", "See ya")]),
    );
    let output = repo.cmd().args(["--format", "json"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["outcome"], "failed");
    assert_eq!(report["conflicts"], 1);
    assert_eq!(report["conflicting_keys"][0], "\"farewell\"");
}

#[test]
fn json_report_is_not_mixed_with_narration() {
    let repo = Repo::new(
        &po(&[("greeting", "Hi")]),
        &po(&[("greeting", "Hello")]),
        &po(&[("greeting", "Hi")]),
    );
    let output = repo
        .cmd()
        .args(["-v", "--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["outcome"], "succeeded");
    assert_eq!(report["local_only"], 1);
}

#[test]
fn duplicate_translations_in_one_input_conflict() {
    let repo = Repo::new(
        &po(&[("k", "1")]),
        &po(&[("k", "2"), ("k", "3")]),
        &po(&[("k", "1")]),
    );
    repo.cmd()
        .assert()
        .code(1)
        .stdout(predicate::str::contains("automatic merge failed"));

    let merged = repo.read("local.po");
    assert!(merged.contains("#-#-#-#-#"));
    assert!(merged.contains('2'));
    assert!(merged.contains('3'));
}

#[test]
fn huge_plural_index_is_a_format_error() {
    let text = "msgid \"a\"\nmsgid_plural \"b\"\nmsgstr[99999999999] \"x\"\n";
    for bad in [text.to_string(), text.replace("99999999999", "18446744073709551615")] {
        let local = po(&[("a", "1")]);
        let repo = Repo::new(&local, &local, &bad);
        repo.cmd()
            .assert()
            .code(1)
            .stderr(predicate::str::contains("line 3"))
            .stderr(predicate::str::contains("invalid plural index"))
            .stderr(predicate::str::contains("panicked").not());
        assert_eq!(repo.read("local.po"), local);
    }
}

#[test]
fn config_file_is_read() {
    let repo = Repo::new(&po(&[]), &po(&[]), &po(&[]));
    fs::write(repo.path("pomerge.toml"), "verbose = true\nparallelism = 1\n").unwrap();
    repo.cmd()
        .arg("--config")
        .arg(repo.path("pomerge.toml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("saving output ..."));
}

#[test]
fn invalid_config_exits_1() {
    let repo = Repo::new(&po(&[]), &po(&[]), &po(&[]));
    fs::write(repo.path("pomerge.toml"), "parallelism = \"lots\"\n").unwrap();
    repo.cmd()
        .arg("--config")
        .arg(repo.path("pomerge.toml"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("pomerge.toml"));
}
