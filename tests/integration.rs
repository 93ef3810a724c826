//! Integration tests for the resetacl CLI


use harness::{TestTree, resetacl};
use predicates::prelude::*;

#[test]
fn test_dry_run_lists_tree_in_order() {
    let tree = TestTree::new();
    tree.add_dir("B");
    tree.add_file("A/inner.txt", "i");
    tree.add_file("a.txt", "a");

    resetacl(tree.path())
        .args(["--dry-run", "."])
        .assert()
        .success()
        .stdout("Updating directory: .\n\n.\n./a.txt\n\n./A\n./A/inner.txt\n\n./B\n")
        .stderr(predicate::str::contains("3 directories, 2 files in"));
}

#[test]
fn test_dry_run_single_file() {
    let tree = TestTree::new();
    tree.add_file("only.txt", "o");

    resetacl(tree.path())
        .args(["--dry-run", "only.txt"])
        .assert()
        .success()
        .stdout("Updating file: only.txt\nonly.txt\n");
}

#[test]
fn test_missing_target_fails() {
    let tree = TestTree::new();

    resetacl(tree.path())
        .args(["--dry-run", "nope"])
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("File or Directory not found: nope"));
}

#[test]
fn test_missing_path_argument_shows_usage() {
    let tree = TestTree::new();

    resetacl(tree.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_quiet_prints_only_header() {
    let tree = TestTree::new();
    tree.add_file("sub/file.txt", "f");

    resetacl(tree.path())
        .args(["--dry-run", "--quiet", "."])
        .assert()
        .success()
        .stdout("Updating directory: .\n")
        .stderr(predicate::str::contains("2 directories, 1 files"));
}

#[test]
fn test_json_output() {
    let tree = TestTree::new();
    tree.add_file("sub/file.txt", "f");

    let output = resetacl(tree.path())
        .args(["--dry-run", "--json", "."])
        .output()
        .expect("Failed to run resetacl");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let records: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line is JSON"))
        .collect();

    let kinds: Vec<&str> = records.iter().map(|r| r["kind"].as_str().unwrap()).collect();
    assert_eq!(kinds, vec!["dir", "dir", "file", "summary"]);
    assert_eq!(records[0]["path"], ".");
    assert_eq!(records[2]["path"], "./sub/file.txt");
    assert_eq!(records[3]["directories"], 2);
    assert_eq!(records[3]["files"], 1);
}

#[test]
fn test_invalid_mode_rejected() {
    let tree = TestTree::new();

    resetacl(tree.path())
        .args(["--dry-run", "--mode", "999", "."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid octal mode"));
}

#[test]
fn test_keep_going_flag_accepted() {
    let tree = TestTree::new();
    tree.add_dir("sub");

    resetacl(tree.path())
        .args(["--dry-run", "--keep-going", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("./sub"));
}

#[cfg(unix)]
#[test]
fn test_reset_applies_mode_or_reports_missing_privilege() {
    use std::fs;
    use std::os::unix::fs::{MetadataExt, PermissionsExt};

    let tree = TestTree::new();
    let file = tree.add_file("sub/file.txt", "f");
    fs::set_permissions(&file, fs::Permissions::from_mode(0o600)).unwrap();

    let meta = fs::metadata(tree.path()).unwrap();
    let owner = meta.uid().to_string();
    let group = meta.gid().to_string();

    let output = resetacl(tree.path())
        .args(["--owner", &owner, "--group", &group, "--mode", "755", "."])
        .output()
        .expect("Failed to run resetacl");
    let stderr = String::from_utf8_lossy(&output.stderr);

    if output.status.success() {
        assert_eq!(fs::metadata(&file).unwrap().permissions().mode() & 0o7777, 0o755);
        assert_eq!(
            fs::metadata(tree.join("sub")).unwrap().permissions().mode() & 0o7777,
            0o755
        );
        assert_eq!(fs::read_to_string(&file).unwrap(), "f");
    } else {
        // Unprivileged: nothing may have been touched
        assert!(stderr.contains("Privilege not held"), "stderr: {}", stderr);
        assert!(stderr.contains("must be run as root"), "stderr: {}", stderr);
        assert_eq!(fs::metadata(&file).unwrap().permissions().mode() & 0o7777, 0o600);
    }
}
