//! Edge case and error handling tests for resetacl
#![cfg(unix)]


use std::cell::RefCell;
use std::fs;

use harness::{TestTree, record_walk, record_walk_with, rel, resetacl};
use predicates::prelude::*;
use resetacl::{EnumerationPolicy, TreeWalker, WalkError, WalkerConfig};

fn following_links() -> WalkerConfig {
    WalkerConfig {
        traverse_links: true,
        ..Default::default()
    }
}

// ============================================================================
// Symlink Edge Cases
// ============================================================================

#[test]
fn test_symlinked_directory_visited_not_entered() {
    let tree = TestTree::new();
    tree.add_file("real/inside.txt", "i");
    tree.add_symlink("link", tree.join("real"));

    let (log, summary) = record_walk(tree.path(), WalkerConfig::default());
    assert_eq!(
        log,
        vec!["dir .", "dir link", "dir real", "file real/inside.txt"]
    );
    assert_eq!(summary.links_not_followed, 1);
}

#[test]
fn test_symlinked_directory_entered_when_traversing_links() {
    let tree = TestTree::new();
    tree.add_file("real/inside.txt", "i");
    tree.add_symlink("link", "real");

    let (log, summary) = record_walk(tree.path(), following_links());
    assert_eq!(
        log,
        vec![
            "dir .",
            "dir link",
            "file link/inside.txt",
            "dir real",
            "file real/inside.txt",
        ]
    );
    assert_eq!(summary.links_not_followed, 0);
}

#[test]
fn test_visitor_veto_still_applies_to_followed_links() {
    let tree = TestTree::new();
    tree.add_file("real/inside.txt", "i");
    tree.add_symlink("link", "real");

    let (log, result) = record_walk_with(tree.path(), following_links(), true, |name| name != "link");
    result.unwrap();
    assert_eq!(
        log,
        vec!["dir .", "dir link", "dir real", "file real/inside.txt"]
    );
}

#[test]
fn test_base_that_is_a_link_visited_once() {
    let tree = TestTree::new();
    tree.add_file("real/a/inside.txt", "i");
    let link = tree.add_symlink("link", tree.join("real"));

    let calls = RefCell::new(Vec::new());
    let mut walker: TreeWalker = TreeWalker::new(|dir| {
        calls.borrow_mut().push(dir.to_path_buf());
        Ok(true)
    })
    .with_file_visitor(|file| {
        calls.borrow_mut().push(file.to_path_buf());
        Ok(true)
    });
    let summary = walker.walk(&link).unwrap();
    drop(walker);

    assert_eq!(calls.into_inner(), vec![link]);
    assert_eq!(summary.directories, 1);
    assert_eq!(summary.links_not_followed, 1);
}

#[test]
fn test_symlink_to_parent_no_infinite_loop() {
    let tree = TestTree::new();
    tree.add_file("subdir/file.txt", "f");
    tree.add_symlink("subdir/parent", "..");

    let (log, _) = record_walk(tree.path(), WalkerConfig::default());
    assert_eq!(
        log,
        vec!["dir .", "dir subdir", "file subdir/file.txt", "dir subdir/parent"]
    );
}

#[test]
fn test_self_referential_link_terminates() {
    let tree = TestTree::new();
    tree.add_symlink("loop", "loop");

    // A link that resolves to nothing is listed as a file
    let (log, _) = record_walk(tree.path(), WalkerConfig::default());
    assert_eq!(log, vec!["dir .", "file loop"]);
}

#[test]
fn test_broken_symlink_visited_as_file() {
    let tree = TestTree::new();
    tree.add_file("real.txt", "r");
    tree.add_symlink("broken", "nonexistent");

    let (log, summary) = record_walk(tree.path(), following_links());
    assert_eq!(log, vec!["dir .", "file broken", "file real.txt"]);
    assert_eq!(summary.files, 2);
}

// ============================================================================
// Mutation and Enumeration Failures
// ============================================================================

#[test]
fn test_removed_directory_fails_fast() {
    let tree = TestTree::new();
    tree.add_dir("a");
    tree.add_dir("doomed");
    tree.add_dir("z");

    let seen = RefCell::new(Vec::new());
    let mut walker: TreeWalker = TreeWalker::new(|dir| {
        seen.borrow_mut().push(rel(tree.path(), dir));
        if dir.ends_with("doomed") {
            fs::remove_dir(dir).unwrap();
        }
        Ok(true)
    });
    let err = walker.walk(tree.path()).unwrap_err();
    drop(walker);

    match err {
        WalkError::ReadDir { path, .. } => assert!(path.ends_with("doomed")),
        other => panic!("expected ReadDir, got {:?}", other),
    }
    // The walk stopped before the sibling after the failure
    assert_eq!(seen.into_inner(), vec![".", "a", "doomed"]);
}

#[test]
fn test_removed_directory_skipped_when_continuing() {
    let tree = TestTree::new();
    tree.add_dir("a");
    tree.add_dir("doomed");
    tree.add_file("z/last.txt", "l");

    let config = WalkerConfig {
        on_error: EnumerationPolicy::SkipAndContinue,
        ..Default::default()
    };
    let seen = RefCell::new(Vec::new());
    let mut walker: TreeWalker = TreeWalker::new(|dir| {
        seen.borrow_mut().push(rel(tree.path(), dir));
        if dir.ends_with("doomed") {
            fs::remove_dir(dir).unwrap();
        }
        Ok(true)
    })
    .with_file_visitor(|file| {
        seen.borrow_mut().push(rel(tree.path(), file));
        Ok(true)
    })
    .with_config(config);
    let summary = walker.walk(tree.path()).unwrap();
    drop(walker);

    assert_eq!(seen.into_inner(), vec![".", "a", "doomed", "z", "z/last.txt"]);
    assert_eq!(summary.skipped.len(), 1);
    assert!(summary.skipped[0].path.ends_with("doomed"));
}

#[test]
fn test_removed_directory_declined_is_harmless() {
    let tree = TestTree::new();
    tree.add_dir("doomed");
    tree.add_dir("kept");

    let mut walker: TreeWalker = TreeWalker::new(|dir| {
        if dir.ends_with("doomed") {
            fs::remove_dir(dir).unwrap();
            return Ok(false);
        }
        Ok(true)
    });
    let summary = walker.walk(tree.path()).unwrap();
    assert_eq!(summary.directories, 3);
}

// ============================================================================
// CLI Edge Cases
// ============================================================================

#[test]
fn test_cli_does_not_descend_into_linked_directory() {
    let tree = TestTree::new();
    tree.add_file("real/inside.txt", "i");
    tree.add_symlink("link", "real");

    resetacl(tree.path())
        .args(["--dry-run", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("./link\n"))
        .stdout(predicate::str::contains("./real/inside.txt"))
        .stdout(predicate::str::contains("./link/inside.txt").not())
        .stderr(predicate::str::contains("1 links not followed"));
}

#[test]
fn test_cli_traverse_links_flag() {
    let tree = TestTree::new();
    tree.add_file("real/inside.txt", "i");
    tree.add_symlink("link", "real");

    resetacl(tree.path())
        .args(["--dry-run", "--traverse-links", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("./link/inside.txt"));
}

#[test]
fn test_cli_broken_symlink_target_not_found() {
    let tree = TestTree::new();
    tree.add_symlink("broken", "nonexistent");

    resetacl(tree.path())
        .args(["--dry-run", "broken"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File or Directory not found: broken"));
}
