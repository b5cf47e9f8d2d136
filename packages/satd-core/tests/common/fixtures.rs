//! Git repository and Java source fixtures
//!
//! Builders for the throwaway repositories the integration tests mine:
//! git CLI plumbing plus small Java source generators.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Create a temporary git repository with a test identity configured
pub fn create_temp_repo() -> (tempfile::TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let repo_path = temp_dir.path().to_path_buf();

    Command::new("git")
        .args(["init"])
        .current_dir(&repo_path)
        .output()
        .expect("Failed to init git repo");

    Command::new("git")
        .args(["config", "user.email", "test@test.com"])
        .current_dir(&repo_path)
        .output()
        .expect("Failed to set user.email");

    Command::new("git")
        .args(["config", "user.name", "Test"])
        .current_dir(&repo_path)
        .output()
        .expect("Failed to set user.name");

    (temp_dir, repo_path)
}

/// Write one file and commit it
pub fn create_commit(repo_path: &Path, filename: &str, content: &str, message: &str) {
    fs::write(repo_path.join(filename), content).expect("Failed to write file");
    stage_and_commit(repo_path, message);
}

/// Write several files and commit them together
pub fn create_commit_files(repo_path: &Path, files: &[(&str, &str)], message: &str) {
    for (filename, content) in files {
        fs::write(repo_path.join(filename), content).expect("Failed to write file");
    }
    stage_and_commit(repo_path, message);
}

/// Remove a file and commit
pub fn delete_and_commit(repo_path: &Path, filename: &str, message: &str) {
    Command::new("git")
        .args(["rm", filename])
        .current_dir(repo_path)
        .output()
        .expect("Failed to git rm");
    commit(repo_path, message);
}

/// Rename a file and commit
pub fn rename_and_commit(repo_path: &Path, from: &str, to: &str, message: &str) {
    Command::new("git")
        .args(["mv", from, to])
        .current_dir(repo_path)
        .output()
        .expect("Failed to git mv");
    commit(repo_path, message);
}

/// Rename a file and rewrite its content, committed as one change
pub fn rename_rewrite_and_commit(
    repo_path: &Path,
    from: &str,
    to: &str,
    content: &str,
    message: &str,
) {
    Command::new("git")
        .args(["mv", from, to])
        .current_dir(repo_path)
        .output()
        .expect("Failed to git mv");
    fs::write(repo_path.join(to), content).expect("Failed to rewrite file");
    stage_and_commit(repo_path, message);
}

/// All commit hashes of the current branch, oldest first
pub fn rev_list(repo_path: &Path) -> Vec<String> {
    let output = Command::new("git")
        .args(["rev-list", "--reverse", "HEAD"])
        .current_dir(repo_path)
        .output()
        .expect("Failed to run git rev-list");

    String::from_utf8(output.stdout)
        .expect("rev-list output is not utf-8")
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

fn stage_and_commit(repo_path: &Path, message: &str) {
    Command::new("git")
        .args(["add", "."])
        .current_dir(repo_path)
        .output()
        .expect("Failed to git add");
    commit(repo_path, message);
}

fn commit(repo_path: &Path, message: &str) {
    Command::new("git")
        .args(["commit", "-m", message])
        .current_dir(repo_path)
        .output()
        .expect("Failed to git commit");
}

/// Java class with a single void method holding the given body lines
pub fn java_method_body(class: &str, method: &str, lines: &[&str]) -> String {
    let body: String = lines.iter().map(|l| format!("        {l}\n")).collect();
    format!("public class {class} {{\n    public void {method}() {{\n{body}    }}\n}}\n")
}

/// Java class with two void methods `m` and `n`
pub fn java_two_methods(class: &str, first: &[&str], second: &[&str]) -> String {
    let first_body: String = first.iter().map(|l| format!("        {l}\n")).collect();
    let second_body: String = second.iter().map(|l| format!("        {l}\n")).collect();
    format!(
        "public class {class} {{\n    public void m() {{\n{first_body}    }}\n\n    public void n() {{\n{second_body}    }}\n}}\n"
    )
}
