use std::path::Path;
use std::process::Command;

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(["-c", "commit.gpgsign=false", "-c", "init.defaultBranch=main"])
        .args(args)
        .current_dir(dir)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
        .env("GIT_AUTHOR_DATE", "2024-01-01T00:00:00+00:00")
        .env("GIT_COMMITTER_DATE", "2024-01-01T00:00:00+00:00")
        .status()
        .unwrap();
    assert!(status.success(), "git {args:?} failed");
}

fn one_commit_repo() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    git(dir.path(), &["init", "-q"]);
    std::fs::write(dir.path().join("a.txt"), "1\n2\n3\n").unwrap();
    git(dir.path(), &["add", "-A"]);
    git(dir.path(), &["commit", "-q", "-m", "C1"]);
    dir
}

#[test]
fn analyze_json_reports_one_finding_per_file() {
    let repo = one_commit_repo();

    let output = Command::new(env!("CARGO_BIN_EXE_fileinfo"))
        .args(["--format", "json", "analyze", "--path"])
        .arg(repo.path())
        .output()
        .unwrap();

    assert!(output.status.success(), "fileinfo analyze failed: {}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["numberOfCommits"], 1);
    assert_eq!(json["window"]["kind"], "count");

    let issues = json["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["id"], "metrics_fileinfo");
    assert_eq!(issues[0]["path"], "a.txt");
    assert_eq!(issues[0]["object"]["linesOfCode"], 3);
    assert_eq!(issues[0]["object"]["lastCommittedAt"], "2024-01-01T00:00:00+00:00");
    assert_eq!(issues[0]["object"]["additions"], 3);
}

#[test]
fn analyze_text_prints_table() {
    let repo = one_commit_repo();

    let output = Command::new(env!("CARGO_BIN_EXE_fileinfo"))
        .args(["analyze", "--path"])
        .arg(repo.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("PATH"));
    assert!(stdout.contains("a.txt"));
    assert!(stdout.contains("1 files, 1 commits in churn window"));
}

#[test]
fn analyze_rejects_plain_directory() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_fileinfo"))
        .args(["analyze", "--path"])
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
}

#[test]
fn analyze_rejects_zero_window_in_config() {
    let repo = one_commit_repo();
    let config = repo.path().join("custom.toml");
    std::fs::write(&config, "[churn]\nwindow_commits = 0\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_fileinfo"))
        .arg("--config")
        .arg(&config)
        .args(["analyze", "--path"])
        .arg(repo.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
}
