use std::process::Command;

#[test]
fn init_creates_valid_toml() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_fileinfo"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success(), "fileinfo init failed: {}", String::from_utf8_lossy(&output.stderr));

    let config_path = dir.path().join(".fileinfo.toml");
    assert!(config_path.exists(), ".fileinfo.toml should exist");

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[churn]"));
    assert!(content.contains("[scan]"));

    let config: fileinfo_core::FileinfoConfig = toml::from_str(&content).unwrap();
    assert_eq!(config, fileinfo_core::FileinfoConfig::default());
}

#[test]
fn init_refuses_if_exists() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".fileinfo.toml"), "# existing").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_fileinfo"))
        .arg("init")
        .current_dir(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let content = std::fs::read_to_string(dir.path().join(".fileinfo.toml")).unwrap();
    assert_eq!(content, "# existing");
}

#[test]
fn no_subcommand_prints_welcome() {
    let output = Command::new(env!("CARGO_BIN_EXE_fileinfo"))
        .arg("--color")
        .arg("never")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("analyze"));
    assert!(stdout.contains("init"));
}
