//! CLI surface integration tests
//! Run with: cargo test --test cli_test

use std::process::Command;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_picar-bot"))
}

#[test]
fn version_prints_the_package_version() {
    let output = bin().arg("version").output().expect("binary should run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("picar-bot v"), "unexpected output: {}", stdout);
}

#[test]
fn init_config_prints_parseable_defaults() {
    let output = bin().arg("init-config").output().expect("binary should run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    // Everything up to the trailing hint is the YAML document
    let yaml = stdout.split("\nSave this").next().unwrap();
    let parsed: serde_yaml::Value = serde_yaml::from_str(yaml).expect("default config should parse");

    let sources = parsed["sources"].as_sequence().expect("sources should be a list");
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0]["command"].as_str(), Some("picar"));
    assert_eq!(sources[0]["url"].as_str(), Some("https://example.com"));
    assert_eq!(sources[0]["template"].as_str(), Some("{pict}"));
}

#[test]
fn help_lists_the_subcommands() {
    let output = bin().arg("--help").output().expect("binary should run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for subcommand in ["run", "version", "init-config"] {
        assert!(stdout.contains(subcommand), "missing {}: {}", subcommand, stdout);
    }
}
