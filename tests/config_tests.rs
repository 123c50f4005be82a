use std::fs;

use thesis_tools::{load_config, ConfigError, ToolConfig};

#[test]
fn missing_file_yields_defaults() {
    let td = tempfile::tempdir().unwrap();
    let cfg = load_config(&td.path().join("thesis-tools.yaml")).expect("defaults");
    assert_eq!(cfg, ToolConfig::default());
    assert_eq!(cfg.entry_file, "main.tex");
    assert_eq!(cfg.chapters_dir, "data");
    assert_eq!(cfg.bibliography, "ref/refs.bib");
    assert_eq!(cfg.json_report, "word_count_report.json");
    assert_eq!(cfg.xlsx_report, "word_count_report.xlsx");
}

#[test]
fn partial_file_overrides_only_given_fields() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("thesis-tools.yaml");
    fs::write(&path, "chapters_dir: chapters\nsource_extension: .tex\n").unwrap();
    let cfg = load_config(&path).unwrap();
    assert_eq!(cfg.chapters_dir, "chapters");
    assert_eq!(cfg.extension(), "tex");
    assert_eq!(cfg.entry_file, "main.tex");
}

#[test]
fn empty_file_yields_defaults() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("thesis-tools.yaml");
    fs::write(&path, "\n").unwrap();
    assert_eq!(load_config(&path).unwrap(), ToolConfig::default());
}

#[test]
fn malformed_yaml_is_parse_error() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("thesis-tools.yaml");
    fs::write(&path, "chapters_dir: [unclosed\n").unwrap();
    assert!(matches!(load_config(&path).unwrap_err(), ConfigError::Parse { .. }));
}

#[test]
fn blank_extension_is_invalid() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("thesis-tools.yaml");
    fs::write(&path, "source_extension: \"  \"\n").unwrap();
    assert!(matches!(load_config(&path).unwrap_err(), ConfigError::Invalid(_)));
}

#[test]
fn lone_dot_extension_is_invalid() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("thesis-tools.yaml");
    fs::write(&path, "source_extension: \".\"\n").unwrap();
    assert!(matches!(load_config(&path).unwrap_err(), ConfigError::Invalid(_)));
}
