use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use thesis_tools::{
    collect_source_files, extract_citations, find_missing, load_keys, read_bibliography, render_missing_report,
    scan_citations, FileOutcome, RefCheckError,
};

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn load_keys_takes_first_field_of_every_entry() {
    let bib = "@article{smith2020, title = {A}}\n@Book{lee2019,\n  author = {B}\n}\n@misc{smith2020, note = {dup}}";
    assert_eq!(load_keys(bib), set(&["smith2020", "lee2019"]));
}

#[test]
fn load_keys_without_entries_is_empty() {
    assert!(load_keys("% just a comment\n").is_empty());
}

#[test]
fn extract_citations_splits_and_trims_multi_key_invocations() {
    let tex = r"See \footcite{a,b, c} and later \footcite{d}\footcite{ a }.";
    assert_eq!(extract_citations(tex), set(&["a", "b", "c", "d"]));
}

#[test]
fn extract_citations_keeps_empty_token_from_trailing_comma() {
    let keys = extract_citations(r"\footcite{a,}");
    assert_eq!(keys, set(&["a", ""]));

    let missing = find_missing(&keys, &set(&["a"]));
    assert_eq!(missing, set(&[""]));
}

#[test]
fn extract_citations_ignores_other_cite_commands() {
    assert!(extract_citations(r"\cite{x} \parencite{y}").is_empty());
}

#[test]
fn find_missing_is_set_difference() {
    let cited = set(&["a", "b", "c"]);
    let defined = set(&["a", "c", "z"]);
    assert_eq!(find_missing(&cited, &defined), set(&["b"]));
    assert!(find_missing(&set(&["a"]), &defined).is_empty());
}

#[test]
fn collect_source_files_walks_nested_dirs() {
    let td = tempfile::tempdir().unwrap();
    let base = td.path();
    fs::create_dir_all(base.join("data/part")).unwrap();
    fs::write(base.join("main.tex"), "x").unwrap();
    fs::write(base.join("data/part/ch1.tex"), "y").unwrap();
    fs::write(base.join("notes.txt"), "z").unwrap();

    let files = collect_source_files(base, "tex").expect("walk ok");
    let rel: Vec<PathBuf> = files.into_iter().map(|p| p.strip_prefix(base).unwrap().to_path_buf()).collect();
    assert_eq!(rel, vec![PathBuf::from("data/part/ch1.tex"), PathBuf::from("main.tex")]);
}

#[test]
fn collect_source_files_missing_root_is_error() {
    let td = tempfile::tempdir().unwrap();
    let err = collect_source_files(&td.path().join("nope"), "tex").unwrap_err();
    assert!(matches!(err, RefCheckError::SourceRootMissing(_)));
}

#[test]
fn read_bibliography_missing_file_is_error() {
    let td = tempfile::tempdir().unwrap();
    let err = read_bibliography(&td.path().join("ref/refs.bib")).unwrap_err();
    assert!(matches!(err, RefCheckError::Bibliography { .. }));
}

#[test]
fn scan_citations_skips_unreadable_files() {
    let td = tempfile::tempdir().unwrap();
    let good = td.path().join("good.tex");
    fs::write(&good, r"\footcite{k1}").unwrap();
    let gone = td.path().join("gone.tex");

    let scan = scan_citations(&[gone, good.clone()]);
    assert_eq!(scan.cited, set(&["k1"]));
    assert_eq!(scan.checked(), vec![&good]);
    assert_eq!(scan.failures().len(), 1);
    assert!(scan.failures()[0].path.ends_with("gone.tex"));
}

#[test]
fn scan_outcomes_follow_input_order() {
    let td = tempfile::tempdir().unwrap();
    let a = td.path().join("a.tex");
    let c = td.path().join("c.tex");
    fs::write(&a, r"\footcite{x}").unwrap();
    fs::write(&c, r"\footcite{y}").unwrap();
    let b = td.path().join("b.tex");

    let scan = scan_citations(&[a.clone(), b, c.clone()]);
    assert_eq!(scan.outcomes.len(), 3);
    assert_eq!(scan.outcomes[0], FileOutcome::Checked(a));
    assert!(matches!(&scan.outcomes[1], FileOutcome::Failed(f) if f.path.ends_with("b.tex")));
    assert_eq!(scan.outcomes[2], FileOutcome::Checked(c));
}

#[test]
fn missing_report_lists_keys_and_counts() {
    let cited = set(&["key1", "key2"]);
    let defined = set(&["key1"]);
    let missing = find_missing(&cited, &defined);
    let out = render_missing_report(&cited, &defined, &missing);
    assert!(out.contains("  - key2\n"));
    assert!(!out.contains("  - key1\n"));
    assert!(out.contains("Total citation keys found in source files: 2"));
    assert!(out.contains("Total keys in bibliography: 1"));
    assert!(out.contains("Missing keys: 1"));

    let none = render_missing_report(&defined, &defined, &BTreeSet::new());
    assert!(none.contains("No missing keys found!"));
}
