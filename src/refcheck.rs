use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use globwalk::GlobWalkerBuilder;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::FileFailure;

static BIB_ENTRY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@\w+\{([^,]+),").unwrap());
static FOOTCITE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\footcite\{([^}]+)\}").unwrap());

#[derive(Debug, Error)]
pub enum RefCheckError {
    #[error("BibliographyUnreadable: {path}: {message}")]
    Bibliography { path: String, message: String },
    #[error("SourceRootMissing: {0}")]
    SourceRootMissing(String),
    #[error("WalkFailed: {0}")]
    Walk(String),
}

/// Keys of every `@type{key,` entry in a bibliography database.
pub fn load_keys(bibliography_text: &str) -> BTreeSet<String> {
    BIB_ENTRY_RE
        .captures_iter(bibliography_text)
        .map(|c| c[1].to_string())
        .collect()
}

/// Read the bibliography file and extract its keys. Unreadable file is fatal.
pub fn read_bibliography(path: &Path) -> Result<BTreeSet<String>, RefCheckError> {
    let raw = std::fs::read_to_string(path).map_err(|e| RefCheckError::Bibliography {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(load_keys(&raw))
}

/// Recursively collect files under `root_dir` ending in `.{extension}`, sorted.
pub fn collect_source_files(root_dir: &Path, extension: &str) -> Result<Vec<PathBuf>, RefCheckError> {
    if !root_dir.is_dir() {
        return Err(RefCheckError::SourceRootMissing(root_dir.display().to_string()));
    }
    let pattern = format!("**/*.{}", extension);
    let mut paths: Vec<PathBuf> = GlobWalkerBuilder::from_patterns(root_dir, &[pattern.as_str()])
        .case_insensitive(false)
        .follow_links(false)
        .build()
        .map_err(|e| RefCheckError::Walk(e.to_string()))?
        .filter_map(|e| e.ok())
        .map(|e| e.path().to_path_buf())
        .collect();

    paths.retain(|p| p.is_file());
    paths.sort();
    Ok(paths)
}

/// All keys cited through `\footcite{...}`; multi-key arguments are split on commas.
pub fn extract_citations(source_text: &str) -> BTreeSet<String> {
    let mut keys = BTreeSet::new();
    for cap in FOOTCITE_RE.captures_iter(source_text) {
        for key in cap[1].split(',') {
            keys.insert(key.trim().to_string());
        }
    }
    keys
}

pub fn find_missing(cited_keys: &BTreeSet<String>, defined_keys: &BTreeSet<String>) -> BTreeSet<String> {
    cited_keys.difference(defined_keys).cloned().collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Checked(PathBuf),
    Failed(FileFailure),
}

#[derive(Debug, Clone, Default)]
pub struct CitationScan {
    pub cited: BTreeSet<String>,
    /// One entry per input file, in input order.
    pub outcomes: Vec<FileOutcome>,
}

impl CitationScan {
    pub fn checked(&self) -> Vec<&PathBuf> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                FileOutcome::Checked(p) => Some(p),
                FileOutcome::Failed(_) => None,
            })
            .collect()
    }
    pub fn failures(&self) -> Vec<&FileFailure> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                FileOutcome::Failed(f) => Some(f),
                FileOutcome::Checked(_) => None,
            })
            .collect()
    }
}

/// Read every file and union its citations. A file that cannot be read is
/// recorded as `FileOutcome::Failed` and skipped.
pub fn scan_citations(files: &[PathBuf]) -> CitationScan {
    let mut scan = CitationScan::default();
    for file in files {
        let outcome = match std::fs::read_to_string(file) {
            Ok(text) => {
                scan.cited.extend(extract_citations(&text));
                FileOutcome::Checked(file.clone())
            }
            Err(e) => FileOutcome::Failed(FileFailure {
                path: file.display().to_string(),
                message: e.to_string(),
            }),
        };
        scan.outcomes.push(outcome);
    }
    scan
}

/// Human-readable listing of missing keys followed by the summary counts.
pub fn render_missing_report(cited: &BTreeSet<String>, defined: &BTreeSet<String>, missing: &BTreeSet<String>) -> String {
    let rule = "=".repeat(50);
    let mut out = String::new();
    out.push('\n');
    out.push_str(&rule);
    out.push_str("\nMISSING CITATION KEYS IN BIBLIOGRAPHY:\n");
    out.push_str(&rule);
    out.push('\n');
    if missing.is_empty() {
        out.push_str("  No missing keys found!\n");
    } else {
        for key in missing {
            out.push_str(&format!("  - {}\n", key));
        }
    }
    out.push_str(&rule);
    out.push('\n');
    out.push_str("\nSummary:\n");
    out.push_str(&format!("  - Total citation keys found in source files: {}\n", cited.len()));
    out.push_str(&format!("  - Total keys in bibliography: {}\n", defined.len()));
    out.push_str(&format!("  - Missing keys: {}\n", missing.len()));
    out
}
