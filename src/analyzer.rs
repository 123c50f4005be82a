use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use globwalk::GlobWalkerBuilder;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::language::count_by_language;
use crate::latex::strip_markup;
use crate::{sha256_hex, FileFailure};

static CHAPTER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\chapter\s*\{([^}]+)\}").unwrap());

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("ProjectRootMissing: {0}")]
    ProjectRootMissing(String),
    #[error("WalkFailed: {0}")]
    Walk(String),
}

/// One loaded source file, keyed by its bare file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub sources: Vec<SourceFile>,
    pub failures: Vec<FileFailure>,
}

/// Load `entry_file` from the project root, then every `*.{extension}` directly
/// under `chapters_dir`, sorted by path. A name already loaded is not loaded twice.
pub fn discover_sources(project_root: &Path, entry_file: &str, chapters_dir: &str, extension: &str) -> Result<Discovery, AnalyzeError> {
    if !project_root.is_dir() {
        return Err(AnalyzeError::ProjectRootMissing(project_root.display().to_string()));
    }
    let mut discovery = Discovery::default();
    let mut seen: HashSet<String> = HashSet::new();

    let entry = project_root.join(entry_file);
    if entry.is_file() {
        load_into(&mut discovery, &mut seen, &entry, entry_file.to_string());
    }

    let data_dir = project_root.join(chapters_dir);
    if data_dir.is_dir() {
        let pattern = format!("*.{}", extension);
        let mut paths: Vec<_> = GlobWalkerBuilder::from_patterns(&data_dir, &[pattern.as_str()])
            .case_insensitive(false)
            .follow_links(false)
            .max_depth(1)
            .build()
            .map_err(|e| AnalyzeError::Walk(e.to_string()))?
            .filter_map(|e| e.ok())
            .map(|e| e.path().to_path_buf())
            .filter(|p| p.is_file())
            .collect();
        paths.sort();

        for path in paths {
            let name = path.file_name().and_then(|s| s.to_str()).unwrap_or_default().to_string();
            if seen.contains(&name) {
                continue;
            }
            load_into(&mut discovery, &mut seen, &path, name);
        }
    }

    Ok(discovery)
}

fn load_into(discovery: &mut Discovery, seen: &mut HashSet<String>, path: &Path, name: String) {
    match std::fs::read_to_string(path) {
        Ok(text) => {
            seen.insert(name.clone());
            discovery.sources.push(SourceFile { name, text });
        }
        Err(e) => discovery.failures.push(FileFailure {
            path: path.display().to_string(),
            message: e.to_string(),
        }),
    }
}

/// Title of the first `\chapter{...}`, or the file name without its extension.
pub fn derive_chapter_label(text: &str, fallback_name: &str) -> String {
    if let Some(cap) = CHAPTER_RE.captures(text) {
        return cap[1].to_string();
    }
    match fallback_name.rfind('.') {
        Some(dot) => fallback_name[..dot].to_string(),
        None => fallback_name.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRecord {
    pub chapter_name: String,
    pub file_path: String,
    pub total_words: usize,
    pub chinese_words: usize,
    pub vietnamese_words: usize,
    pub english_words: usize,
    pub language_breakdown: BTreeMap<String, usize>,
    pub sha256: String,
    #[serde(skip)]
    pub raw_content: String,
    #[serde(skip)]
    pub clean_content: String,
}

pub fn process_chapter(label: &str, text: &str, file_name: &str) -> ChapterRecord {
    let clean = strip_markup(text);
    let counts = count_by_language(&clean);
    ChapterRecord {
        chapter_name: label.to_string(),
        file_path: file_name.to_string(),
        total_words: counts.total,
        chinese_words: counts.chinese,
        vietnamese_words: counts.vietnamese,
        english_words: counts.english,
        language_breakdown: counts.breakdown(),
        sha256: sha256_hex(text.as_bytes()),
        raw_content: text.to_string(),
        clean_content: clean,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalStats {
    pub total_words: usize,
    pub chinese_words: usize,
    pub vietnamese_words: usize,
    pub english_words: usize,
    pub num_chapters: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterExtreme {
    pub name: String,
    pub words: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageDistribution {
    pub chinese_percentage: f64,
    pub vietnamese_percentage: f64,
    pub english_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub longest_chapter: ChapterExtreme,
    pub shortest_chapter: ChapterExtreme,
    pub average_words_per_chapter: f64,
    pub language_distribution: LanguageDistribution,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub timestamp: String,
    pub total_stats: TotalStats,
    pub chapters: Vec<ChapterRecord>,
    pub summary: Option<Summary>,
}

pub fn compute_totals(records: &[ChapterRecord]) -> TotalStats {
    TotalStats {
        total_words: records.iter().map(|c| c.total_words).sum(),
        chinese_words: records.iter().map(|c| c.chinese_words).sum(),
        vietnamese_words: records.iter().map(|c| c.vietnamese_words).sum(),
        english_words: records.iter().map(|c| c.english_words).sum(),
        num_chapters: records.len(),
    }
}

/// Two decimals, halves to even (0.125 -> 0.12).
fn round2(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}

/// `part` as a percentage of `whole`; 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round2(part as f64 / whole as f64 * 100.0)
}

/// Longest/shortest chapter (first encountered wins on ties), mean length and
/// language shares. `None` when there are no chapters.
pub fn summarize(records: &[ChapterRecord], totals: &TotalStats) -> Option<Summary> {
    let first = records.first()?;
    let mut longest = first;
    let mut shortest = first;
    for rec in &records[1..] {
        if rec.total_words > longest.total_words {
            longest = rec;
        }
        if rec.total_words < shortest.total_words {
            shortest = rec;
        }
    }

    Some(Summary {
        longest_chapter: ChapterExtreme { name: longest.chapter_name.clone(), words: longest.total_words },
        shortest_chapter: ChapterExtreme { name: shortest.chapter_name.clone(), words: shortest.total_words },
        average_words_per_chapter: round2(totals.total_words as f64 / records.len() as f64),
        language_distribution: LanguageDistribution {
            chinese_percentage: percentage(totals.chinese_words, totals.total_words),
            vietnamese_percentage: percentage(totals.vietnamese_words, totals.total_words),
            english_percentage: percentage(totals.english_words, totals.total_words),
        },
    })
}

/// Fold chapter records into a report stamped with the current local time.
pub fn aggregate(records: Vec<ChapterRecord>) -> AnalysisReport {
    let timestamp = chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string();
    aggregate_at(records, timestamp)
}

pub fn aggregate_at(records: Vec<ChapterRecord>, timestamp: String) -> AnalysisReport {
    let total_stats = compute_totals(&records);
    let summary = summarize(&records, &total_stats);
    AnalysisReport { timestamp, total_stats, chapters: records, summary }
}

/// Label, strip and classify every discovered source in order.
pub fn analyze_sources(sources: &[SourceFile]) -> Vec<ChapterRecord> {
    sources
        .iter()
        .map(|src| {
            let label = derive_chapter_label(&src.text, &src.name);
            process_chapter(&label, &src.text, &src.name)
        })
        .collect()
}
