pub mod analyzer;
pub mod config;
pub mod language;
pub mod latex;
pub mod refcheck;
pub mod report;

use serde::{Deserialize, Serialize};

pub use analyzer::{
    aggregate, aggregate_at, analyze_sources, compute_totals, derive_chapter_label, discover_sources, percentage,
    process_chapter, summarize, AnalysisReport, AnalyzeError, ChapterRecord, Discovery, SourceFile, Summary, TotalStats,
};
pub use config::{load_config, ConfigError, ToolConfig, CONFIG_FILE};
pub use language::{count_by_language, LanguageCounts};
pub use latex::strip_markup;
pub use refcheck::{
    collect_source_files, extract_citations, find_missing, load_keys, read_bibliography, render_missing_report,
    scan_citations, CitationScan, FileOutcome, RefCheckError,
};
pub use report::{build_workbook, export_json, export_xlsx, render_console_report, ExportError};

/// A file that could not be read; the run continues without it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub path: String,
    pub message: String,
}

/// Emit one structured progress event as a JSON line on stderr.
pub fn log_event(event: serde_json::Value) {
    eprintln!("{}", event);
}

// Utility to compute sha256 hex
pub fn sha256_hex(bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let out = hasher.finalize();
    out.iter().map(|b| format!("{:02x}", b)).collect()
}
