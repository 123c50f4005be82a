use std::io::Write;
use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use thiserror::Error;

use crate::analyzer::AnalysisReport;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Locked: {0}")]
    Locked(String),
    #[error("WriteFailed: {0}")]
    WriteFailed(String),
    #[error("WorkbookFailed: {0}")]
    Workbook(String),
}

impl From<XlsxError> for ExportError {
    fn from(e: XlsxError) -> Self {
        ExportError::Workbook(e.to_string())
    }
}

/// Write `bytes` to a temp file beside `target`, then rename it into place.
fn write_atomic(target: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    let io_err = |e: std::io::Error| {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            ExportError::Locked(target.display().to_string())
        } else {
            ExportError::WriteFailed(format!("{}: {}", target.display(), e))
        }
    };
    let dir = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(io_err)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(bytes).map_err(io_err)?;
    tmp.persist(target).map_err(|e| io_err(e.error))?;
    Ok(())
}

pub fn export_json(report: &AnalysisReport, path: &Path) -> Result<(), ExportError> {
    let bytes = serde_json::to_vec_pretty(report).map_err(|e| ExportError::WriteFailed(e.to_string()))?;
    write_atomic(path, &bytes)
}

enum Cell {
    Text(String),
    Number(f64),
}

fn write_row(sheet: &mut Worksheet, row: u32, cells: &[Cell]) -> Result<(), XlsxError> {
    for (col, cell) in cells.iter().enumerate() {
        let col = col as u16;
        match cell {
            Cell::Text(s) => sheet.write_string(row, col, s.as_str())?,
            Cell::Number(n) => sheet.write_number(row, col, *n)?,
        };
    }
    Ok(())
}

fn write_header(sheet: &mut Worksheet, names: &[&str]) -> Result<(), XlsxError> {
    let cells: Vec<Cell> = names.iter().map(|n| Cell::Text(n.to_string())).collect();
    write_row(sheet, 0, &cells)
}

/// Build the three-sheet workbook (Chapters, Total_Stats, Summary) in memory.
pub fn build_workbook(report: &AnalysisReport) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Chapters")?;
    write_header(sheet, &[
        "chapter_name", "file_path", "total_words", "chinese_words",
        "vietnamese_words", "english_words", "language_breakdown", "sha256",
    ])?;
    for (i, chap) in report.chapters.iter().enumerate() {
        let breakdown = serde_json::to_string(&chap.language_breakdown).unwrap_or_default();
        write_row(sheet, i as u32 + 1, &[
            Cell::Text(chap.chapter_name.clone()),
            Cell::Text(chap.file_path.clone()),
            Cell::Number(chap.total_words as f64),
            Cell::Number(chap.chinese_words as f64),
            Cell::Number(chap.vietnamese_words as f64),
            Cell::Number(chap.english_words as f64),
            Cell::Text(breakdown),
            Cell::Text(chap.sha256.clone()),
        ])?;
    }

    let sheet = workbook.add_worksheet();
    sheet.set_name("Total_Stats")?;
    write_header(sheet, &["total_words", "chinese_words", "vietnamese_words", "english_words", "num_chapters"])?;
    let t = &report.total_stats;
    write_row(sheet, 1, &[
        Cell::Number(t.total_words as f64),
        Cell::Number(t.chinese_words as f64),
        Cell::Number(t.vietnamese_words as f64),
        Cell::Number(t.english_words as f64),
        Cell::Number(t.num_chapters as f64),
    ])?;

    let sheet = workbook.add_worksheet();
    sheet.set_name("Summary")?;
    if let Some(s) = &report.summary {
        write_header(sheet, &[
            "longest_chapter_name", "longest_chapter_words",
            "shortest_chapter_name", "shortest_chapter_words",
            "average_words_per_chapter",
            "chinese_percentage", "vietnamese_percentage", "english_percentage",
        ])?;
        write_row(sheet, 1, &[
            Cell::Text(s.longest_chapter.name.clone()),
            Cell::Number(s.longest_chapter.words as f64),
            Cell::Text(s.shortest_chapter.name.clone()),
            Cell::Number(s.shortest_chapter.words as f64),
            Cell::Number(s.average_words_per_chapter),
            Cell::Number(s.language_distribution.chinese_percentage),
            Cell::Number(s.language_distribution.vietnamese_percentage),
            Cell::Number(s.language_distribution.english_percentage),
        ])?;
    }

    Ok(workbook.save_to_buffer()?)
}

pub fn export_xlsx(report: &AnalysisReport, path: &Path) -> Result<(), ExportError> {
    let bytes = build_workbook(report)?;
    write_atomic(path, &bytes)
}

/// 1234567 -> "1,234,567"
pub fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Console rendering of the analysis report.
pub fn render_console_report(report: &AnalysisReport) -> String {
    let rule = "=".repeat(60);
    let t = &report.total_stats;
    let mut out = String::new();
    out.push_str(&format!("\n{}\nTHESIS WORD COUNT REPORT\n{}\n", rule, rule));

    out.push_str("\nOVERALL:\n");
    out.push_str(&format!("   Total words: {}\n", group_thousands(t.total_words)));
    out.push_str(&format!("   Chapters: {}\n", t.num_chapters));
    out.push_str(&format!("   - Chinese: {}\n", group_thousands(t.chinese_words)));
    out.push_str(&format!("   - Vietnamese: {}\n", group_thousands(t.vietnamese_words)));
    out.push_str(&format!("   - English: {}\n", group_thousands(t.english_words)));

    if let Some(s) = &report.summary {
        let d = &s.language_distribution;
        out.push_str("\nLANGUAGE DISTRIBUTION:\n");
        out.push_str(&format!("   - Chinese: {:.2}%\n", d.chinese_percentage));
        out.push_str(&format!("   - Vietnamese: {:.2}%\n", d.vietnamese_percentage));
        out.push_str(&format!("   - English: {:.2}%\n", d.english_percentage));
    }

    out.push_str("\nPER CHAPTER:\n");
    for chap in &report.chapters {
        out.push_str(&format!("   {}: {} words\n", chap.chapter_name, group_thousands(chap.total_words)));
    }

    if let Some(s) = &report.summary {
        out.push_str("\nDETAILS:\n");
        out.push_str(&format!("   Longest chapter: {} ({} words)\n", s.longest_chapter.name, group_thousands(s.longest_chapter.words)));
        out.push_str(&format!("   Shortest chapter: {} ({} words)\n", s.shortest_chapter.name, group_thousands(s.shortest_chapter.words)));
        out.push_str(&format!("   Average per chapter: {:.2} words\n", s.average_words_per_chapter));
    }

    out.push_str(&format!("\n{}\n", rule));
    out
}
