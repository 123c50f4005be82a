use std::collections::{BTreeMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static CHINESE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\x{4e00}-\x{9fff}]+").unwrap());
static VIETNAMESE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[àáạảãâầấậẩẫăằắặẳẵèéẹẻẽêềếệểễìíịỉĩòóọỏõôồốộổỗơờớợởỡùúụủũưừứựửữỳýỵỷỹđa-zA-Z]+\b").unwrap()
});
static ENGLISH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-zA-Z]+\b").unwrap());

/// Per-language unique-token counts for one piece of cleaned text.
///
/// The three matchers are independent, so a token such as `xin` lands in both
/// the Vietnamese and the English bucket while `total` counts it once.
/// `chinese + vietnamese + english` may therefore exceed `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageCounts {
    pub chinese: usize,
    pub vietnamese: usize,
    pub english: usize,
    pub total: usize,
}

impl LanguageCounts {
    pub fn breakdown(&self) -> BTreeMap<String, usize> {
        BTreeMap::from([
            ("chinese".to_string(), self.chinese),
            ("vietnamese".to_string(), self.vietnamese),
            ("english".to_string(), self.english),
            ("total".to_string(), self.total),
        ])
    }
}

/// Maximal runs of CJK unified ideographs.
pub fn detect_chinese(text: &str) -> Vec<&str> {
    CHINESE_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Words made of Vietnamese letters, with or without diacritics.
pub fn detect_vietnamese(text: &str) -> Vec<&str> {
    VIETNAMESE_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Words made of plain ASCII letters only.
pub fn detect_english(text: &str) -> Vec<&str> {
    ENGLISH_RE.find_iter(text).map(|m| m.as_str()).collect()
}

fn unique_non_blank(tokens: &[&str]) -> usize {
    tokens
        .iter()
        .copied()
        .collect::<HashSet<&str>>()
        .into_iter()
        .filter(|w| !w.trim().is_empty())
        .count()
}

pub fn count_by_language(text: &str) -> LanguageCounts {
    let chinese = detect_chinese(text);
    let vietnamese = detect_vietnamese(text);
    let english = detect_english(text);

    let total = chinese
        .iter()
        .chain(vietnamese.iter())
        .chain(english.iter())
        .copied()
        .collect::<HashSet<&str>>()
        .len();

    LanguageCounts {
        chinese: unique_non_blank(&chinese),
        vietnamese: unique_non_blank(&vietnamese),
        english: unique_non_blank(&english),
        total,
    }
}
