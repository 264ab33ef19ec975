//! Skill detection in normalized documents
//!
//! A vocabulary skill is found when its flexible surface pattern matches the
//! normalized text, or when its punctuation-free form is contained in the
//! punctuation-free text. Fallback tech keywords are scanned directly.

use crate::error::{Result, RankerError};
use crate::processing::lexicon::{clean_terms, Lexicon, SkillVocabulary};
use crate::processing::round_to_hundredths;
use aho_corasick::AhoCorasick;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

/// Required skills found and not found in one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    /// Percentage of required skills matched, 0-100 with two decimals
    pub skill_score: f64,
}

struct SkillPattern {
    skill: String,
    pattern: Regex,
    compact: String,
}

pub struct SkillMatcher {
    vocabulary: Arc<SkillVocabulary>,
    patterns: Vec<SkillPattern>,
    keywords: Vec<String>,
    keyword_scanner: Option<AhoCorasick>,
}

impl SkillMatcher {
    pub fn new(lexicon: &Lexicon) -> Result<Self> {
        let patterns = lexicon
            .vocabulary
            .iter()
            .map(|skill| {
                Ok(SkillPattern {
                    skill: skill.to_string(),
                    pattern: skill_pattern(skill)?,
                    compact: compact(skill),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut keywords = clean_terms(&lexicon.tech_keywords);
        keywords.retain(|k| !compact(k).is_empty());

        // Pattern 2i is the keyword as written, 2i + 1 its compact form
        let keyword_scanner = if keywords.is_empty() {
            None
        } else {
            let surfaces = keywords.iter().flat_map(|k| [k.clone(), compact(k)]);
            let scanner = AhoCorasick::new(surfaces).map_err(|e| {
                RankerError::Configuration(format!("Failed to build keyword scanner: {}", e))
            })?;
            Some(scanner)
        };

        Ok(Self {
            vocabulary: Arc::clone(&lexicon.vocabulary),
            patterns,
            keywords,
            keyword_scanner,
        })
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }

    /// Partition the required skills into matched and missing for one document
    pub fn match_skills<S: AsRef<str>>(&self, normalized: &str, required: &[S]) -> MatchResult {
        let required = clean_terms(required);
        let found = self.found_skills(normalized);

        let (matched, missing): (Vec<String>, Vec<String>) =
            required.iter().cloned().partition(|skill| found.contains(skill));

        let skill_score = if required.is_empty() {
            0.0
        } else {
            round_to_hundredths(100.0 * matched.len() as f64 / required.len() as f64)
        };

        MatchResult {
            matched,
            missing,
            skill_score,
        }
    }

    /// Every vocabulary skill and fallback keyword present, sorted
    pub fn detect_skills(&self, normalized: &str) -> Vec<String> {
        self.found_skills(normalized)
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn found_skills(&self, normalized: &str) -> HashSet<String> {
        let lowered = normalized.to_lowercase();
        let compact_text = compact(&lowered);
        let mut found = HashSet::new();

        for entry in &self.patterns {
            if entry.pattern.is_match(&lowered)
                || (!entry.compact.is_empty() && compact_text.contains(&entry.compact))
            {
                found.insert(entry.skill.clone());
            }
        }

        if let Some(scanner) = &self.keyword_scanner {
            for haystack in [lowered.as_str(), compact_text.as_str()] {
                for hit in scanner.find_overlapping_iter(haystack) {
                    found.insert(self.keywords[hit.pattern().as_usize() / 2].clone());
                }
            }
        }

        found
    }
}

impl Default for SkillMatcher {
    fn default() -> Self {
        Self::new(&Lexicon::builtin()).expect("Built-in vocabulary patterns are valid")
    }
}

/// Flexible surface pattern for one skill: words may be separated by
/// whitespace, hyphens or slashes, and a plural `s` may follow
pub fn skill_pattern(skill: &str) -> Result<Regex> {
    let words: Vec<String> = skill.split_whitespace().map(regex::escape).collect();
    let lead = match skill.chars().next() {
        Some(c) if c.is_alphanumeric() => r"\b",
        _ => "",
    };
    let tail = match skill.chars().last() {
        Some(c) if c.is_alphanumeric() => r"s?\b",
        _ => "",
    };

    Ok(Regex::new(&format!(
        "(?i){}{}{}",
        lead,
        words.join(r"[\s\-/]*"),
        tail
    ))?)
}

/// Lowercase text with everything but letters and digits removed
pub fn compact(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}
