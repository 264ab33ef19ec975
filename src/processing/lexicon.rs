//! Skill vocabulary and the rule tables that drive normalization and matching
//!
//! Every table here has a built-in default so a missing configuration never
//! stops a ranking. Configuration may replace any table individually.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Character that glues a protected multi-word phrase into one token
pub const PHRASE_JOINER: char = '_';

/// Canonical skills scanned in every document when no vocabulary is configured
pub const DEFAULT_SKILLS: &[&str] = &[
    "python", "java", "c", "c++", "html", "css", "javascript", "typescript",
    "react", "node.js", "express.js", "next.js", "django", "flask", "sql", "mysql",
    "mongodb", "power bi", "excel", "tableau", "data analysis", "data visualization",
    "data cleaning", "machine learning", "deep learning", "nlp", "git", "linux",
    "docker", "aws", "communication skills", "teamwork", "problem solving",
    "pandas", "numpy", "postman", "api", "rest api", "leadership",
];

/// Abbreviations lowercased up front and kept verbatim through lemmatization
pub const DEFAULT_ACRONYMS: &[&str] = &[
    "AWS", "SNS", "SQS", "IAM", "CI", "CD", "API", "JWT",
    "REST", "SQL", "HTML", "CSS", "HTTP", "TCP", "UDP",
];

/// Multi-word canonical forms that must survive tokenization as one unit
pub const DEFAULT_PHRASES: &[&str] = &[
    "power bi", "data cleaning", "data visualization", "data analysis",
    "machine learning", "deep learning", "communication skills", "problem solving",
    "artificial intelligence", "vs code", "intellij idea", "jupyter notebook",
    "node.js", "express.js", "next.js",
];

/// Tool and library names a general lemmatizer would distort or drop.
///
/// The same list feeds the normalizer's allow-list and the matcher's
/// fallback scan so the two never drift apart.
pub const DEFAULT_TECH_KEYWORDS: &[&str] = &[
    "jest", "supertest", "axios", "vite", "tailwind", "redux", "swagger",
    "postman", "eslint", "mocha", "chai", "docker", "lambda", "sns", "sqs",
    "iam", "joi", "pandas", "kubernetes", "jenkins",
];

/// Ordered synonym rules, applied top to bottom on lowercased text.
///
/// Specific forms come before the generic rules that would otherwise swallow
/// them: the `*js` framework rules precede the bare `js` rule, and the Power BI
/// and data rules precede the bare `dashboard` rule.
pub const DEFAULT_SYNONYMS: &[(&str, &str)] = &[
    // databases
    (r"\b(?:mysql|postgresql|ms\s*sql|sql(?:\s*(?:server|database)s?)?)\b", "sql"),
    // web frameworks
    (r"\b(?:react[\s.\-]*js|react\s*(?:app|framework)s?)\b", "react"),
    (r"\b(?:node[\s.\-]*js|node\s*apps?)\b", "node.js"),
    (r"\bexpress[\s.\-]*js\b", "express.js"),
    (r"\bnext[\s.\-]*js\b", "next.js"),
    (r"(^|\s)js\b", "${1}javascript"),
    // data skills
    (r"\bpower[\s\-]*bi(?:\s*(?:dashboard|report|tool|workspace)s?)?\b", "power bi"),
    (r"\bdata\s*(?:cleaning|handling|wrangling|preprocessing|management|munging|transformation)s?\b", "data cleaning"),
    (r"\bdata\s*(?:visualization|viz|dashboard|chart|plot|reporting)s?\b", "data visualization"),
    (r"\bdashboards?\b", "data visualization"),
    (r"\b(?:data\s*(?:analytics|analysis|analyses|insights?|mining)|eda|exploratory\s*data\s*analysis)\b", "data analysis"),
    (r"\bexcel(?:\s*(?:sheet|tool|file|workbook|report)s?)?\b", "excel"),
    // ml / ai
    (r"\b(?:ml|machine\s*learning(?:\s*(?:model|project|algorithm)s?)?)\b", "machine learning"),
    (r"\b(?:dl|deep\s*learning)\b", "deep learning"),
    (r"\b(?:ai|artificial\s*intelligence)\b", "artificial intelligence"),
    // soft skills
    (r"\bteam\s*(?:collaboration|coordination|player|work)s?\b", "teamwork"),
    (r"\b(?:collaboration|coordination|cooperation)s?\b", "teamwork"),
    (r"\b(?:communication(?:\s*skills?)?|presentations?|documentation|interpersonal\s*skills?)\b", "communication skills"),
    (r"\b(?:problem[\s\-]*solving|analytical\s*thinking|critical\s*thinking)\b", "problem solving"),
    (r"\b(?:leadership|management\s*skills?|team\s*leads?)\b", "leadership"),
    // tools
    (r"\b(?:visual\s*studio\s*code|vs\s*code|vscode)\b", "vs code"),
    (r"\bintellij(?:\s*idea)?\b", "intellij idea"),
    (r"\b(?:jupyter\s*notebooks?|google\s*colab|colab)\b", "jupyter notebook"),
];

/// English stop words dropped by the normalizer
pub const NORMALIZER_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your",
    "yours", "yourself", "yourselves", "he", "him", "his", "himself", "she", "her",
    "hers", "herself", "it", "its", "itself", "they", "them", "their", "theirs",
    "themselves", "what", "which", "who", "whom", "this", "that", "these", "those",
    "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if",
    "or", "because", "as", "until", "while", "of", "at", "by", "for", "with",
    "about", "against", "between", "into", "through", "during", "before", "after",
    "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where",
    "why", "how", "all", "any", "both", "each", "few", "more", "most", "other",
    "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too",
    "very", "s", "t", "can", "will", "just", "don", "should", "now", "d", "ll", "m",
    "o", "re", "ve", "y", "ain", "aren", "couldn", "didn", "doesn", "hadn", "hasn",
    "haven", "isn", "ma", "mightn", "mustn", "needn", "shan", "shouldn", "wasn",
    "weren", "won", "wouldn",
];

/// Trim, lowercase, drop blanks and duplicates while keeping first-seen order
pub fn clean_terms<I, S>(terms: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut cleaned = Vec::new();

    for term in terms {
        let term = term.as_ref().trim().to_lowercase();
        if term.is_empty() {
            continue;
        }
        if seen.insert(term.clone()) {
            cleaned.push(term);
        }
    }

    cleaned
}

/// Ordered, de-duplicated set of canonical lowercase skill strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillVocabulary {
    skills: Vec<String>,
}

impl SkillVocabulary {
    pub fn new<I, S>(skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            skills: clean_terms(skills),
        }
    }

    pub fn builtin() -> Self {
        Self::new(DEFAULT_SKILLS.iter().copied())
    }

    /// Parse a skills list file: one skill per line, blank lines ignored
    pub fn from_lines(content: &str) -> Self {
        Self::new(content.lines())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().map(String::as_str)
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}

/// One `pattern -> canonical` rewrite; `canonical` may reference capture groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymRule {
    pub pattern: String,
    pub canonical: String,
}

impl SynonymRule {
    pub fn new(pattern: impl Into<String>, canonical: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            canonical: canonical.into(),
        }
    }
}

/// Immutable bundle of every table the normalizer and matcher consult
#[derive(Debug, Clone)]
pub struct Lexicon {
    pub vocabulary: Arc<SkillVocabulary>,
    pub acronyms: Vec<String>,
    pub synonyms: Vec<SynonymRule>,
    pub phrases: Vec<String>,
    pub tech_keywords: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Lexicon {
    pub fn builtin() -> Self {
        Self {
            vocabulary: Arc::new(SkillVocabulary::builtin()),
            acronyms: default_acronyms(),
            synonyms: default_synonyms(),
            phrases: default_phrases(),
            tech_keywords: default_tech_keywords(),
        }
    }

    /// Phrases protected during tokenization, longest first.
    ///
    /// Configured phrases plus every vocabulary skill holding a character a
    /// cleanup pass would strip (spaces, dots, `+`, `#`).
    pub fn protected_phrases(&self) -> Vec<String> {
        let from_vocabulary = self
            .vocabulary
            .iter()
            .filter(|skill| skill.chars().any(|c| !c.is_alphanumeric()));

        let mut phrases = clean_terms(
            self.phrases
                .iter()
                .map(String::as_str)
                .chain(from_vocabulary),
        );
        phrases.retain(|p| p.chars().any(|c| c.is_alphanumeric()));
        phrases.sort_by(|a, b| b.len().cmp(&a.len()));
        phrases
    }

    /// Tokens kept verbatim by the lemmatizer: tech keywords and acronyms
    pub fn preserved_tokens(&self) -> HashSet<String> {
        clean_terms(self.tech_keywords.iter().chain(self.acronyms.iter()))
            .into_iter()
            .collect()
    }
}

pub fn default_acronyms() -> Vec<String> {
    DEFAULT_ACRONYMS.iter().map(|s| s.to_string()).collect()
}

pub fn default_phrases() -> Vec<String> {
    DEFAULT_PHRASES.iter().map(|s| s.to_string()).collect()
}

pub fn default_tech_keywords() -> Vec<String> {
    DEFAULT_TECH_KEYWORDS.iter().map(|s| s.to_string()).collect()
}

pub fn default_synonyms() -> Vec<SynonymRule> {
    DEFAULT_SYNONYMS
        .iter()
        .map(|(pattern, canonical)| SynonymRule::new(*pattern, *canonical))
        .collect()
}
