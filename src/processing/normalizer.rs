//! Canonicalization of extracted document text
//!
//! Raw text goes through six ordered steps: acronym protection, synonym
//! rewriting, phrase protection, character cleanup, token filtering with
//! lemmatization, and phrase restoration with glue repair. Each later step
//! relies on the output shape of the earlier ones, so the order is fixed.

use crate::error::Result;
use crate::processing::lemmatizer::Lemmatizer;
use crate::processing::lexicon::{Lexicon, NORMALIZER_STOP_WORDS, PHRASE_JOINER};
use regex::{Captures, NoExpand, Regex};
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Upper bound on re-normalization rounds when settling on a fixed point
const MAX_PASSES: usize = 4;

struct CompiledRule {
    pattern: Regex,
    canonical: String,
}

struct ProtectedPhrase {
    pattern: Regex,
    key: String,
    phrase: String,
}

pub struct TextNormalizer {
    acronyms: Option<Regex>,
    synonyms: Vec<CompiledRule>,
    phrases: Vec<ProtectedPhrase>,
    preserved: HashSet<String>,
    stop_words: HashSet<&'static str>,
    lemmatizer: Lemmatizer,
}

impl TextNormalizer {
    pub fn new(lexicon: &Lexicon) -> Result<Self> {
        let acronyms = if lexicon.acronyms.is_empty() {
            None
        } else {
            let alternatives: Vec<String> = lexicon
                .acronyms
                .iter()
                .map(|a| regex::escape(a.trim()))
                .filter(|a| !a.is_empty())
                .collect();
            Some(Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives.join("|")))?)
        };

        let synonyms = lexicon
            .synonyms
            .iter()
            .map(|rule| {
                Ok(CompiledRule {
                    pattern: Regex::new(&rule.pattern)?,
                    canonical: rule.canonical.to_lowercase(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let phrases = lexicon
            .protected_phrases()
            .into_iter()
            .map(|phrase| {
                Ok(ProtectedPhrase {
                    pattern: Self::phrase_pattern(&phrase)?,
                    key: Self::phrase_key(&phrase),
                    phrase,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            acronyms,
            synonyms,
            phrases,
            preserved: lexicon.preserved_tokens(),
            stop_words: NORMALIZER_STOP_WORDS.iter().copied().collect(),
            lemmatizer: Lemmatizer::new(),
        })
    }

    /// Normalize text into a canonical lowercase token string.
    ///
    /// Dropping stop words can bring two words together that a synonym rule
    /// recognises on a second pass, so passes repeat until the output stops
    /// changing. The result is therefore idempotent.
    pub fn normalize(&self, text: &str) -> String {
        let mut current = self.normalize_once(text);

        for _ in 1..MAX_PASSES {
            let next = self.normalize_once(&current);
            if next == current {
                break;
            }
            current = next;
        }

        current
    }

    /// A single pass of the six-step pipeline
    pub fn normalize_once(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }

        let text = self.protect_acronyms(text);
        let text = self.apply_synonyms(&text);
        let text = self.protect_phrases(&text);
        let text = Self::cleanup(&text);
        let tokens = self.filter_tokens(&text);
        self.restore_phrases(&tokens)
    }

    /// Step 1: lowercase known acronyms as whole words
    pub fn protect_acronyms(&self, text: &str) -> String {
        match &self.acronyms {
            Some(pattern) => pattern
                .replace_all(text, |caps: &Captures| caps[0].to_lowercase())
                .into_owned(),
            None => text.to_string(),
        }
    }

    /// Step 2: lowercase and apply synonym rules in table order
    pub fn apply_synonyms(&self, text: &str) -> String {
        // The joiner is reserved for protected phrases
        let mut text = text.to_lowercase().replace(PHRASE_JOINER, " ");

        for rule in &self.synonyms {
            text = rule
                .pattern
                .replace_all(&text, rule.canonical.as_str())
                .into_owned();
        }

        collapse_whitespace(&text)
    }

    /// Step 3: glue each known multi-word phrase into a single token
    pub fn protect_phrases(&self, text: &str) -> String {
        let mut text = text.to_string();

        for phrase in &self.phrases {
            text = phrase
                .pattern
                .replace_all(&text, NoExpand(&phrase.key))
                .into_owned();
        }

        text
    }

    /// Step 4: keep letters, digits, the joiner and whitespace
    pub fn cleanup(text: &str) -> String {
        let kept: String = text
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == PHRASE_JOINER || c.is_whitespace() {
                    c
                } else {
                    ' '
                }
            })
            .collect();

        collapse_whitespace(&kept)
    }

    /// Step 5: tokenize, drop stop words and non-alphabetic tokens, lemmatize.
    /// Protected phrase tokens pass through untouched.
    pub fn filter_tokens(&self, text: &str) -> Vec<String> {
        text.unicode_words()
            .filter_map(|word| {
                if word.contains(PHRASE_JOINER) {
                    Some(word.to_lowercase())
                } else {
                    self.filter_word(word)
                }
            })
            .collect()
    }

    /// Step 6: expand protected tokens back to their phrase and split off any
    /// word that extraction glued onto the end of a phrase
    pub fn restore_phrases(&self, tokens: &[String]) -> String {
        let mut restored = Vec::with_capacity(tokens.len());

        for token in tokens {
            if !token.contains(PHRASE_JOINER) {
                restored.push(token.clone());
                continue;
            }

            let tail = match self.phrases.iter().find(|p| token.starts_with(&p.key)) {
                Some(phrase) => {
                    restored.push(phrase.phrase.clone());
                    &token[phrase.key.len()..]
                }
                None => token.as_str(),
            };

            restored.extend(
                tail.split(PHRASE_JOINER)
                    .filter(|word| !word.is_empty())
                    .filter_map(|word| self.filter_word(word)),
            );
        }

        restored.join(" ")
    }

    fn filter_word(&self, word: &str) -> Option<String> {
        let word = word.to_lowercase();

        if self.preserved.contains(&word) {
            return Some(word);
        }
        if self.stop_words.contains(word.as_str()) || !word.chars().all(char::is_alphabetic) {
            return None;
        }

        let lemma = self.lemmatizer.lemmatize(&word);
        if self.stop_words.contains(lemma.as_str()) {
            None
        } else {
            Some(lemma)
        }
    }

    fn phrase_pattern(phrase: &str) -> Result<Regex> {
        let body: Vec<String> = phrase.split_whitespace().map(regex::escape).collect();
        let boundary = match phrase.chars().next() {
            Some(c) if c.is_alphanumeric() => r"\b",
            _ => "",
        };
        Ok(Regex::new(&format!("{}{}", boundary, body.join(r"\s+")))?)
    }

    fn phrase_key(phrase: &str) -> String {
        phrase
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { PHRASE_JOINER })
            .collect()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(&Lexicon::builtin()).expect("Built-in lexicon patterns are valid")
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
