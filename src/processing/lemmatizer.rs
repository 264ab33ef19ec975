//! Dictionary-free English lemmatizer
//!
//! Folds regular plurals and a small table of irregular or frequent verb
//! forms. Every output is a fixed point: lemmatizing a lemma returns it
//! unchanged.

/// Irregular and common resume verb forms. No value is itself a key, and no
/// value ends in a suffix the plural rules strip.
const IRREGULAR: &[(&str, &str)] = &[
    ("built", "build"),
    ("building", "build"),
    ("wrote", "write"),
    ("written", "write"),
    ("taught", "teach"),
    ("children", "child"),
    ("people", "person"),
    ("analyses", "analysis"),
    ("developed", "develop"),
    ("developing", "develop"),
    ("designed", "design"),
    ("implemented", "implement"),
    ("created", "create"),
    ("managed", "manage"),
    ("deployed", "deploy"),
    ("analyzed", "analyze"),
    ("improved", "improve"),
    ("optimized", "optimize"),
    ("automated", "automate"),
    ("maintained", "maintain"),
    ("delivered", "deliver"),
    ("integrated", "integrate"),
    ("migrated", "migrate"),
    ("reduced", "reduce"),
    ("increased", "increase"),
];

/// Endings that look plural but are part of the singular form
const SINGULAR_ENDINGS: &[&str] = &["ss", "us", "is", "os"];

#[derive(Debug, Default, Clone, Copy)]
pub struct Lemmatizer;

impl Lemmatizer {
    pub fn new() -> Self {
        Self
    }

    /// Lemma of a lowercase alphabetic word
    pub fn lemmatize(&self, word: &str) -> String {
        if let Some(lemma) = Self::irregular(word) {
            return lemma.to_string();
        }

        let folded = Self::fold_plural(word);
        match Self::irregular(&folded) {
            Some(lemma) => lemma.to_string(),
            None => folded,
        }
    }

    fn irregular(word: &str) -> Option<&'static str> {
        IRREGULAR
            .iter()
            .find(|(form, _)| *form == word)
            .map(|(_, lemma)| *lemma)
    }

    fn fold_plural(word: &str) -> String {
        let len = word.chars().count();
        if len <= 3 || !word.ends_with('s') {
            return word.to_string();
        }

        if word.ends_with("ies") && len > 4 {
            return format!("{}y", &word[..word.len() - 3]);
        }
        if word.ends_with("sses") {
            return word[..word.len() - 2].to_string();
        }
        if ["ches", "shes", "xes"].iter().any(|end| word.ends_with(end)) {
            return word[..word.len() - 2].to_string();
        }
        if SINGULAR_ENDINGS.iter().any(|end| word.ends_with(end)) {
            return word.to_string();
        }

        word[..word.len() - 1].to_string()
    }
}
