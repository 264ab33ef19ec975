//! Normalization, matching, similarity and ranking

pub mod lexicon;
pub mod lemmatizer;
pub mod normalizer;
pub mod skill_matcher;
pub mod similarity;
pub mod ranker;

/// Round a score to two decimal places
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
