//! Resume ranker library
//!
//! Ranks candidate documents against a job profile by combining exact skill
//! matching with corpus-relative TF-IDF similarity.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{RankerError, Result};
pub use processing::lexicon::{Lexicon, SkillVocabulary, SynonymRule};
pub use processing::normalizer::TextNormalizer;
pub use processing::ranker::{
    CandidateDocument, HybridRanker, RankedCandidate, RankingRequest, ScoreWeights,
};
pub use processing::similarity::SimilarityScorer;
pub use processing::skill_matcher::{MatchResult, SkillMatcher};
