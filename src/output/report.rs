//! Ranking report handed to the output formatters

use crate::processing::lexicon::clean_terms;
use crate::processing::ranker::{job_text, JobTextSource, RankedCandidate, ScoreWeights};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingReport {
    pub metadata: ReportMetadata,
    /// Candidates, best first
    pub candidates: Vec<RankedCandidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub ranker_version: String,
    pub document_count: usize,
    /// Required skills after trimming, lowercasing and de-duplication
    pub required_skills: Vec<String>,
    /// Weights actually applied, summing to one
    pub weights: ScoreWeights,
    pub job_text_source: JobTextSource,
    pub processing_time_ms: u64,
}

/// Coarse quality band for a 0-100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Strong,
    Good,
    Fair,
    Weak,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 75.0 => ScoreBand::Strong,
            s if s >= 50.0 => ScoreBand::Good,
            s if s >= 25.0 => ScoreBand::Fair,
            _ => ScoreBand::Weak,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Strong => "STRONG",
            ScoreBand::Good => "GOOD",
            ScoreBand::Fair => "FAIR",
            ScoreBand::Weak => "WEAK",
        }
    }
}

impl RankingReport {
    pub fn new<S: AsRef<str>>(
        required_skills: &[S],
        job_description: &str,
        weights: ScoreWeights,
        candidates: Vec<RankedCandidate>,
        processing_time_ms: u64,
    ) -> Self {
        let (_, job_text_source) = job_text(required_skills, job_description);

        Self {
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                ranker_version: env!("CARGO_PKG_VERSION").to_string(),
                document_count: candidates.len(),
                required_skills: clean_terms(required_skills),
                weights: weights.normalized(),
                job_text_source,
                processing_time_ms,
            },
            candidates,
        }
    }

    pub fn top_candidate(&self) -> Option<&RankedCandidate> {
        self.candidates.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_reflects_request() {
        let report = RankingReport::new(
            &["Python", "python", " SQL "],
            "",
            ScoreWeights::new(1.0, 1.0),
            Vec::new(),
            12,
        );

        assert_eq!(report.metadata.required_skills, vec!["python", "sql"]);
        assert_eq!(report.metadata.weights, ScoreWeights::new(0.5, 0.5));
        assert_eq!(report.metadata.job_text_source, JobTextSource::RequiredSkills);
        assert_eq!(report.metadata.document_count, 0);
        assert!(report.top_candidate().is_none());
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::from_score(100.0), ScoreBand::Strong);
        assert_eq!(ScoreBand::from_score(50.0), ScoreBand::Good);
        assert_eq!(ScoreBand::from_score(49.99), ScoreBand::Fair);
        assert_eq!(ScoreBand::from_score(0.0), ScoreBand::Weak);
    }
}
