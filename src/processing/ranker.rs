//! Hybrid ranking of a batch of candidate documents

use crate::error::Result;
use crate::processing::lexicon::{clean_terms, Lexicon};
use crate::processing::normalizer::TextNormalizer;
use crate::processing::round_to_hundredths;
use crate::processing::similarity::{SimilarityScorer, DEFAULT_MAX_FEATURES};
use crate::processing::skill_matcher::{MatchResult, SkillMatcher};
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub const DEFAULT_SKILL_WEIGHT: f64 = 0.6;
pub const DEFAULT_SEMANTIC_WEIGHT: f64 = 0.4;

/// One uploaded document with its extracted text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateDocument {
    pub id: String,
    pub text: String,
}

impl CandidateDocument {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Relative importance of skill matching and semantic similarity.
/// The two values need not sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub skill: f64,
    pub semantic: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            skill: DEFAULT_SKILL_WEIGHT,
            semantic: DEFAULT_SEMANTIC_WEIGHT,
        }
    }
}

impl ScoreWeights {
    pub fn new(skill: f64, semantic: f64) -> Self {
        Self { skill, semantic }
    }

    /// Scale the weights so they sum to one. Negative or non-finite weights
    /// count as zero, and an all-zero pair falls back to the defaults.
    pub fn normalized(&self) -> ScoreWeights {
        let skill = non_negative(self.skill);
        let semantic = non_negative(self.semantic);

        let largest = skill.max(semantic);
        if largest == 0.0 {
            return ScoreWeights::default();
        }

        // Scale by the larger weight first so huge pairs cannot overflow
        let (skill, semantic) = (skill / largest, semantic / largest);
        let total = skill + semantic;
        ScoreWeights {
            skill: skill / total,
            semantic: semantic / total,
        }
    }
}

fn non_negative(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}

/// A full ranking request as accepted by the batch interface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingRequest {
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub weights: ScoreWeights,
    #[serde(default)]
    pub documents: Vec<CandidateDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub id: String,
    pub skill_score: f64,
    pub tfidf_score: f64,
    pub final_score: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

/// Where the text compared against each document came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobTextSource {
    Description,
    RequiredSkills,
}

/// Text used as the similarity reference: the job description when it has
/// content, otherwise the cleaned required skills joined by spaces
pub fn job_text<S: AsRef<str>>(required_skills: &[S], job_description: &str) -> (String, JobTextSource) {
    if job_description.trim().is_empty() {
        (
            clean_terms(required_skills).join(" "),
            JobTextSource::RequiredSkills,
        )
    } else {
        (job_description.to_string(), JobTextSource::Description)
    }
}

/// Per-document intermediate state, dropped once the ranking is built
struct ScoredDocument<'a> {
    id: &'a str,
    normalized: String,
    matches: MatchResult,
}

/// Combines skill matching and batch TF-IDF similarity into one ranking.
///
/// Holds only immutable tables, so one instance can serve concurrent
/// requests. Each call fits its own vector space.
pub struct HybridRanker {
    normalizer: TextNormalizer,
    matcher: SkillMatcher,
    scorer: SimilarityScorer,
}

impl HybridRanker {
    pub fn new(lexicon: &Lexicon, max_features: usize) -> Result<Self> {
        Ok(Self {
            normalizer: TextNormalizer::new(lexicon)?,
            matcher: SkillMatcher::new(lexicon)?,
            scorer: SimilarityScorer::new(max_features),
        })
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    pub fn matcher(&self) -> &SkillMatcher {
        &self.matcher
    }

    pub fn rank(&self, request: &RankingRequest) -> Vec<RankedCandidate> {
        self.rank_documents(
            &request.required_skills,
            &request.job_description,
            &request.documents,
            request.weights,
        )
    }

    /// Score every document and sort by final score, highest first.
    /// Equal scores keep their input order.
    pub fn rank_documents<S: AsRef<str>>(
        &self,
        required_skills: &[S],
        job_description: &str,
        documents: &[CandidateDocument],
        weights: ScoreWeights,
    ) -> Vec<RankedCandidate> {
        if documents.is_empty() {
            log::info!("No documents to rank");
            return Vec::new();
        }

        let start = Instant::now();
        let weights = weights.normalized();
        log::info!(
            "Ranking {} documents (skill weight {:.2}, semantic weight {:.2})",
            documents.len(),
            weights.skill,
            weights.semantic
        );

        let scored: Vec<ScoredDocument> = documents
            .iter()
            .map(|doc| {
                let normalized = self.normalizer.normalize(&doc.text);
                let matches = self.matcher.match_skills(&normalized, required_skills);
                ScoredDocument {
                    id: &doc.id,
                    normalized,
                    matches,
                }
            })
            .collect();

        let (reference, source) = job_text(required_skills, job_description);
        log::debug!("Similarity reference taken from {:?}", source);
        let reference = self.normalizer.normalize(&reference);

        let texts: Vec<&str> = scored.iter().map(|doc| doc.normalized.as_str()).collect();
        let similarities = match self.scorer.try_scores(&reference, &texts) {
            Ok(scores) => scores,
            Err(e) => {
                log::warn!("Similarity scoring degraded to zero: {}", e);
                vec![0.0; texts.len()]
            }
        };

        let mut ranking: Vec<RankedCandidate> = scored
            .into_iter()
            .zip(similarities)
            .map(|(doc, tfidf_score)| {
                let skill_score = doc.matches.skill_score;
                let final_score =
                    round_to_hundredths(weights.skill * skill_score + weights.semantic * tfidf_score);
                log::debug!(
                    "{}: skill {:.2}, tfidf {:.2}, final {:.2}",
                    doc.id,
                    skill_score,
                    tfidf_score,
                    final_score
                );

                RankedCandidate {
                    id: doc.id.to_string(),
                    skill_score,
                    tfidf_score,
                    final_score,
                    matched_skills: doc.matches.matched,
                    missing_skills: doc.matches.missing,
                }
            })
            .collect();

        // sort_by is stable, ties keep upload order
        ranking.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));

        log::info!(
            "Ranked {} documents in {}ms",
            ranking.len(),
            start.elapsed().as_millis()
        );

        ranking
    }
}

impl Default for HybridRanker {
    fn default() -> Self {
        Self::new(&Lexicon::builtin(), DEFAULT_MAX_FEATURES)
            .expect("Built-in lexicon patterns are valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::{Arc, OnceLock};

    fn skills(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_weight_normalization() {
        let w = ScoreWeights::new(3.0, 1.0).normalized();
        assert!((w.skill - 0.75).abs() < 1e-12);
        assert!((w.semantic - 0.25).abs() < 1e-12);

        for (a, b) in [(1.0, 1.0), (0.2, 7.5), (100.0, 0.0), (0.001, 0.003)] {
            let w = ScoreWeights::new(a, b).normalized();
            assert!((w.skill + w.semantic - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_zero_weights_fall_back_to_defaults() {
        assert_eq!(ScoreWeights::new(0.0, 0.0).normalized(), ScoreWeights::new(0.6, 0.4));
        assert_eq!(ScoreWeights::new(f64::NAN, 0.0).normalized(), ScoreWeights::default());
    }

    #[test]
    fn test_negative_weight_counts_as_zero() {
        let w = ScoreWeights::new(-1.0, 2.0).normalized();
        assert_eq!(w.skill, 0.0);
        assert_eq!(w.semantic, 1.0);
    }

    #[test]
    fn test_empty_batch_yields_empty_ranking() {
        let ranker = HybridRanker::default();
        let ranking = ranker.rank_documents(&skills(&["python"]), "", &[], ScoreWeights::default());
        assert!(ranking.is_empty());
    }

    #[test]
    fn test_job_text_falls_back_to_required_skills() {
        let (text, source) = job_text(&skills(&["Python", " sql", ""]), "   ");
        assert_eq!(text, "python sql");
        assert_eq!(source, JobTextSource::RequiredSkills);

        let (text, source) = job_text(&skills(&["python"]), "Backend engineer");
        assert_eq!(text, "Backend engineer");
        assert_eq!(source, JobTextSource::Description);
    }

    #[test]
    fn test_empty_document_ranks_last() {
        let ranker = HybridRanker::default();
        let documents = vec![
            CandidateDocument::new("blank.pdf", ""),
            CandidateDocument::new("strong.pdf", "Proficient in Python and SQL Server"),
        ];

        let ranking =
            ranker.rank_documents(&skills(&["python", "sql"]), "", &documents, ScoreWeights::default());

        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].id, "strong.pdf");
        assert_eq!(ranking[0].skill_score, 100.0);
        assert!(ranking[0].tfidf_score > 0.0);

        let blank = &ranking[1];
        assert_eq!(blank.id, "blank.pdf");
        assert_eq!(blank.skill_score, 0.0);
        assert_eq!(blank.tfidf_score, 0.0);
        assert_eq!(blank.final_score, 0.0);
        assert_eq!(blank.missing_skills, vec!["python", "sql"]);
    }

    #[test]
    fn test_final_score_combines_components() {
        let ranker = HybridRanker::default();
        let documents = vec![
            CandidateDocument::new("a", "Python developer with Docker and AWS experience"),
            CandidateDocument::new("b", "Data analysis in Excel and Tableau dashboards"),
            CandidateDocument::new("c", "Machine learning with Python, Pandas and NumPy"),
        ];
        let weights = ScoreWeights::new(3.0, 1.0);

        let ranking = ranker.rank_documents(
            &skills(&["python", "excel", "machine learning"]),
            "Python engineer for machine learning pipelines",
            &documents,
            weights,
        );

        for candidate in &ranking {
            let expected = round_to_hundredths(0.75 * candidate.skill_score + 0.25 * candidate.tfidf_score);
            assert_eq!(candidate.final_score, expected);
            for score in [candidate.skill_score, candidate.tfidf_score, candidate.final_score] {
                assert!((0.0..=100.0).contains(&score));
            }
        }
        assert!(ranking.windows(2).all(|w| w[0].final_score >= w[1].final_score));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranker = HybridRanker::default();
        let documents = vec![
            CandidateDocument::new("first", "Python and SQL"),
            CandidateDocument::new("second", "Python and SQL"),
            CandidateDocument::new("third", ""),
            CandidateDocument::new("fourth", ""),
        ];

        let ranking =
            ranker.rank_documents(&skills(&["python", "sql"]), "", &documents, ScoreWeights::default());
        let order: Vec<&str> = ranking.iter().map(|c| c.id.as_str()).collect();

        assert_eq!(order, vec!["first", "second", "third", "fourth"]);
        assert_eq!(ranking[0].final_score, ranking[1].final_score);
    }

    #[test]
    fn test_rank_request_from_json() {
        let request: RankingRequest = serde_json::from_str(
            r#"{
                "required_skills": ["react"],
                "documents": [{"id": "r1", "text": "Built a ReactJS application"}]
            }"#,
        )
        .unwrap();

        assert_eq!(request.weights, ScoreWeights::default());
        let ranking = HybridRanker::default().rank(&request);
        assert_eq!(ranking[0].matched_skills, vec!["react"]);
    }

    #[test]
    fn test_concurrent_requests_share_ranker() {
        let ranker = Arc::new(HybridRanker::default());
        let expected = ranker.rank_documents(
            &skills(&["python"]),
            "",
            &[CandidateDocument::new("x", "Python scripting")],
            ScoreWeights::default(),
        );

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let ranker = Arc::clone(&ranker);
                let expected = expected.clone();
                scope.spawn(move || {
                    let ranking = ranker.rank_documents(
                        &skills(&["python"]),
                        "",
                        &[CandidateDocument::new("x", "Python scripting")],
                        ScoreWeights::default(),
                    );
                    assert_eq!(ranking, expected);
                });
            }
        });
    }

    const DOCUMENT_POOL: &[&str] = &[
        "",
        "Python and SQL",
        "Python developer",
        "SQL Server reporting in Power BI",
        "Excel dashboards and data cleaning",
        "Machine learning with Python",
        "Team leadership",
    ];

    fn shared_ranker() -> &'static HybridRanker {
        static RANKER: OnceLock<HybridRanker> = OnceLock::new();
        RANKER.get_or_init(HybridRanker::default)
    }

    fn weight() -> impl Strategy<Value = f64> {
        prop_oneof![
            Just(0.0),
            0.0..10.0f64,
            0.0..f64::MAX,
            any::<f64>(),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn test_normalized_weights_sum_to_one(skill in weight(), semantic in weight()) {
            let w = ScoreWeights::new(skill, semantic).normalized();

            prop_assert!((0.0..=1.0).contains(&w.skill));
            prop_assert!((0.0..=1.0).contains(&w.semantic));
            prop_assert!((w.skill + w.semantic - 1.0).abs() < 1e-9);

            if non_negative(skill) == 0.0 && non_negative(semantic) == 0.0 {
                prop_assert_eq!(w, ScoreWeights::default());
            }
        }

        #[test]
        fn test_ranking_is_sorted_stable_and_bounded(
            picks in prop::collection::vec(prop::sample::select(DOCUMENT_POOL), 0..12),
            skill in 0.0..5.0f64,
            semantic in 0.0..5.0f64,
        ) {
            let documents: Vec<CandidateDocument> = picks
                .iter()
                .enumerate()
                .map(|(index, text)| CandidateDocument::new(format!("doc{index}"), *text))
                .collect();

            let ranking = shared_ranker().rank_documents(
                &skills(&["python", "sql", "power bi"]),
                "",
                &documents,
                ScoreWeights::new(skill, semantic),
            );
            prop_assert_eq!(ranking.len(), documents.len());

            let position = |id: &str| documents.iter().position(|d| d.id == id);
            for pair in ranking.windows(2) {
                prop_assert!(pair[0].final_score >= pair[1].final_score);
                if pair[0].final_score == pair[1].final_score {
                    prop_assert!(position(&pair[0].id) < position(&pair[1].id));
                }
            }

            for candidate in &ranking {
                for score in [candidate.skill_score, candidate.tfidf_score, candidate.final_score] {
                    prop_assert!((0.0..=100.0).contains(&score));
                }
            }
        }
    }
}
