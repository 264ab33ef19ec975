//! Corpus-relative TF-IDF cosine similarity between a job text and documents
//!
//! The vector space is fitted on one batch (job text plus every document) and
//! thrown away afterwards. Scores from different batches are not comparable.

use crate::error::{Result, RankerError};
use crate::processing::round_to_hundredths;
use ndarray::Array2;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Vocabulary cap applied when nothing else is configured
pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// Classic English stop word list used for term weighting
const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
    "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
    "amongst", "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone",
    "anything", "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became",
    "because", "become", "becomes", "becoming", "been", "before", "beforehand", "behind",
    "being", "below", "beside", "besides", "between", "beyond", "bill", "both", "bottom",
    "but", "by", "call", "can", "cannot", "cant", "co", "con", "could", "couldnt", "cry",
    "de", "describe", "detail", "do", "done", "down", "due", "during", "each", "eg",
    "eight", "either", "eleven", "else", "elsewhere", "empty", "enough", "etc", "even",
    "ever", "every", "everyone", "everything", "everywhere", "except", "few", "fifteen",
    "fifty", "fill", "find", "fire", "first", "five", "for", "former", "formerly", "forty",
    "found", "four", "from", "front", "full", "further", "get", "give", "go", "had", "has",
    "hasnt", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein",
    "hereupon", "hers", "herself", "him", "himself", "his", "how", "however", "hundred",
    "i", "ie", "if", "in", "inc", "indeed", "interest", "into", "is", "it", "its", "itself",
    "keep", "last", "latter", "latterly", "least", "less", "ltd", "made", "many", "may",
    "me", "meanwhile", "might", "mill", "mine", "more", "moreover", "most", "mostly",
    "move", "much", "must", "my", "myself", "name", "namely", "neither", "never",
    "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
    "part", "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem",
    "seemed", "seeming", "seems", "serious", "several", "she", "should", "show", "side",
    "since", "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something",
    "sometime", "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than",
    "that", "the", "their", "them", "themselves", "then", "thence", "there", "thereafter",
    "thereby", "therefore", "therein", "thereupon", "these", "they", "thick", "thin",
    "third", "this", "those", "though", "three", "through", "throughout", "thru", "thus",
    "to", "together", "too", "top", "toward", "towards", "twelve", "twenty", "two", "un",
    "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were",
    "what", "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
    "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while", "whither",
    "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without",
    "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

/// Fitted document-term weights, one L2-normalised row per corpus entry
#[derive(Debug, Clone)]
pub struct TfidfMatrix {
    pub vocabulary: Vec<String>,
    pub weights: Array2<f64>,
}

pub struct TfidfVectorizer {
    max_features: usize,
    stop_words: HashSet<&'static str>,
}

fn token_pattern() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("Invalid token regex"))
}

impl TfidfVectorizer {
    /// `max_features == 0` leaves the vocabulary uncapped
    pub fn new(max_features: usize) -> Self {
        Self {
            max_features,
            stop_words: ENGLISH_STOP_WORDS.iter().copied().collect(),
        }
    }

    /// Lowercase tokens of two or more word characters, stop words removed
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();

        token_pattern()
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|token| !self.stop_words.contains(token))
            .map(str::to_string)
            .collect()
    }

    /// Fit the vocabulary and IDF on `corpus` and return its weight matrix
    pub fn fit_transform(&self, corpus: &[&str]) -> Result<TfidfMatrix> {
        let counts: Vec<HashMap<String, usize>> = corpus
            .iter()
            .map(|text| {
                let mut doc = HashMap::new();
                for token in self.tokenize(text) {
                    *doc.entry(token).or_insert(0) += 1;
                }
                doc
            })
            .collect();

        let mut term_freq: HashMap<&str, usize> = HashMap::new();
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for doc in &counts {
            for (term, count) in doc {
                *term_freq.entry(term.as_str()).or_insert(0) += count;
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        if term_freq.is_empty() {
            return Err(RankerError::Vectorization(
                "empty vocabulary; documents contain only stop words".to_string(),
            ));
        }

        let mut ranked: Vec<(&str, usize)> = term_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        if self.max_features > 0 {
            ranked.truncate(self.max_features);
        }

        let mut vocabulary: Vec<String> = ranked.iter().map(|(term, _)| term.to_string()).collect();
        vocabulary.sort();

        let index: HashMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(col, term)| (term.as_str(), col))
            .collect();

        let n_docs = corpus.len() as f64;
        let idf: Vec<f64> = vocabulary
            .iter()
            .map(|term| {
                let df = doc_freq.get(term.as_str()).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        let mut weights = Array2::<f64>::zeros((counts.len(), vocabulary.len()));
        for (row, doc) in counts.iter().enumerate() {
            for (term, &count) in doc {
                if let Some(&col) = index.get(term.as_str()) {
                    weights[[row, col]] = count as f64 * idf[col];
                }
            }
        }

        for mut row in weights.rows_mut() {
            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|w| w / norm);
            }
        }

        Ok(TfidfMatrix { vocabulary, weights })
    }
}

pub struct SimilarityScorer {
    vectorizer: TfidfVectorizer,
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FEATURES)
    }
}

impl SimilarityScorer {
    pub fn new(max_features: usize) -> Self {
        Self {
            vectorizer: TfidfVectorizer::new(max_features),
        }
    }

    /// Similarity of each document to the job text, 0-100 with two decimals
    pub fn try_scores(&self, job_text: &str, documents: &[&str]) -> Result<Vec<f64>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let mut corpus = Vec::with_capacity(documents.len() + 1);
        corpus.push(job_text);
        corpus.extend_from_slice(documents);

        let matrix = self.vectorizer.fit_transform(&corpus)?;
        let job = matrix.weights.row(0);

        Ok(matrix
            .weights
            .rows()
            .into_iter()
            .skip(1)
            .map(|doc| {
                let cosine = doc.dot(&job);
                if cosine.is_finite() {
                    round_to_hundredths((cosine * 100.0).clamp(0.0, 100.0))
                } else {
                    0.0
                }
            })
            .collect())
    }

    /// Like [`try_scores`](Self::try_scores) but a degenerate corpus yields
    /// zero for every document
    pub fn scores(&self, job_text: &str, documents: &[&str]) -> Vec<f64> {
        self.try_scores(job_text, documents)
            .unwrap_or_else(|_| vec![0.0; documents.len()])
    }
}
