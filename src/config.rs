//! Configuration management for the resume ranker

use crate::error::{Result, RankerError};
use crate::processing::lexicon::{
    default_acronyms, default_phrases, default_synonyms, default_tech_keywords, Lexicon,
    SkillVocabulary, SynonymRule,
};
use crate::processing::ranker::{ScoreWeights, DEFAULT_SEMANTIC_WEIGHT, DEFAULT_SKILL_WEIGHT};
use crate::processing::similarity::DEFAULT_MAX_FEATURES;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub lexicon: LexiconConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub skill_weight: f64,
    pub semantic_weight: f64,
    /// Vocabulary cap for TF-IDF, 0 for no cap
    pub max_features: usize,
}

/// Overrides for the built-in lexicon tables. Each absent table keeps its
/// built-in default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexiconConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    /// Skill list file, one skill per line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acronyms: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phrases: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_keywords: Option<Vec<String>>,
    /// Applied in the order written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synonyms: Option<Vec<SynonymRule>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            skill_weight: DEFAULT_SKILL_WEIGHT,
            semantic_weight: DEFAULT_SEMANTIC_WEIGHT,
            max_features: DEFAULT_MAX_FEATURES,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl ScoringConfig {
    pub fn weights(&self) -> ScoreWeights {
        ScoreWeights::new(self.skill_weight, self.semantic_weight)
    }
}

impl LexiconConfig {
    /// Assemble the immutable lexicon shared by every ranking request.
    ///
    /// An unreadable or empty skill source falls back to the built-in
    /// vocabulary with a warning.
    pub fn build(&self) -> Result<Lexicon> {
        let mut skills: Vec<String> = self.skills.clone().unwrap_or_default();

        if let Some(path) = &self.skills_file {
            match std::fs::read_to_string(path) {
                Ok(content) => {
                    skills.extend(SkillVocabulary::from_lines(&content).iter().map(str::to_string))
                }
                Err(e) => log::warn!(
                    "Could not read skills file {}: {}",
                    path.display(),
                    e
                ),
            }
        }

        let mut vocabulary = SkillVocabulary::new(&skills);
        if vocabulary.is_empty() {
            if self.skills.is_some() || self.skills_file.is_some() {
                log::warn!("Configured skill vocabulary is empty, using built-in skills");
            }
            vocabulary = SkillVocabulary::builtin();
        }

        Ok(Lexicon {
            vocabulary: Arc::new(vocabulary),
            acronyms: self.acronyms.clone().unwrap_or_else(default_acronyms),
            synonyms: self.synonyms.clone().unwrap_or_else(default_synonyms),
            phrases: self.phrases.clone().unwrap_or_else(default_phrases),
            tech_keywords: self.tech_keywords.clone().unwrap_or_else(default_tech_keywords),
        })
    }
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file yields the defaults. At the default location the
    /// defaults are also written out for later editing.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (config_path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::config_path(), false),
        };

        if config_path.exists() {
            return Self::from_file(&config_path);
        }

        let config = Self::default();
        if explicit {
            log::warn!(
                "Config file {} not found, using defaults",
                config_path.display()
            );
        } else if let Err(e) = config.save_to(&config_path) {
            log::warn!("Could not write default config: {}", e);
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| RankerError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("skill_weight", self.scoring.skill_weight),
            ("semantic_weight", self.scoring.semantic_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RankerError::Configuration(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| RankerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-ranker")
            .join("config.toml")
    }

    pub fn build_lexicon(&self) -> Result<Lexicon> {
        self.lexicon.build()
    }
}
