//! CLI interface for the resume ranker

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-ranker")]
#[command(about = "Rank resumes against a job profile by skill match and TF-IDF similarity")]
#[command(long_about = "Score a batch of resumes (PDF, TXT, MD) against required skills and a job description, combining exact skill matching with corpus-relative TF-IDF similarity")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank resume files against required skills
    Rank {
        /// Required skills, comma separated (e.g. "python, sql, power bi")
        #[arg(short = 'k', long)]
        skills: String,

        /// Path to job description file (PDF, TXT, MD)
        #[arg(short, long, conflicts_with = "job_text")]
        job: Option<PathBuf>,

        /// Job description given inline
        #[arg(long)]
        job_text: Option<String>,

        /// Weight of the skill match score
        #[arg(long, value_parser = parse_weight)]
        skill_weight: Option<f64>,

        /// Weight of the TF-IDF similarity score
        #[arg(long, value_parser = parse_weight)]
        semantic_weight: Option<f64>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show matched and missing skills per candidate
        #[arg(short, long)]
        detailed: bool,

        /// Resume files or directories of resumes
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Rank a JSON request ({required_skills, job_description, weights, documents})
    Batch {
        /// Request file, or "-" for stdin
        #[arg(short, long, default_value = "-")]
        input: PathBuf,
    },

    /// Preview the skills detected in each document
    Skills {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Print the normalized text of a document
    Normalize {
        path: PathBuf,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Print the configuration file location
    Path,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

/// Weights must be finite and non-negative
pub fn parse_weight(value: &str) -> Result<f64, String> {
    let weight: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("Invalid weight: {}", value))?;

    if weight.is_finite() && weight >= 0.0 {
        Ok(weight)
    } else {
        Err(format!("Weight must be a non-negative number, got {}", value))
    }
}

/// Split a comma separated skill list, dropping blank entries
pub fn parse_skill_list(skills: &str) -> Vec<String> {
    skills
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
