//! Output formatters for ranking reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::{RankingReport, ScoreBand};
use crate::processing::ranker::{JobTextSource, RankedCandidate};
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for rendering a ranking report
pub trait OutputFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String>;
}

/// Console table with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Picks the formatter for a requested output format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{} {}\n", "█".blue().bold(), title.blue().bold())
        } else {
            format!("\n█ {}\n", title)
        }
    }

    fn format_score_badge(&self, score: f64) -> String {
        let band = ScoreBand::from_score(score);
        let color = match band {
            ScoreBand::Strong => Color::Green,
            ScoreBand::Good => Color::BrightGreen,
            ScoreBand::Fair => Color::Yellow,
            ScoreBand::Weak => Color::Red,
        };

        if self.use_colors {
            format!("[{}]", band.label().color(color).bold())
        } else {
            format!("[{}]", band.label())
        }
    }

    fn format_candidate_details(&self, candidate: &RankedCandidate) -> String {
        let mut output = String::new();

        let matched = if candidate.matched_skills.is_empty() {
            "-".to_string()
        } else {
            candidate.matched_skills.join(", ")
        };
        let missing = if candidate.missing_skills.is_empty() {
            "-".to_string()
        } else {
            candidate.missing_skills.join(", ")
        };

        output.push_str(&format!("      {} {}\n", self.colorize("✓", Color::Green), matched));
        output.push_str(&format!("      {} {}\n", self.colorize("✗", Color::Red), missing));
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut output = String::new();
        let meta = &report.metadata;

        output.push_str(&self.format_header("📊 CANDIDATE RANKING"));
        output.push_str(&format!(
            "Generated: {} | Documents: {} | Processing time: {}ms\n",
            meta.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            meta.document_count,
            meta.processing_time_ms
        ));
        output.push_str(&format!(
            "Weights: skill {:.0}% / semantic {:.0}% | Compared against: {}\n",
            meta.weights.skill * 100.0,
            meta.weights.semantic * 100.0,
            job_source_label(meta.job_text_source)
        ));
        output.push_str(&format!("Required skills: {}\n", meta.required_skills.join(", ")));

        if report.candidates.is_empty() {
            output.push_str(&format!("\n{}\n", self.colorize("No documents to rank.", Color::Yellow)));
            return Ok(output);
        }

        output.push_str(&format!(
            "\n{:>4}  {:<32} {:>8} {:>8} {:>8}  {}\n",
            "#", "Document", "Final", "Skill", "TF-IDF", "Matched"
        ));
        output.push_str(&format!("{}\n", "─".repeat(80)));

        let required = meta.required_skills.len();
        for (index, candidate) in report.candidates.iter().enumerate() {
            output.push_str(&format!(
                "{:>4}  {:<32} {:>8.2} {:>8.2} {:>8.2}  {}/{} {}\n",
                index + 1,
                truncate(&candidate.id, 32),
                candidate.final_score,
                candidate.skill_score,
                candidate.tfidf_score,
                candidate.matched_skills.len(),
                required,
                self.format_score_badge(candidate.final_score)
            ));

            if self.detailed {
                output.push_str(&self.format_candidate_details(candidate));
            }
        }

        if let Some(top) = report.top_candidate() {
            output.push_str(&format!(
                "\n🏆 Top candidate: {} ({:.2})\n",
                self.colorize(&top.id, Color::Cyan),
                top.final_score
            ));
        }

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &RankingReport) -> Result<String> {
        let mut output = String::new();
        let meta = &report.metadata;

        output.push_str("# 📊 Candidate Ranking\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Documents:** {} | **Processing Time:** {}ms\n\n",
                meta.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                meta.document_count,
                meta.processing_time_ms
            ));
            output.push_str(&format!(
                "**Weights:** skill {:.1}% / semantic {:.1}% | **Compared against:** {}\n\n",
                meta.weights.skill * 100.0,
                meta.weights.semantic * 100.0,
                job_source_label(meta.job_text_source)
            ));
        }

        output.push_str(&format!(
            "**Required skills:** {}\n\n",
            meta.required_skills
                .iter()
                .map(|s| format!("`{}`", s))
                .collect::<Vec<_>>()
                .join(", ")
        ));

        output.push_str("| # | Document | Final | Skill | TF-IDF | Matched | Missing |\n");
        output.push_str("|---|----------|-------|-------|--------|---------|---------|\n");
        for (index, candidate) in report.candidates.iter().enumerate() {
            output.push_str(&format!(
                "| {} | {} | {:.2} | {:.2} | {:.2} | {} | {} |\n",
                index + 1,
                escape_cell(&candidate.id),
                candidate.final_score,
                candidate.skill_score,
                candidate.tfidf_score,
                escape_cell(&candidate.matched_skills.join(", ")),
                escape_cell(&candidate.missing_skills.join(", "))
            ));
        }

        Ok(output)
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self::with_options(true, false, true, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &RankingReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

fn job_source_label(source: JobTextSource) -> &'static str {
    match source {
        JobTextSource::Description => "job description",
        JobTextSource::RequiredSkills => "required skills",
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let kept: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
