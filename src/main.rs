//! Resume ranker: hybrid skill-match and TF-IDF ranking of resumes

use anyhow::{bail, Context};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use resume_ranker::cli::{self, Cli, Commands, ConfigAction};
use resume_ranker::config::{Config, OutputFormat};
use resume_ranker::input::InputManager;
use resume_ranker::output::formatter::{save_report_to_file, ReportGenerator};
use resume_ranker::output::report::RankingReport;
use resume_ranker::processing::ranker::{CandidateDocument, HybridRanker, RankingRequest, ScoreWeights};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {:#}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    match command {
        Commands::Rank {
            skills,
            job,
            job_text,
            skill_weight,
            semantic_weight,
            output,
            save,
            detailed,
            paths,
        } => {
            let required = cli::parse_skill_list(&skills);
            if required.is_empty() {
                warn!("No required skills given; every skill score will be 0");
            }

            let format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(anyhow::Error::msg)?,
                None => config.output.format,
            };
            let weights = ScoreWeights::new(
                skill_weight.unwrap_or(config.scoring.skill_weight),
                semantic_weight.unwrap_or(config.scoring.semantic_weight),
            );

            let ranker = build_ranker(&config)?;
            let mut input_manager = InputManager::new();

            let job_description = match (job, job_text) {
                (Some(path), _) => {
                    cli::validate_file_extension(&path, &["pdf", "txt", "md", "markdown"])
                        .map_err(anyhow::Error::msg)
                        .with_context(|| format!("Job description file {}", path.display()))?;
                    input_manager
                        .extract_text(&path)
                        .await
                        .with_context(|| format!("Failed to read job description {}", path.display()))?
                }
                (None, Some(text)) => text,
                (None, None) => String::new(),
            };

            if format == OutputFormat::Console {
                println!("🚀 Ranking resumes");
                println!("🎯 Required skills: {}", required.join(", "));
            }
            let start = Instant::now();

            let documents = extract_documents(&mut input_manager, &paths).await?;
            if documents.is_empty() {
                warn!("No supported documents found");
            }

            let ranking = ranker.rank_documents(&required, &job_description, &documents, weights);
            let report = RankingReport::new(
                &required,
                &job_description,
                weights,
                ranking,
                start.elapsed().as_millis() as u64,
            );

            let detailed = detailed || config.output.detailed;
            let use_colors = config.output.color_output && save.is_none();
            let generator = ReportGenerator::with_options(use_colors, detailed, true, true);
            let rendered = generator.generate_report(&report, format)?;

            match save {
                Some(path) => {
                    save_report_to_file(&rendered, &path)?;
                    println!("💾 Report saved to {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Batch { input } => {
            let content = read_input(&input)?;
            let request: RankingRequest =
                serde_json::from_str(&content).context("Invalid ranking request")?;

            let ranker = build_ranker(&config)?;
            let ranking = ranker.rank(&request);
            println!("{}", serde_json::to_string_pretty(&ranking)?);
        }

        Commands::Skills { paths } => {
            let ranker = build_ranker(&config)?;
            let mut input_manager = InputManager::new();

            for document in extract_documents(&mut input_manager, &paths).await? {
                let normalized = ranker.normalizer().normalize(&document.text);
                let detected = ranker.matcher().detect_skills(&normalized);

                println!("📄 {} ({} skills)", document.id, detected.len());
                if detected.is_empty() {
                    println!("   -");
                } else {
                    println!("   {}", detected.join(", "));
                }
            }
        }

        Commands::Normalize { path } => {
            let ranker = build_ranker(&config)?;
            let mut input_manager = InputManager::new();

            let text = input_manager
                .extract_text(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            println!("{}", ranker.normalizer().normalize(&text));
        }

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);

            match action.unwrap_or(ConfigAction::Show) {
                ConfigAction::Show => {
                    let content = toml::to_string_pretty(&config)?;
                    println!("# {}\n{}", path.display(), content);
                }
                ConfigAction::Path => println!("{}", path.display()),
                ConfigAction::Reset => {
                    Config::default().save_to(&path)?;
                    println!("✅ Configuration reset: {}", path.display());
                }
            }
        }
    }

    Ok(())
}

fn build_ranker(config: &Config) -> anyhow::Result<HybridRanker> {
    let lexicon = config.build_lexicon()?;
    info!(
        "Loaded lexicon: {} skills, {} synonym rules, {} tech keywords",
        lexicon.vocabulary.len(),
        lexicon.synonyms.len(),
        lexicon.tech_keywords.len()
    );

    HybridRanker::new(&lexicon, config.scoring.max_features).context("Invalid lexicon configuration")
}

/// Extract every document under `paths` with a progress bar
async fn extract_documents(
    input_manager: &mut InputManager,
    paths: &[PathBuf],
) -> anyhow::Result<Vec<CandidateDocument>> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let documents = input_manager
        .collect_documents_with(paths, |progress| {
            pb.set_length(progress.total as u64);
            pb.set_position(progress.done as u64);
            pb.set_message(progress.id.to_string());
        })
        .await;
    pb.finish_and_clear();

    Ok(documents?)
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        return Ok(content);
    }

    if !input.exists() {
        bail!("Request file does not exist: {}", input.display());
    }
    Ok(std::fs::read_to_string(input)?)
}
