//! Integration tests for the resume ranker

use resume_ranker::config::Config;
use resume_ranker::input::manager::InputManager;
use resume_ranker::processing::ranker::{CandidateDocument, HybridRanker, RankingRequest, ScoreWeights};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn skills(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
    // Bullets and line breaks are flattened
    assert!(!text.contains('•'));
    assert!(!text.contains('■'));
    assert!(!text.contains('\n'));
    assert!(!text.contains("  "));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.md");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.contains("John Doe"));
    assert!(text.contains("Software Engineer"));
    assert!(text.contains("React"));
    assert!(text.contains("Node.js"));
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_resume.txt");

    let text1 = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let text2 = manager.extract_text(path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_and_missing_files() {
    let mut manager = InputManager::new();

    assert!(manager.extract_text(Path::new("tests/fixtures/unsupported.xyz")).await.is_err());
    assert!(manager.extract_text(Path::new("tests/fixtures/nonexistent.txt")).await.is_err());

    // The lenient path never fails
    assert_eq!(manager.extract_lenient(Path::new("tests/fixtures/unsupported.xyz")).await, "");
    assert_eq!(manager.extract_lenient(Path::new("tests/fixtures/nonexistent.txt")).await, "");
}

#[tokio::test]
async fn test_malformed_pdf_is_treated_as_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.pdf");
    std::fs::write(&path, b"%PDF-1.4 this is not really a pdf").unwrap();

    let mut manager = InputManager::new();
    assert!(manager.extract_text(&path).await.is_err());
    assert_eq!(manager.extract_lenient(&path).await, "");
}

#[tokio::test]
async fn test_collect_documents_from_directory() {
    let mut manager = InputManager::new();
    let documents = manager
        .collect_documents(&[PathBuf::from("tests/fixtures")])
        .await
        .unwrap();

    let ids: Vec<&str> = documents.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["analyst_resume.txt", "job.txt", "sample_resume.md", "sample_resume.txt"]
    );
    assert!(documents.iter().all(|d| !d.text.is_empty()));
}

#[tokio::test]
async fn test_collect_documents_is_not_recursive_and_keeps_empty_files() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("b.txt"), "Python developer").unwrap();
    std::fs::write(dir.path().join("a.md"), "").unwrap();
    std::fs::write(dir.path().join("notes.docx"), "ignored").unwrap();
    std::fs::create_dir(dir.path().join("nested")).unwrap();
    std::fs::write(dir.path().join("nested").join("c.txt"), "SQL").unwrap();

    let mut manager = InputManager::new();
    let documents = manager
        .collect_documents(&[dir.path().to_path_buf()])
        .await
        .unwrap();

    assert_eq!(
        documents,
        vec![
            CandidateDocument::new("a.md", ""),
            CandidateDocument::new("b.txt", "Python developer"),
        ]
    );
}

#[tokio::test]
async fn test_collect_documents_reports_progress_per_document() {
    let mut manager = InputManager::new();
    let mut seen: Vec<(usize, usize, String)> = Vec::new();

    let documents = manager
        .collect_documents_with(
            &[
                PathBuf::from("tests/fixtures/sample_resume.txt"),
                PathBuf::from("tests/fixtures/unsupported.xyz"),
            ],
            |progress| seen.push((progress.done, progress.total, progress.id.to_string())),
        )
        .await;
    assert!(documents.is_err());
    assert!(seen.is_empty());

    let documents = manager
        .collect_documents_with(
            &[
                PathBuf::from("tests/fixtures/analyst_resume.txt"),
                PathBuf::from("tests/fixtures/sample_resume.md"),
            ],
            |progress| seen.push((progress.done, progress.total, progress.id.to_string())),
        )
        .await
        .unwrap();

    assert_eq!(documents.len(), 2);
    assert_eq!(
        seen,
        vec![
            (1, 2, "analyst_resume.txt".to_string()),
            (2, 2, "sample_resume.md".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_collect_documents_rejects_missing_path() {
    let mut manager = InputManager::new();
    let result = manager
        .collect_documents(&[PathBuf::from("tests/fixtures/does-not-exist")])
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_end_to_end_ranking_from_files() {
    let mut manager = InputManager::new();
    let documents = manager
        .collect_documents(&[
            PathBuf::from("tests/fixtures/sample_resume.txt"),
            PathBuf::from("tests/fixtures/analyst_resume.txt"),
        ])
        .await
        .unwrap();
    let job = manager.extract_text(Path::new("tests/fixtures/job.txt")).await.unwrap();

    let ranker = HybridRanker::default();
    let required = skills(&["Python", "SQL", "Power BI", "Excel", "Data Cleaning", "Machine Learning"]);
    let ranking = ranker.rank_documents(&required, &job, &documents, ScoreWeights::default());

    assert_eq!(ranking.len(), 2);

    let analyst = &ranking[0];
    assert_eq!(analyst.id, "analyst_resume.txt");
    assert_eq!(analyst.missing_skills, vec!["sql"]);
    assert_eq!(analyst.skill_score, 83.33);
    assert!(analyst.tfidf_score > 0.0);

    let engineer = &ranking[1];
    assert_eq!(engineer.id, "sample_resume.txt");
    assert_eq!(engineer.matched_skills, vec!["python", "sql"]);
    assert_eq!(engineer.skill_score, 33.33);
    assert!(analyst.tfidf_score > engineer.tfidf_score);
}

#[test]
fn test_batch_request_round_trip() {
    let request: RankingRequest = serde_json::from_str(
        r#"{
            "required_skills": ["python", "sql"],
            "job_description": "",
            "weights": {"skill": 0, "semantic": 0},
            "documents": [
                {"id": "empty", "text": ""},
                {"id": "match", "text": "Proficient in Python and SQL Server"},
                {"id": "partial", "text": "Python scripting"}
            ]
        }"#,
    )
    .unwrap();

    let ranking = HybridRanker::default().rank(&request);
    let ids: Vec<&str> = ranking.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["match", "partial", "empty"]);

    let value = serde_json::to_value(&ranking).unwrap();
    let first = value[0].as_object().unwrap();
    let mut keys: Vec<&str> = first.keys().map(String::as_str).collect();
    keys.sort();
    assert_eq!(
        keys,
        vec!["final_score", "id", "matched_skills", "missing_skills", "skill_score", "tfidf_score"]
    );
    assert_eq!(value[2]["final_score"], 0.0);
}

#[test]
fn test_configured_lexicon_drives_matching() {
    let dir = TempDir::new().unwrap();
    let skills_path = dir.path().join("skills_list.txt");
    std::fs::write(&skills_path, "rust\ntokio\npython\n").unwrap();

    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
[scoring]
skill_weight = 1.0
semantic_weight = 0.0

[lexicon]
skills_file = "{}"

[[lexicon.synonyms]]
pattern = '\brustlang\b'
canonical = "rust"
"#,
            skills_path.display()
        ),
    )
    .unwrap();

    let config = Config::load(Some(&config_path)).unwrap();
    let lexicon = config.build_lexicon().unwrap();
    let ranker = HybridRanker::new(&lexicon, config.scoring.max_features).unwrap();

    let ranking = ranker.rank_documents(
        &skills(&["rust", "tokio"]),
        "",
        &[
            CandidateDocument::new("py", "Python developer"),
            CandidateDocument::new("rs", "Async services in RustLang with Tokio"),
        ],
        config.scoring.weights(),
    );

    assert_eq!(ranking[0].id, "rs");
    assert_eq!(ranking[0].skill_score, 100.0);
    assert_eq!(ranking[0].final_score, 100.0);
    assert_eq!(ranking[1].final_score, 0.0);
}
