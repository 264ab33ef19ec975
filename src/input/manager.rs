//! Input manager for handling different file types

use crate::error::{Result, RankerError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    clean_extracted_text, restrict_pdf_charset, MarkdownExtractor, PdfExtractor, PlainTextExtractor,
    TextExtractor,
};
use crate::processing::ranker::CandidateDocument;
use log::{info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Progress of a [`InputManager::collect_documents_with`] run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectProgress<'a> {
    pub done: usize,
    pub total: usize,
    pub id: &'a str,
}

pub struct InputManager {
    cache: HashMap<PathBuf, String>,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
        }
    }

    /// Extract and flatten the text of one supported file
    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        if let Some(cached_text) = self.cache.get(path) {
            info!("Using cached text for: {}", path.display());
            return Ok(cached_text.clone());
        }

        if !path.exists() {
            return Err(RankerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let raw = match FileType::from_path(path) {
            FileType::Pdf => {
                info!("Extracting text from PDF: {}", path.display());
                restrict_pdf_charset(&PdfExtractor.extract(path).await?)
            }
            FileType::Text => {
                info!("Reading plain text file: {}", path.display());
                PlainTextExtractor.extract(path).await?
            }
            FileType::Markdown => {
                info!("Processing markdown file: {}", path.display());
                MarkdownExtractor.extract(path).await?
            }
            FileType::Unknown => {
                return Err(RankerError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            }
        };

        let text = clean_extracted_text(&raw);

        self.cache.insert(path.to_path_buf(), text.clone());

        Ok(text)
    }

    /// Like [`extract_text`](Self::extract_text) but never fails: any problem
    /// is logged and the document is treated as empty
    pub async fn extract_lenient(&mut self, path: &Path) -> String {
        match self.extract_text(path).await {
            Ok(text) => {
                if text.is_empty() {
                    warn!("No text extracted from {}", path.display());
                }
                text
            }
            Err(e) => {
                warn!("Treating {} as empty: {}", path.display(), e);
                String::new()
            }
        }
    }

    /// Resolve the files to rank: directories contribute their supported
    /// files (non-recursive, sorted by name), files are taken as given
    pub fn expand_paths(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for path in paths {
            if path.is_dir() {
                let mut entries: Vec<PathBuf> = std::fs::read_dir(path)?
                    .filter_map(|entry| entry.ok().map(|e| e.path()))
                    .filter(|p| p.is_file() && FileType::from_path(p).is_supported())
                    .collect();
                entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
                info!("Found {} documents in {}", entries.len(), path.display());
                files.extend(entries);
            } else if !path.exists() {
                return Err(RankerError::InvalidInput(format!(
                    "Path does not exist: {}",
                    path.display()
                )));
            } else if !FileType::from_path(path).is_supported() {
                return Err(RankerError::UnsupportedFormat(format!(
                    "Unsupported file type for: {}",
                    path.display()
                )));
            } else {
                files.push(path.clone());
            }
        }

        Ok(files)
    }

    /// Extract every document under `paths` in upload order
    pub async fn collect_documents(&mut self, paths: &[PathBuf]) -> Result<Vec<CandidateDocument>> {
        self.collect_documents_with(paths, |_| {}).await
    }

    /// Same as [`collect_documents`](Self::collect_documents), reporting each
    /// extracted document to `on_progress`
    pub async fn collect_documents_with<F>(
        &mut self,
        paths: &[PathBuf],
        mut on_progress: F,
    ) -> Result<Vec<CandidateDocument>>
    where
        F: FnMut(CollectProgress<'_>),
    {
        let files = self.expand_paths(paths)?;
        let total = files.len();
        let mut documents = Vec::with_capacity(total);

        for (index, file) in files.iter().enumerate() {
            let id = document_id(file);
            let text = self.extract_lenient(file).await;
            on_progress(CollectProgress {
                done: index + 1,
                total,
                id: &id,
            });
            documents.push(CandidateDocument::new(id, text));
        }

        info!("Extracted {} documents", documents.len());
        Ok(documents)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

/// Identifier shown for a document: its file name
pub fn document_id(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
