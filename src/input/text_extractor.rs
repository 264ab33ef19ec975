//! Text extraction from various file formats

use crate::error::{Result, RankerError};
use pulldown_cmark::{html, Parser};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tokio::fs;

/// Bullet glyphs PDF layouts leave in extracted text
const BULLET_GLYPHS: &[char] = &['•', '■', '●', '▪', '◆'];

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).await?;

        // The parser is CPU bound and may panic on malformed files
        let parsed = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| {
                RankerError::PdfExtraction(format!("PDF parser aborted on '{}': {}", path.display(), e))
            })?;

        parsed.map_err(|e| {
            RankerError::PdfExtraction(format!("Failed to extract text from PDF '{}': {}", path.display(), e))
        })
    }
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        Ok(fs::read_to_string(path).await?)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(Self::markdown_to_text(&markdown_content))
    }
}

impl MarkdownExtractor {
    pub fn markdown_to_text(markdown: &str) -> String {
        let parser = Parser::new(markdown);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);

        Self::html_to_text(&html_output)
    }

    fn html_to_text(html: &str) -> String {
        static TAGS: OnceLock<Regex> = OnceLock::new();
        let tags = TAGS.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));

        let text = html
            .replace("<br />", "\n")
            .replace("</p>", "\n\n")
            .replace("</li>", "\n");
        let stripped = tags.replace_all(&text, "");

        let decoded = stripped
            .replace("&nbsp;", " ")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&amp;", "&");

        decoded
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Flatten extracted text: bullet glyphs and line breaks become spaces and
/// whitespace runs collapse to one space
pub fn clean_extracted_text(text: &str) -> String {
    text.replace(BULLET_GLYPHS, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reduce PDF text to the ASCII letters, digits and `. , - + #` that skill
/// surfaces use; everything else becomes a space. Layout glyphs, ligatures and
/// private-use symbols from PDF fonts otherwise glue onto neighbouring words.
pub fn restrict_pdf_charset(text: &str) -> String {
    static DISALLOWED: OnceLock<Regex> = OnceLock::new();
    let disallowed = DISALLOWED
        .get_or_init(|| Regex::new(r"[^A-Za-z0-9.,\-+#\s]+").expect("Invalid charset regex"));

    disallowed.replace_all(text, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_extracted_text() {
        let raw = "• Python\n■ SQL\r\n\n●  Power BI ▪ Excel◆Tableau";
        assert_eq!(
            clean_extracted_text(raw),
            "Python SQL Power BI Excel Tableau"
        );
        assert_eq!(clean_extracted_text("  \n\t "), "");
    }

    #[test]
    fn test_restrict_pdf_charset() {
        let raw = "C++ & C# | Node.js, ﬁnance\u{f0b7}SQL (José) 5+ yrs";
        assert_eq!(
            clean_extracted_text(&restrict_pdf_charset(raw)),
            "C++ C# Node.js, nance SQL Jos 5+ yrs"
        );
        assert_eq!(restrict_pdf_charset("plain text"), "plain text");
    }

    #[test]
    fn test_markdown_to_text_strips_formatting() {
        let text = MarkdownExtractor::markdown_to_text(
            "## Skills\n\n- **Rust** &amp; C++\n- `Docker`\n\nSee [site](https://x.dev).",
        );

        assert!(text.contains("Skills"));
        assert!(text.contains("Rust & C++"));
        assert!(text.contains("Docker"));
        assert!(text.contains("See site."));
        assert!(!text.contains("**"));
        assert!(!text.contains('<'));
    }
}
