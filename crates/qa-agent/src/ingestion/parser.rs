//! Format-specific text extraction

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::types::{Document, FileType};

use super::html::summarize_html;

/// Extracts plain text from raw upload bytes; the second argument is the filename
pub type Extractor = fn(&[u8], &str) -> Result<String>;

/// Dispatches uploads to the extractor for their format
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentProcessor;

impl DocumentProcessor {
    /// Create a new processor
    pub fn new() -> Self {
        Self
    }

    /// Extractor for a file type, `None` for unsupported types
    pub fn extractor_for(file_type: FileType) -> Option<Extractor> {
        let extractor: Extractor = match file_type {
            FileType::Markdown | FileType::Txt => extract_text,
            FileType::Json => extract_json,
            FileType::Pdf => extract_pdf,
            FileType::Html => extract_html,
            FileType::Docx => extract_docx,
            FileType::Unknown => return None,
        };
        Some(extractor)
    }

    /// Extract the text of an upload into a [`Document`]
    pub fn process(&self, filename: &str, data: &[u8]) -> Result<Document> {
        let file_type = FileType::from_filename(filename);
        let extractor = Self::extractor_for(file_type).ok_or_else(|| {
            let ext = std::path::Path::new(filename)
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| format!(".{}", e))
                .unwrap_or_else(|| filename.to_string());
            Error::UnsupportedFileType(ext)
        })?;

        let content = extractor(data, filename)?;
        tracing::debug!(
            "Extracted {} characters from '{}' ({})",
            content.chars().count(),
            filename,
            file_type.tag()
        );

        Ok(Document::new(
            filename.to_string(),
            file_type,
            content,
            hash_content(data),
            data.len() as u64,
        ))
    }
}

/// UTF-8 decode; invalid byte sequences are dropped
pub fn decode_text(data: &[u8]) -> String {
    match std::str::from_utf8(data) {
        Ok(text) => text.to_string(),
        Err(_) => String::from_utf8_lossy(data).replace(char::REPLACEMENT_CHARACTER, ""),
    }
}

fn extract_text(data: &[u8], _filename: &str) -> Result<String> {
    Ok(decode_text(data))
}

/// Render JSON as indented `key: value` text; invalid JSON falls back to the raw text
fn extract_json(data: &[u8], filename: &str) -> Result<String> {
    match serde_json::from_slice::<serde_json::Value>(data) {
        Ok(value) => Ok(json_to_text(&value, 0)),
        Err(e) => {
            tracing::debug!("'{}' is not valid JSON ({}), indexing raw text", filename, e);
            Ok(decode_text(data))
        }
    }
}

fn json_to_text(value: &serde_json::Value, indent: usize) -> String {
    use serde_json::Value;

    let prefix = "  ".repeat(indent);
    let mut lines = Vec::new();

    match value {
        Value::Object(map) => {
            for (key, value) in map {
                match value {
                    Value::Object(_) | Value::Array(_) => {
                        lines.push(format!("{}{}:", prefix, key));
                        lines.push(json_to_text(value, indent + 1));
                    }
                    scalar => lines.push(format!("{}{}: {}", prefix, key, scalar_to_text(scalar))),
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                lines.push(json_to_text(item, indent));
            }
        }
        scalar => lines.push(format!("{}{}", prefix, scalar_to_text(scalar))),
    }

    lines.join("\n")
}

fn scalar_to_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn extract_pdf(data: &[u8], filename: &str) -> Result<String> {
    // pdf-extract panics on some malformed font tables
    let text = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data))
        .map_err(|_| Error::file_parse(filename, "Error processing PDF: extractor panicked"))?
        .map_err(|e| Error::file_parse(filename, format!("Error processing PDF: {}", e)))?;

    let text = text.replace('\0', "");
    if text.trim().is_empty() {
        return Err(Error::file_parse(filename, "No text content could be extracted from PDF"));
    }
    Ok(text)
}

fn extract_html(data: &[u8], filename: &str) -> Result<String> {
    let name = std::path::Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);
    summarize_html(&decode_text(data), name)
}

/// Paragraph texts joined by blank lines
fn extract_docx(data: &[u8], filename: &str) -> Result<String> {
    let doc = docx_rs::read_docx(data)
        .map_err(|e| Error::file_parse(filename, format!("Error processing DOCX: {}", e)))?;

    let mut paragraphs = Vec::new();
    for child in doc.document.children {
        if let docx_rs::DocumentChild::Paragraph(p) = child {
            let mut text = String::new();
            for child in p.children {
                if let docx_rs::ParagraphChild::Run(run) = child {
                    for child in run.children {
                        if let docx_rs::RunChild::Text(t) = child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            paragraphs.push(text);
        }
    }

    Ok(paragraphs.join("\n\n"))
}

/// Hash content for deduplication
fn hash_content(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
