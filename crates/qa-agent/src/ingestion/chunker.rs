//! Paragraph- and sentence-aware text chunking
//!
//! Text is split on blank lines into paragraphs, which are packed greedily
//! into chunks of at most `chunk_size` characters. A paragraph that is too
//! long on its own is split into sentences that are packed the same way. A
//! single sentence longer than `chunk_size` is kept whole: no text is ever
//! truncated, so such a chunk is the only kind allowed to exceed the bound.

use regex::Regex;
use std::sync::OnceLock;

use crate::config::ChunkingConfig;
use crate::types::{Chunk, Metadata};

const PARAGRAPH_SEPARATOR: &str = "\n\n";
const SENTENCE_SEPARATOR: &str = " ";

fn paragraph_boundary() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\n\s*\n").expect("Invalid regex"))
}

fn sentence_boundary() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[.!?]\s+").expect("Invalid regex"))
}

/// Text chunker with configurable size
#[derive(Debug, Clone)]
pub struct TextChunker {
    /// Soft upper bound on chunk length in characters
    chunk_size: usize,
    /// Declared overlap; the packer does not re-include text from the previous chunk
    chunk_overlap: usize,
}

impl TextChunker {
    /// Create a new chunker
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Create a chunker from configuration
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Target chunk size in characters
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Configured overlap in characters
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split text into ordered chunks, attaching `metadata` to each one
    pub fn split(&self, text: &str, metadata: &Metadata) -> Vec<Chunk> {
        let mut packer = Packer::new(self.chunk_size, metadata);

        for paragraph in split_paragraphs(text) {
            if packer.fits(paragraph, PARAGRAPH_SEPARATOR) {
                packer.append(paragraph, PARAGRAPH_SEPARATOR);
                continue;
            }

            packer.flush();

            if char_len(paragraph) > self.chunk_size {
                for sentence in split_sentences(paragraph) {
                    if packer.fits(sentence, SENTENCE_SEPARATOR) {
                        packer.append(sentence, SENTENCE_SEPARATOR);
                    } else {
                        packer.flush();
                        packer.append(sentence, SENTENCE_SEPARATOR);
                    }
                }
            } else {
                packer.append(paragraph, PARAGRAPH_SEPARATOR);
            }
        }

        packer.finish()
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::from_config(&ChunkingConfig::default())
    }
}

/// Greedy accumulator that emits indexed chunks on flush
struct Packer<'a> {
    chunk_size: usize,
    metadata: &'a Metadata,
    current: String,
    current_len: usize,
    chunks: Vec<Chunk>,
}

impl<'a> Packer<'a> {
    fn new(chunk_size: usize, metadata: &'a Metadata) -> Self {
        Self {
            chunk_size,
            metadata,
            current: String::new(),
            current_len: 0,
            chunks: Vec::new(),
        }
    }

    /// Whether `unit` can join the accumulator without exceeding the bound
    fn fits(&self, unit: &str, separator: &str) -> bool {
        let separator_len = if self.current.is_empty() {
            0
        } else {
            separator.len()
        };
        self.current_len + separator_len + char_len(unit) <= self.chunk_size
    }

    fn append(&mut self, unit: &str, separator: &str) {
        if !self.current.is_empty() {
            self.current.push_str(separator);
            self.current_len += separator.len();
        }
        self.current.push_str(unit);
        self.current_len += char_len(unit);
    }

    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.current);
        self.current_len = 0;
        let index = self.chunks.len();
        self.chunks.push(Chunk::new(text, index, self.metadata.clone()));
    }

    fn finish(mut self) -> Vec<Chunk> {
        self.flush();
        self.chunks
    }
}

/// Trimmed, non-empty paragraphs separated by blank lines
fn split_paragraphs(text: &str) -> impl Iterator<Item = &str> {
    paragraph_boundary()
        .split(text)
        .map(str::trim)
        .filter(|p| !p.is_empty())
}

/// Sentences ending in `.`, `!` or `?`; the whitespace after the punctuation is dropped
fn split_sentences(paragraph: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for boundary in sentence_boundary().find_iter(paragraph) {
        // The punctuation mark is a single ASCII byte and stays with its sentence
        let end = boundary.start() + 1;
        sentences.push(&paragraph[start..end]);
        start = boundary.end();
    }
    if start < paragraph.len() {
        sentences.push(&paragraph[start..]);
    }

    sentences
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SOURCE_DOCUMENT_KEY;

    fn metadata(source: &str) -> Metadata {
        let mut meta = Metadata::new();
        meta.insert(SOURCE_DOCUMENT_KEY.to_string(), serde_json::json!(source));
        meta
    }

    fn texts(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_empty_input() {
        let chunker = TextChunker::new(50, 10);
        assert!(chunker.split("", &Metadata::new()).is_empty());
        assert!(chunker.split("   \n\n  ", &Metadata::new()).is_empty());
        assert!(chunker.split("\n\n\n \t \n", &Metadata::new()).is_empty());
    }

    #[test]
    fn test_paragraphs_pack_together() {
        let chunker = TextChunker::new(50, 0);
        let chunks = chunker.split("Alpha beta gamma.\n\nDelta epsilon zeta.", &Metadata::new());

        assert_eq!(texts(&chunks), vec!["Alpha beta gamma.\n\nDelta epsilon zeta."]);
        assert_eq!(chunks[0].chunk_index, 0);
    }

    #[test]
    fn test_oversized_sentence_kept_whole() {
        let chunker = TextChunker::new(10, 0);
        let sentence = "abcdefghij klmnopqrst uvwxyzabcd efghijkl";
        assert_eq!(sentence.len(), 41);

        let chunks = chunker.split(sentence, &Metadata::new());
        assert_eq!(texts(&chunks), vec![sentence]);
    }

    #[test]
    fn test_paragraphs_that_cannot_merge() {
        let chunker = TextChunker::new(20, 0);
        let text = format!("{}\n\n{}", "A".repeat(15), "B".repeat(15));
        let chunks = chunker.split(&text, &Metadata::new());

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, "A".repeat(15));
        assert_eq!(chunks[1].text, "B".repeat(15));
        assert_eq!(chunks[0].chunk_index, 0);
        assert_eq!(chunks[1].chunk_index, 1);
    }

    #[test]
    fn test_separator_counts_toward_size() {
        // 9 + 2 + 9 = 20 fits exactly, one more character does not
        let chunker = TextChunker::new(20, 0);
        let fits = chunker.split("aaaaaaaaa\n\nbbbbbbbbb", &Metadata::new());
        assert_eq!(fits.len(), 1);

        let overflows = chunker.split("aaaaaaaaa\n\nbbbbbbbbbb", &Metadata::new());
        assert_eq!(overflows.len(), 2);
    }

    #[test]
    fn test_long_paragraph_split_into_sentences() {
        let chunker = TextChunker::new(30, 0);
        let text = "First sentence is here. Second one follows! Is this the third? Yes.";
        let chunks = chunker.split(text, &Metadata::new());

        assert_eq!(
            texts(&chunks),
            vec![
                "First sentence is here.",
                "Second one follows!",
                "Is this the third? Yes.",
            ]
        );
    }

    #[test]
    fn test_sentence_tail_continues_with_next_paragraph() {
        let chunker = TextChunker::new(30, 0);
        let text = "One two three four five six. Seven.\n\nEight.";
        let chunks = chunker.split(text, &Metadata::new());

        assert_eq!(
            texts(&chunks),
            vec!["One two three four five six.", "Seven.\n\nEight."]
        );
    }

    #[test]
    fn test_paragraph_whitespace_is_trimmed() {
        let chunker = TextChunker::new(100, 0);
        let chunks = chunker.split("  first  \n \t \n\n   second\n", &Metadata::new());
        assert_eq!(texts(&chunks), vec!["first\n\nsecond"]);
    }

    #[test]
    fn test_size_counts_characters() {
        // 10 two-byte characters fit a 10 character chunk
        let chunker = TextChunker::new(10, 0);
        let chunks = chunker.split(&"é".repeat(10), &Metadata::new());
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_metadata_and_ids_attached() {
        let chunker = TextChunker::new(20, 0);
        let meta = metadata("ui_guide.md");
        let text = format!("{}\n\n{}", "A".repeat(15), "B".repeat(15));
        let chunks = chunker.split(&text, &meta);

        for chunk in &chunks {
            assert_eq!(chunk.source_document(), "ui_guide.md");
            assert_eq!(
                chunk.id,
                crate::ingestion::identity::chunk_id(&chunk.text, "ui_guide.md", chunk.chunk_index)
            );
        }
        assert_ne!(chunks[0].id, chunks[1].id);
    }

    #[test]
    fn test_overlap_is_not_applied() {
        let with_overlap = TextChunker::new(20, 15);
        let without = TextChunker::new(20, 0);
        let text = "First part here.\n\nSecond part here.\n\nThird part here.";

        assert_eq!(with_overlap.chunk_overlap(), 15);
        assert_eq!(
            texts(&with_overlap.split(text, &Metadata::new())),
            texts(&without.split(text, &Metadata::new()))
        );
    }

    #[test]
    fn test_indices_follow_positions() {
        let chunker = TextChunker::new(5, 0);
        let text = vec!["word"; 300].join("\n\n");
        let chunks = chunker.split(&text, &Metadata::new());

        assert_eq!(chunks.len(), 300);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.chunk_index, i);
        }
    }

    #[test]
    fn test_split_sentences() {
        assert_eq!(
            split_sentences("Hi. There!  How?\tOk"),
            vec!["Hi.", "There!", "How?", "Ok"]
        );
        assert_eq!(split_sentences("v1.2 is out"), vec!["v1.2 is out"]);
    }
}
