pub mod ocr;
pub mod pdf;
pub mod raster;

use anyhow::Result;
use tracing::{debug, info};

use crate::llm::LlmClient;
use ocr::OcrEngine;
use raster::{DocSource, Rasterizer};

/// Pages per summarization chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 10;

/// Below this many extracted characters a document is treated as scanned
/// and routed through OCR.
pub const MIN_TEXT_THRESHOLD: usize = 50;

/// Which extraction path produced a document's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    DirectText,
    Ocr,
}

pub struct Extracted {
    pub text: String,
    pub strategy: Strategy,
}

/// Orchestrates the two extraction paths and the chunked summarization of
/// large documents. Service handles are injected at construction and live
/// for the session.
pub struct Pipeline {
    rasterizer: Rasterizer,
    ocr: OcrEngine,
}

impl Pipeline {
    pub fn new(rasterizer: Rasterizer, ocr: OcrEngine) -> Self {
        Self { rasterizer, ocr }
    }

    /// OCR strategy: rasterize every page, recognize each, newline-join.
    /// Used when a document is known or suspected to be image-only.
    pub async fn extract_scanned(&self, source: DocSource<'_>) -> Result<String> {
        let pages = self.rasterizer.render(source).await?;
        let mut texts = Vec::with_capacity(pages.len());
        for page in &pages {
            texts.push(self.ocr.recognize(page).await);
        }
        Ok(pdf::join_pages(&texts))
    }

    /// Try the embedded text layer first and fall back to OCR when the
    /// extracted text is too sparse to have come from a digital original.
    pub async fn extract_auto(&self, bytes: &[u8]) -> Result<Extracted> {
        let pages = pdf::extract_page_texts(bytes)?;
        let text = pdf::join_pages(&pages);
        if !needs_ocr(&text) {
            debug!(chars = text.len(), "direct-text extraction sufficient");
            return Ok(Extracted {
                text,
                strategy: Strategy::DirectText,
            });
        }

        info!(
            chars = text.len(),
            threshold = MIN_TEXT_THRESHOLD,
            "text layer too sparse, falling back to OCR"
        );
        let text = self.extract_scanned(DocSource::Bytes(bytes)).await?;
        Ok(Extracted {
            text,
            strategy: Strategy::Ocr,
        })
    }
}

/// The explicit strategy decision: sparse text means scanned content.
pub fn needs_ocr(extracted: &str) -> bool {
    extracted.trim().len() < MIN_TEXT_THRESHOLD
}

/// Group page texts into contiguous chunks of up to `chunk_size` pages,
/// newline-joining the non-empty pages of each chunk.
///
/// Chunks partition the pages in order: ceil(n / chunk_size) chunks, no page
/// duplicated or omitted.
pub fn chunk_pages(pages: &[String], chunk_size: usize) -> Vec<String> {
    let chunk_size = chunk_size.max(1);
    pages
        .chunks(chunk_size)
        .map(pdf::join_pages)
        .collect()
}

/// Summarize each chunk with one completion call, sequentially, preserving
/// chunk order. This is the once-per-session rulebook condensation.
pub async fn summarize_chunks(llm: &LlmClient, chunks: &[String]) -> Result<Vec<String>> {
    let mut summaries = Vec::with_capacity(chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        let summary = llm
            .complete("Summarize this text.", chunk, None, None)
            .await?;
        debug!(chunk = i, chars = summary.len(), "chunk summarized");
        summaries.push(summary);
    }
    Ok(summaries)
}

/// Evidence uploads are recorded by filename only; their content is not
/// examined.
pub fn describe_evidence(filenames: &[String]) -> String {
    if filenames.is_empty() {
        return "No evidence provided.".to_string();
    }
    format!("Uploaded evidence files: {}", filenames.join(", "))
}
