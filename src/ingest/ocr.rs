use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tokio::process::Command;
use tracing::warn;

use super::raster::PageImage;

/// Tesseract adapter. One engine per session, reused across pages.
///
/// Output is requested in TSV form so recognized word tokens can be kept and
/// the layout/confidence columns discarded.
pub struct OcrEngine {
    tesseract: PathBuf,
    lang: String,
}

impl OcrEngine {
    pub fn new(tesseract: PathBuf) -> Self {
        let lang = dotenv::var("OCR_LANG").unwrap_or_else(|_| "eng".to_string());
        Self { tesseract, lang }
    }

    /// Recognize one page image, space-joining all recognized tokens.
    ///
    /// A failure on one page is isolated: it logs a warning and yields an
    /// empty string so sibling pages keep going.
    pub async fn recognize(&self, page: &PageImage) -> String {
        match self.run(page).await {
            Ok(text) => text,
            Err(e) => {
                warn!(image = ?page.path, "OCR failed on page: {e:#}");
                String::new()
            }
        }
    }

    async fn run(&self, page: &PageImage) -> Result<String> {
        let output = Command::new(&self.tesseract)
            .arg(&page.path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
            .arg("--psm")
            .arg("1")
            .arg("tsv")
            .output()
            .await
            .with_context(|| format!("failed to run {:?}", self.tesseract))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("tesseract exited with error: {}", stderr.trim());
        }

        Ok(join_tsv_tokens(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Pull the word tokens out of tesseract TSV output and space-join them.
///
/// TSV rows carry 12 columns; level 5 rows are word detections with the
/// token in the last column. Everything else (page/block/line rows, the
/// header, empty detections) is dropped.
fn join_tsv_tokens(tsv: &str) -> String {
    tsv.lines()
        .filter_map(|line| {
            let cols: Vec<&str> = line.split('\t').collect();
            if cols.len() != 12 || cols[0] != "5" {
                return None;
            }
            let token = cols[11].trim();
            (!token.is_empty()).then_some(token)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    fn word_row(token: &str) -> String {
        format!("5\t1\t1\t1\t1\t1\t10\t10\t40\t12\t96.5\t{}", token)
    }

    #[test]
    fn joins_word_tokens_with_spaces() {
        let tsv = format!(
            "{}\n1\t1\t0\t0\t0\t0\t0\t0\t600\t800\t-1\t\n{}\n{}\n{}",
            HEADER,
            word_row("REAL"),
            word_row("ESTATE"),
            word_row("ACT")
        );
        assert_eq!(join_tsv_tokens(&tsv), "REAL ESTATE ACT");
    }

    #[test]
    fn drops_structural_rows_and_empty_detections() {
        let tsv = format!(
            "{}\n4\t1\t1\t1\t1\t0\t0\t0\t0\t0\t-1\t\n{}\n5\t1\t1\t1\t1\t2\t0\t0\t0\t0\t10.0\t \n",
            HEADER,
            word_row("escrow")
        );
        assert_eq!(join_tsv_tokens(&tsv), "escrow");
    }

    #[test]
    fn empty_output_yields_empty_string() {
        assert_eq!(join_tsv_tokens(""), "");
        assert_eq!(join_tsv_tokens(HEADER), "");
    }
}
