use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tempfile::TempDir;
use tokio::process::Command;
use tracing::debug;

/// Rendering resolution. 300 DPI is the usual floor for workable OCR.
const RASTER_DPI: u32 = 300;

/// One uploaded document, either on disk or still in memory. Uploads arrive
/// as transient buffers; reference documents live beside the process.
pub enum DocSource<'a> {
    Path(&'a Path),
    Bytes(&'a [u8]),
}

/// A rendered page image. Holds the scratch directory alive for as long as
/// any page from the render is still in use.
#[derive(Clone)]
pub struct PageImage {
    pub path: PathBuf,
    _dir: Arc<TempDir>,
}

/// Converts PDF pages to page images by shelling out to `pdftoppm`
/// (poppler-utils) at an injected location. A missing or failing converter
/// is fatal for the triggering action; there is no fallback renderer.
pub struct Rasterizer {
    pdftoppm: PathBuf,
}

impl Rasterizer {
    pub fn new(pdftoppm: PathBuf) -> Self {
        Self { pdftoppm }
    }

    /// Render every page of the document, in page order.
    pub async fn render(&self, source: DocSource<'_>) -> Result<Vec<PageImage>> {
        let dir = Arc::new(TempDir::new().context("failed to create raster scratch dir")?);

        // In-memory uploads are spooled to the scratch dir; pdftoppm only
        // reads from a path.
        let input: PathBuf = match source {
            DocSource::Path(p) => p.to_path_buf(),
            DocSource::Bytes(bytes) => {
                let spooled = dir.path().join("input.pdf");
                tokio::fs::write(&spooled, bytes)
                    .await
                    .context("failed to spool PDF buffer")?;
                spooled
            }
        };

        let prefix = dir.path().join("page");
        let output = Command::new(&self.pdftoppm)
            .arg("-png")
            .arg("-r")
            .arg(RASTER_DPI.to_string())
            .arg(&input)
            .arg(&prefix)
            .output()
            .await
            .with_context(|| {
                format!(
                    "failed to run {:?} — is poppler-utils installed at the configured location?",
                    self.pdftoppm
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("pdftoppm failed: {}", stderr.trim());
        }

        let mut rendered: Vec<(u32, PathBuf)> = Vec::new();
        let mut entries = tokio::fs::read_dir(dir.path())
            .await
            .context("failed to list rendered pages")?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if let Some(n) = page_number(&path) {
                rendered.push((n, path));
            }
        }

        if rendered.is_empty() {
            bail!("pdftoppm produced no page images");
        }
        rendered.sort_by_key(|(n, _)| *n);

        debug!(pages = rendered.len(), "document rasterized");
        Ok(rendered
            .into_iter()
            .map(|(_, path)| PageImage {
                path,
                _dir: dir.clone(),
            })
            .collect())
    }
}

/// Parse the page index out of a `page-NN.png` filename produced by
/// pdftoppm. Non-page files in the scratch dir (the spooled input) are None.
fn page_number(path: &Path) -> Option<u32> {
    if path.extension()? != "png" {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    stem.strip_prefix("page-")?.parse().ok()
}
