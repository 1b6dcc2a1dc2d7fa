use std::sync::Arc;

use anyhow::{Context as _, Result};
use tokio::sync::OnceCell;
use tracing::info;

use crate::config::Config;
use crate::ingest::{self, pdf, Pipeline};
use crate::llm::LlmClient;
use crate::search::CaseSearch;

/// Session-scoped service handles and cached state. All collaborators are
/// constructed once at startup and injected here; nothing reaches for
/// process globals.
pub struct AppState {
    pub llm: Arc<LlmClient>,
    pub search: Arc<CaseSearch>,
    pub pipeline: Arc<Pipeline>,
    pub config: Arc<Config>,
    /// Per-chunk rulebook summaries, computed at most once per session.
    rule_summary: OnceCell<Vec<String>>,
}

impl AppState {
    pub fn new(
        llm: Arc<LlmClient>,
        search: Arc<CaseSearch>,
        pipeline: Arc<Pipeline>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            llm,
            search,
            pipeline,
            config,
            rule_summary: OnceCell::new(),
        }
    }

    /// Get the rulebook summary, computing it on first use. Repeat calls
    /// within a session reuse the cached value; a failed computation is not
    /// cached, so the next action retries.
    pub async fn ensure_rule_summary(&self) -> Result<&[String]> {
        let summary = self
            .rule_summary
            .get_or_try_init(|| async {
                info!(rulebook = ?self.config.rulebook_pdf, "summarizing rulebook");
                let path = self.config.rulebook_pdf.clone();
                let pages =
                    tokio::task::spawn_blocking(move || pdf::extract_page_texts_from_path(&path))
                        .await
                        .context("spawn_blocking join failed")??;
                let chunks = ingest::chunk_pages(&pages, ingest::DEFAULT_CHUNK_SIZE);
                let summary = ingest::summarize_chunks(&self.llm, &chunks).await?;
                info!(chunks = summary.len(), "rulebook summarized and cached");
                Ok::<_, anyhow::Error>(summary)
            })
            .await?;
        Ok(summary)
    }
}

pub type Context<'a> = poise::Context<'a, AppState, anyhow::Error>;

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn summary_cell_runs_the_work_exactly_once() {
        let cell: OnceCell<Vec<String>> = OnceCell::new();
        let runs = AtomicUsize::new(0);

        for _ in 0..3 {
            let got = cell
                .get_or_try_init(|| async {
                    runs.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, anyhow::Error>(vec!["summary".to_string()])
                })
                .await
                .unwrap();
            assert_eq!(got, &vec!["summary".to_string()]);
        }

        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_summary_is_not_cached() {
        let cell: OnceCell<Vec<String>> = OnceCell::new();
        let runs = AtomicUsize::new(0);

        let first = cell
            .get_or_try_init(|| async {
                runs.fetch_add(1, Ordering::SeqCst);
                Err::<Vec<String>, _>(anyhow::anyhow!("summarization failed"))
            })
            .await;
        assert!(first.is_err());

        let second = cell
            .get_or_try_init(|| async {
                runs.fetch_add(1, Ordering::SeqCst);
                Ok::<_, anyhow::Error>(vec!["retry worked".to_string()])
            })
            .await
            .unwrap();
        assert_eq!(second[0], "retry worked");
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }
}
