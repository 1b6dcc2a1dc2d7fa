use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

/// Startup configuration resolved once from the environment.
///
/// All filesystem paths are validated here so a misplaced rulebook or
/// converter binary fails at launch with a clear message instead of deep
/// inside an extraction call.
pub struct Config {
    pub discord_token: String,
    pub guild_id: Option<u64>,
    /// `pdftoppm` binary (poppler-utils) used to rasterize scanned PDFs.
    pub pdftoppm: PathBuf,
    /// `tesseract` binary used for OCR on rendered page images.
    pub tesseract: PathBuf,
    /// The fixed RERA rulebook PDF summarized once per session.
    pub rulebook_pdf: PathBuf,
    /// Two reference order-format PDFs quoted in verdict prompts.
    pub order_example_1: PathBuf,
    pub order_example_2: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let discord_token = match dotenv::var("DISCORD_TOKEN") {
            Ok(t) if !t.is_empty() => t,
            _ => bail!("DISCORD_TOKEN required"),
        };
        let guild_id = dotenv::var("DISCORD_GUILD_ID")
            .ok()
            .and_then(|s| s.parse::<u64>().ok());

        let pdftoppm = PathBuf::from(
            dotenv::var("PDFTOPPM_PATH").unwrap_or_else(|_| "pdftoppm".to_string()),
        );
        let tesseract = PathBuf::from(
            dotenv::var("TESSERACT_PATH").unwrap_or_else(|_| "tesseract".to_string()),
        );

        let rulebook_pdf = require_file(
            "RULEBOOK_PDF",
            dotenv::var("RULEBOOK_PDF").unwrap_or_else(|_| "ReraRules2017.pdf".to_string()),
        )?;
        let order_example_1 = require_file(
            "ORDER_EXAMPLE_1",
            dotenv::var("ORDER_EXAMPLE_1").unwrap_or_else(|_| "OrderExample1.pdf".to_string()),
        )?;
        let order_example_2 = require_file(
            "ORDER_EXAMPLE_2",
            dotenv::var("ORDER_EXAMPLE_2").unwrap_or_else(|_| "OrderExample2.pdf".to_string()),
        )?;

        Ok(Self {
            discord_token,
            guild_id,
            pdftoppm,
            tesseract,
            rulebook_pdf,
            order_example_1,
            order_example_2,
        })
    }
}

/// Resolve a reference-document path and confirm it exists on disk.
fn require_file(var: &str, raw: String) -> Result<PathBuf> {
    let path = PathBuf::from(raw);
    if !path.is_file() {
        bail!(
            "{} points at {:?}, which does not exist — place the document there or set {} to its location",
            var,
            path,
            var
        );
    }
    Ok(path)
}

/// Check whether a converter/OCR binary looks runnable. Used for a startup
/// warning only; the rasterizer still fails fatally at call time if the tool
/// is genuinely missing.
pub fn tool_available(binary: &Path) -> bool {
    std::process::Command::new(binary)
        .arg("-v")
        .output()
        .is_ok()
}
