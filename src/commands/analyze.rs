use poise::serenity_prelude as serenity;
use tracing::info;

use crate::commands::{is_pdf, send_chunked};
use crate::llm::Message;
use crate::prompts;
use crate::state::Context;

/// Analyze a specific aspect of an uploaded document against the rulebook
#[poise::command(slash_command, guild_only)]
pub async fn analyze(
    ctx: Context<'_>,
    #[description = "PDF document to analyze"] document: serenity::Attachment,
    #[description = "What to analyze (e.g. escrow account, signatures, page numbers)"]
    focus: String,
) -> Result<(), anyhow::Error> {
    if !is_pdf(&document.filename) {
        ctx.say("Please upload a PDF document.").await?;
        return Ok(());
    }
    if focus.trim().is_empty() {
        ctx.say("Specify what to analyze (e.g. escrow account, signatures).")
            .await?;
        return Ok(());
    }

    ctx.defer().await?;

    let state = ctx.data();
    info!(
        user = ctx.author().name,
        file = document.filename,
        focus,
        "targeted analysis started"
    );

    let bytes = document.download().await?;
    let extracted = state.pipeline.extract_auto(&bytes).await?;
    if extracted.text.trim().is_empty() {
        ctx.say("No text could be extracted from that document.")
            .await?;
        return Ok(());
    }

    let rule_summary = state.ensure_rule_summary().await?;

    let prompt = prompts::analysis_prompt(rule_summary, &extracted.text, &focus);
    let report = state
        .llm
        .chat(
            &[Message {
                role: "user".to_string(),
                content: prompt,
            }],
            Some(0.0),
            Some(2000),
        )
        .await?;

    info!(
        strategy = ?extracted.strategy,
        report_len = report.len(),
        "targeted analysis complete"
    );

    send_chunked(
        &ctx,
        &format!("**Analysis: {} — {}**\n\n{}", focus, document.filename, report),
    )
    .await
}
