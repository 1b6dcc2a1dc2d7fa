use poise::serenity_prelude as serenity;
use tracing::info;

use crate::commands::{is_pdf, send_chunked};
use crate::llm::Message;
use crate::prompts;
use crate::state::Context;

/// Check an uploaded document for compliance against the RERA rulebook
#[poise::command(slash_command, guild_only)]
pub async fn check(
    ctx: Context<'_>,
    #[description = "PDF document to verify"] document: serenity::Attachment,
) -> Result<(), anyhow::Error> {
    if !is_pdf(&document.filename) {
        ctx.say("Please upload a PDF document.").await?;
        return Ok(());
    }

    ctx.defer().await?;

    let state = ctx.data();
    info!(
        user = ctx.author().name,
        file = document.filename,
        size = document.size,
        "compliance check started"
    );

    let bytes = document.download().await?;
    let extracted = state.pipeline.extract_auto(&bytes).await?;
    if extracted.text.trim().is_empty() {
        ctx.say("No text could be extracted from that document.")
            .await?;
        return Ok(());
    }

    // The rulebook summary must exist before the prompt can be assembled;
    // after the first action it comes straight from the session cache.
    let rule_summary = state.ensure_rule_summary().await?;

    let prompt = prompts::compliance_prompt(rule_summary, &extracted.text);
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
        "compliance check complete"
    );

    send_chunked(
        &ctx,
        &format!("**General Compliance Check — {}**\n\n{}", document.filename, report),
    )
    .await
}
