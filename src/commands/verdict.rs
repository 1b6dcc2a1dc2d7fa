use poise::serenity_prelude as serenity;
use tracing::info;

use crate::commands::send_chunked;
use crate::ingest;
use crate::prompts;
use crate::state::Context;

/// Draft a mock case verdict from party statements and evidence
#[poise::command(slash_command, guild_only)]
pub async fn verdict(
    ctx: Context<'_>,
    #[description = "Consumer's statement"] consumer_statement: String,
    #[description = "Builder's statement"] builder_statement: String,
    #[description = "Title of a past case to search for"] case_title: Option<String>,
    #[description = "Evidence file for the consumer"] consumer_evidence: Option<
        serenity::Attachment,
    >,
    #[description = "Second evidence file for the consumer"] consumer_evidence_2: Option<
        serenity::Attachment,
    >,
    #[description = "Evidence file for the builder"] builder_evidence: Option<
        serenity::Attachment,
    >,
    #[description = "Second evidence file for the builder"] builder_evidence_2: Option<
        serenity::Attachment,
    >,
) -> Result<(), anyhow::Error> {
    if consumer_statement.trim().is_empty() || builder_statement.trim().is_empty() {
        ctx.say("Both parties must provide a statement!").await?;
        return Ok(());
    }

    ctx.defer().await?;

    let state = ctx.data();
    info!(
        user = ctx.author().name,
        has_title = case_title.is_some(),
        "verdict drafting started"
    );

    // Evidence uploads are recorded by filename only.
    let consumer_evidence_text = ingest::describe_evidence(&filenames(&[
        consumer_evidence.as_ref(),
        consumer_evidence_2.as_ref(),
    ]));
    let builder_evidence_text = ingest::describe_evidence(&filenames(&[
        builder_evidence.as_ref(),
        builder_evidence_2.as_ref(),
    ]));

    let reference_cases = match case_title.as_deref() {
        Some(title) => state.search.lookup(title).await,
        None => Vec::new(),
    };

    // Pull the two order-format examples through the ingestion pipeline.
    // Both are scans in practice, but the pipeline decides the path.
    let example_format_1 = state
        .pipeline
        .extract_auto(&tokio::fs::read(&state.config.order_example_1).await?)
        .await?
        .text;
    let example_format_2 = state
        .pipeline
        .extract_auto(&tokio::fs::read(&state.config.order_example_2).await?)
        .await?
        .text;

    let prompt = prompts::verdict_prompt(
        &example_format_1,
        &example_format_2,
        &consumer_statement,
        &consumer_evidence_text,
        &builder_statement,
        &builder_evidence_text,
        &reference_cases,
    );

    let order = state
        .llm
        .complete(prompts::VERDICT_SYSTEM, &prompt, None, None)
        .await?;

    info!(
        references = reference_cases.len(),
        order_len = order.len(),
        "verdict drafted"
    );

    send_chunked(&ctx, &format!("**Verdict**\n\n{}", order)).await
}

fn filenames(attachments: &[Option<&serenity::Attachment>]) -> Vec<String> {
    attachments
        .iter()
        .flatten()
        .map(|a| a.filename.clone())
        .collect()
}
