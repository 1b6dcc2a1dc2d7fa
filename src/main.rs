mod commands;
mod config;
mod ingest;
mod llm;
mod prompts;
mod search;
mod state;

use std::sync::Arc;

use poise::serenity_prelude as serenity;
use poise::{Framework, FrameworkOptions};
use tracing::{error, info, warn, Level};

use config::Config;
use ingest::{ocr::OcrEngine, raster::Rasterizer, Pipeline};
use llm::LlmClient;
use search::CaseSearch;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();

    // Load env
    let _ = dotenv::dotenv();
    let config = Arc::new(Config::from_env()?);
    let guild_id = config.guild_id.map(serenity::GuildId::new);
    info!(rulebook = ?config.rulebook_pdf, "configuration loaded");

    if !config::tool_available(&config.pdftoppm) {
        warn!(path = ?config.pdftoppm, "pdftoppm not runnable — scanned documents will fail");
    }
    if !config::tool_available(&config.tesseract) {
        warn!(path = ?config.tesseract, "tesseract not runnable — OCR will fail");
    }

    // Init service handles
    let llm_client = Arc::new(LlmClient::from_env()?);
    info!("LLM client initialized");

    let case_search = Arc::new(CaseSearch::from_env()?);
    info!("Case search client initialized");

    let pipeline = Arc::new(Pipeline::new(
        Rasterizer::new(config.pdftoppm.clone()),
        OcrEngine::new(config.tesseract.clone()),
    ));

    let token = config.discord_token.clone();
    let app_state = AppState::new(llm_client, case_search, pipeline, config);

    let intents =
        serenity::GatewayIntents::GUILDS | serenity::GatewayIntents::GUILD_MESSAGES;

    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: vec![commands::rera()],
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Bot connected as: {} ({})", ready.user.name, ready.user.id);

                let commands = &framework.options().commands;
                info!("Registering {} top-level command(s):", commands.len());
                for cmd in commands {
                    info!("  /{} ({} subcommands)", cmd.name, cmd.subcommands.len());
                    for sub in &cmd.subcommands {
                        info!("    /{} {}", cmd.name, sub.name);
                    }
                }

                if let Some(gid) = guild_id {
                    info!("Registering to guild {} (instant)", gid);
                    poise::builtins::register_in_guild(
                        ctx,
                        &framework.options().commands,
                        gid,
                    )
                    .await?;
                } else {
                    info!("Registering globally (up to 1 hour delay)");
                    poise::builtins::register_globally(
                        ctx,
                        &framework.options().commands,
                    )
                    .await?;
                }

                Ok(app_state)
            })
        })
        .build();

    info!("Starting RERA clerk bot...");

    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create client: {}", e))?;

    if let Err(e) = client.start().await {
        error!("Client error: {}", e);
    }

    Ok(())
}
