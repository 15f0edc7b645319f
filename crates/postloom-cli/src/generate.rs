//! `generate` command: run one campaign brief end to end from the terminal.

use postloom_core::AppConfig;
use postloom_llm::ChatClient;
use postloom_pipeline::{run_brief_generation, BriefRequest, GenerationConfig};
use sqlx::PgPool;
use uuid::Uuid;

/// Runs the full generation pipeline for one campaign request and prints the
/// resulting drafts.
///
/// # Errors
///
/// Returns an error when the gateway client cannot be constructed or when the
/// pipeline fails before producing a strategy. Per-platform copy failures are
/// reflected in the post count, not propagated.
pub(crate) async fn run_generate(
    pool: &PgPool,
    config: &AppConfig,
    user_id: Uuid,
    request: BriefRequest,
) -> anyhow::Result<()> {
    let chat = ChatClient::new(
        &config.llm_api_base,
        config.llm_api_key.as_deref(),
        config.llm_timeout_secs,
    )?;
    let generation = GenerationConfig::from_app_config(config);

    let outcome = run_brief_generation(pool, &chat, &generation, user_id, &request).await?;
    println!(
        "brief {}: {} posts generated",
        outcome.brief_id, outcome.posts_generated
    );

    let Some(brief) = postloom_db::get_brief_for_user(pool, outcome.brief_id, user_id).await?
    else {
        anyhow::bail!("brief {} not readable after generation", outcome.brief_id);
    };
    let posts = postloom_db::list_posts_for_brief(pool, brief.id).await?;
    for post in &posts {
        println!();
        println!("[{}] {} ({})", post.platform, post.public_id, post.status);
        println!("{}", post.generated_text);
    }

    Ok(())
}
