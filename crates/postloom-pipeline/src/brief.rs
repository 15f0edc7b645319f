//! Brief orchestration: one campaign request in, draft posts out.

use postloom_core::{AppConfig, CampaignInput};
use postloom_db::BrandRow;
use postloom_llm::{retry_with_backoff, ChatClient, GenerationParams};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::PipelineError;
use crate::prompts;
use crate::strategy::{parse_strategy_entries, StrategyEntry};

/// Sampling defaults for the strategy call.
const STRATEGY_TEMPERATURE: f64 = 0.7;
const STRATEGY_MAX_TOKENS: u32 = 1000;

/// Sampling defaults for the copy call.
const COPY_TEMPERATURE: f64 = 0.8;
const COPY_MAX_TOKENS: u32 = 800;

/// Tunables for one generation run.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub strategy_params: GenerationParams,
    pub copy_params: GenerationParams,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl GenerationConfig {
    /// Builds the run configuration from [`AppConfig`], applying the fixed
    /// sampling defaults for each call.
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            strategy_params: GenerationParams {
                model: config.strategy_model.clone(),
                temperature: STRATEGY_TEMPERATURE,
                max_tokens: STRATEGY_MAX_TOKENS,
            },
            copy_params: GenerationParams {
                model: config.copy_model.clone(),
                temperature: COPY_TEMPERATURE,
                max_tokens: COPY_MAX_TOKENS,
            },
            max_retries: config.llm_max_retries,
            backoff_base_ms: config.llm_retry_backoff_base_ms,
        }
    }
}

/// One campaign-generation request, already resolved to a concrete user.
#[derive(Debug, Clone)]
pub struct BriefRequest {
    pub brand_id: Uuid,
    pub topic: String,
    pub goal: Option<String>,
    pub cta: Option<String>,
}

/// Result of a finished orchestration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub brief_id: Uuid,
    pub posts_generated: usize,
}

/// Run the full brief pipeline for one campaign request.
///
/// 1. Validate the request (non-blank topic).
/// 2. Authorize: load the brand scoped to the requesting user.
/// 3. Create the brief in `processing`.
/// 4. Generate the content strategy and parse its platform entries.
/// 5. Generate copy per entry; individual failures are logged and skipped.
/// 6. Finalize the brief: `completed` when at least one post was written,
///    `error` otherwise.
/// 7. Report the public brief id and the number of posts generated.
///
/// # Errors
///
/// Returns [`PipelineError`] when validation, authorization, brief creation,
/// or the strategy step fails. Once the strategy step has produced entries,
/// per-entry copy failures never fail the run; they only reduce
/// `posts_generated`.
pub async fn run_brief_generation(
    pool: &PgPool,
    chat: &ChatClient,
    config: &GenerationConfig,
    user_id: Uuid,
    request: &BriefRequest,
) -> Result<GenerationOutcome, PipelineError> {
    // Step 1: Validate.
    if request.topic.trim().is_empty() {
        return Err(PipelineError::Validation(
            "topic must not be blank".to_string(),
        ));
    }

    // Step 2: Authorize. Owner scoping makes a foreign brand indistinguishable
    // from an absent one.
    let brand = postloom_db::get_brand_for_user(pool, request.brand_id, user_id)
        .await?
        .ok_or(PipelineError::NotFound)?;

    let campaign = CampaignInput::new(
        request.topic.clone(),
        request.goal.clone(),
        request.cta.clone(),
    );

    // Step 3: Create the brief in `processing`.
    let brief = postloom_db::create_brief(
        pool,
        user_id,
        brand.id,
        &campaign.topic,
        &campaign.goal,
        campaign.cta_text.as_deref(),
    )
    .await?;

    tracing::info!(
        brief_id = %brief.public_id,
        brand = %brand.name,
        topic = %campaign.topic,
        "brief created, generating strategy"
    );

    // Step 4: Strategy call. Failure here is fatal to the run; the brief is
    // moved to `error` (best effort) before returning.
    let strategy_text = prompts::strategy_prompt(&brand, &campaign);
    let raw = match retry_with_backoff(config.max_retries, config.backoff_base_ms, || {
        chat.generate(
            prompts::STRATEGY_SYSTEM_PROMPT,
            &strategy_text,
            &config.strategy_params,
        )
    })
    .await
    {
        Ok(raw) => raw,
        Err(e) => {
            fail_brief_best_effort(pool, brief.id, brief.public_id).await;
            return Err(PipelineError::Gateway(e));
        }
    };

    let entries = match parse_strategy_entries(&raw) {
        Ok(entries) => entries,
        Err(e) => {
            fail_brief_best_effort(pool, brief.id, brief.public_id).await;
            return Err(e);
        }
    };

    // Step 5: Copy per entry, sequentially. One platform's failure never
    // aborts the rest.
    let mut posts_generated = 0_usize;
    for entry in &entries {
        match generate_post(pool, chat, config, &brand, &campaign, brief.id, entry).await {
            Ok(()) => posts_generated += 1,
            Err(e) => {
                tracing::warn!(
                    brief_id = %brief.public_id,
                    platform = %entry.platform,
                    error = %e,
                    "copy generation failed, skipping platform"
                );
            }
        }
    }

    // Step 6: Finalize. A failed status write is logged and accepted; the
    // stale-brief sweep reconciles rows left in `processing`.
    let finalize = if posts_generated > 0 {
        postloom_db::complete_brief(pool, brief.id).await
    } else {
        postloom_db::fail_brief(pool, brief.id).await
    };
    if let Err(e) = finalize {
        tracing::error!(
            brief_id = %brief.public_id,
            error = %e,
            "brief finalization write failed"
        );
    }

    tracing::info!(
        brief_id = %brief.public_id,
        posts_generated,
        attempted = entries.len(),
        "brief generation finished"
    );

    // Step 7: Report.
    Ok(GenerationOutcome {
        brief_id: brief.public_id,
        posts_generated,
    })
}

/// Generates and persists one draft post for a strategy entry.
async fn generate_post(
    pool: &PgPool,
    chat: &ChatClient,
    config: &GenerationConfig,
    brand: &BrandRow,
    campaign: &CampaignInput,
    brief_id: i64,
    entry: &StrategyEntry,
) -> Result<(), PipelineError> {
    let copy_text = prompts::copy_prompt(brand, campaign, entry);
    let text = retry_with_backoff(config.max_retries, config.backoff_base_ms, || {
        chat.generate(prompts::COPY_SYSTEM_PROMPT, &copy_text, &config.copy_params)
    })
    .await?;

    postloom_db::insert_draft_post(pool, brief_id, &entry.platform, &text, None).await?;
    Ok(())
}

/// Marks the brief as errored, logging instead of propagating a failed write.
async fn fail_brief_best_effort(pool: &PgPool, brief_id: i64, public_id: Uuid) {
    if let Err(e) = postloom_db::fail_brief(pool, brief_id).await {
        tracing::error!(
            brief_id = %public_id,
            error = %e,
            "failed to mark brief as errored"
        );
    }
}
