//! Prompt renderers for the two model calls.
//!
//! Pure functions: brand profile plus campaign parameters in, prompt text
//! out. The strategy prompt asks for a JSON array of platform entries; the
//! copy prompt asks for finished post text.

use postloom_core::CampaignInput;
use postloom_db::BrandRow;

use crate::strategy::StrategyEntry;

/// System prompt for the strategy call.
pub const STRATEGY_SYSTEM_PROMPT: &str =
    "You are a strategic social media planner. Always respond with valid JSON.";

/// System prompt for the copywriting call.
pub const COPY_SYSTEM_PROMPT: &str =
    "You are an expert social media copywriter. Create engaging, platform-optimized content.";

/// Renders the strategy prompt for one campaign.
#[must_use]
pub fn strategy_prompt(brand: &BrandRow, campaign: &CampaignInput) -> String {
    format!(
        "Plan social media content for the brand \"{name}\".\n\
         \n\
         Brand description: {description}\n\
         Tone of voice: {tone}\n\
         \n\
         Campaign topic: {topic}\n\
         Campaign goal: {goal}\n\
         Call to action: {cta}\n\
         \n\
         Choose the social platforms best suited to this campaign and define \
         the angle for each. Respond with a JSON array only, no surrounding \
         text. Each element must be an object with two string fields: \
         \"platform\" (the platform name, e.g. \"LinkedIn\" or \"Twitter\") \
         and \"directive\" (one or two sentences describing the angle, format, \
         and hook for that platform).",
        name = brand.name,
        description = brand.description,
        tone = brand.tone_of_voice,
        topic = campaign.topic,
        goal = campaign.goal,
        cta = campaign.cta_text.as_deref().unwrap_or("None"),
    )
}

/// Renders the copy prompt for one strategy entry.
#[must_use]
pub fn copy_prompt(brand: &BrandRow, campaign: &CampaignInput, entry: &StrategyEntry) -> String {
    format!(
        "Write a {platform} post for the brand \"{name}\".\n\
         \n\
         Brand description: {description}\n\
         Tone of voice: {tone}\n\
         \n\
         Campaign topic: {topic}\n\
         Campaign goal: {goal}\n\
         Call to action: {cta}\n\
         \n\
         Content directive: {directive}\n\
         \n\
         Write the finished post text only, ready to publish on {platform}. \
         Match the brand's tone of voice, follow the platform's conventions \
         and length norms, and work the call to action in naturally when one \
         is given. Do not include commentary, labels, or markdown formatting.",
        platform = entry.platform,
        name = brand.name,
        description = brand.description,
        tone = brand.tone_of_voice,
        topic = campaign.topic,
        goal = campaign.goal,
        cta = campaign.cta_text.as_deref().unwrap_or("None"),
        directive = entry.directive,
    )
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn test_brand() -> BrandRow {
        BrandRow {
            id: 1,
            public_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Acme Cold Brew".to_string(),
            description: "Small-batch nitro cold brew in cans".to_string(),
            tone_of_voice: "playful but direct".to_string(),
            logo_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        }
    }

    #[test]
    fn strategy_prompt_embeds_brand_and_campaign() {
        let brand = test_brand();
        let campaign = CampaignInput::new(
            "Summer launch",
            Some("Drive preorders".to_string()),
            Some("Join the waitlist".to_string()),
        );

        let prompt = strategy_prompt(&brand, &campaign);

        assert!(prompt.contains("Acme Cold Brew"));
        assert!(prompt.contains("Small-batch nitro cold brew in cans"));
        assert!(prompt.contains("playful but direct"));
        assert!(prompt.contains("Summer launch"));
        assert!(prompt.contains("Drive preorders"));
        assert!(prompt.contains("Join the waitlist"));
        assert!(prompt.contains("JSON array"));
    }

    #[test]
    fn strategy_prompt_renders_absent_cta_as_none() {
        let brand = test_brand();
        let campaign = CampaignInput::new("Summer launch", None, None);

        let prompt = strategy_prompt(&brand, &campaign);

        assert!(prompt.contains("Call to action: None"));
    }

    #[test]
    fn copy_prompt_embeds_platform_and_directive() {
        let brand = test_brand();
        let campaign = CampaignInput::new("Summer launch", None, None);
        let entry = StrategyEntry {
            platform: "LinkedIn".to_string(),
            directive: "Lead with the founder story, end with a question.".to_string(),
        };

        let prompt = copy_prompt(&brand, &campaign, &entry);

        assert!(prompt.contains("Write a LinkedIn post"));
        assert!(prompt.contains("Lead with the founder story, end with a question."));
        assert!(prompt.contains("playful but direct"));
        assert!(prompt.contains("ready to publish on LinkedIn"));
    }

    #[test]
    fn system_prompts_are_fixed() {
        assert_eq!(
            STRATEGY_SYSTEM_PROMPT,
            "You are a strategic social media planner. Always respond with valid JSON."
        );
        assert_eq!(
            COPY_SYSTEM_PROMPT,
            "You are an expert social media copywriter. Create engaging, platform-optimized content."
        );
    }
}
