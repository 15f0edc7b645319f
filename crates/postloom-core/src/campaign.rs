/// Goal applied when a campaign request leaves the field out or blank.
pub const DEFAULT_GOAL: &str = "Generate engagement";

/// Caller-supplied campaign parameters for one generation run.
///
/// `topic` is required and validated by the orchestrator; `goal` is always
/// populated (the default is applied here so every downstream consumer sees
/// a concrete goal).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignInput {
    pub topic: String,
    pub goal: String,
    pub cta_text: Option<String>,
}

impl CampaignInput {
    /// Build a campaign input, substituting [`DEFAULT_GOAL`] when `goal` is
    /// absent or blank.
    #[must_use]
    pub fn new(topic: impl Into<String>, goal: Option<String>, cta_text: Option<String>) -> Self {
        let goal = goal
            .filter(|g| !g.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GOAL.to_string());
        Self {
            topic: topic.into(),
            goal,
            cta_text,
        }
    }
}
