//! Brief orchestration pipeline for postloom.
//!
//! Turns one campaign request into platform-tailored draft posts: authorizes
//! the brand, creates the brief, asks the model for a content strategy,
//! generates copy per platform entry with partial-failure tolerance, and
//! finalizes the brief status.

pub mod brief;
pub mod error;
pub mod prompts;
pub mod strategy;

pub use brief::{run_brief_generation, BriefRequest, GenerationConfig, GenerationOutcome};
pub use error::PipelineError;
pub use strategy::{parse_strategy_entries, StrategyEntry};
