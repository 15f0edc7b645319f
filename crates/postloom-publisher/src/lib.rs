//! Publish worker for postloom.
//!
//! Claims batches of ready posts, hands each to a delivery backend behind the
//! [`Publisher`] trait, and records the terminal outcome per post. Ships with
//! a randomized [`SimulatedPublisher`]; real platform integrations implement
//! the same trait.

pub mod publisher;
pub mod simulator;
pub mod worker;

pub use publisher::{DeliveryError, PublishedPost, Publisher};
pub use simulator::SimulatedPublisher;
pub use worker::{run_publish_batch, PublishResult};
