//! Email provider surface

pub mod postmark;

pub use postmark::PostmarkMailer;

use crate::error::PostmarkResult;
use crate::models::Message;
use crate::response::SendResult;
use async_trait::async_trait;

/// Trait for email providers
#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Send a single message
    async fn send(&self, message: &Message) -> PostmarkResult<SendResult>;

    /// Check that the provider is configured
    async fn health_check(&self) -> PostmarkResult<()>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}
