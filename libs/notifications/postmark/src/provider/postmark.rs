//! Postmark email provider
//!
//! Sends one message per call via `POST /email`. No retries: any failure is
//! returned to the caller as a [`PostmarkError`].

use crate::config::PostmarkConfig;
use crate::error::{PostmarkError, PostmarkResult};
use crate::logger::{MailLogger, TracingMailLogger};
use crate::models::Message;
use crate::payload::OutboundPayload;
use crate::provider::EmailProvider;
use crate::response::{parse_response, SendResult};
use crate::transport::{ApiRequest, ReqwestTransport, Transport};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument, warn, Level};

/// Postmark email provider
pub struct PostmarkMailer<T: Transport = ReqwestTransport> {
    config: PostmarkConfig,
    transport: T,
    logger: Arc<dyn MailLogger>,
}

impl PostmarkMailer<ReqwestTransport> {
    /// Create a mailer that talks to Postmark over HTTPS.
    ///
    /// Fails with [`PostmarkError::Config`] when the server token is blank.
    pub fn new(config: PostmarkConfig) -> PostmarkResult<Self> {
        ensure_server_token(&config)?;
        let transport = ReqwestTransport::new(config.timeout)?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> PostmarkMailer<T> {
    /// Create a mailer over a custom transport.
    pub fn with_transport(config: PostmarkConfig, transport: T) -> PostmarkResult<Self> {
        ensure_server_token(&config)?;
        Ok(Self {
            config,
            transport,
            logger: Arc::new(TracingMailLogger),
        })
    }

    /// Replace the logger that receives the debug-mode summary.
    pub fn with_logger(mut self, logger: Arc<dyn MailLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &PostmarkConfig {
        &self.config
    }

    /// Validate, translate and send `message`.
    ///
    /// In debug mode a redacted summary (From, Subject, ReplyTo, Tag) is
    /// logged whether the send succeeded or not.
    #[instrument(
        skip(self, message),
        fields(recipients = message.recipient_count(), debug_mode = self.config.debug)
    )]
    pub async fn send(&self, message: &Message) -> PostmarkResult<SendResult> {
        let mut summary = OutboundPayload::default();
        let result = self.dispatch(message, &mut summary).await;

        // Error text can quote recipients; only the debug summary carries it.
        if let Err(err) = &result {
            warn!(kind = err.kind(), retryable = err.is_retryable(), "Postmark send failed");
        }

        if self.config.debug {
            self.logger.log(Level::DEBUG, &summary_line(&summary, &result));
        }

        result
    }

    async fn dispatch(
        &self,
        message: &Message,
        summary: &mut OutboundPayload,
    ) -> PostmarkResult<SendResult> {
        let payload = OutboundPayload::build(message, summary)?;
        let body = serde_json::to_string(&payload)?;

        debug!(
            attachments = payload.attachments.len(),
            has_html = !payload.html_body.is_empty(),
            has_text = !payload.text_body.is_empty(),
            "Sending email via Postmark"
        );

        let response = self
            .transport
            .post(ApiRequest {
                url: self.config.email_endpoint(),
                server_token: self.config.server_token.clone(),
                body,
            })
            .await?;

        let result = parse_response(response.status, &response.body)?;
        debug!(message_id = ?result.message_id, "Email accepted by Postmark");

        Ok(result)
    }
}

#[async_trait]
impl<T: Transport> EmailProvider for PostmarkMailer<T> {
    async fn send(&self, message: &Message) -> PostmarkResult<SendResult> {
        PostmarkMailer::send(self, message).await
    }

    async fn health_check(&self) -> PostmarkResult<()> {
        ensure_server_token(&self.config)
    }

    fn name(&self) -> &'static str {
        "postmark"
    }
}

fn ensure_server_token(config: &PostmarkConfig) -> PostmarkResult<()> {
    if config.server_token.trim().is_empty() {
        return Err(PostmarkError::Config(
            "Postmark server token is not configured".to_string(),
        ));
    }
    Ok(())
}

/// One-line summary with no recipients and no body content.
fn summary_line(summary: &OutboundPayload, result: &PostmarkResult<SendResult>) -> String {
    let status = match result {
        Ok(_) => "sent".to_string(),
        Err(err) => format!("failed with error '{}'", err),
    };

    format!(
        "Postmark email From='{}' Subject='{}' ReplyTo='{}' Tag='{}' {}",
        summary.from, summary.subject, summary.reply_to, summary.tag, status
    )
}
