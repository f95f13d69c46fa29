//! Logging collaborator used for the debug-mode send summary.

use tracing::Level;

/// Receives human-readable log lines from the mailer.
pub trait MailLogger: Send + Sync {
    fn log(&self, level: Level, message: &str);
}

/// Forwards log lines into `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMailLogger;

impl MailLogger for TracingMailLogger {
    fn log(&self, level: Level, message: &str) {
        // tracing needs the level at compile time
        match level {
            Level::ERROR => tracing::error!(target: "postmark_mail", "{}", message),
            Level::WARN => tracing::warn!(target: "postmark_mail", "{}", message),
            Level::INFO => tracing::info!(target: "postmark_mail", "{}", message),
            Level::DEBUG => tracing::debug!(target: "postmark_mail", "{}", message),
            _ => tracing::trace!(target: "postmark_mail", "{}", message),
        }
    }
}
