//! Turns command-line arguments into a [`Message`].

use clap::Args;
use eyre::{Result, WrapErr};
use postmark_mail::{Attachment, Message};
use std::path::{Path, PathBuf};

/// Message fields shared by `preview` and `send`
#[derive(Args, Debug, Clone)]
pub struct ComposeArgs {
    /// Sender, e.g. "Shop <shop@example.com>"
    #[arg(long)]
    pub from: String,

    /// To recipient (repeatable). A display name may contain commas:
    /// --to '"Doe, Jane" <jane@example.com>'
    #[arg(long)]
    pub to: Vec<String>,

    /// Cc recipient (repeatable)
    #[arg(long)]
    pub cc: Vec<String>,

    /// Bcc recipient (repeatable)
    #[arg(long)]
    pub bcc: Vec<String>,

    /// Reply-To address (repeatable)
    #[arg(long)]
    pub reply_to: Vec<String>,

    #[arg(short, long)]
    pub subject: Option<String>,

    /// Plain-text body
    #[arg(long)]
    pub text: Option<String>,

    /// HTML body
    #[arg(long)]
    pub html: Option<String>,

    /// File to attach (repeatable)
    #[arg(long = "attach")]
    pub attachments: Vec<PathBuf>,

    /// Postmark tag (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

impl ComposeArgs {
    pub fn to_message(&self) -> Result<Message> {
        let mut message = Message::new().from(self.from.as_str());

        for address in &self.to {
            message = message.to(address.as_str());
        }
        for address in &self.cc {
            message = message.cc(address.as_str());
        }
        for address in &self.bcc {
            message = message.bcc(address.as_str());
        }
        for address in &self.reply_to {
            message = message.reply_to(address.as_str());
        }
        if let Some(subject) = &self.subject {
            message = message.subject(subject.as_str());
        }
        if let Some(text) = &self.text {
            message = message.text(text.as_str());
        }
        if let Some(html) = &self.html {
            message = message.html(html.as_str());
        }
        for path in &self.attachments {
            message = message.attach(read_attachment(path)?);
        }
        for tag in &self.tags {
            message = message.tag(tag.as_str());
        }

        Ok(message)
    }
}

fn read_attachment(path: &Path) -> Result<Attachment> {
    let content = std::fs::read(path)
        .wrap_err_with(|| format!("Failed to read attachment {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content_type = mime_guess::from_path(path).first_or_octet_stream();

    Ok(Attachment::new(content_type.essence_str(), name, content))
}
