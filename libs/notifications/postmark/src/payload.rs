//! Translation of a [`Message`] into the Postmark `/email` request body.

use crate::error::{PostmarkError, PostmarkResult};
use crate::models::{Address, Attachment, Body, BodyPart, Message, MimeKind, TAG_HEADER};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Serialize;

/// Postmark accepts at most this many recipients (To + Cc + Bcc) per message.
pub const MAX_RECIPIENTS: usize = 20;

/// JSON body of `POST /email`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutboundPayload {
    pub from: String,
    pub to: String,
    pub cc: String,
    pub bcc: String,
    pub subject: String,
    pub reply_to: String,
    pub html_body: String,
    pub text_body: String,
    pub attachments: Vec<OutboundAttachment>,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutboundAttachment {
    pub content_type: String,
    pub name: String,
    /// Base64 of the raw bytes
    pub content: String,
}

impl From<&Attachment> for OutboundAttachment {
    fn from(attachment: &Attachment) -> Self {
        Self {
            content_type: attachment.content_type.clone(),
            name: attachment.name.clone(),
            content: BASE64.encode(&attachment.content),
        }
    }
}

impl OutboundPayload {
    /// Build the payload, enforcing the recipient, sender and body rules.
    pub fn from_message(message: &Message) -> PostmarkResult<Self> {
        Self::build(message, &mut Self::default())
    }

    /// Same as [`from_message`](Self::from_message), but fills `progress`
    /// field by field so a caller can still see what was extracted when a
    /// later step fails.
    pub(crate) fn build(message: &Message, progress: &mut Self) -> PostmarkResult<Self> {
        let (to, cc, bcc) = extract_recipients(message)?;
        progress.to = to;
        progress.cc = cc;
        progress.bcc = bcc;

        progress.from = extract_sender(message)?;
        progress.subject = message.subject.clone().unwrap_or_default();
        progress.reply_to = join_addresses(&message.reply_to)?;

        let (html_body, text_body) = extract_body(message)?;
        progress.html_body = html_body;
        progress.text_body = text_body;

        progress.attachments = extract_attachments(message);
        progress.tag = extract_tags(message);

        Ok(progress.clone())
    }
}

/// Header form of each mailbox, comma separated. Fails on the first address
/// that is not a valid mailbox.
fn join_addresses(addresses: &[Address]) -> PostmarkResult<String> {
    let mailboxes = addresses
        .iter()
        .map(|address| address.to_mailbox().map(|mailbox| mailbox.to_string()))
        .collect::<PostmarkResult<Vec<_>>>()?;

    Ok(mailboxes.join(","))
}

fn extract_recipients(message: &Message) -> PostmarkResult<(String, String, String)> {
    let total = message.recipient_count();

    if total == 0 {
        return Err(PostmarkError::Validation(
            "message has no recipients".to_string(),
        ));
    }
    if total > MAX_RECIPIENTS {
        return Err(PostmarkError::Validation(format!(
            "message has {} recipients, the maximum is {}",
            total, MAX_RECIPIENTS
        )));
    }

    Ok((
        join_addresses(&message.to)?,
        join_addresses(&message.cc)?,
        join_addresses(&message.bcc)?,
    ))
}

fn extract_sender(message: &Message) -> PostmarkResult<String> {
    message
        .sender
        .iter()
        .chain(message.from.first())
        .find(|address| !address.is_empty())
        .ok_or_else(|| PostmarkError::Validation("message has no sender address".to_string()))?
        .to_mailbox()
        .map(|mailbox| mailbox.to_string())
}

/// HTML and text bodies. Several parts of the same kind are joined with a
/// newline, in order.
fn extract_body(message: &Message) -> PostmarkResult<(String, String)> {
    let mut html: Vec<&str> = Vec::new();
    let mut text: Vec<&str> = Vec::new();

    match &message.body {
        Body::Empty => {}
        Body::Raw(raw) => match message.content_type().map(MimeKind::of) {
            Some(MimeKind::Html) => html.push(raw),
            _ => text.push(raw),
        },
        Body::Parts(parts) => {
            for part in parts {
                match part {
                    BodyPart::Html(content) => html.push(content),
                    BodyPart::Text(content) => text.push(content),
                    BodyPart::Attachment(_) => {}
                }
            }
        }
    }

    let (html, text) = (html.join("\n"), text.join("\n"));
    if html.is_empty() && text.is_empty() {
        return Err(PostmarkError::Validation(
            "message has neither an HTML nor a text body".to_string(),
        ));
    }

    Ok((html, text))
}

fn extract_attachments(message: &Message) -> Vec<OutboundAttachment> {
    match &message.body {
        Body::Parts(parts) => parts
            .iter()
            .filter_map(|part| match part {
                BodyPart::Attachment(attachment) => Some(OutboundAttachment::from(attachment)),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn extract_tags(message: &Message) -> String {
    message
        .header_values(TAG_HEADER)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}
