//! In-memory message model.
//!
//! A [`Message`] is built by the caller for one send attempt. Body content is
//! a tagged list of [`BodyPart`]s, so the transformer never has to inspect a
//! mail library's object graph.

use crate::error::{PostmarkError, PostmarkResult};
use lettre::message::Mailbox;
use std::fmt;

/// Header carrying Postmark tags. May appear more than once.
pub const TAG_HEADER: &str = "Postmark-Tag";

const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// A mailbox: an email address with an optional display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub email: String,
    pub name: Option<String>,
}

impl Address {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    pub fn with_name(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: Some(name.into()),
        }
    }

    /// Parse an RFC 5322 mailbox (`"Name <email>"`, `"\"Last, First\" <email>"`
    /// or a bare `"email"`).
    ///
    /// Input that is not a valid mailbox is kept verbatim as the email so
    /// that [`to_mailbox`](Self::to_mailbox) can reject it when the payload
    /// is built.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        match input.parse::<Mailbox>() {
            Ok(mailbox) => Self::from(mailbox),
            Err(_) => Self::new(input.trim_start_matches('<').trim_end_matches('>').trim()),
        }
    }

    /// An address with a blank email cannot be used as a sender.
    pub fn is_empty(&self) -> bool {
        self.email.trim().is_empty()
    }

    /// Validate the email and pair it with the display name.
    pub fn to_mailbox(&self) -> PostmarkResult<Mailbox> {
        let email = self
            .email
            .trim()
            .parse::<lettre::Address>()
            .map_err(|e| {
                PostmarkError::Validation(format!("invalid address '{}': {}", self.email, e))
            })?;
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        Ok(Mailbox::new(name, email))
    }
}

impl From<Mailbox> for Address {
    fn from(mailbox: Mailbox) -> Self {
        Self {
            email: mailbox.email.to_string(),
            name: mailbox.name.filter(|name| !name.trim().is_empty()),
        }
    }
}

/// Header form of the mailbox. Display names containing specials such as `,`
/// are quoted.
impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_mailbox() {
            Ok(mailbox) => fmt::Display::fmt(&mailbox, f),
            Err(_) => f.write_str(&self.email),
        }
    }
}

/// A single message header. Names compare case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// File attached to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub content_type: String,
    pub name: String,
    pub content: Vec<u8>,
}

impl Attachment {
    pub fn new(
        content_type: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            content_type: content_type.into(),
            name: name.into(),
            content: content.into(),
        }
    }
}

/// One MIME-typed chunk of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyPart {
    Html(String),
    Text(String),
    Attachment(Attachment),
}

impl BodyPart {
    /// Classify a raw MIME chunk by its content type.
    ///
    /// `text/html` and `text/plain` become body content; any other type is
    /// an attachment. Parameters such as `; charset=utf-8` are ignored.
    pub fn from_mime(content_type: &str, filename: Option<&str>, content: Vec<u8>) -> Self {
        match MimeKind::of(content_type) {
            MimeKind::Html => BodyPart::Html(String::from_utf8_lossy(&content).into_owned()),
            MimeKind::Text => BodyPart::Text(String::from_utf8_lossy(&content).into_owned()),
            MimeKind::Other => BodyPart::Attachment(Attachment::new(
                content_type.trim(),
                filename.unwrap_or_default(),
                content,
            )),
        }
    }
}

/// Message body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Body {
    #[default]
    Empty,
    /// A single string body. Its type comes from the message's
    /// `Content-Type` header and defaults to `text/plain`.
    Raw(String),
    Parts(Vec<BodyPart>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MimeKind {
    Html,
    Text,
    Other,
}

impl MimeKind {
    pub(crate) fn of(content_type: &str) -> Self {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "text/html" => MimeKind::Html,
            "text/plain" => MimeKind::Text,
            _ => MimeKind::Other,
        }
    }
}

/// Email message to be sent
#[derive(Debug, Clone, Default)]
pub struct Message {
    /// Explicit sender; wins over `from` when set
    pub sender: Option<Address>,
    pub from: Vec<Address>,
    pub to: Vec<Address>,
    pub cc: Vec<Address>,
    pub bcc: Vec<Address>,
    pub reply_to: Vec<Address>,
    pub subject: Option<String>,
    pub headers: Vec<Header>,
    pub body: Body,
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sender(mut self, address: impl Into<Address>) -> Self {
        self.sender = Some(address.into());
        self
    }

    pub fn from(mut self, address: impl Into<Address>) -> Self {
        self.from.push(address.into());
        self
    }

    pub fn to(mut self, address: impl Into<Address>) -> Self {
        self.to.push(address.into());
        self
    }

    pub fn cc(mut self, address: impl Into<Address>) -> Self {
        self.cc.push(address.into());
        self
    }

    pub fn bcc(mut self, address: impl Into<Address>) -> Self {
        self.bcc.push(address.into());
        self
    }

    pub fn reply_to(mut self, address: impl Into<Address>) -> Self {
        self.reply_to.push(address.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Append a header; repeated names are kept.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Add a Postmark tag.
    pub fn tag(self, tag: impl Into<String>) -> Self {
        self.header(TAG_HEADER, tag)
    }

    /// Replace the body with a single string body.
    pub fn raw_body(mut self, body: impl Into<String>) -> Self {
        self.body = Body::Raw(body.into());
        self
    }

    pub fn html(self, html: impl Into<String>) -> Self {
        self.part(BodyPart::Html(html.into()))
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.part(BodyPart::Text(text.into()))
    }

    pub fn attach(self, attachment: Attachment) -> Self {
        self.part(BodyPart::Attachment(attachment))
    }

    /// Append a body part. A raw body is kept as the first text part.
    pub fn part(mut self, part: BodyPart) -> Self {
        self.body = match std::mem::take(&mut self.body) {
            Body::Empty => Body::Parts(vec![part]),
            Body::Raw(raw) => {
                let first = match self.content_type().map(MimeKind::of) {
                    Some(MimeKind::Html) => BodyPart::Html(raw),
                    _ => BodyPart::Text(raw),
                };
                Body::Parts(vec![first, part])
            }
            Body::Parts(mut parts) => {
                parts.push(part);
                Body::Parts(parts)
            }
        };
        self
    }

    /// Values of every header named `name`, in insertion order.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// First `Content-Type` header, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.header_values(CONTENT_TYPE_HEADER).next()
    }

    /// Total number of To, Cc and Bcc recipients.
    pub fn recipient_count(&self) -> usize {
        self.to.len() + self.cc.len() + self.bcc.len()
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Address::parse(value)
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Address::parse(&value)
    }
}
