//! Postmark transport for transactional email
//!
//! Translates an in-memory [`Message`] into the JSON body of Postmark's
//! `POST /email` endpoint, sends it once, and classifies the response.
//!
//! ## Components
//!
//! - **Models**: `Message`, `Address`, `BodyPart`, `Attachment`
//! - **Payload**: `OutboundPayload` with recipient, sender and body validation
//! - **Transport**: `Transport` trait and the `reqwest`-backed `ReqwestTransport`
//! - **Provider**: `PostmarkMailer`, the `EmailProvider` implementation
//!
//! ## Usage
//!
//! ```ignore
//! use postmark_mail::{Message, PostmarkConfig, PostmarkMailer};
//!
//! let mailer = PostmarkMailer::new(PostmarkConfig::new(token))?;
//! let message = Message::new()
//!     .from("Shop <shop@example.com>")
//!     .to("customer@example.com")
//!     .subject("Your order has shipped")
//!     .html("<p>On its way!</p>")
//!     .tag("shipping");
//! let result = mailer.send(&message).await?;
//! ```

pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod payload;
pub mod provider;
pub mod response;
pub mod transport;

pub use config::PostmarkConfig;
pub use error::{PostmarkError, PostmarkResult};
pub use logger::{MailLogger, TracingMailLogger};
pub use models::{Address, Attachment, Body, BodyPart, Header, Message, TAG_HEADER};
pub use payload::{OutboundAttachment, OutboundPayload, MAX_RECIPIENTS};
pub use provider::{EmailProvider, PostmarkMailer};
pub use response::{parse_response, SendResult};
pub use transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};
