//! Integration tests for the Postmark mailer

use async_trait::async_trait;
use postmark_mail::{
    Address, ApiRequest, ApiResponse, Attachment, BodyPart, MailLogger, Message, PostmarkConfig,
    PostmarkError, PostmarkMailer, PostmarkResult, Transport,
};
use std::sync::{Arc, Mutex};
use tracing::Level;

/// Transport that records requests and replies with a canned response
#[derive(Clone)]
struct RecordingTransport {
    requests: Arc<Mutex<Vec<ApiRequest>>>,
    status: u16,
    body: String,
}

impl RecordingTransport {
    fn replying(status: u16, body: &str) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            status,
            body: body.to_string(),
        }
    }

    fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn post(&self, request: ApiRequest) -> PostmarkResult<ApiResponse> {
        self.requests.lock().unwrap().push(request);
        Ok(ApiResponse {
            status: self.status,
            body: self.body.clone(),
        })
    }
}

#[derive(Default)]
struct RecordingLogger {
    lines: Mutex<Vec<String>>,
}

impl MailLogger for RecordingLogger {
    fn log(&self, level: Level, message: &str) {
        assert_eq!(level, Level::DEBUG);
        self.lines.lock().unwrap().push(message.to_string());
    }
}

fn accepted() -> RecordingTransport {
    RecordingTransport::replying(
        200,
        r#"{"To":"a@x.com","SubmittedAt":"2024-05-01T10:00:00Z","MessageID":"0a129aee-e1cd-480d-b08d-4f48548ff48d","ErrorCode":0,"Message":"OK"}"#,
    )
}

fn mailer(transport: &RecordingTransport) -> PostmarkMailer<RecordingTransport> {
    PostmarkMailer::with_transport(
        PostmarkConfig::new("test-token").with_api_url("http://postmark.test"),
        transport.clone(),
    )
    .expect("valid config")
}

#[tokio::test]
async fn test_full_message_is_sent_as_single_payload() {
    let transport = accepted();
    let pdf = b"%PDF-1.7 invoice".to_vec();

    let message = Message::new()
        .from(Address::with_name("shop@x.com", "Shop"))
        .to("a@x.com")
        .cc("b@x.com")
        .bcc("audit@x.com")
        .reply_to("support@x.com")
        .subject("Invoice")
        .text("Invoice attached")
        .html("<p>Invoice attached</p>")
        .part(BodyPart::from_mime("application/pdf", Some("invoice.pdf"), pdf))
        .tag("invoice")
        .tag("billing");

    let result = mailer(&transport).send(&message).await.expect("send succeeds");
    assert_eq!(
        result.message_id.as_deref(),
        Some("0a129aee-e1cd-480d-b08d-4f48548ff48d")
    );

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, "http://postmark.test/email");
    assert_eq!(requests[0].server_token, "test-token");

    let body: serde_json::Value = serde_json::from_str(&requests[0].body).unwrap();
    assert_eq!(body["From"], "Shop <shop@x.com>");
    assert_eq!(body["To"], "a@x.com");
    assert_eq!(body["Cc"], "b@x.com");
    assert_eq!(body["Bcc"], "audit@x.com");
    assert_eq!(body["ReplyTo"], "support@x.com");
    assert_eq!(body["Subject"], "Invoice");
    assert_eq!(body["TextBody"], "Invoice attached");
    assert_eq!(body["HtmlBody"], "<p>Invoice attached</p>");
    assert_eq!(body["Tag"], "invoice,billing");
    assert_eq!(body["Attachments"][0]["ContentType"], "application/pdf");
    assert_eq!(body["Attachments"][0]["Name"], "invoice.pdf");
    assert_eq!(body["Attachments"][0]["Content"], "JVBERi0xLjcgaW52b2ljZQ==");
}

#[tokio::test]
async fn test_too_many_recipients_is_rejected_before_sending() {
    let transport = accepted();
    let message = (0..21).fold(
        Message::new().from("shop@x.com").text("hi"),
        |message, i| message.to(format!("user{i}@x.com")),
    );

    let err = mailer(&transport).send(&message).await.unwrap_err();

    assert!(matches!(err, PostmarkError::Validation(_)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_rejected_message_surfaces_api_code() {
    let transport = RecordingTransport::replying(422, r#"{"ErrorCode":10,"Message":"bad"}"#);

    let err = mailer(&transport)
        .send(&Message::new().from("shop@x.com").to("a@x.com").text("hi"))
        .await
        .unwrap_err();

    let text = err.to_string();
    assert!(matches!(err, PostmarkError::Validation(_)));
    assert!(text.contains("10") && text.contains("bad"));
}

#[tokio::test]
async fn test_debug_mode_logs_redacted_summary() {
    let transport = accepted();
    let logger = Arc::new(RecordingLogger::default());
    let mailer = PostmarkMailer::with_transport(
        PostmarkConfig::new("test-token").with_debug(true),
        transport.clone(),
    )
    .unwrap()
    .with_logger(logger.clone());

    let message = Message::new()
        .from("shop@x.com")
        .to("hidden@x.com")
        .subject("Welcome")
        .text("top secret text")
        .attach(Attachment::new("image/png", "logo.png", vec![0x89, 0x50]))
        .tag("welcome");

    mailer.send(&message).await.unwrap();

    let lines = logger.lines.lock().unwrap().clone();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("Subject='Welcome'"));
    assert!(lines[0].contains("Tag='welcome'"));
    assert!(lines[0].ends_with("sent"));
    assert!(!lines[0].contains("hidden@x.com"));
    assert!(!lines[0].contains("top secret text"));
}
