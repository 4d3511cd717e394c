//! End-to-end integration tests for complibot.
//!
//! The completion service is a wiremock stub server, so every scenario —
//! including transport failures and zero-call assertions — runs hermetic
//! and fast. PDFs are built in memory with lopdf; no fixture files.

use async_trait::async_trait;
use complibot::{
    audit_bytes, audit_text, audit_to_file, AuditConfig, AuditError, AuditRequest, Completion,
    CompletionClient, Framework,
};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Build a minimal text-bearing PDF with one page per entry in `pages`.
fn make_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let kids_len = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => kids_len,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

const CSRD_TABLE: &str = "| Metric | Value | Unit | Page Ref |\n|---|---|---|---|\n| Gross Scope 1 | 500 | tCO2e | 1 |\n| Gross Scope 2 (Market-based) | 300 | tCO2e | 1 |\n";

/// Chat-completion JSON body the stub service returns.
fn completion_json(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "cmpl-test",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 210, "completion_tokens": 64, "total_tokens": 274 }
    })
}

/// Config pointed at a stub server.
fn stub_config(server: &MockServer, framework: Framework) -> AuditConfig {
    AuditConfig::builder()
        .framework(framework)
        .api_key("test-key")
        .base_url(server.uri())
        .build()
        .expect("valid config")
}

/// Call-counting test double for the completion client seam.
struct CountingClient {
    calls: AtomicUsize,
    response: String,
}

impl CountingClient {
    fn new(response: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            response: response.to_string(),
        })
    }
}

#[async_trait]
impl CompletionClient for CountingClient {
    async fn complete(&self, _request: &AuditRequest) -> Result<Completion, AuditError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Completion {
            content: self.response.clone(),
            prompt_tokens: 0,
            completion_tokens: 0,
        })
    }
}

// ── CSRD end-to-end ──────────────────────────────────────────────────────────

#[tokio::test]
async fn csrd_audit_sends_framework_instructions_and_forwards_table_verbatim() {
    let server = MockServer::start().await;

    // The system segment must carry the ESRS E1 instruction text and the
    // expected columns; the user segment the labelled report text.
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_string_contains("ESRS E1"))
        .and(body_string_contains("Metric | Value | Unit | Page Ref"))
        .and(body_string_contains("Here is the report text:"))
        .and(body_string_contains("Scope 1: 500 tCO2e"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_json(CSRD_TABLE)))
        .expect(1)
        .mount(&server)
        .await;

    let config = stub_config(&server, Framework::Csrd);
    let output = audit_text(
        "Scope 1: 500 tCO2e. Scope 2 (market-based): 300 tCO2e.",
        &config,
    )
    .await
    .expect("audit should succeed");

    assert_eq!(output.framework, Framework::Csrd);
    assert_eq!(output.markdown, CSRD_TABLE, "stub body must pass through unmodified");
    assert!(output.stats.columns_verified);
    assert_eq!(output.stats.prompt_tokens, 210);
    assert_eq!(output.stats.completion_tokens, 64);
}

#[tokio::test]
async fn compliance_marker_in_model_output_is_preserved() {
    let server = MockServer::start().await;
    let body = "| Metric | Value | Unit | Page Ref |\n|---|---|---|---|\n| Gross Scope 2 | Non-Compliant with ESRS E1 | — | — |\n";

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_json(body)))
        .mount(&server)
        .await;

    let config = stub_config(&server, Framework::Csrd);
    let output = audit_text("Scope 1 only: 500 tCO2e.", &config).await.unwrap();

    // Downstream consumers detect non-compliance by searching for the
    // profile's marker; it must survive pass-through.
    let marker = Framework::Csrd.profile().compliance_marker.unwrap();
    assert!(output.markdown.contains(marker));
}

// ── Full pipeline from PDF bytes ─────────────────────────────────────────────

#[tokio::test]
async fn pdf_audit_caps_extraction_at_two_pages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_json(CSRD_TABLE)))
        .expect(1)
        .mount(&server)
        .await;

    let pdf = make_pdf(&[
        "Page one: Scope 1: 500 tCO2e.",
        "Page two: Scope 2 market-based: 300 tCO2e.",
        "Page three: unrelated appendix.",
        "Page four.",
        "Page five.",
    ]);

    let config = stub_config(&server, Framework::Csrd);
    let output = audit_bytes(&pdf, &config).await.expect("audit should succeed");

    assert_eq!(output.stats.page_count, 5);
    assert_eq!(output.stats.pages_used, 2);
    assert!(output.stats.extracted_chars > 0);

    // The request body must contain pages 1–2 and nothing past the cap.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body = String::from_utf8_lossy(&requests[0].body).to_string();
    assert!(body.contains("Page one"));
    assert!(body.contains("Page two"));
    assert!(!body.contains("Page three"), "page 3 must never be sent");
}

#[tokio::test]
async fn audit_to_file_writes_the_markdown_artifact() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_json(CSRD_TABLE)))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let pdf_path = dir.path().join("excerpt.pdf");
    std::fs::write(&pdf_path, make_pdf(&["Scope 1: 500 tCO2e."])).unwrap();
    let out_path = dir.path().join("audit_report.md");

    let config = stub_config(&server, Framework::Csrd);
    let output = audit_to_file(&pdf_path, &out_path, &config).await.unwrap();

    let written = std::fs::read_to_string(&out_path).unwrap();
    assert_eq!(written, output.markdown);
    assert_eq!(written, CSRD_TABLE);
}

// ── Preconditions: no wasted remote calls ───────────────────────────────────

#[tokio::test]
async fn empty_text_fails_without_any_remote_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_json(CSRD_TABLE)))
        .expect(0)
        .mount(&server)
        .await;

    let config = stub_config(&server, Framework::Generic);
    let err = audit_text("", &config).await.unwrap_err();
    assert!(matches!(err, AuditError::EmptyExtraction { .. }), "got {err:?}");

    server.verify().await;
}

#[tokio::test]
async fn whitespace_only_text_counts_as_empty_with_injected_double() {
    let client = CountingClient::new(CSRD_TABLE);
    let config = AuditConfig::builder()
        .framework(Framework::Generic)
        .client(client.clone())
        .build()
        .unwrap();

    let err = audit_text("   \n\t  ", &config).await.unwrap_err();
    assert!(matches!(err, AuditError::EmptyExtraction { .. }));
    assert_eq!(client.calls.load(Ordering::SeqCst), 0, "double must never be invoked");
}

#[tokio::test]
async fn missing_credential_fails_before_extraction() {
    let config = AuditConfig::builder()
        .framework(Framework::Csrd)
        .build()
        .unwrap();

    let err = audit_text("Scope 1: 500 tCO2e.", &config).await.unwrap_err();
    assert!(matches!(err, AuditError::MissingCredentials));
}

#[tokio::test]
async fn injected_client_needs_no_credential() {
    let client = CountingClient::new(CSRD_TABLE);
    let config = AuditConfig::builder()
        .framework(Framework::Csrd)
        .client(client.clone())
        .build()
        .unwrap();

    let output = audit_text("Scope 1: 500 tCO2e.", &config).await.unwrap();
    assert_eq!(output.markdown, CSRD_TABLE);
    assert_eq!(client.calls.load(Ordering::SeqCst), 1);
}

// ── Transport failures ───────────────────────────────────────────────────────

#[tokio::test]
async fn http_500_surfaces_as_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let config = stub_config(&server, Framework::Csrd);
    let err = audit_text("Scope 1: 500 tCO2e.", &config).await.unwrap_err();

    match err {
        AuditError::ApiError { status, ref detail } => {
            assert_eq!(status, 500);
            assert!(detail.contains("backend exploded"));
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
    assert!(err.is_transport());

    // Exactly one attempt: no automatic retry.
    server.verify().await;
}

#[tokio::test]
async fn http_401_surfaces_as_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let config = stub_config(&server, Framework::Generic);
    let err = audit_text("Scope 1: 500 tCO2e.", &config).await.unwrap_err();

    match err {
        AuditError::AuthError { ref detail } => assert!(detail.contains("invalid api key")),
        other => panic!("expected AuthError, got {other:?}"),
    }
    assert!(!err.is_transport(), "auth failures should not look retryable");
}

#[tokio::test]
async fn non_json_body_surfaces_as_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let config = stub_config(&server, Framework::Generic);
    let err = audit_text("Scope 1: 500 tCO2e.", &config).await.unwrap_err();
    assert!(matches!(err, AuditError::MalformedResponse { .. }), "got {err:?}");
}

#[tokio::test]
async fn empty_choices_surfaces_as_malformed_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
        )
        .mount(&server)
        .await;

    let config = stub_config(&server, Framework::Generic);
    let err = audit_text("Scope 1: 500 tCO2e.", &config).await.unwrap_err();
    assert!(matches!(err, AuditError::MalformedResponse { .. }));
}

// ── Output validation (warn-only) ────────────────────────────────────────────

#[tokio::test]
async fn mismatched_header_is_flagged_but_not_rejected() {
    let server = MockServer::start().await;
    let drifted = "| Indicator | Amount |\n|---|---|\n| Scope 1 | 500 |\n";
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_json(drifted)))
        .mount(&server)
        .await;

    let config = stub_config(&server, Framework::Csrd);
    let output = audit_text("Scope 1: 500 tCO2e.", &config).await.unwrap();

    assert_eq!(output.markdown, drifted, "result must not be rejected or rewritten");
    assert!(!output.stats.columns_verified);
}

#[tokio::test]
async fn validation_can_be_disabled() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_json("no table here")))
        .mount(&server)
        .await;

    let config = AuditConfig::builder()
        .framework(Framework::Csrd)
        .api_key("test-key")
        .base_url(server.uri())
        .validate_columns(false)
        .build()
        .unwrap();

    let output = audit_text("Scope 1: 500 tCO2e.", &config).await.unwrap();
    assert!(output.stats.columns_verified);
}

// ── Decode failures ──────────────────────────────────────────────────────────

#[tokio::test]
async fn corrupt_payload_fails_before_any_remote_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_json(CSRD_TABLE)))
        .expect(0)
        .mount(&server)
        .await;

    let config = stub_config(&server, Framework::Generic);
    let err = audit_bytes(b"%PDF-1.5 then garbage", &config).await.unwrap_err();
    assert!(err.is_decode(), "got {err:?}");

    server.verify().await;
}

#[tokio::test]
async fn each_framework_sends_its_own_instructions() {
    for fw in Framework::ALL {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_json("| a |\n")))
            .expect(1)
            .mount(&server)
            .await;

        let config = stub_config(&server, fw);
        audit_text("Scope 1: 500 tCO2e.", &config).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body = String::from_utf8_lossy(&requests[0].body).to_string();
        // The body is JSON-escaped; compare against an escaped fragment of
        // the first instruction line.
        let first_line = fw.profile().system_instructions.lines().next().unwrap();
        let escaped = serde_json::to_string(first_line).unwrap();
        assert!(
            body.contains(escaped.trim_matches('"')),
            "{fw}: request body missing its instructions"
        );
    }
}
