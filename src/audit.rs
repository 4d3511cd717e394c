//! Audit entry points: the full extract → prompt → complete pipeline.
//!
//! One invocation is one logical request: a synchronous decode of the
//! capped document text, a single blocking network round trip, and a
//! verbatim pass-through of the completion. There is no internal
//! concurrency and no shared mutable state — concurrent callers each
//! drive an independent invocation against the read-only framework
//! registry.

use crate::config::AuditConfig;
use crate::error::AuditError;
use crate::framework::FrameworkProfile;
use crate::output::{AuditOutput, AuditStats, DocumentInfo};
use crate::pipeline::client::{CompletionClient, HttpCompletionClient};
use crate::pipeline::{extract, input, prompt, validate};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Audit a local PDF report against the configured framework.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// Decode and precondition failures abort before any network call;
/// transport failures surface immediately with no automatic retry. Exactly
/// one of `AuditOutput` / `AuditError` results from each invocation.
pub async fn audit(
    path: impl AsRef<Path>,
    config: &AuditConfig,
) -> Result<AuditOutput, AuditError> {
    let bytes = input::read_pdf(path)?;
    audit_bytes(&bytes, config).await
}

/// Audit an in-memory PDF payload.
///
/// Useful when the report arrives from an upload or a database rather than
/// the filesystem.
pub async fn audit_bytes(bytes: &[u8], config: &AuditConfig) -> Result<AuditOutput, AuditError> {
    let total_start = Instant::now();
    let profile = config.framework.profile();
    info!("Starting audit against {}", profile.display_name);

    // Client resolution first: a missing credential fails before we spend
    // any time decoding the document.
    let client = resolve_client(config)?;

    let extract_start = Instant::now();
    let extraction = {
        let bytes = bytes.to_vec();
        let max_pages = config.max_pages;
        tokio::task::spawn_blocking(move || extract::extract_text(&bytes, max_pages))
            .await
            .map_err(|e| AuditError::Internal(format!("extraction task: {e}")))??
    };
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;
    info!(
        "Document loaded: {} characters from {}/{} pages",
        extraction.char_count(),
        extraction.pages_used,
        extraction.page_count
    );

    if extraction.is_blank() {
        return Err(AuditError::EmptyExtraction {
            pages_scanned: extraction.pages_used,
        });
    }

    run_completion(
        client,
        profile,
        &extraction.text,
        AuditStats {
            page_count: extraction.page_count,
            pages_used: extraction.pages_used,
            extracted_chars: extraction.char_count(),
            extract_duration_ms,
            ..Default::default()
        },
        total_start,
        config,
    )
    .await
}

/// Audit already-extracted report text.
///
/// The seam for callers that bring their own text extractor: the pipeline
/// from prompt construction onward is identical to [`audit`].
pub async fn audit_text(text: &str, config: &AuditConfig) -> Result<AuditOutput, AuditError> {
    let total_start = Instant::now();
    let profile = config.framework.profile();

    let client = resolve_client(config)?;

    if text.trim().is_empty() {
        return Err(AuditError::EmptyExtraction { pages_scanned: 0 });
    }

    run_completion(
        client,
        profile,
        text,
        AuditStats {
            extracted_chars: text.chars().count(),
            ..Default::default()
        },
        total_start,
        config,
    )
    .await
}

/// Audit a report and write the markdown artifact to a file.
///
/// Uses an atomic write (temp file + rename) so a failed invocation never
/// leaves a partial report behind. The conventional artifact name is
/// `audit_report.md`; the CLI applies it as the default.
pub async fn audit_to_file(
    path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &AuditConfig,
) -> Result<AuditOutput, AuditError> {
    let output = audit(path, config).await?;
    let out = output_path.as_ref();

    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AuditError::OutputWriteFailed {
                    path: out.to_path_buf(),
                    source: e,
                })?;
        }
    }

    let tmp = out.with_extension("md.tmp");
    tokio::fs::write(&tmp, &output.markdown)
        .await
        .map_err(|e| AuditError::OutputWriteFailed {
            path: out.to_path_buf(),
            source: e,
        })?;
    tokio::fs::rename(&tmp, out)
        .await
        .map_err(|e| AuditError::OutputWriteFailed {
            path: out.to_path_buf(),
            source: e,
        })?;

    Ok(output)
}

/// Synchronous wrapper around [`audit`].
///
/// Creates a temporary tokio runtime internally.
pub fn audit_sync(
    path: impl AsRef<Path>,
    config: &AuditConfig,
) -> Result<AuditOutput, AuditError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| AuditError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(audit(path, config))
}

/// Report page count and capped character count without a credential or
/// any network call.
pub async fn inspect(
    path: impl AsRef<Path>,
    max_pages: usize,
) -> Result<DocumentInfo, AuditError> {
    let bytes = input::read_pdf(path)?;
    let extraction = tokio::task::spawn_blocking(move || extract::extract_text(&bytes, max_pages))
        .await
        .map_err(|e| AuditError::Internal(format!("extraction task: {e}")))??;

    Ok(DocumentInfo {
        page_count: extraction.page_count,
        pages_used: extraction.pages_used,
        extracted_chars: extraction.char_count(),
    })
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Use the injected client when present, otherwise construct an HTTP
/// client for this invocation from the invocation-scoped credential.
fn resolve_client(config: &AuditConfig) -> Result<Arc<dyn CompletionClient>, AuditError> {
    if let Some(ref client) = config.client {
        return Ok(Arc::clone(client));
    }
    Ok(Arc::new(HttpCompletionClient::from_config(config)?))
}

/// The shared back half of every audit: build the request, run the round
/// trip, check the header, assemble the output.
async fn run_completion(
    client: Arc<dyn CompletionClient>,
    profile: &'static FrameworkProfile,
    text: &str,
    mut stats: AuditStats,
    total_start: Instant,
    config: &AuditConfig,
) -> Result<AuditOutput, AuditError> {
    let request = prompt::build(profile, text);

    let completion_start = Instant::now();
    let completion = client.complete(&request).await?;
    stats.completion_duration_ms = completion_start.elapsed().as_millis() as u64;
    let generated_at = Utc::now();

    stats.prompt_tokens = completion.prompt_tokens;
    stats.completion_tokens = completion.completion_tokens;

    stats.columns_verified = if config.validate_columns {
        let ok = validate::table_header_matches(&completion.content, profile.output_columns);
        if !ok {
            warn!(
                "Returned table header does not match expected columns {}",
                profile.header_row()
            );
        }
        ok
    } else {
        true
    };

    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    info!(
        "Audit complete: {} chars of markdown in {}ms",
        completion.content.len(),
        stats.total_duration_ms
    );

    Ok(AuditOutput {
        framework: profile.id,
        markdown: completion.content,
        generated_at,
        stats,
    })
}
