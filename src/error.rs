//! Error types for the complibot library.
//!
//! Every failure mode of an audit invocation is a variant of [`AuditError`].
//! An invocation yields exactly one of `AuditOutput` or `AuditError` — there
//! is no partial success, and nothing is retried automatically. Variants are
//! grouped by where in the pipeline they occur:
//!
//! * **Decode** — the document could not be read or parsed. Raised before
//!   any network activity.
//! * **Precondition** — missing credential or empty extracted text. Also
//!   raised before any network activity, so a doomed invocation never costs
//!   a remote call.
//! * **Transport** — the completion service was unreachable, rejected the
//!   request, or returned a body we could not interpret. Surfaced verbatim;
//!   callers that want retries re-invoke the pipeline themselves (see
//!   [`AuditError::is_transport`]).

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the complibot library.
#[derive(Debug, Error)]
pub enum AuditError {
    // ── Decode errors ─────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Report file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// PDF structure is corrupt, encrypted, or otherwise unparseable.
    #[error("Report PDF could not be decoded: {detail}")]
    CorruptPdf { detail: String },

    /// The PDF parsed but text could not be recovered from its pages.
    #[error("Text extraction failed on page {page}: {detail}")]
    ExtractionFailed { page: u32, detail: String },

    // ── Precondition errors ───────────────────────────────────────────────
    /// No API credential was supplied and no client was injected.
    #[error(
        "No API credential configured.\n\
         Pass --api-key or set PERPLEXITY_API_KEY."
    )]
    MissingCredentials,

    /// Extracted text was empty or whitespace after capping; the remote
    /// service is never called for such a document.
    #[error(
        "No text could be extracted from the first {pages_scanned} page(s).\n\
         The document may be scanned images without a text layer."
    )]
    EmptyExtraction { pages_scanned: usize },

    // ── Transport errors ──────────────────────────────────────────────────
    /// The request never produced an HTTP response (DNS, connect, TLS).
    #[error("Completion request failed: {reason}")]
    RequestFailed { reason: String },

    /// The completion call exceeded the configured timeout.
    #[error("Completion call timed out after {elapsed_ms}ms\nIncrease --api-timeout.")]
    ApiTimeout { elapsed_ms: u64 },

    /// The service rejected the credential (401/403).
    #[error("Authentication rejected by completion service: {detail}")]
    AuthError { detail: String },

    /// The service returned a non-success HTTP status.
    #[error("Completion service returned HTTP {status}: {detail}")]
    ApiError { status: u16, detail: String },

    /// The response body did not match the expected completion schema.
    #[error("Malformed completion response: {detail}")]
    MalformedResponse { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output report file.
    #[error("Failed to write report file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuditError {
    /// True for failures of the remote round trip itself.
    ///
    /// These are the only errors where a user-initiated re-invocation has a
    /// reasonable chance of succeeding without changing the input.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            AuditError::RequestFailed { .. }
                | AuditError::ApiTimeout { .. }
                | AuditError::ApiError { .. }
                | AuditError::MalformedResponse { .. }
        )
    }

    /// True when the document itself could not be decoded into text.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            AuditError::FileNotFound { .. }
                | AuditError::PermissionDenied { .. }
                | AuditError::NotAPdf { .. }
                | AuditError::CorruptPdf { .. }
                | AuditError::ExtractionFailed { .. }
        )
    }
}
