//! Output types returned from a successful audit.

use crate::framework::Framework;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The result of one audit invocation.
///
/// Immutable once produced. `markdown` is the completion service's output
/// passed through verbatim — the pipeline performs no parsing or rewriting
/// of the table, so whatever the model emitted (including a framework's
/// compliance-failure phrase) survives to the presenter and the download
/// artifact unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditOutput {
    /// Framework the document was audited against.
    pub framework: Framework,
    /// Raw markdown compliance table from the completion service.
    pub markdown: String,
    /// When the completion arrived.
    pub generated_at: DateTime<Utc>,
    /// Pipeline counters for this invocation.
    pub stats: AuditStats,
}

/// Counters describing what one invocation read, sent, and received.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditStats {
    /// Total pages in the source document.
    pub page_count: usize,
    /// Pages actually decoded (≤ the configured cap).
    pub pages_used: usize,
    /// Characters of text extracted and sent for analysis.
    pub extracted_chars: usize,
    /// Prompt tokens reported by the completion service (0 if not reported).
    pub prompt_tokens: u32,
    /// Completion tokens reported by the completion service (0 if not reported).
    pub completion_tokens: u32,
    /// Wall-clock time spent decoding the document.
    pub extract_duration_ms: u64,
    /// Wall-clock time spent in the completion round trip.
    pub completion_duration_ms: u64,
    /// Total invocation time.
    pub total_duration_ms: u64,
    /// Whether the returned table header matched the profile's expected
    /// columns (always true when validation is disabled).
    pub columns_verified: bool,
}

/// Cheap document facts available without a credential or network call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// Total pages in the document.
    pub page_count: usize,
    /// Pages the configured cap would decode.
    pub pages_used: usize,
    /// Characters of text the capped extraction yields.
    pub extracted_chars: usize,
}
