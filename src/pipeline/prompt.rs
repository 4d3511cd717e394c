//! Prompt construction: combine a framework profile with extracted text.
//!
//! The instructions and the document text are kept as two distinct message
//! segments — system role and user role — so the model reliably separates
//! "rules to follow" from "data to analyze". Collapsing them into one
//! undifferentiated string is the anti-pattern this module exists to avoid.
//!
//! [`build`] is pure: no I/O, no clock, no mutation of its inputs. All size
//! bounding happened during extraction; the text arrives here final.

use crate::framework::{Framework, FrameworkProfile};
use crate::prompts::REPORT_TEXT_LABEL;
use serde::Serialize;

/// Message role in the completion exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One message of the two-segment exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A fully-formed request for one audit invocation.
///
/// Constructed fresh per invocation and never reused across frameworks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRequest {
    /// Framework whose profile produced the system segment.
    pub framework: Framework,
    /// Extracted document text, exactly as the extractor produced it.
    pub document_text: String,
    /// The two-segment message layout sent to the completion service.
    pub messages: Vec<ChatMessage>,
}

/// Build an [`AuditRequest`] from a profile and extracted text.
///
/// The user segment is the fixed [`REPORT_TEXT_LABEL`], a blank line, then
/// the text verbatim — no truncation or rewriting happens here.
pub fn build(profile: &FrameworkProfile, text: &str) -> AuditRequest {
    AuditRequest {
        framework: profile.id,
        document_text: text.to_string(),
        messages: vec![
            ChatMessage::system(profile.system_instructions),
            ChatMessage::user(format!("{REPORT_TEXT_LABEL}\n\n{text}")),
        ],
    }
}
