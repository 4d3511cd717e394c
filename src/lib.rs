//! # complibot
//!
//! Audit sustainability report excerpts for GHG disclosure compliance
//! using a remote language model.
//!
//! ## Why this crate?
//!
//! GHG "Scope 1/2" figures hide in free-form report prose, and every
//! disclosure framework (CSRD, GRI 305, SASB) wants different indicator
//! codes reported in a different table shape. This crate extracts text
//! from a report excerpt, instructs a completion service with the selected
//! framework's extraction rules, and returns the resulting markdown
//! compliance table verbatim.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     read payload, verify %PDF magic
//!  ├─ 2. Extract   decode text from the first N pages (lopdf, spawn_blocking)
//!  ├─ 3. Profile   look up the framework's instruction record
//!  ├─ 4. Prompt    system instructions + labelled report text
//!  ├─ 5. Complete  single round trip to the completion service
//!  └─ 6. Output    verbatim markdown table + invocation stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use complibot::{audit, AuditConfig, Framework};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AuditConfig::builder()
//!         .framework(Framework::Csrd)
//!         .api_key(std::env::var("PERPLEXITY_API_KEY")?)
//!         .build()?;
//!     let output = audit("annual_report_excerpt.pdf", &config).await?;
//!     println!("{}", output.markdown);
//!     Ok(())
//! }
//! ```
//!
//! ## Frameworks
//!
//! | Id | Lens | Table columns |
//! |----|------|---------------|
//! | `generic` | Scope 1 & 2, any standard | Metric, Status, Value, Evidence (Quote) |
//! | `csrd`    | ESRS E1, market-based Scope 2 | Metric, Value, Unit, Page Ref |
//! | `gri305`  | GRI 305-1 / 305-2 | GRI Indicator, Value, Unit, Evidence |
//! | `sasb`    | Industry accounting metrics | Accounting Metric, Value, Unit, Evidence |
//!
//! Unrecognised identifiers fall back to `generic` rather than failing.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `complibot` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod audit;
pub mod config;
pub mod error;
pub mod framework;
pub mod output;
pub mod pipeline;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use audit::{audit, audit_bytes, audit_sync, audit_text, audit_to_file, inspect};
pub use config::{AuditConfig, AuditConfigBuilder, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_PAGE_CAP};
pub use error::AuditError;
pub use framework::{Framework, FrameworkProfile};
pub use output::{AuditOutput, AuditStats, DocumentInfo};
pub use pipeline::client::{Completion, CompletionClient, HttpCompletionClient};
pub use pipeline::prompt::{AuditRequest, ChatMessage, Role};
