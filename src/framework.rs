//! The framework registry: one immutable profile per reporting framework.
//!
//! Each supported disclosure standard is modelled as a [`FrameworkProfile`]
//! record rather than a branch in the pipeline. The pipeline never inspects
//! which framework it is running; it reads the profile's instructions,
//! expected table columns, and compliance marker. Adding a framework means
//! adding one record here — no other module changes.
//!
//! The registry is `'static` data: profiles are fixed at compile time,
//! immutable, and safe for unsynchronised concurrent reads from any number
//! of parallel audit invocations.

use crate::prompts;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of supported reporting frameworks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    /// Framework-agnostic Scope 1 & 2 extraction. (default, and the
    /// fallback for unrecognised identifiers)
    #[default]
    Generic,
    /// EU Corporate Sustainability Reporting Directive (ESRS E1).
    Csrd,
    /// GRI 305: Emissions (305-1 direct, 305-2 energy indirect).
    Gri305,
    /// SASB industry-specific accounting metrics.
    Sasb,
}

impl Framework {
    /// Every registered framework, in registry order.
    pub const ALL: [Framework; 4] = [
        Framework::Generic,
        Framework::Csrd,
        Framework::Gri305,
        Framework::Sasb,
    ];

    /// Canonical identifier, as accepted on the CLI and in configs.
    pub fn id(&self) -> &'static str {
        match self {
            Framework::Generic => "generic",
            Framework::Csrd => "csrd",
            Framework::Gri305 => "gri305",
            Framework::Sasb => "sasb",
        }
    }

    /// Resolve an identifier to a framework, falling back to
    /// [`Framework::Generic`] for anything unrecognised.
    ///
    /// The fallback is a deliberate default-safe policy: an unknown
    /// identifier still produces a useful Scope 1/2 audit rather than an
    /// error. Matching is case-insensitive.
    pub fn from_id(id: &str) -> Framework {
        match id.trim().to_ascii_lowercase().as_str() {
            "csrd" => Framework::Csrd,
            "gri305" | "gri-305" | "gri" => Framework::Gri305,
            "sasb" => Framework::Sasb,
            _ => Framework::Generic,
        }
    }

    /// The profile record for this framework.
    pub fn profile(&self) -> &'static FrameworkProfile {
        match self {
            Framework::Generic => &GENERIC,
            Framework::Csrd => &CSRD,
            Framework::Gri305 => &GRI305,
            Framework::Sasb => &SASB,
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Everything the pipeline needs to know about one framework.
///
/// The `system_instructions` encode three facets that tests can check
/// independently of any network call: the auditor persona, the indicator
/// codes to extract, and the required table shape (which must agree with
/// `output_columns`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameworkProfile {
    /// Registry key; unique across the registry.
    pub id: Framework,
    /// Human-readable name shown in summaries and `--help`.
    pub display_name: &'static str,
    /// Full system-role instruction text sent to the completion service.
    pub system_instructions: &'static str,
    /// Expected markdown table header, in column order. Never empty.
    pub output_columns: &'static [&'static str],
    /// Phrase the model is instructed to emit when required data is absent.
    ///
    /// Part of the profile so downstream consumers (and tests) can detect
    /// non-compliance deterministically by searching the result for it.
    pub compliance_marker: Option<&'static str>,
}

impl FrameworkProfile {
    /// Look up a profile by identifier. Never fails; unrecognised
    /// identifiers resolve to the Generic profile.
    pub fn lookup(id: &str) -> &'static FrameworkProfile {
        Framework::from_id(id).profile()
    }

    /// The expected header row rendered as a markdown table header,
    /// e.g. `| Metric | Value | Unit | Page Ref |`.
    pub fn header_row(&self) -> String {
        format!("| {} |", self.output_columns.join(" | "))
    }
}

// ── Registry entries ─────────────────────────────────────────────────────

static GENERIC: FrameworkProfile = FrameworkProfile {
    id: Framework::Generic,
    display_name: "Generic (Scope 1 & 2)",
    system_instructions: prompts::GENERIC_INSTRUCTIONS,
    output_columns: &["Metric", "Status", "Value", "Evidence (Quote)"],
    compliance_marker: Some("Not Found"),
};

static CSRD: FrameworkProfile = FrameworkProfile {
    id: Framework::Csrd,
    display_name: "CSRD (EU Standard)",
    system_instructions: prompts::CSRD_INSTRUCTIONS,
    output_columns: &["Metric", "Value", "Unit", "Page Ref"],
    compliance_marker: Some("Non-Compliant with ESRS E1"),
};

static GRI305: FrameworkProfile = FrameworkProfile {
    id: Framework::Gri305,
    display_name: "GRI 305 (Global)",
    system_instructions: prompts::GRI305_INSTRUCTIONS,
    output_columns: &["GRI Indicator", "Value", "Unit", "Evidence"],
    compliance_marker: Some("Not Reported under GRI 305"),
};

static SASB: FrameworkProfile = FrameworkProfile {
    id: Framework::Sasb,
    display_name: "SASB (Industry Specific)",
    system_instructions: prompts::SASB_INSTRUCTIONS,
    output_columns: &["Accounting Metric", "Value", "Unit", "Evidence"],
    compliance_marker: Some("Omitted from SASB Disclosure"),
};
