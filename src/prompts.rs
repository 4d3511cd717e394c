//! System instructions for each reporting framework.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — tightening an extraction rule or a
//!    compliance phrase requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the instruction text per
//!    framework without spinning up a completion service, so a prompt
//!    regression (a lost indicator code, a changed marker phrase) fails
//!    a test immediately.
//!
//! Each constant encodes three facets the registry relies on: the auditor
//! persona, the indicator codes to extract, and the required table shape.
//! The phrases quoted in single quotes are load-bearing — downstream
//! consumers search the result for them.

/// Framework-agnostic Scope 1 & 2 extraction instructions.
pub const GENERIC_INSTRUCTIONS: &str = "\
You are an expert ESG Auditor. Analyze this text for 'Scope 1' and 'Scope 2' emissions.
If exact figures are missing, state: 'Not Found'.
Output a simple markdown table with columns: Metric | Status | Value | Evidence (Quote).";

/// CSRD / ESRS E1 extraction instructions.
pub const CSRD_INSTRUCTIONS: &str = "\
You are an expert EU ESG Auditor. Analyze the text for CSRD 'ESRS E1' compliance.
Extract 'Gross Scope 1' and 'Gross Scope 2' (Market-based) emissions.
If data is missing, explicitly state: 'Non-Compliant with ESRS E1'.
Output a markdown table with columns: Metric | Value | Unit | Page Ref.";

/// GRI 305 extraction instructions.
pub const GRI305_INSTRUCTIONS: &str = "\
You are a GRI Specialist. Extract data for 'GRI 305-1 (Direct GHG)' and 'GRI 305-2 (Energy Indirect GHG)'.
Ensure you distinguish between Location-based and Market-based Scope 2.
If an indicator is absent, state: 'Not Reported under GRI 305'.
Output a markdown table with columns: GRI Indicator | Value | Unit | Evidence.";

/// SASB extraction instructions.
pub const SASB_INSTRUCTIONS: &str = "\
You are a SASB Analyst. Extract Scope 1 and Scope 2 emissions.
Look for 'Activity Metrics' or 'Accounting Metrics' specific to the industry.
If a required metric is absent, state: 'Omitted from SASB Disclosure'.
Output a markdown table with columns: Accounting Metric | Value | Unit | Evidence.";

/// Fixed label prefixed to the document text in the user-role message.
///
/// Keeping the label out of the system segment preserves the separation
/// between "rules to follow" and "data to analyze".
pub const REPORT_TEXT_LABEL: &str = "Here is the report text:";
