//! Pipeline stages for a compliance audit.
//!
//! Each submodule implements exactly one transformation step. Keeping
//! stages separate makes each independently testable and lets us swap an
//! implementation (a different PDF decoder, a different completion vendor)
//! without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ prompt ──▶ client ──▶ validate
//! (path)    (lopdf)     (profile)  (HTTP)     (header check)
//! ```
//!
//! 1. [`input`]    — read the PDF payload and verify it is one
//! 2. [`extract`]  — decode text from the first N pages; runs in
//!    `spawn_blocking` because lopdf is synchronous
//! 3. [`prompt`]   — combine the framework profile with the text into a
//!    two-segment request; pure, no I/O
//! 4. [`client`]   — the single network round trip to the completion
//!    service; the only stage with I/O beyond reading the input file
//! 5. [`validate`] — warn-only check that the returned table header matches
//!    the profile's expected columns

pub mod client;
pub mod extract;
pub mod input;
pub mod prompt;
pub mod validate;
