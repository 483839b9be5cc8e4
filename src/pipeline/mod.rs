//! Pipeline stages for corpus-to-AsciiDoc conversion.
//!
//! Each submodule owns exactly one concern. Keeping them separate makes each
//! independently testable and keeps the policy decisions (skip rules, error
//! caps) in the runner rather than scattered through the mechanics.
//!
//! ## Data Flow
//!
//! ```text
//! inventory ──▶ fragment ──▶ strategy ──▶ invoke ──▶ classify
//! (fmt→paths)   (qbk only)   (per-fmt)    (tools)    (outcome)
//! ```
//!
//! 1. [`tools`]    — resolve pandoc/quickbook once into a `ToolAvailability`
//!    snapshot threaded through the run
//! 2. [`fragment`] — exclude non-standalone sub-documents before any tool
//!    is invoked
//! 3. [`strategy`] — the per-format conversion procedures (direct copy,
//!    pandoc pass-through, two-stage quickbook, local MathML wrap)
//! 4. [`invoke`]   — run an external command and capture its output; the
//!    only stage that spawns processes
//! 5. [`classify`] — turn a failed invocation into a file / content / tool
//!    outcome via the prioritised substring rules

pub mod classify;
pub mod fragment;
pub mod invoke;
pub mod strategy;
pub mod tools;
