//! Record reconciliation
//!
//! Given a zone snapshot and the observed public address, decide which
//! records are stale and what their content should become.
//!
//! ## Flow
//!
//! ```text
//! records + observed ──► classify() ──► Classification
//!                                            │
//!                                            ▼
//!                                       build_plan() ──► UpdatePlan ──► apply(provider)
//! ```
//!
//! [`classify`] is pure. [`build_plan`] enforces the reference invariant and
//! is the only place a run can end in the inconsistent state.
//! [`UpdatePlan::apply`] is the only step that talks to the provider.

mod classify;
mod plan;

pub use classify::{Classification, Mismatch, MismatchReason, classify};
pub use plan::{PlannedUpdate, UpdatePlan, build_plan};
