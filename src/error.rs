//! Crate-wide error type.
//!
//! One variant per failure mode in the planner's error-handling design:
//! caller mistakes (`InvalidInput`, `Config`), genuine infeasibility
//! (`NoPlan`), and internal bugs (`InternalInconsistency`). A feasible-subset
//! result (some obstacles skipped) is *not* an error — it comes back as
//! `Ok(Plan)` with a populated `skipped` list.

use thiserror::Error;

/// Errors produced by the planning core.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlannerError {
    /// Caller-supplied data was malformed: an unknown obstacle id, a
    /// duplicate obstacle id, or similar.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// No feasible plan exists at all (every obstacle, including the empty
    /// subset search, failed).
    #[error("no feasible plan: {0}")]
    NoPlan(String),

    /// A `PlannerConfig` override was rejected at construction time.
    #[error("invalid planner configuration: {0}")]
    Config(String),

    /// An internal invariant was violated: a cost-cache miss where a hit was
    /// guaranteed, or an arc-table lookup for a heading that cannot occur.
    /// Reaching this variant indicates a bug in the planner, not bad input.
    #[error("internal planner inconsistency: {0}")]
    InternalInconsistency(String),
}

/// Convenience alias used throughout the crate.
pub type PlannerResult<T> = std::result::Result<T, PlannerError>;
