/*
 * SATD Tracker Core - Self-Admitted Technical Debt Lineage Engine
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (LineRange, CommitMeta)
 * - features/    : Vertical slices (comments → classification → diffing → lineage → bisection)
 * - usecases/    : Session orchestration (MiningSession)
 *
 * The engine mines TODO/FIXME-style comments out of git history and
 * resolves what happened to each one across commits: removed, edited,
 * moved, renamed along with its file, or still unaddressed.
 */

#![allow(clippy::collapsible_if)] // Readability over brevity

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models
pub mod shared;

/// Feature modules (extraction → classification → diffing → lineage → bisection)
pub mod features;

/// Usecase layer (MiningSession)
pub mod usecases;

/// Tracker configuration
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::TrackerConfig;
pub use errors::{Result, SatdError};
pub use features::bisection::application::{LocatedResolution, ResolutionLocator};
pub use features::classification::infrastructure::KeywordDebtPredicate;
pub use features::classification::ports::DebtPredicate;
pub use features::comments::domain::{CommentKind, GroupedComment};
pub use features::comments::infrastructure::JavaCommentSource;
pub use features::comments::ports::CommentSource;
pub use features::lineage::domain::{CommentSnapshot, Resolution, SatdInstance};
pub use shared::models::{CommitMeta, LineRange};
pub use usecases::{MiningSession, PairOutcome};
