//! Domain layer containing the update cycle's vocabulary.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, errors, state machine)
//! - `dependency` - Outdated reports, manifests and version diffs
//! - `cycle` - Cycle phases, records and outcomes
//! - `memory` - Cross-cycle history and its queries
//! - `publish` - Branch naming, repository coordinates and PR wording

pub mod cycle;
pub mod dependency;
pub mod foundation;
pub mod memory;
pub mod publish;
