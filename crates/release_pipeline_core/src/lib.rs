//! Shared release pipeline domain primitives.
//!
//! This crate owns the CodePipeline job event model, user parameter decoding,
//! stack output lookup, and the pure decisions the release actions make
//! (patch operations, permission grants, failure classification). It
//! intentionally excludes AWS SDK and Lambda runtime concerns.

pub mod artifacts;
pub mod error;
pub mod event;
pub mod params;
pub mod patch;
pub mod permission;
pub mod stack_outputs;
