//! AWS-oriented adapters and handlers for the release pipeline actions.
//!
//! This crate owns runtime integration details (Lambda handlers, CodePipeline
//! result reporting, and S3/API Gateway/Lambda adapters). Domain decisions
//! live in `release_pipeline_core`.

pub mod adapters;
pub mod handlers;
pub mod logging;
