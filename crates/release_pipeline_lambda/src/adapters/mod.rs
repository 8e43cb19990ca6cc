//! Ports the handlers call, each with its AWS SDK implementation.
//!
//! Handlers are synchronous; the AWS implementations park the current Lambda
//! worker thread while the SDK future runs, so they must be called from a
//! multi-threaded Tokio runtime.

use std::future::Future;

pub mod artifact_store;
pub mod function_aliases;
pub mod job_reporter;
pub mod stage_gateway;

fn block_on<F: Future>(future: F) -> F::Output {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
