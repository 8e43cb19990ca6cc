use aws_sdk_codepipeline::error::DisplayErrorContext;
use aws_sdk_codepipeline::types::{FailureDetails, FailureType};
use release_pipeline_core::error::{ApiError, FailureKind};
use serde::{Deserialize, Serialize};

use super::block_on;

/// CodePipeline rejects longer failure messages.
pub const MAX_FAILURE_MESSAGE_CHARS: usize = 5000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// Tells CodePipeline how a job ended.
pub trait JobReporter {
    fn put_success(&self, job_id: &str) -> Result<(), ApiError>;
    fn put_failure(&self, job_id: &str, failure: &JobFailure) -> Result<(), ApiError>;
}

pub struct CodePipelineJobReporter {
    client: aws_sdk_codepipeline::Client,
}

impl CodePipelineJobReporter {
    pub fn new(client: aws_sdk_codepipeline::Client) -> Self {
        Self { client }
    }
}

impl JobReporter for CodePipelineJobReporter {
    fn put_success(&self, job_id: &str) -> Result<(), ApiError> {
        block_on(async {
            self.client
                .put_job_success_result()
                .job_id(job_id)
                .send()
                .await
        })
        .map(|_| ())
        .map_err(|error| {
            ApiError::Service(format!(
                "failed to report success of job {job_id}: {}",
                DisplayErrorContext(&error)
            ))
        })
    }

    fn put_failure(&self, job_id: &str, failure: &JobFailure) -> Result<(), ApiError> {
        let failure_type = match failure.kind {
            FailureKind::ConfigurationError => FailureType::ConfigurationError,
            FailureKind::JobFailed => FailureType::JobFailed,
        };
        let details = FailureDetails::builder()
            .r#type(failure_type)
            .message(truncate_message(&failure.message))
            .build()
            .map_err(|error| ApiError::Service(format!("invalid failure details: {error}")))?;

        block_on(async {
            self.client
                .put_job_failure_result()
                .job_id(job_id)
                .failure_details(details)
                .send()
                .await
        })
        .map(|_| ())
        .map_err(|error| {
            ApiError::Service(format!(
                "failed to report failure of job {job_id}: {}",
                DisplayErrorContext(&error)
            ))
        })
    }
}

fn truncate_message(message: &str) -> String {
    message.chars().take(MAX_FAILURE_MESSAGE_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_failure_messages_are_truncated() {
        let message = "x".repeat(MAX_FAILURE_MESSAGE_CHARS + 10);
        assert_eq!(truncate_message(&message).len(), MAX_FAILURE_MESSAGE_CHARS);
        assert_eq!(truncate_message("short"), "short");
    }
}
