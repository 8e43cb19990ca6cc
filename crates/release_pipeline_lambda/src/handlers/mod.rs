//! CodePipeline job handlers.
//!
//! Each handler is a function of the raw job event and the ports it needs.
//! The job ID is read before anything else; once it is known every outcome
//! is reported to CodePipeline, and only a missing job ID or a failed report
//! is returned to the Lambda runtime as an error.

use release_pipeline_core::error::ReleaseError;
use release_pipeline_core::event::Artifact;
use release_pipeline_core::stack_outputs::StackOutputs;
use serde::Serialize;
use serde_json::json;

use crate::adapters::artifact_store::ArtifactStore;
use crate::adapters::job_reporter::{JobFailure, JobReporter};
use crate::logging::{log_error, log_info};

pub mod alias;
pub mod alias_inputs;
pub mod stage;

#[cfg(test)]
pub(crate) mod test_helpers;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobOutcome<T> {
    Succeeded { job_id: String, release: T },
    Failed { job_id: String, failure: JobFailure },
}

impl<T> JobOutcome<T> {
    pub fn job_id(&self) -> &str {
        match self {
            Self::Succeeded { job_id, .. } | Self::Failed { job_id, .. } => job_id,
        }
    }

    pub fn failure(&self) -> Option<&JobFailure> {
        match self {
            Self::Succeeded { .. } => None,
            Self::Failed { failure, .. } => Some(failure),
        }
    }
}

pub(crate) fn report_outcome<T>(
    component: &str,
    job_id: String,
    result: Result<T, ReleaseError>,
    reporter: &impl JobReporter,
) -> Result<JobOutcome<T>, ReleaseError> {
    match result {
        Ok(release) => {
            reporter.put_success(&job_id)?;
            log_info(component, "job_succeeded", json!({ "job_id": job_id.clone() }));
            Ok(JobOutcome::Succeeded { job_id, release })
        }
        Err(error) => {
            let failure = JobFailure {
                kind: error.failure_kind(),
                message: error.to_string(),
            };
            log_error(
                component,
                "job_failed",
                json!({
                    "job_id": job_id.clone(),
                    "failure_type": failure.kind.as_str(),
                    "error": failure.message.clone(),
                }),
            );
            reporter.put_failure(&job_id, &failure)?;
            Ok(JobOutcome::Failed { job_id, failure })
        }
    }
}

pub(crate) fn load_stack_outputs(
    store: &impl ArtifactStore,
    artifact: &Artifact,
    file_name: &str,
) -> Result<StackOutputs, ReleaseError> {
    let location = artifact.s3_location()?;
    let archive = store.fetch_object(&location.bucket_name, &location.object_key)?;
    StackOutputs::from_archive(&archive, file_name)
}

#[cfg(test)]
mod tests {
    use release_pipeline_core::error::{ApiError, FailureKind};

    use super::*;
    use crate::handlers::test_helpers::{CapturingReporter, ReportCall, JOB_ID};

    #[test]
    fn failed_job_is_reported_with_its_classification() {
        let reporter = CapturingReporter::new();

        let outcome = report_outcome::<()>(
            "test",
            JOB_ID.to_string(),
            Err(ReleaseError::NoInputArtifacts),
            &reporter,
        )
        .expect("report accepted");

        let expected = JobFailure {
            kind: FailureKind::ConfigurationError,
            message: "input artifacts must not be empty".to_string(),
        };
        assert_eq!(outcome.failure(), Some(&expected));
        assert_eq!(
            reporter.calls(),
            vec![ReportCall::Failure(JOB_ID.to_string(), expected)]
        );
    }

    #[test]
    fn rejected_failure_report_is_returned_to_the_runtime() {
        let reporter = CapturingReporter::rejecting();

        let error = report_outcome::<()>(
            "test",
            JOB_ID.to_string(),
            Err(ReleaseError::NoInputArtifacts),
            &reporter,
        )
        .expect_err("report was rejected");

        assert!(matches!(error, ReleaseError::Api(ApiError::Service(_))));
        assert_eq!(reporter.calls().len(), 1);
    }

    #[test]
    fn rejected_success_report_is_returned_to_the_runtime() {
        let reporter = CapturingReporter::rejecting();

        let error = report_outcome("test", JOB_ID.to_string(), Ok(()), &reporter)
            .expect_err("report was rejected");

        assert!(error.to_string().starts_with("InvalidJobStateException"));
        assert_eq!(reporter.calls(), vec![ReportCall::Success(JOB_ID.to_string())]);
    }
}
