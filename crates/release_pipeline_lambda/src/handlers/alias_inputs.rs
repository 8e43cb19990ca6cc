use release_pipeline_core::error::ReleaseError;
use release_pipeline_core::event::{job_data, Artifact};
use release_pipeline_core::params::parse_user_parameter_object;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::logging::log_debug;

const COMPONENT: &str = "alias_inputs";

/// Everything the alias action reads from a job event before it touches any
/// AWS service.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AliasJobInputs {
    pub user_parameters: Map<String, Value>,
    pub input_artifacts: Vec<Artifact>,
    pub output_artifacts: Vec<Artifact>,
}

pub fn extract_alias_job_inputs(event: &Value) -> Result<AliasJobInputs, ReleaseError> {
    let data = job_data(event)?;
    let user_parameters = parse_user_parameter_object(data.user_parameters_raw()?)?;
    let output_artifacts = data
        .output_artifacts
        .ok_or_else(|| ReleaseError::MissingProperty("outputArtifacts".to_string()))?;
    log_debug(COMPONENT, "user_parameters", Value::Object(user_parameters.clone()));
    log_debug(COMPONENT, "input_artifacts", json!(data.input_artifacts));
    log_debug(COMPONENT, "output_artifacts", json!(output_artifacts));

    Ok(AliasJobInputs {
        user_parameters,
        input_artifacts: data.input_artifacts,
        output_artifacts,
    })
}
