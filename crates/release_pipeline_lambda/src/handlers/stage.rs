use release_pipeline_core::artifacts::single_input_artifact;
use release_pipeline_core::error::ReleaseError;
use release_pipeline_core::event::{job_data, job_id, redacted};
use release_pipeline_core::params::{parse_user_parameters, StageConfiguration, StageUserParameters};
use release_pipeline_core::patch::{
    deployment_description, deployment_patch_operation, method_settings_patch_operations,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::adapters::artifact_store::ArtifactStore;
use crate::adapters::job_reporter::JobReporter;
use crate::adapters::stage_gateway::{CreateStageRequest, StageGateway};
use crate::handlers::{load_stack_outputs, report_outcome, JobOutcome};
use crate::logging::{log_debug, log_info};

const COMPONENT: &str = "stage_handler";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StageAction {
    Created,
    Redeployed,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StageRelease {
    pub api_id: String,
    pub stage_name: String,
    pub action: StageAction,
    pub deployment_id: String,
    pub method_patch_operations: usize,
}

/// Creates or redeploys the API Gateway stage named in the job's user
/// parameters and reports the result to CodePipeline.
pub fn handle_stage_event(
    event: &Value,
    store: &impl ArtifactStore,
    gateway: &impl StageGateway,
    reporter: &impl JobReporter,
) -> Result<JobOutcome<StageRelease>, ReleaseError> {
    log_debug(COMPONENT, "event_received", redacted(event));
    let job_id = job_id(event)?;
    log_info(COMPONENT, "job_started", json!({ "job_id": job_id.clone() }));

    let result = release_stage(event, store, gateway);
    report_outcome(COMPONENT, job_id, result, reporter)
}

fn release_stage(
    event: &Value,
    store: &impl ArtifactStore,
    gateway: &impl StageGateway,
) -> Result<StageRelease, ReleaseError> {
    let data = job_data(event)?;
    let params: StageUserParameters = parse_user_parameters(data.user_parameters_raw()?)?;
    log_debug(COMPONENT, "user_parameters", json!(params));

    let artifact = single_input_artifact(&data.input_artifacts)?;
    let stack_outputs = load_stack_outputs(store, artifact, &params.stack_outputs_file_name)?;
    log_debug(COMPONENT, "stack_outputs", json!(stack_outputs));

    let api_id = stack_outputs.api_id(&params.api_logical_id)?;
    log_debug(COMPONENT, "api_resolved", json!({ "api_id": api_id }));

    update_stage(
        gateway,
        api_id,
        &params.stage_name,
        &params.stage_configuration,
    )
}

/// Redeploys an existing stage, or creates it when the lookup reports it
/// missing.
pub fn update_stage(
    gateway: &impl StageGateway,
    api_id: &str,
    stage_name: &str,
    configuration: &StageConfiguration,
) -> Result<StageRelease, ReleaseError> {
    log_info(
        COMPONENT,
        "stage_lookup",
        json!({ "api_id": api_id, "stage_name": stage_name }),
    );
    match gateway.get_stage(api_id, stage_name) {
        Ok(stage) => {
            log_debug(COMPONENT, "stage_found", json!(stage));
            let deployment_id =
                update_stage_deployment(gateway, api_id, stage_name, configuration)?;
            let method_patch_operations =
                update_method_settings(gateway, api_id, stage_name, configuration)?;
            Ok(StageRelease {
                api_id: api_id.to_string(),
                stage_name: stage_name.to_string(),
                action: StageAction::Redeployed,
                deployment_id,
                method_patch_operations,
            })
        }
        Err(error) if error.is_not_found() => {
            create_stage(gateway, api_id, stage_name, configuration)
        }
        Err(error) => Err(error.into()),
    }
}

fn create_stage(
    gateway: &impl StageGateway,
    api_id: &str,
    stage_name: &str,
    configuration: &StageConfiguration,
) -> Result<StageRelease, ReleaseError> {
    let deployment_id = create_deployment(gateway, api_id, configuration)?;
    log_info(
        COMPONENT,
        "stage_creating",
        json!({
            "api_id": api_id,
            "stage_name": stage_name,
            "deployment_id": deployment_id.clone(),
        }),
    );
    gateway.create_stage(&CreateStageRequest {
        api_id: api_id.to_string(),
        stage_name: stage_name.to_string(),
        description: configuration.description().to_string(),
        deployment_id: deployment_id.clone(),
        variables: configuration.variables.clone(),
        tags: configuration.tags.clone(),
    })?;
    let method_patch_operations =
        update_method_settings(gateway, api_id, stage_name, configuration)?;

    Ok(StageRelease {
        api_id: api_id.to_string(),
        stage_name: stage_name.to_string(),
        action: StageAction::Created,
        deployment_id,
        method_patch_operations,
    })
}

fn update_stage_deployment(
    gateway: &impl StageGateway,
    api_id: &str,
    stage_name: &str,
    configuration: &StageConfiguration,
) -> Result<String, ReleaseError> {
    let deployment_id = create_deployment(gateway, api_id, configuration)?;
    log_info(
        COMPONENT,
        "stage_redeploying",
        json!({
            "api_id": api_id,
            "stage_name": stage_name,
            "deployment_id": deployment_id.clone(),
        }),
    );
    gateway.update_stage(
        api_id,
        stage_name,
        &[deployment_patch_operation(&deployment_id)],
    )?;
    Ok(deployment_id)
}

fn create_deployment(
    gateway: &impl StageGateway,
    api_id: &str,
    configuration: &StageConfiguration,
) -> Result<String, ReleaseError> {
    log_info(COMPONENT, "deployment_creating", json!({ "api_id": api_id }));
    Ok(gateway.create_deployment(api_id, &deployment_description(configuration))?)
}

/// Applies the configured method settings as one patch batch. Returns the
/// number of patch operations sent; nothing is sent for an empty batch.
fn update_method_settings(
    gateway: &impl StageGateway,
    api_id: &str,
    stage_name: &str,
    configuration: &StageConfiguration,
) -> Result<usize, ReleaseError> {
    let operations = method_settings_patch_operations(&configuration.method_settings);
    log_info(
        COMPONENT,
        "method_settings_updating",
        json!({
            "api_id": api_id,
            "stage_name": stage_name,
            "patch_operations": operations.len(),
        }),
    );
    log_debug(COMPONENT, "method_settings_patch", json!(operations));
    if operations.is_empty() {
        return Ok(0);
    }
    gateway.update_stage(api_id, stage_name, &operations)?;
    Ok(operations.len())
}
