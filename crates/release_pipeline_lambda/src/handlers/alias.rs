use release_pipeline_core::artifacts::first_input_artifact;
use release_pipeline_core::error::ReleaseError;
use release_pipeline_core::event::{account_id, job_id, redacted};
use release_pipeline_core::params::{decode_user_parameters, AliasUserParameters};
use release_pipeline_core::permission::{verify_policy_statement, PermissionGrant};
use serde::Serialize;
use serde_json::{json, Value};

use crate::adapters::artifact_store::ArtifactStore;
use crate::adapters::function_aliases::{AliasTarget, FunctionAliases};
use crate::adapters::job_reporter::JobReporter;
use crate::handlers::alias_inputs::extract_alias_job_inputs;
use crate::handlers::{load_stack_outputs, report_outcome, JobOutcome};
use crate::logging::{log_debug, log_error, log_info, log_warn};

const COMPONENT: &str = "alias_handler";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AliasAction {
    Updated,
    Created,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PermissionAction {
    Granted,
    AlreadyGranted,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AliasRelease {
    pub function_name: String,
    pub alias: String,
    pub version: String,
    pub alias_action: AliasAction,
    pub permission_action: PermissionAction,
    pub source_arn: String,
}

/// Points `destAlias` at the version behind `srcAlias`, lets the API invoke
/// it, and reports the result to CodePipeline. A missing `region` is
/// reported against the job like any other failure.
pub fn handle_alias_event(
    event: &Value,
    region: Option<&str>,
    store: &impl ArtifactStore,
    functions: &impl FunctionAliases,
    reporter: &impl JobReporter,
) -> Result<JobOutcome<AliasRelease>, ReleaseError> {
    log_debug(COMPONENT, "event_received", redacted(event));
    let job_id = job_id(event)?;
    log_info(COMPONENT, "job_started", json!({ "job_id": job_id.clone() }));

    let result = promote_alias(event, region, store, functions);
    report_outcome(COMPONENT, job_id, result, reporter)
}

fn promote_alias(
    event: &Value,
    region: Option<&str>,
    store: &impl ArtifactStore,
    functions: &impl FunctionAliases,
) -> Result<AliasRelease, ReleaseError> {
    let region = region.ok_or(ReleaseError::MissingRegion)?;
    let account_id = account_id(event)?;
    log_info(COMPONENT, "account_resolved", json!({ "account_id": account_id.clone() }));

    let inputs = extract_alias_job_inputs(event)?;
    let params: AliasUserParameters = decode_user_parameters(inputs.user_parameters)?;

    let artifact = first_input_artifact(&inputs.input_artifacts)?;
    let stack_outputs = load_stack_outputs(store, artifact, &params.stack_output_file_name)?;
    log_debug(COMPONENT, "stack_outputs", json!(stack_outputs));

    let function_name = stack_outputs.function_name(&params.function_logical_id)?;
    let api_id = stack_outputs.api_id(&params.api_logical_id)?;

    log_info(
        COMPONENT,
        "alias_lookup",
        json!({ "function_name": function_name, "alias": params.src_alias.clone() }),
    );
    let version = functions.get_alias_version(function_name, &params.src_alias)?;

    let target = AliasTarget {
        function_name: function_name.to_string(),
        alias: params.dest_alias.clone(),
        version,
        description: params.description.clone(),
    };
    let alias_action = update_function_alias(functions, &target)?;

    let grant = PermissionGrant::for_api(
        region,
        &account_id,
        function_name,
        &params.dest_alias,
        &params.permission_statement_id,
        api_id,
    );
    let permission_action = add_permission_to_api(functions, &grant)?;

    Ok(AliasRelease {
        function_name: target.function_name,
        alias: target.alias,
        version: target.version,
        alias_action,
        permission_action,
        source_arn: grant.source_arn,
    })
}

/// Repoints the alias, creating it when it does not exist yet.
pub fn update_function_alias(
    functions: &impl FunctionAliases,
    target: &AliasTarget,
) -> Result<AliasAction, ReleaseError> {
    log_info(
        COMPONENT,
        "alias_updating",
        json!({
            "function_name": target.function_name.clone(),
            "alias": target.alias.clone(),
            "version": target.version.clone(),
            "description": target.description.clone(),
        }),
    );
    match functions.update_alias(target) {
        Ok(()) => Ok(AliasAction::Updated),
        Err(error) if error.is_not_found() => {
            log_info(
                COMPONENT,
                "alias_creating",
                json!({ "function_name": target.function_name.clone(), "alias": target.alias.clone() }),
            );
            functions.create_alias(target)?;
            Ok(AliasAction::Created)
        }
        Err(error) => Err(error.into()),
    }
}

/// Adds the invoke permission. An existing statement with the same ID is
/// accepted only if it grants exactly the same access; otherwise the original
/// conflict is returned.
pub fn add_permission_to_api(
    functions: &impl FunctionAliases,
    grant: &PermissionGrant,
) -> Result<PermissionAction, ReleaseError> {
    log_debug(COMPONENT, "permission_adding", json!(grant));
    let conflict = match functions.add_permission(grant) {
        Ok(()) => return Ok(PermissionAction::Granted),
        Err(error) if error.is_conflict() => error,
        Err(error) => return Err(error.into()),
    };

    log_warn(
        COMPONENT,
        "permission_exists",
        json!({ "statement_id": grant.statement_id.clone() }),
    );
    let policy = functions.get_policy(&grant.function_arn)?;
    match verify_policy_statement(&policy, grant) {
        Ok(()) => {
            log_info(
                COMPONENT,
                "permission_verified",
                json!({ "statement_id": grant.statement_id.clone() }),
            );
            Ok(PermissionAction::AlreadyGranted)
        }
        Err(mismatch) => {
            log_error(
                COMPONENT,
                "permission_mismatch",
                json!({
                    "statement_id": grant.statement_id.clone(),
                    "field": mismatch.field(),
                    "detail": mismatch.detail(),
                }),
            );
            Err(conflict.into())
        }
    }
}
