use std::collections::BTreeMap;

use aws_sdk_apigateway::error::{DisplayErrorContext, SdkError};
use aws_sdk_apigateway::operation::create_deployment::CreateDeploymentError;
use aws_sdk_apigateway::operation::create_stage::CreateStageError;
use aws_sdk_apigateway::operation::get_stage::GetStageError;
use aws_sdk_apigateway::operation::update_stage::UpdateStageError;
use aws_sdk_apigateway::types::Op;
use release_pipeline_core::error::ApiError;
use release_pipeline_core::patch::{PatchOp, PatchOperation};
use serde::Serialize;

use super::block_on;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StageSummary {
    pub stage_name: String,
    pub deployment_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateStageRequest {
    pub api_id: String,
    pub stage_name: String,
    pub description: String,
    pub deployment_id: String,
    pub variables: BTreeMap<String, String>,
    pub tags: BTreeMap<String, String>,
}

pub trait StageGateway {
    /// `ApiError::NotFound` when the stage does not exist.
    fn get_stage(&self, api_id: &str, stage_name: &str) -> Result<StageSummary, ApiError>;

    /// Returns the new deployment ID.
    fn create_deployment(&self, api_id: &str, description: &str) -> Result<String, ApiError>;

    fn create_stage(&self, request: &CreateStageRequest) -> Result<(), ApiError>;

    fn update_stage(
        &self,
        api_id: &str,
        stage_name: &str,
        operations: &[PatchOperation],
    ) -> Result<(), ApiError>;
}

pub struct ApiGatewayStages {
    client: aws_sdk_apigateway::Client,
}

impl ApiGatewayStages {
    pub fn new(client: aws_sdk_apigateway::Client) -> Self {
        Self { client }
    }
}

impl StageGateway for ApiGatewayStages {
    fn get_stage(&self, api_id: &str, stage_name: &str) -> Result<StageSummary, ApiError> {
        block_on(async {
            self.client
                .get_stage()
                .rest_api_id(api_id)
                .stage_name(stage_name)
                .send()
                .await
                .map(|stage| StageSummary {
                    stage_name: stage.stage_name().unwrap_or(stage_name).to_string(),
                    deployment_id: stage.deployment_id().map(str::to_string),
                })
                .map_err(classify)
        })
    }

    fn create_deployment(&self, api_id: &str, description: &str) -> Result<String, ApiError> {
        let deployment = block_on(async {
            self.client
                .create_deployment()
                .rest_api_id(api_id)
                .description(description)
                .send()
                .await
        })
        .map_err(classify)?;

        deployment
            .id()
            .map(str::to_string)
            .ok_or_else(|| ApiError::Service(format!("deployment of {api_id} returned no id")))
    }

    fn create_stage(&self, request: &CreateStageRequest) -> Result<(), ApiError> {
        block_on(async {
            self.client
                .create_stage()
                .rest_api_id(&request.api_id)
                .stage_name(&request.stage_name)
                .description(&request.description)
                .deployment_id(&request.deployment_id)
                .set_variables(Some(request.variables.clone().into_iter().collect()))
                .set_tags(Some(request.tags.clone().into_iter().collect()))
                .send()
                .await
                .map(|_| ())
                .map_err(classify)
        })
    }

    fn update_stage(
        &self,
        api_id: &str,
        stage_name: &str,
        operations: &[PatchOperation],
    ) -> Result<(), ApiError> {
        let patch_operations: Vec<_> = operations.iter().map(to_sdk_patch_operation).collect();
        block_on(async {
            self.client
                .update_stage()
                .rest_api_id(api_id)
                .stage_name(stage_name)
                .set_patch_operations(Some(patch_operations))
                .send()
                .await
                .map(|_| ())
                .map_err(classify)
        })
    }
}

fn to_sdk_patch_operation(operation: &PatchOperation) -> aws_sdk_apigateway::types::PatchOperation {
    let op = match operation.op {
        PatchOp::Replace => Op::Replace,
    };
    aws_sdk_apigateway::types::PatchOperation::builder()
        .op(op)
        .path(&operation.path)
        .value(&operation.value)
        .build()
}

/// API Gateway service errors the stage calls branch on.
trait StageServiceError: std::error::Error + 'static {
    fn is_not_found(&self) -> bool;

    fn is_conflict(&self) -> bool {
        false
    }
}

impl StageServiceError for GetStageError {
    fn is_not_found(&self) -> bool {
        self.is_not_found_exception()
    }
}

impl StageServiceError for CreateDeploymentError {
    fn is_not_found(&self) -> bool {
        self.is_not_found_exception()
    }

    fn is_conflict(&self) -> bool {
        self.is_conflict_exception()
    }
}

impl StageServiceError for CreateStageError {
    fn is_not_found(&self) -> bool {
        self.is_not_found_exception()
    }

    fn is_conflict(&self) -> bool {
        self.is_conflict_exception()
    }
}

impl StageServiceError for UpdateStageError {
    fn is_not_found(&self) -> bool {
        self.is_not_found_exception()
    }

    fn is_conflict(&self) -> bool {
        self.is_conflict_exception()
    }
}

fn classify<E, R>(error: SdkError<E, R>) -> ApiError
where
    E: StageServiceError,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&error).to_string();
    match error.as_service_error() {
        Some(service) if service.is_not_found() => ApiError::NotFound(message),
        Some(service) if service.is_conflict() => ApiError::Conflict(message),
        _ => ApiError::Service(message),
    }
}
