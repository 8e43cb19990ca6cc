use aws_sdk_lambda::error::{DisplayErrorContext, SdkError};
use aws_sdk_lambda::operation::add_permission::AddPermissionError;
use aws_sdk_lambda::operation::create_alias::CreateAliasError;
use aws_sdk_lambda::operation::get_alias::GetAliasError;
use aws_sdk_lambda::operation::get_policy::GetPolicyError;
use aws_sdk_lambda::operation::update_alias::UpdateAliasError;
use release_pipeline_core::error::ApiError;
use release_pipeline_core::permission::PermissionGrant;

use super::block_on;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTarget {
    pub function_name: String,
    pub alias: String,
    pub version: String,
    pub description: String,
}

pub trait FunctionAliases {
    /// Version the alias currently points at.
    fn get_alias_version(&self, function_name: &str, alias: &str) -> Result<String, ApiError>;

    /// `ApiError::NotFound` when the alias does not exist yet.
    fn update_alias(&self, target: &AliasTarget) -> Result<(), ApiError>;

    fn create_alias(&self, target: &AliasTarget) -> Result<(), ApiError>;

    /// `ApiError::Conflict` when the statement ID is already in the policy.
    fn add_permission(&self, grant: &PermissionGrant) -> Result<(), ApiError>;

    /// Resource policy document of the function (or qualified alias ARN).
    fn get_policy(&self, function_name: &str) -> Result<String, ApiError>;
}

pub struct LambdaFunctionAliases {
    client: aws_sdk_lambda::Client,
}

impl LambdaFunctionAliases {
    pub fn new(client: aws_sdk_lambda::Client) -> Self {
        Self { client }
    }
}

impl FunctionAliases for LambdaFunctionAliases {
    fn get_alias_version(&self, function_name: &str, alias: &str) -> Result<String, ApiError> {
        let output = block_on(async {
            self.client
                .get_alias()
                .function_name(function_name)
                .name(alias)
                .send()
                .await
        })
        .map_err(classify)?;

        output
            .function_version()
            .map(str::to_string)
            .ok_or_else(|| {
                ApiError::Service(format!("alias {alias} of {function_name} has no version"))
            })
    }

    fn update_alias(&self, target: &AliasTarget) -> Result<(), ApiError> {
        block_on(async {
            self.client
                .update_alias()
                .function_name(&target.function_name)
                .name(&target.alias)
                .function_version(&target.version)
                .description(&target.description)
                .send()
                .await
        })
        .map(|_| ())
        .map_err(classify)
    }

    fn create_alias(&self, target: &AliasTarget) -> Result<(), ApiError> {
        block_on(async {
            self.client
                .create_alias()
                .function_name(&target.function_name)
                .name(&target.alias)
                .function_version(&target.version)
                .description(&target.description)
                .send()
                .await
        })
        .map(|_| ())
        .map_err(classify)
    }

    fn add_permission(&self, grant: &PermissionGrant) -> Result<(), ApiError> {
        block_on(async {
            self.client
                .add_permission()
                .function_name(&grant.function_arn)
                .statement_id(&grant.statement_id)
                .action(&grant.action)
                .principal(&grant.principal)
                .source_arn(&grant.source_arn)
                .send()
                .await
        })
        .map(|_| ())
        .map_err(classify)
    }

    fn get_policy(&self, function_name: &str) -> Result<String, ApiError> {
        let output = block_on(async {
            self.client
                .get_policy()
                .function_name(function_name)
                .send()
                .await
        })
        .map_err(classify)?;

        output
            .policy()
            .map(str::to_string)
            .ok_or_else(|| ApiError::Service(format!("{function_name} has no resource policy")))
    }
}

/// Lambda service errors the alias calls branch on.
trait AliasServiceError: std::error::Error + 'static {
    fn is_not_found(&self) -> bool;

    fn is_conflict(&self) -> bool {
        false
    }
}

impl AliasServiceError for GetAliasError {
    fn is_not_found(&self) -> bool {
        self.is_resource_not_found_exception()
    }
}

impl AliasServiceError for UpdateAliasError {
    fn is_not_found(&self) -> bool {
        self.is_resource_not_found_exception()
    }

    fn is_conflict(&self) -> bool {
        self.is_resource_conflict_exception()
    }
}

impl AliasServiceError for CreateAliasError {
    fn is_not_found(&self) -> bool {
        self.is_resource_not_found_exception()
    }

    fn is_conflict(&self) -> bool {
        self.is_resource_conflict_exception()
    }
}

impl AliasServiceError for AddPermissionError {
    fn is_not_found(&self) -> bool {
        self.is_resource_not_found_exception()
    }

    fn is_conflict(&self) -> bool {
        self.is_resource_conflict_exception()
    }
}

impl AliasServiceError for GetPolicyError {
    fn is_not_found(&self) -> bool {
        self.is_resource_not_found_exception()
    }
}

fn classify<E, R>(error: SdkError<E, R>) -> ApiError
where
    E: AliasServiceError,
    R: std::fmt::Debug,
{
    let message = DisplayErrorContext(&error).to_string();
    match error.as_service_error() {
        Some(service) if service.is_not_found() => ApiError::NotFound(message),
        Some(service) if service.is_conflict() => ApiError::Conflict(message),
        _ => ApiError::Service(message),
    }
}
