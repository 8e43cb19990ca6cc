//! Patch operations applied to API Gateway stages.
//!
//! API Gateway expects numeric stage settings as strings, so every value is
//! rendered to text here.

use serde::{Deserialize, Serialize};

use crate::params::{MethodSetting, StageConfiguration};

pub const DEFAULT_LOGGING_LEVEL: &str = "OFF";
pub const DEFAULT_THROTTLING_BURST_LIMIT: &str = "5000";
pub const DEFAULT_THROTTLING_RATE_LIMIT: &str = "10000";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Replace,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    pub value: String,
}

impl PatchOperation {
    pub fn replace(path: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            op: PatchOp::Replace,
            path: path.into(),
            value: value.into(),
        }
    }
}

pub fn method_setting_patch_operations(setting: &MethodSetting) -> Vec<PatchOperation> {
    let base_path = format!("{}/{}", setting.resource_path, setting.http_method);
    let logging_level = setting
        .logging_level
        .clone()
        .unwrap_or_else(|| DEFAULT_LOGGING_LEVEL.to_string());
    let burst_limit = setting
        .throttling_burst_limit
        .as_ref()
        .map(|limit| limit.render())
        .unwrap_or_else(|| DEFAULT_THROTTLING_BURST_LIMIT.to_string());
    let rate_limit = setting
        .throttling_rate_limit
        .as_ref()
        .map(|limit| limit.render())
        .unwrap_or_else(|| DEFAULT_THROTTLING_RATE_LIMIT.to_string());

    vec![
        PatchOperation::replace(format!("{base_path}/logging/loglevel"), logging_level),
        PatchOperation::replace(format!("{base_path}/throttling/burstLimit"), burst_limit),
        PatchOperation::replace(format!("{base_path}/throttling/rateLimit"), rate_limit),
    ]
}

pub fn method_settings_patch_operations(settings: &[MethodSetting]) -> Vec<PatchOperation> {
    settings
        .iter()
        .flat_map(method_setting_patch_operations)
        .collect()
}

pub fn deployment_patch_operation(deployment_id: &str) -> PatchOperation {
    PatchOperation::replace("/deploymentId", deployment_id)
}

pub fn deployment_description(configuration: &StageConfiguration) -> String {
    format!("deployment for {}", configuration.description())
}
