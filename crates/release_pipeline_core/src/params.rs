use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ReleaseError;
use crate::event::json_kind;

pub const DEFAULT_STAGE_DESCRIPTION: &str = "stage";

/// User parameters of the stage release action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StageUserParameters {
    pub stack_outputs_file_name: String,
    pub api_logical_id: String,
    pub stage_name: String,
    pub stage_configuration: StageConfiguration,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StageConfiguration {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub method_settings: Vec<MethodSetting>,
}

impl StageConfiguration {
    pub fn description(&self) -> &str {
        self.description
            .as_deref()
            .unwrap_or(DEFAULT_STAGE_DESCRIPTION)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MethodSetting {
    pub resource_path: String,
    pub http_method: String,
    #[serde(default)]
    pub logging_level: Option<String>,
    #[serde(default)]
    pub throttling_burst_limit: Option<LimitValue>,
    #[serde(default)]
    pub throttling_rate_limit: Option<LimitValue>,
}

/// Throttling limit written either as a JSON number or as a string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LimitValue {
    Number(serde_json::Number),
    Text(String),
}

impl LimitValue {
    pub fn render(&self) -> String {
        match self {
            Self::Number(number) => number.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

/// User parameters of the alias promotion action.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AliasUserParameters {
    pub stack_output_file_name: String,
    pub function_logical_id: String,
    pub api_logical_id: String,
    pub src_alias: String,
    pub dest_alias: String,
    #[serde(default)]
    pub description: String,
    pub permission_statement_id: String,
}

/// Decodes a `UserParameters` string, which must hold a JSON object.
pub fn parse_user_parameters<T: DeserializeOwned>(raw: &str) -> Result<T, ReleaseError> {
    decode_user_parameters(parse_user_parameter_object(raw)?)
}

pub fn decode_user_parameters<T: DeserializeOwned>(
    object: Map<String, Value>,
) -> Result<T, ReleaseError> {
    serde_json::from_value(Value::Object(object))
        .map_err(|error| ReleaseError::InvalidParameters(format!("UserParameters: {error}")))
}

pub fn parse_user_parameter_object(raw: &str) -> Result<Map<String, Value>, ReleaseError> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(object) => Ok(object),
        other => Err(ReleaseError::InvalidParameters(format!(
            "UserParameters must be a JSON object not {}",
            json_kind(&other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_configuration_defaults_apply() {
        let params: StageUserParameters = parse_user_parameters(
            r#"{"stackOutputsFileName":"out.json","apiLogicalId":"MyApi","stageName":"prod","stageConfiguration":{}}"#,
        )
        .expect("parameters should decode");

        assert_eq!(params.stage_name, "prod");
        assert_eq!(params.stage_configuration.description(), "stage");
        assert!(params.stage_configuration.variables.is_empty());
        assert!(params.stage_configuration.method_settings.is_empty());
    }

    #[test]
    fn limits_accept_numbers_and_strings() {
        let setting: MethodSetting = serde_json::from_str(
            r#"{"resourcePath":"/~1tiles","httpMethod":"GET","throttlingBurstLimit":200,"throttlingRateLimit":"50.5"}"#,
        )
        .expect("setting should decode");

        assert_eq!(
            setting.throttling_burst_limit.map(|limit| limit.render()),
            Some("200".to_string())
        );
        assert_eq!(
            setting.throttling_rate_limit.map(|limit| limit.render()),
            Some("50.5".to_string())
        );
    }

    #[test]
    fn rejects_array_user_parameters() {
        let error = parse_user_parameters::<AliasUserParameters>("[1, 2]")
            .expect_err("arrays are not parameter objects");
        assert!(matches!(error, ReleaseError::InvalidParameters(_)));
        assert_eq!(
            error.to_string(),
            "UserParameters must be a JSON object not array"
        );
    }

    #[test]
    fn rejects_malformed_json() {
        let error = parse_user_parameter_object("{not json").expect_err("invalid JSON");
        assert!(matches!(error, ReleaseError::MalformedJson(_)));
    }

    #[test]
    fn alias_description_defaults_to_empty() {
        let params: AliasUserParameters = parse_user_parameters(
            r#"{"stackOutputFileName":"outputs.json","functionLogicalId":"TileFunction","apiLogicalId":"TileApi","srcAlias":"staging","destAlias":"production","permissionStatementId":"tile-api-invoke"}"#,
        )
        .expect("parameters should decode");
        assert_eq!(params.description, "");
        assert_eq!(params.dest_alias, "production");
    }

    #[test]
    fn missing_required_field_is_invalid_parameters() {
        let error = parse_user_parameters::<AliasUserParameters>(r#"{"srcAlias":"staging"}"#)
            .expect_err("required fields are absent");
        assert!(matches!(error, ReleaseError::InvalidParameters(_)));
    }
}
