use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const INVOKE_ACTION: &str = "lambda:InvokeFunction";
pub const API_GATEWAY_PRINCIPAL: &str = "apigateway.amazonaws.com";
pub const ALLOW_EFFECT: &str = "Allow";

/// Resource policy statement that lets an API invoke a function alias.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PermissionGrant {
    pub function_arn: String,
    pub statement_id: String,
    pub action: String,
    pub principal: String,
    pub source_arn: String,
}

impl PermissionGrant {
    /// Grant covering `GET` on every stage and resource of `api_id`.
    pub fn for_api(
        region: &str,
        account_id: &str,
        function_name: &str,
        alias: &str,
        statement_id: &str,
        api_id: &str,
    ) -> Self {
        Self {
            function_arn: format!(
                "arn:aws:lambda:{region}:{account_id}:function:{function_name}:{alias}"
            ),
            statement_id: statement_id.to_string(),
            action: INVOKE_ACTION.to_string(),
            principal: API_GATEWAY_PRINCIPAL.to_string(),
            source_arn: format!("arn:aws:execute-api:{region}:{account_id}:{api_id}/*/GET/*"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("statement {field}: {detail}")]
pub struct StatementMismatch {
    field: &'static str,
    detail: String,
}

impl StatementMismatch {
    fn new(field: &'static str, detail: impl Into<String>) -> Self {
        Self {
            field,
            detail: detail.into(),
        }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// Checks that the statement `grant.statement_id` in a function policy grants
/// exactly what `grant` asks for.
pub fn verify_policy_statement(
    policy_json: &str,
    grant: &PermissionGrant,
) -> Result<(), StatementMismatch> {
    let policy: Value = serde_json::from_str(policy_json)
        .map_err(|error| StatementMismatch::new("Policy", error.to_string()))?;
    let statement = policy
        .get("Statement")
        .and_then(Value::as_array)
        .and_then(|statements| {
            statements.iter().find(|statement| {
                statement.get("Sid").and_then(Value::as_str) == Some(grant.statement_id.as_str())
            })
        })
        .ok_or_else(|| {
            StatementMismatch::new("Sid", format!("no statement {}", grant.statement_id))
        })?;

    expect_field(statement, &["Effect"], ALLOW_EFFECT, "Effect")?;
    expect_field(statement, &["Principal", "Service"], &grant.principal, "Principal")?;
    expect_field(statement, &["Action"], &grant.action, "Action")?;
    expect_field(statement, &["Resource"], &grant.function_arn, "Resource")?;
    expect_field(
        statement,
        &["Condition", "ArnLike", "AWS:SourceArn"],
        &grant.source_arn,
        "SourceArn",
    )
}

fn expect_field(
    statement: &Value,
    path: &[&str],
    expected: &str,
    field: &'static str,
) -> Result<(), StatementMismatch> {
    let actual = path
        .iter()
        .try_fold(statement, |value, key| value.get(*key))
        .and_then(Value::as_str);
    match actual {
        Some(value) if value == expected => Ok(()),
        Some(value) => Err(StatementMismatch::new(
            field,
            format!("expected {expected} but found {value}"),
        )),
        None => Err(StatementMismatch::new(field, "missing")),
    }
}
