//! Parses the alias action's job event and returns what it found, without
//! calling any AWS service or reporting to CodePipeline.

use lambda_runtime::{service_fn, Error, LambdaEvent};
use release_pipeline_lambda::handlers::alias_inputs::{extract_alias_job_inputs, AliasJobInputs};
use serde_json::Value;

async fn handle_request(event: LambdaEvent<Value>) -> Result<AliasJobInputs, Error> {
    extract_alias_job_inputs(&event.payload).map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
