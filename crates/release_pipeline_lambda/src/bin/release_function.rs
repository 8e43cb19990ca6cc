use lambda_runtime::{service_fn, Error, LambdaEvent};
use release_pipeline_lambda::adapters::artifact_store::S3ArtifactStore;
use release_pipeline_lambda::adapters::function_aliases::LambdaFunctionAliases;
use release_pipeline_lambda::adapters::job_reporter::CodePipelineJobReporter;
use release_pipeline_lambda::handlers::alias::{handle_alias_event, AliasRelease};
use release_pipeline_lambda::handlers::JobOutcome;
use serde_json::Value;

async fn handle_request(event: LambdaEvent<Value>) -> Result<JobOutcome<AliasRelease>, Error> {
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let region = aws_config.region().map(|region| region.to_string());

    let store = S3ArtifactStore::new(aws_sdk_s3::Client::new(&aws_config));
    let functions = LambdaFunctionAliases::new(aws_sdk_lambda::Client::new(&aws_config));
    let reporter = CodePipelineJobReporter::new(aws_sdk_codepipeline::Client::new(&aws_config));

    handle_alias_event(&event.payload, region.as_deref(), &store, &functions, &reporter)
        .map_err(|error| Error::from(format!("alias release could not be reported: {error}")))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
