use lambda_runtime::{service_fn, Error, LambdaEvent};
use release_pipeline_lambda::adapters::artifact_store::S3ArtifactStore;
use release_pipeline_lambda::adapters::job_reporter::CodePipelineJobReporter;
use release_pipeline_lambda::adapters::stage_gateway::ApiGatewayStages;
use release_pipeline_lambda::handlers::stage::{handle_stage_event, StageRelease};
use release_pipeline_lambda::handlers::JobOutcome;
use serde_json::Value;

async fn handle_request(event: LambdaEvent<Value>) -> Result<JobOutcome<StageRelease>, Error> {
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = S3ArtifactStore::new(aws_sdk_s3::Client::new(&aws_config));
    let gateway = ApiGatewayStages::new(aws_sdk_apigateway::Client::new(&aws_config));
    let reporter = CodePipelineJobReporter::new(aws_sdk_codepipeline::Client::new(&aws_config));

    handle_stage_event(&event.payload, &store, &gateway, &reporter)
        .map_err(|error| Error::from(format!("stage release could not be reported: {error}")))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
