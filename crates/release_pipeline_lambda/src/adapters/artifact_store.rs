use aws_sdk_s3::error::DisplayErrorContext;
use release_pipeline_core::error::ApiError;

use super::block_on;

pub trait ArtifactStore {
    fn fetch_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ApiError>;
}

/// Reads pipeline artifacts from the CodePipeline artifact bucket.
pub struct S3ArtifactStore {
    s3_client: aws_sdk_s3::Client,
}

impl S3ArtifactStore {
    pub fn new(s3_client: aws_sdk_s3::Client) -> Self {
        Self { s3_client }
    }
}

impl ArtifactStore for S3ArtifactStore {
    fn fetch_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ApiError> {
        block_on(async {
            let object = self
                .s3_client
                .get_object()
                .bucket(bucket)
                .key(key)
                .send()
                .await
                .map_err(|error| {
                    ApiError::Service(format!(
                        "failed to read s3://{bucket}/{key}: {}",
                        DisplayErrorContext(&error)
                    ))
                })?;
            let body = object.body.collect().await.map_err(|error| {
                ApiError::Service(format!("failed to stream s3://{bucket}/{key}: {error}"))
            })?;
            Ok(body.into_bytes().to_vec())
        })
    }
}
