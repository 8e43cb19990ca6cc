use crate::error::ReleaseError;
use crate::event::Artifact;

/// The stage action accepts exactly one input artifact.
pub fn single_input_artifact(artifacts: &[Artifact]) -> Result<&Artifact, ReleaseError> {
    match artifacts {
        [artifact] => Ok(artifact),
        other => Err(ReleaseError::UnexpectedArtifactCount(other.len())),
    }
}

/// The alias action reads the first input artifact and ignores the rest.
pub fn first_input_artifact(artifacts: &[Artifact]) -> Result<&Artifact, ReleaseError> {
    artifacts.first().ok_or(ReleaseError::NoInputArtifacts)
}

#[cfg(test)]
mod tests {
    use crate::event::{ArtifactLocation, S3Location};

    use super::*;

    fn artifact(key: &str) -> Artifact {
        Artifact {
            name: Some(key.to_string()),
            location: ArtifactLocation {
                location_type: "S3".to_string(),
                s3_location: Some(S3Location {
                    bucket_name: "bucket".to_string(),
                    object_key: key.to_string(),
                }),
            },
        }
    }

    #[test]
    fn single_artifact_rule_rejects_zero_and_many() {
        assert!(matches!(
            single_input_artifact(&[]),
            Err(ReleaseError::UnexpectedArtifactCount(0))
        ));
        assert!(matches!(
            single_input_artifact(&[artifact("a"), artifact("b")]),
            Err(ReleaseError::UnexpectedArtifactCount(2))
        ));
        let only = [artifact("a")];
        assert_eq!(
            single_input_artifact(&only).expect("one artifact").name.as_deref(),
            Some("a")
        );
    }

    #[test]
    fn first_artifact_rule_requires_a_non_empty_list() {
        assert!(matches!(
            first_input_artifact(&[]),
            Err(ReleaseError::NoInputArtifacts)
        ));
        let many = [artifact("a"), artifact("b")];
        assert_eq!(
            first_input_artifact(&many).expect("first").name.as_deref(),
            Some("a")
        );
    }
}
