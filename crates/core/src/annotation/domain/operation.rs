use serde::Deserialize;

use super::annotation_results::{AnnotateVideoResponse, Status};
use crate::shared::error::AnnotateError;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoAnnotationProgress {
    pub input_uri: String,
    pub progress_percent: u32,
}

/// Metadata attached to a running `videos:annotate` operation.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnnotateVideoProgress {
    pub annotation_progress: Vec<VideoAnnotationProgress>,
}

/// Handle to a long-running annotation job.
///
/// Pending while `done` is false; once done, exactly one of `error` or
/// `response` is set.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Operation {
    pub name: String,
    pub done: bool,
    pub metadata: Option<AnnotateVideoProgress>,
    pub error: Option<Status>,
    pub response: Option<AnnotateVideoResponse>,
}

impl Operation {
    /// Lowest progress across all inputs, if the service reported any.
    pub fn progress_percent(&self) -> Option<u32> {
        self.metadata
            .as_ref()
            .and_then(|m| m.annotation_progress.iter().map(|p| p.progress_percent).min())
    }

    /// Converts a finished operation into its response.
    ///
    /// Returns `Ok(None)` while the operation is still pending.
    pub fn into_response(self) -> Result<Option<AnnotateVideoResponse>, AnnotateError> {
        if !self.done {
            return Ok(None);
        }
        if let Some(status) = self.error {
            return Err(AnnotateError::Remote {
                code: status.code,
                message: status.message,
            });
        }
        Ok(Some(self.response.unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_operation_has_no_response() {
        let json = r#"{
            "name": "projects/1/locations/us-east1/operations/42",
            "metadata": {
                "@type": "type.googleapis.com/google.cloud.videointelligence.v1.AnnotateVideoProgress",
                "annotationProgress": [{ "inputUri": "/b/v.mp4", "progressPercent": 35 }]
            }
        }"#;
        let op: Operation = serde_json::from_str(json).unwrap();
        assert!(!op.done);
        assert_eq!(op.progress_percent(), Some(35));
        assert_eq!(op.into_response().unwrap(), None);
    }

    #[test]
    fn test_done_operation_yields_response() {
        let json = r#"{
            "name": "op",
            "done": true,
            "response": { "annotationResults": [{ "inputUri": "/b/v.mp4" }] }
        }"#;
        let op: Operation = serde_json::from_str(json).unwrap();
        let response = op.into_response().unwrap().unwrap();
        assert_eq!(response.annotation_results[0].input_uri, "/b/v.mp4");
    }

    #[test]
    fn test_failed_operation_yields_remote_error() {
        let json = r#"{ "name": "op", "done": true, "error": { "code": 8, "message": "quota" } }"#;
        let op: Operation = serde_json::from_str(json).unwrap();
        match op.into_response() {
            Err(AnnotateError::Remote { code, message }) => {
                assert_eq!(code, 8);
                assert_eq!(message, "quota");
            }
            other => panic!("expected remote error, got {other:?}"),
        }
    }

    #[test]
    fn test_progress_is_minimum_across_inputs() {
        let op = Operation {
            metadata: Some(AnnotateVideoProgress {
                annotation_progress: vec![
                    VideoAnnotationProgress {
                        input_uri: "a".to_string(),
                        progress_percent: 80,
                    },
                    VideoAnnotationProgress {
                        input_uri: "b".to_string(),
                        progress_percent: 20,
                    },
                ],
            }),
            ..Default::default()
        };
        assert_eq!(op.progress_percent(), Some(20));
    }

    #[test]
    fn test_no_metadata_means_no_progress() {
        assert_eq!(Operation::default().progress_percent(), None);
    }
}
