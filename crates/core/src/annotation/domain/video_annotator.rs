use std::time::Duration;

use super::annotate_request::AnnotateVideoRequest;
use super::operation::Operation;
use crate::shared::error::AnnotateError;

/// Port to the remote video analysis service.
///
/// `submit` starts a long-running job and returns its handle; `poll`
/// re-reads the job state by name. Neither call blocks on the job itself.
/// `timeout` bounds the submission exchange, which includes uploading any
/// inline video content.
pub trait VideoAnnotator {
    fn submit(
        &self,
        request: &AnnotateVideoRequest,
        timeout: Duration,
    ) -> Result<Operation, AnnotateError>;

    fn poll(&self, operation_name: &str) -> Result<Operation, AnnotateError>;
}
