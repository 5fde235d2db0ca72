use std::io::Write;
use std::time::Instant;

use crate::annotation::domain::annotation_results::VideoAnnotationResults;
use crate::annotation::domain::video_annotator::VideoAnnotator;
use crate::pipeline::operation_logger::OperationLogger;
use crate::pipeline::operation_waiter::OperationWaiter;
use crate::pipeline::request_builder::RequestBuilder;
use crate::pipeline::result_printer::{single_result, DetailedTextReport, ResultReport};
use crate::shared::error::AnnotateError;

pub const WAITING_MESSAGE: &str = "Waiting for operation to complete...";

/// Text detection for a video stored in Cloud Storage:
/// build → submit → wait → print the first detection in detail.
pub struct DetectTextGcsUseCase {
    annotator: Box<dyn VideoAnnotator>,
    builder: RequestBuilder,
    waiter: OperationWaiter,
    logger: Box<dyn OperationLogger>,
}

impl DetectTextGcsUseCase {
    pub fn new(
        annotator: Box<dyn VideoAnnotator>,
        builder: RequestBuilder,
        waiter: OperationWaiter,
        logger: Box<dyn OperationLogger>,
    ) -> Self {
        Self {
            annotator,
            builder,
            waiter,
            logger,
        }
    }

    pub fn execute(
        &mut self,
        gcs_uri: &str,
        out: &mut dyn Write,
    ) -> Result<VideoAnnotationResults, AnnotateError> {
        let plan = self.builder.cloud_storage(gcs_uri);

        writeln!(out, "{WAITING_MESSAGE}").map_err(AnnotateError::Output)?;
        out.flush().map_err(AnnotateError::Output)?;

        let start = Instant::now();
        let response = self.waiter.submit_and_wait(
            self.annotator.as_ref(),
            &plan.text_request,
            plan.timeout,
            self.logger.as_mut(),
        )?;
        self.logger
            .timing("text_detection", start.elapsed().as_secs_f64() * 1000.0);

        let result = single_result(&response)?;
        DetailedTextReport.print(result, out)?;
        self.logger.summary();
        Ok(result.clone())
    }
}
