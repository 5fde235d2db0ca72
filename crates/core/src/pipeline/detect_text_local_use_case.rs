use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::annotation::domain::annotate_request::AnnotateVideoRequest;
use crate::annotation::domain::annotation_results::VideoAnnotationResults;
use crate::annotation::domain::video_annotator::VideoAnnotator;
use crate::pipeline::detect_text_gcs_use_case::WAITING_MESSAGE;
use crate::pipeline::operation_logger::OperationLogger;
use crate::pipeline::operation_waiter::OperationWaiter;
use crate::pipeline::request_builder::RequestBuilder;
use crate::pipeline::result_printer::{
    single_result, ConcatenatedTextReport, ResultReport, TranscriptReport,
};
use crate::shared::error::AnnotateError;

/// Results of both local-file passes.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalAnnotationResults {
    pub text: VideoAnnotationResults,
    pub speech: VideoAnnotationResults,
}

/// Text detection followed by speech transcription for a local video.
///
/// The file is uploaded inline twice, once per feature, and each wait
/// gets the same size-derived budget.
pub struct DetectTextLocalUseCase {
    annotator: Box<dyn VideoAnnotator>,
    builder: RequestBuilder,
    waiter: OperationWaiter,
    logger: Box<dyn OperationLogger>,
}

impl DetectTextLocalUseCase {
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
        path: &Path,
        out: &mut dyn Write,
    ) -> Result<LocalAnnotationResults, AnnotateError> {
        let plan = self.builder.local_file(path)?;

        let text = self.run_stage(
            "text_detection",
            "Text Detection",
            &plan.text_request,
            plan.timeout,
            &ConcatenatedTextReport,
            out,
        )?;
        let speech = self.run_stage(
            "speech_transcription",
            "Speech Transcription",
            &plan.speech_request,
            plan.timeout,
            &TranscriptReport,
            out,
        )?;

        self.logger.summary();
        Ok(LocalAnnotationResults { text, speech })
    }

    fn run_stage(
        &mut self,
        stage: &str,
        label: &str,
        request: &AnnotateVideoRequest,
        timeout: Duration,
        report: &dyn ResultReport,
        out: &mut dyn Write,
    ) -> Result<VideoAnnotationResults, AnnotateError> {
        writeln!(out, "{WAITING_MESSAGE}{label}").map_err(AnnotateError::Output)?;
        out.flush().map_err(AnnotateError::Output)?;

        let start = Instant::now();
        let response = self.waiter.submit_and_wait(
            self.annotator.as_ref(),
            request,
            timeout,
            self.logger.as_mut(),
        )?;
        self.logger
            .timing(stage, start.elapsed().as_secs_f64() * 1000.0);

        let result = single_result(&response)?;
        report.print(result, out)?;
        Ok(result.clone())
    }
}
