use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::annotation::domain::annotate_request::AnnotateVideoRequest;
use crate::annotation::domain::annotation_results::AnnotateVideoResponse;
use crate::annotation::domain::operation::Operation;
use crate::annotation::domain::video_annotator::VideoAnnotator;
use crate::pipeline::operation_logger::OperationLogger;
use crate::shared::error::AnnotateError;

/// Granularity at which a sleeping wait notices cancellation.
const CANCEL_CHECK_INTERVAL: Duration = Duration::from_millis(100);

/// Blocks until a submitted operation finishes, fails, or exhausts its budget.
///
/// Only the local wait is abandoned on timeout or cancellation; the remote
/// job keeps running.
pub struct OperationWaiter {
    poll_interval: Duration,
    cancelled: Arc<AtomicBool>,
}

impl OperationWaiter {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_cancel_flag(mut self, cancelled: Arc<AtomicBool>) -> Self {
        self.cancelled = cancelled;
        self
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Submits `request` and waits for its response. The submission itself
    /// is bounded by the same `timeout` as the wait.
    pub fn submit_and_wait(
        &self,
        annotator: &dyn VideoAnnotator,
        request: &AnnotateVideoRequest,
        timeout: Duration,
        logger: &mut dyn OperationLogger,
    ) -> Result<AnnotateVideoResponse, AnnotateError> {
        let operation = annotator.submit(request, timeout)?;
        logger.info(&format!("Submitted operation {}", operation.name));
        self.wait(annotator, operation, timeout, logger)
    }

    pub fn wait(
        &self,
        annotator: &dyn VideoAnnotator,
        operation: Operation,
        timeout: Duration,
        logger: &mut dyn OperationLogger,
    ) -> Result<AnnotateVideoResponse, AnnotateError> {
        let start = Instant::now();
        let name = operation.name.clone();
        let mut current = operation;

        loop {
            if let Some(percent) = current.progress_percent() {
                logger.progress(&name, percent);
            }
            if let Some(response) = current.into_response()? {
                return Ok(response);
            }

            if self.is_cancelled() {
                return Err(AnnotateError::Cancelled { operation: name });
            }
            let elapsed = start.elapsed();
            if elapsed >= timeout {
                return Err(AnnotateError::Timeout {
                    operation: name,
                    waited: timeout,
                });
            }

            self.sleep(self.poll_interval.min(timeout - elapsed));
            if self.is_cancelled() {
                return Err(AnnotateError::Cancelled { operation: name });
            }
            current = annotator.poll(&name)?;
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    fn sleep(&self, duration: Duration) {
        let deadline = Instant::now() + duration;
        loop {
            let now = Instant::now();
            if now >= deadline || self.is_cancelled() {
                return;
            }
            thread::sleep((deadline - now).min(CANCEL_CHECK_INTERVAL));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::domain::annotate_request::{Feature, VideoSource};
    use crate::annotation::domain::annotation_results::{Status, VideoAnnotationResults};
    use crate::annotation::domain::operation::{AnnotateVideoProgress, VideoAnnotationProgress};
    use crate::pipeline::operation_logger::NullOperationLogger;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    // ─── Stubs ───

    /// Returns `submitted` from `submit`, then scripted states from `poll`.
    /// Once the script runs out, keeps returning a pending operation.
    struct StubAnnotator {
        submitted: Operation,
        polls: Mutex<VecDeque<Result<Operation, AnnotateError>>>,
        poll_count: Mutex<usize>,
        submit_timeouts: Mutex<Vec<Duration>>,
    }

    impl StubAnnotator {
        fn new(submitted: Operation, polls: Vec<Result<Operation, AnnotateError>>) -> Self {
            Self {
                submitted,
                polls: Mutex::new(polls.into_iter().collect()),
                poll_count: Mutex::new(0),
                submit_timeouts: Mutex::new(Vec::new()),
            }
        }

        fn polls(&self) -> usize {
            *self.poll_count.lock().unwrap()
        }
    }

    impl VideoAnnotator for StubAnnotator {
        fn submit(
            &self,
            _: &AnnotateVideoRequest,
            timeout: Duration,
        ) -> Result<Operation, AnnotateError> {
            self.submit_timeouts.lock().unwrap().push(timeout);
            Ok(self.submitted.clone())
        }

        fn poll(&self, name: &str) -> Result<Operation, AnnotateError> {
            *self.poll_count.lock().unwrap() += 1;
            self.polls
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(pending(name, None)))
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        progress: Vec<u32>,
        messages: Vec<String>,
    }

    impl OperationLogger for RecordingLogger {
        fn progress(&mut self, _operation: &str, percent: u32) {
            self.progress.push(percent);
        }
        fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
        fn info(&mut self, message: &str) {
            self.messages.push(message.to_string());
        }
    }

    // ─── Helpers ───

    fn pending(name: &str, percent: Option<u32>) -> Operation {
        Operation {
            name: name.to_string(),
            metadata: percent.map(|p| AnnotateVideoProgress {
                annotation_progress: vec![VideoAnnotationProgress {
                    input_uri: "/b/v.mp4".to_string(),
                    progress_percent: p,
                }],
            }),
            ..Default::default()
        }
    }

    fn finished(name: &str, input_uri: &str) -> Operation {
        Operation {
            name: name.to_string(),
            done: true,
            response: Some(AnnotateVideoResponse {
                annotation_results: vec![VideoAnnotationResults {
                    input_uri: input_uri.to_string(),
                    ..Default::default()
                }],
            }),
            ..Default::default()
        }
    }

    fn request() -> AnnotateVideoRequest {
        AnnotateVideoRequest::new(
            VideoSource::InputUri("gs://b/v.mp4".to_string()),
            vec![Feature::TextDetection],
        )
    }

    const LONG: Duration = Duration::from_secs(60);

    // ─── Tests ───

    #[test]
    fn test_returns_response_after_polling() {
        let annotator = StubAnnotator::new(
            pending("op", Some(0)),
            vec![Ok(pending("op", Some(40))), Ok(finished("op", "/b/v.mp4"))],
        );
        let mut logger = RecordingLogger::default();
        let waiter = OperationWaiter::new(Duration::ZERO);

        let response = waiter
            .submit_and_wait(&annotator, &request(), LONG, &mut logger)
            .unwrap();

        assert_eq!(response.annotation_results[0].input_uri, "/b/v.mp4");
        assert_eq!(annotator.polls(), 2);
        assert_eq!(logger.progress, vec![0, 40]);
        assert_eq!(logger.messages, vec!["Submitted operation op".to_string()]);
    }

    #[test]
    fn test_submission_is_bounded_by_wait_budget() {
        let annotator = StubAnnotator::new(finished("op", "x"), vec![]);
        let waiter = OperationWaiter::new(Duration::ZERO);
        let budget = Duration::from_secs(1200);
        waiter
            .submit_and_wait(&annotator, &request(), budget, &mut NullOperationLogger)
            .unwrap();
        assert_eq!(*annotator.submit_timeouts.lock().unwrap(), vec![budget]);
    }

    #[test]
    fn test_already_done_operation_is_not_polled() {
        let annotator = StubAnnotator::new(finished("op", "x"), vec![]);
        let waiter = OperationWaiter::new(Duration::ZERO);
        waiter
            .submit_and_wait(&annotator, &request(), LONG, &mut NullOperationLogger)
            .unwrap();
        assert_eq!(annotator.polls(), 0);
    }

    #[test]
    fn test_zero_budget_times_out_immediately() {
        let annotator = StubAnnotator::new(pending("op", None), vec![]);
        let waiter = OperationWaiter::new(Duration::ZERO);
        let err = waiter
            .submit_and_wait(&annotator, &request(), Duration::ZERO, &mut NullOperationLogger)
            .unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(annotator.polls(), 0);
    }

    #[test]
    fn test_never_finishing_operation_times_out() {
        let annotator = StubAnnotator::new(pending("op", None), vec![]);
        let waiter = OperationWaiter::new(Duration::from_millis(5));
        let start = Instant::now();
        let err = waiter
            .submit_and_wait(
                &annotator,
                &request(),
                Duration::from_millis(50),
                &mut NullOperationLogger,
            )
            .unwrap_err();

        match err {
            AnnotateError::Timeout { operation, waited } => {
                assert_eq!(operation, "op");
                assert_eq!(waited, Duration::from_millis(50));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert!(annotator.polls() >= 1);
    }

    #[test]
    fn test_remote_failure_propagates() {
        let failed = Operation {
            name: "op".to_string(),
            done: true,
            error: Some(Status {
                code: 3,
                message: "invalid video".to_string(),
            }),
            ..Default::default()
        };
        let annotator = StubAnnotator::new(pending("op", None), vec![Ok(failed)]);
        let waiter = OperationWaiter::new(Duration::ZERO);
        let err = waiter
            .submit_and_wait(&annotator, &request(), LONG, &mut NullOperationLogger)
            .unwrap_err();
        assert!(matches!(err, AnnotateError::Remote { code: 3, .. }));
    }

    #[test]
    fn test_poll_error_propagates() {
        let annotator = StubAnnotator::new(
            pending("op", None),
            vec![Err(AnnotateError::Http {
                status: 503,
                message: "unavailable".to_string(),
            })],
        );
        let waiter = OperationWaiter::new(Duration::ZERO);
        let err = waiter
            .submit_and_wait(&annotator, &request(), LONG, &mut NullOperationLogger)
            .unwrap_err();
        assert!(matches!(err, AnnotateError::Http { status: 503, .. }));
        assert_eq!(annotator.polls(), 1);
    }

    #[test]
    fn test_cancelled_before_wait() {
        let annotator = StubAnnotator::new(pending("op", None), vec![]);
        let waiter = OperationWaiter::new(Duration::ZERO);
        waiter.cancel_flag().store(true, Ordering::Relaxed);
        let err = waiter
            .submit_and_wait(&annotator, &request(), LONG, &mut NullOperationLogger)
            .unwrap_err();
        assert!(matches!(err, AnnotateError::Cancelled { .. }));
        assert_eq!(annotator.polls(), 0);
    }

    #[test]
    fn test_cancel_interrupts_sleep() {
        let annotator = StubAnnotator::new(pending("op", None), vec![]);
        let flag = Arc::new(AtomicBool::new(false));
        let waiter = OperationWaiter::new(Duration::from_secs(30)).with_cancel_flag(flag.clone());

        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            flag.store(true, Ordering::Relaxed);
        });

        let start = Instant::now();
        let err = waiter
            .submit_and_wait(&annotator, &request(), LONG, &mut NullOperationLogger)
            .unwrap_err();
        canceller.join().unwrap();

        assert!(matches!(err, AnnotateError::Cancelled { .. }));
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(annotator.polls(), 0);
    }
}
