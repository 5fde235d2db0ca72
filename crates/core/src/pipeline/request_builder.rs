use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::annotation::domain::annotate_request::{
    AnnotateVideoRequest, Feature, SpeechTranscriptionConfig, VideoContext, VideoSource,
};
use crate::shared::constants::{
    BYTES_PER_MIB, CLOUD_STORAGE_TIMEOUT_SECS, LOCAL_TIMEOUT_FLOOR_SECS,
    LOCAL_TIMEOUT_PER_MIB_SECS, SPEECH_LANGUAGE_CODE, SPEECH_MAX_ALTERNATIVES,
};
use crate::shared::error::AnnotateError;

/// How long to wait for an operation, given the size of the uploaded video.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeoutPolicy {
    Fixed(Duration),
    /// `max(floor, per_mib × whole MiB)`.
    SizeScaled { floor: Duration, per_mib: Duration },
}

impl TimeoutPolicy {
    pub fn cloud_storage_default() -> Self {
        TimeoutPolicy::Fixed(Duration::from_secs(CLOUD_STORAGE_TIMEOUT_SECS))
    }

    pub fn local_file_default() -> Self {
        TimeoutPolicy::SizeScaled {
            floor: Duration::from_secs(LOCAL_TIMEOUT_FLOOR_SECS),
            per_mib: Duration::from_secs(LOCAL_TIMEOUT_PER_MIB_SECS),
        }
    }

    pub fn resolve(&self, size_bytes: u64) -> Duration {
        match *self {
            TimeoutPolicy::Fixed(timeout) => timeout,
            TimeoutPolicy::SizeScaled { floor, per_mib } => {
                let whole_mib = u32::try_from(size_bytes / BYTES_PER_MIB).unwrap_or(u32::MAX);
                floor.max(per_mib.saturating_mul(whole_mib))
            }
        }
    }
}

/// Speech settings applied to local-file transcription requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeechOptions {
    pub language_code: String,
    pub max_alternatives: u32,
    pub enable_automatic_punctuation: bool,
}

impl Default for SpeechOptions {
    fn default() -> Self {
        Self {
            language_code: SPEECH_LANGUAGE_CODE.to_string(),
            max_alternatives: SPEECH_MAX_ALTERNATIVES,
            enable_automatic_punctuation: true,
        }
    }
}

/// Requests for a Cloud Storage video.
#[derive(Clone, Debug, PartialEq)]
pub struct CloudStoragePlan {
    pub text_request: AnnotateVideoRequest,
    pub timeout: Duration,
}

/// Requests for a local video. Both share one wait budget.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalFilePlan {
    pub text_request: AnnotateVideoRequest,
    pub speech_request: AnnotateVideoRequest,
    pub timeout: Duration,
}

pub struct RequestBuilder {
    cloud_storage_timeout: TimeoutPolicy,
    local_file_timeout: TimeoutPolicy,
    speech: SpeechOptions,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new(
            TimeoutPolicy::cloud_storage_default(),
            TimeoutPolicy::local_file_default(),
            SpeechOptions::default(),
        )
    }
}

impl RequestBuilder {
    pub fn new(
        cloud_storage_timeout: TimeoutPolicy,
        local_file_timeout: TimeoutPolicy,
        speech: SpeechOptions,
    ) -> Self {
        Self {
            cloud_storage_timeout,
            local_file_timeout,
            speech,
        }
    }

    /// Text detection only; the URI is passed through untouched.
    pub fn cloud_storage(&self, uri: &str) -> CloudStoragePlan {
        CloudStoragePlan {
            text_request: AnnotateVideoRequest::new(
                VideoSource::InputUri(uri.to_string()),
                vec![Feature::TextDetection],
            ),
            timeout: self.cloud_storage_timeout.resolve(0),
        }
    }

    /// Reads the whole file and builds a text detection request and a
    /// speech transcription request over the same bytes.
    pub fn local_file(&self, path: &Path) -> Result<LocalFilePlan, AnnotateError> {
        let data = fs::read(path).map_err(|e| AnnotateError::ReadInput {
            path: path.to_path_buf(),
            source: e,
        })?;
        let size_bytes = data.len() as u64;
        let timeout = self.local_file_timeout.resolve(size_bytes);
        log::info!(
            "Read {} ({size_bytes} bytes), waiting up to {}s per request",
            path.display(),
            timeout.as_secs()
        );

        let speech_request = AnnotateVideoRequest::new(
            VideoSource::InputContent(data.clone()),
            vec![Feature::SpeechTranscription],
        )
        .with_context(VideoContext {
            speech_transcription_config: Some(SpeechTranscriptionConfig {
                language_code: self.speech.language_code.clone(),
                max_alternatives: self.speech.max_alternatives,
                enable_automatic_punctuation: self.speech.enable_automatic_punctuation,
            }),
        });
        let text_request =
            AnnotateVideoRequest::new(VideoSource::InputContent(data), vec![Feature::TextDetection]);

        Ok(LocalFilePlan {
            text_request,
            speech_request,
            timeout,
        })
    }
}
