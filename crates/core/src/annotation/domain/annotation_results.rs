use serde::Deserialize;

use crate::shared::time_offset::TimeOffset;

/// `google.rpc.Status` as embedded in operations and per-video results.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Status {
    pub code: i32,
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NormalizedVertex {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NormalizedBoundingPoly {
    pub vertices: Vec<NormalizedVertex>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextFrame {
    pub rotated_bounding_box: NormalizedBoundingPoly,
    pub time_offset: TimeOffset,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoSegment {
    pub start_time_offset: TimeOffset,
    pub end_time_offset: TimeOffset,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextSegment {
    pub segment: VideoSegment,
    pub confidence: f32,
    pub frames: Vec<TextFrame>,
}

/// Text detected in one continuous span of the video.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextAnnotation {
    pub text: String,
    pub segments: Vec<TextSegment>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpeechRecognitionAlternative {
    pub transcript: String,
    pub confidence: f32,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpeechTranscription {
    pub alternatives: Vec<SpeechRecognitionAlternative>,
    pub language_code: String,
}

/// Annotations for a single input video.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoAnnotationResults {
    pub input_uri: String,
    pub text_annotations: Vec<TextAnnotation>,
    pub speech_transcriptions: Vec<SpeechTranscription>,
    pub error: Option<Status>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnnotateVideoResponse {
    pub annotation_results: Vec<VideoAnnotationResults>,
}

impl AnnotateVideoResponse {
    /// Results for the submitted video. Each request carries exactly one
    /// video, so only the first entry is meaningful.
    pub fn first_result(&self) -> Option<&VideoAnnotationResults> {
        self.annotation_results.first()
    }
}
