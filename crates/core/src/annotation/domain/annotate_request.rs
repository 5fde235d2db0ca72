use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Serialize, Serializer};

/// A video analysis capability requested from the service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Feature {
    TextDetection,
    SpeechTranscription,
}

/// Where the service reads the video from.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum VideoSource {
    /// A `gs://bucket/object` reference, sent verbatim.
    InputUri(String),
    /// Raw file bytes, base64-encoded on the wire.
    InputContent(#[serde(serialize_with = "serialize_base64")] Vec<u8>),
}

impl std::fmt::Debug for VideoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoSource::InputUri(uri) => f.debug_tuple("InputUri").field(uri).finish(),
            VideoSource::InputContent(bytes) => {
                write!(f, "InputContent({} bytes)", bytes.len())
            }
        }
    }
}

fn serialize_base64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(bytes))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechTranscriptionConfig {
    pub language_code: String,
    pub max_alternatives: u32,
    pub enable_automatic_punctuation: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_transcription_config: Option<SpeechTranscriptionConfig>,
}

/// Body of a `videos:annotate` call. Built once, never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateVideoRequest {
    #[serde(flatten)]
    pub source: VideoSource,
    pub features: Vec<Feature>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_context: Option<VideoContext>,
}

impl AnnotateVideoRequest {
    pub fn new(source: VideoSource, features: Vec<Feature>) -> Self {
        Self {
            source,
            features,
            video_context: None,
        }
    }

    pub fn with_context(mut self, context: VideoContext) -> Self {
        self.video_context = Some(context);
        self
    }

    pub fn speech_config(&self) -> Option<&SpeechTranscriptionConfig> {
        self.video_context
            .as_ref()
            .and_then(|c| c.speech_transcription_config.as_ref())
    }
}
