pub const DEFAULT_ENDPOINT: &str = "https://videointelligence.googleapis.com";
pub const API_VERSION: &str = "v1";

/// Language used for speech transcription of local files (Cantonese, Hong Kong).
pub const SPEECH_LANGUAGE_CODE: &str = "zh-HK";
pub const SPEECH_MAX_ALTERNATIVES: u32 = 1;

/// Wait budget for videos referenced from Cloud Storage.
pub const CLOUD_STORAGE_TIMEOUT_SECS: u64 = 300;

/// Local uploads wait at least this long, plus `LOCAL_TIMEOUT_PER_MIB_SECS`
/// per whole MiB once that product exceeds the floor.
pub const LOCAL_TIMEOUT_FLOOR_SECS: u64 = 600;
pub const LOCAL_TIMEOUT_PER_MIB_SECS: u64 = 60;

pub const BYTES_PER_MIB: u64 = 1024 * 1024;

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Progress log lines are emitted every time the reported percentage
/// advances by at least this many points.
pub const PROGRESS_LOG_STEP: u32 = 10;
