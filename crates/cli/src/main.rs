use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use video_annotate_core::annotation::domain::video_annotator::VideoAnnotator;
use video_annotate_core::annotation::infrastructure::rest_video_annotator::{
    RestConfig, RestVideoAnnotator, DEFAULT_HTTP_TIMEOUT,
};
use video_annotate_core::input::domain::input_choice::{InputChoice, InputSelector};
use video_annotate_core::input::infrastructure::stdin_line_source::StdinLineSource;
use video_annotate_core::pipeline::detect_text_gcs_use_case::DetectTextGcsUseCase;
use video_annotate_core::pipeline::detect_text_local_use_case::DetectTextLocalUseCase;
use video_annotate_core::pipeline::operation_logger::LogOperationLogger;
use video_annotate_core::pipeline::operation_waiter::OperationWaiter;
use video_annotate_core::pipeline::request_builder::RequestBuilder;
use video_annotate_core::shared::settings::Settings;

/// Detect on-screen text and transcribe speech in videos with the
/// Cloud Video Intelligence API.
///
/// The video source is chosen interactively; these options only tune how
/// the service is reached.
#[derive(Parser)]
#[command(name = "video-annotate")]
struct Cli {
    /// OAuth 2.0 access token, e.g. from `gcloud auth print-access-token`.
    #[arg(long, env = "GOOGLE_OAUTH_ACCESS_TOKEN", hide_env_values = true)]
    access_token: String,

    /// API endpoint (overrides the settings file).
    #[arg(long, env = "VIDEO_ANNOTATE_ENDPOINT")]
    endpoint: Option<String>,

    /// Project billed for API usage (overrides the settings file).
    #[arg(long, env = "GOOGLE_CLOUD_QUOTA_PROJECT")]
    quota_project: Option<String>,

    /// Seconds between operation status checks (overrides the settings file).
    #[arg(long, env = "VIDEO_ANNOTATE_POLL_INTERVAL")]
    poll_interval: Option<u64>,

    /// Settings file to use instead of the default location.
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;
    validate(&settings)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut source = StdinLineSource::stdin();
    let selection = InputSelector::new(&mut source, &mut out).select()?;

    let annotator = build_annotator(&cli, &settings)?;
    let builder = RequestBuilder::new(
        settings.cloud_storage_timeout(),
        settings.local_file_timeout(),
        settings.speech_options(),
    );
    let waiter = OperationWaiter::new(settings.poll_interval());
    let logger = Box::new(LogOperationLogger::default());

    match selection.choice {
        InputChoice::CloudStorage => {
            let mut use_case = DetectTextGcsUseCase::new(annotator, builder, waiter, logger);
            use_case.execute(&selection.location, &mut out)?;
        }
        InputChoice::LocalFile => {
            let mut use_case = DetectTextLocalUseCase::new(annotator, builder, waiter, logger);
            use_case.execute(Path::new(&selection.location), &mut out)?;
        }
    }

    out.flush()?;
    Ok(())
}

fn load_settings(cli: &Cli) -> Result<Settings, Box<dyn std::error::Error>> {
    let mut settings = match &cli.settings {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    if let Some(endpoint) = &cli.endpoint {
        settings.endpoint = endpoint.clone();
    }
    if let Some(project) = &cli.quota_project {
        settings.quota_project = Some(project.clone());
    }
    if let Some(secs) = cli.poll_interval {
        settings.poll_interval_secs = secs;
    }
    log::debug!("Using settings: {settings:?}");
    Ok(settings)
}

fn build_annotator(
    cli: &Cli,
    settings: &Settings,
) -> Result<Box<dyn VideoAnnotator>, Box<dyn std::error::Error>> {
    log::info!("Using endpoint {}", settings.endpoint);
    let annotator = RestVideoAnnotator::new(RestConfig {
        endpoint: settings.endpoint.clone(),
        access_token: cli.access_token.clone(),
        quota_project: settings.quota_project.clone(),
        http_timeout: DEFAULT_HTTP_TIMEOUT,
    })?;
    Ok(Box::new(annotator))
}

fn validate(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    if !settings.endpoint.starts_with("http://") && !settings.endpoint.starts_with("https://") {
        return Err(format!(
            "Endpoint must start with http:// or https://, got '{}'",
            settings.endpoint
        )
        .into());
    }
    if settings.poll_interval_secs == 0 {
        return Err("Poll interval must be at least 1 second".into());
    }
    if settings.language_code.trim().is_empty() {
        return Err("Language code must not be empty".into());
    }
    if settings.cloud_storage_timeout_secs == 0 {
        return Err("Cloud Storage timeout must be at least 1 second".into());
    }
    Ok(())
}
