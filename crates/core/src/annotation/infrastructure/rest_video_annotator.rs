use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;

use crate::annotation::domain::annotate_request::AnnotateVideoRequest;
use crate::annotation::domain::operation::Operation;
use crate::annotation::domain::video_annotator::VideoAnnotator;
use crate::shared::constants::{API_VERSION, DEFAULT_ENDPOINT};
use crate::shared::error::AnnotateError;

/// Upper bound for status polls. Submissions use the caller's wait budget.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(300);

const QUOTA_PROJECT_HEADER: &str = "x-goog-user-project";

#[derive(Clone, Debug)]
pub struct RestConfig {
    pub endpoint: String,
    pub access_token: String,
    pub quota_project: Option<String>,
    pub http_timeout: Duration,
}

impl RestConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            access_token: access_token.into(),
            quota_project: None,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

/// `VideoAnnotator` backed by the Video Intelligence REST API.
pub struct RestVideoAnnotator {
    client: Client,
    endpoint: String,
    access_token: String,
    quota_project: Option<String>,
}

impl RestVideoAnnotator {
    pub fn new(config: RestConfig) -> Result<Self, AnnotateError> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| AnnotateError::Transport {
                url: config.endpoint.clone(),
                source: e,
            })?;
        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            access_token: config.access_token,
            quota_project: config.quota_project,
        })
    }

    pub fn annotate_url(&self) -> String {
        format!("{}/{API_VERSION}/videos:annotate", self.endpoint)
    }

    pub fn operation_url(&self, operation_name: &str) -> String {
        format!(
            "{}/{API_VERSION}/{}",
            self.endpoint,
            operation_name.trim_start_matches('/')
        )
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.bearer_auth(&self.access_token);
        match &self.quota_project {
            Some(project) => builder.header(QUOTA_PROJECT_HEADER, project),
            None => builder,
        }
    }

    fn send(&self, url: &str, builder: RequestBuilder) -> Result<Operation, AnnotateError> {
        let response = self
            .authorized(builder)
            .send()
            .map_err(|e| AnnotateError::Transport {
                url: url.to_string(),
                source: e,
            })?;
        read_operation(url, response)
    }
}

impl VideoAnnotator for RestVideoAnnotator {
    fn submit(
        &self,
        request: &AnnotateVideoRequest,
        timeout: Duration,
    ) -> Result<Operation, AnnotateError> {
        let url = self.annotate_url();
        log::debug!(
            "POST {url} features={:?} timeout={}s",
            request.features,
            timeout.as_secs()
        );
        self.send(&url, self.client.post(&url).timeout(timeout).json(request))
    }

    fn poll(&self, operation_name: &str) -> Result<Operation, AnnotateError> {
        let url = self.operation_url(operation_name);
        log::debug!("GET {url}");
        self.send(&url, self.client.get(&url))
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

fn read_operation(url: &str, response: Response) -> Result<Operation, AnnotateError> {
    let status = response.status();
    let body = response.text().map_err(|e| AnnotateError::Transport {
        url: url.to_string(),
        source: e,
    })?;

    if !status.is_success() {
        return Err(AnnotateError::Http {
            status: status.as_u16(),
            message: error_message(&body),
        });
    }

    serde_json::from_str(&body).map_err(AnnotateError::Decode)
}

/// Extracts the message from a Google API error envelope, falling back to
/// the raw body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ => body.trim().to_string(),
    }
}
