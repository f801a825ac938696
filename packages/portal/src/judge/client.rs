use async_trait::async_trait;
use common::JudgeConfig;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use tracing::debug;

use super::models::{CreatedResponse, JudgeRequest, JudgeToken, JudgeVerdict};
use super::{JudgeBackend, JudgeError};

const AUTH_HEADER: &str = "X-Auth-Token";

/// HTTP client for a Judge0-compatible execution service.
///
/// Cheap to clone and safe to share between concurrent gradings.
#[derive(Clone, Debug)]
pub struct Judge0Client {
    http: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl Judge0Client {
    pub fn new(config: &JudgeConfig) -> Result<Self, JudgeError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            JudgeError::Configuration(format!("base URL '{}': {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(JudgeError::Configuration(format!(
                "base URL '{}' cannot carry a path",
                config.base_url
            )));
        }

        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| JudgeError::Configuration(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone().filter(|key| !key.is_empty()),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, JudgeError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| JudgeError::Configuration("base URL cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header(AUTH_HEADER, key),
            None => builder,
        }
    }

    async fn read_body(
        response: reqwest::Response,
        expected: StatusCode,
    ) -> Result<String, JudgeError> {
        let status = response.status();
        let body = response.text().await?;
        if status != expected {
            return Err(JudgeError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl JudgeBackend for Judge0Client {
    async fn submit(&self, request: &JudgeRequest) -> Result<JudgeToken, JudgeError> {
        let url = self.endpoint(&["submissions"])?;
        let response = self
            .authorize(self.http.post(url))
            .query(&[("base64_encoded", "false")])
            .json(request)
            .send()
            .await?;

        let body = Self::read_body(response, StatusCode::CREATED).await?;
        let created: CreatedResponse = serde_json::from_str(&body)?;

        debug!(token = %created.token, "Queued judge job");
        Ok(created.token)
    }

    async fn poll(&self, token: &JudgeToken) -> Result<JudgeVerdict, JudgeError> {
        let url = self.endpoint(&["submissions", token.0.as_str()])?;
        let response = self
            .authorize(self.http.get(url))
            .query(&[("base64_encoded", "false")])
            .send()
            .await?;

        let body = Self::read_body(response, StatusCode::OK).await?;
        let verdict: JudgeVerdict = serde_json::from_str(&body)?;

        debug!(
            token = %token,
            status = verdict.status.id,
            description = %verdict.status.description,
            "Polled judge job"
        );
        Ok(verdict)
    }
}
