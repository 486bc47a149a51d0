use std::error::Error;
use std::future::Future;
use std::time::Duration;

use log::{debug, info};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::protocol::{LlmRequest, LlmResponse, RunRequest, RunResponse};
use crate::settings::Settings;

/// A failed round trip to the backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request never produced a response.
    #[error("{0}")]
    Network(String),
    /// Any non-2xx status; `body` is the raw response text.
    #[error("HTTP {status}")]
    Status { status: u16, body: String },
    /// A 2xx response whose body is not the expected JSON.
    #[error("unexpected backend response: {0}")]
    Malformed(String),
}

/// The execution service a run talks to.
pub trait Backend {
    fn execute(
        &self,
        request: &RunRequest,
    ) -> impl Future<Output = Result<RunResponse, TransportError>> + Send;

    fn complete(
        &self,
        request: &LlmRequest,
    ) -> impl Future<Output = Result<LlmResponse, TransportError>> + Send;
}

/// JSON-over-HTTP backend at the URLs configured in [`Settings`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    run_url: String,
    llm_url: String,
}

impl HttpBackend {
    pub fn new(settings: &Settings) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Network(error_chain(&e)))?;
        Ok(HttpBackend {
            client,
            run_url: settings.backend_url.clone(),
            llm_url: settings.llm_url(),
        })
    }

    pub fn run_url(&self) -> &str {
        &self.run_url
    }

    pub fn llm_url(&self) -> &str {
        &self.llm_url
    }

    async fn post<Req, Resp>(&self, url: &str, body: &Req) -> Result<Resp, TransportError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        info!("POST {}", url);
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Network(error_chain(&e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::Network(error_chain(&e)))?;
        debug!("{} responded {} ({} bytes)", url, status, text.len());

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        serde_json::from_str(&text).map_err(|e| TransportError::Malformed(e.to_string()))
    }
}

impl Backend for HttpBackend {
    async fn execute(&self, request: &RunRequest) -> Result<RunResponse, TransportError> {
        self.post(&self.run_url, request).await
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, TransportError> {
        self.post(&self.llm_url, request).await
    }
}

/// `error` followed by each of its sources, joined with `: `.
fn error_chain(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
