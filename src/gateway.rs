use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::json;

use crate::types::{AlertResult, PollResponse, SessionStatus, UploadResponse};

/// Contract with the monitoring backend. The controller never talks
/// transport directly; everything goes through this seam.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn start_live_session(&self) -> Result<SessionStatus>;
    async fn stop_live_session(&self) -> Result<SessionStatus>;
    async fn poll_events(&self) -> Result<PollResponse>;
    async fn submit_user_response(&self, response: &str) -> Result<()>;
    async fn submit_alert(&self, transcript: &str, clip_path: &str) -> Result<AlertResult>;
    async fn upload_clip(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadResponse>;
}

/// HTTP implementation speaking the backend's JSON routes.
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn start_live_session(&self) -> Result<SessionStatus> {
        self.client
            .post(self.url("/start_live"))
            .send()
            .await
            .context("start_live request failed")?
            .json()
            .await
            .context("start_live response was not valid JSON")
    }

    async fn stop_live_session(&self) -> Result<SessionStatus> {
        self.client
            .post(self.url("/stop_live"))
            .send()
            .await
            .context("stop_live request failed")?
            .json()
            .await
            .context("stop_live response was not valid JSON")
    }

    async fn poll_events(&self) -> Result<PollResponse> {
        self.client
            .get(self.url("/poll_events"))
            .send()
            .await
            .context("poll_events request failed")?
            .json()
            .await
            .context("poll_events response was not valid JSON")
    }

    async fn submit_user_response(&self, response: &str) -> Result<()> {
        self.client
            .post(self.url("/user_response"))
            .json(&json!({ "response": response }))
            .send()
            .await
            .context("user_response request failed")?;
        Ok(())
    }

    async fn submit_alert(&self, transcript: &str, clip_path: &str) -> Result<AlertResult> {
        self.client
            .post(self.url("/send_alert"))
            .json(&json!({ "transcript": transcript, "clip_path": clip_path }))
            .send()
            .await
            .context("send_alert request failed")?
            .json()
            .await
            .context("send_alert response was not valid JSON")
    }

    async fn upload_clip(&self, file_name: &str, bytes: Vec<u8>) -> Result<UploadResponse> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        self.client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await
            .context("upload request failed")?
            .json()
            .await
            .context("upload response was not valid JSON")
    }
}
