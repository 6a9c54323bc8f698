use std::time::Duration;

use async_trait::async_trait;
use reqwest::Response;
use serde::Serialize;

use super::{ErrorBody, Outcome, SignUpResponse, Transport, CREATE_ACCOUNT_PATH};
use crate::{fields::FormFields, VERSION};

/// Information about an unsuccessful response.
#[derive(Debug, Clone)]
pub struct NotSuccessResponseInfo {
    pub status_code: u16,
    pub text: String,
}

impl From<NotSuccessResponseInfo> for ErrorBody {
    fn from(info: NotSuccessResponseInfo) -> Self {
        let body = serde_json::from_str::<ErrorBody>(&info.text).unwrap_or_else(|e| {
            tracing::debug!("Error response body is not a JSON error object: {}", e);
            ErrorBody::default()
        });
        ErrorBody {
            http_status: Some(info.status_code),
            message: body.message,
        }
    }
}

#[async_trait]
pub trait ResponseExt {
    async fn check_success(self) -> Result<Self, NotSuccessResponseInfo>
    where
        Self: Sized;
}

#[async_trait]
impl ResponseExt for Response {
    async fn check_success(self) -> Result<Self, NotSuccessResponseInfo> {
        let status = self.status();
        if !status.is_success() {
            return Err(NotSuccessResponseInfo {
                status_code: status.as_u16(),
                text: self
                    .text()
                    .await
                    .unwrap_or_else(|_| "Failed to read response text".to_string()),
            });
        }
        Ok(self)
    }
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(format!("velox/{}", VERSION))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post_json<T: Serialize>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<Response, reqwest::Error> {
        let url = format!("{}{}", self.base_url, endpoint);

        self.http
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn sign_up(&self, request: FormFields) -> Outcome {
        let response = match self.post_json(CREATE_ACCOUNT_PATH, &request).await {
            Ok(response) => response,
            Err(e) => return Outcome::Fault(e.to_string()),
        };

        match response.check_success().await {
            Ok(response) => match response.json::<SignUpResponse>().await {
                Ok(res) => Outcome::Success(res),
                Err(e) => Outcome::Fault(format!("Invalid response body: {}", e)),
            },
            Err(info) => {
                tracing::debug!("Account creation refused with status {}", info.status_code);
                Outcome::Rejected(info.into())
            }
        }
    }
}
