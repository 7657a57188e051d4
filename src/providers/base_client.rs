use crate::core::error::ChatError;
use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;

/// Generous fixed timeout for the single blocking inference call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Thin JSON-over-HTTP client for a local inference endpoint.
///
/// One attempt per call, no retries, no cancellation beyond the timeout.
#[derive(Clone)]
pub struct HttpClient {
    endpoint: String,
}

impl HttpClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
        }
    }

    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Response, ChatError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let url = format!("{}/{}", self.endpoint, path.trim_start_matches('/'));

        let response = client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(payload)
            .send()
            .await?;
        Ok(response)
    }
}
