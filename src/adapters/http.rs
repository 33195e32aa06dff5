use crate::utils::error::{Result, TravelError};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Shared reqwest client; without a timeout a stalled service blocks the caller.
pub fn build_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Non-2xx becomes a `ServiceError`, an undecodable body a `MalformedResponse`.
pub async fn read_json<T: DeserializeOwned>(service: &str, response: Response) -> Result<T> {
    let status = response.status();
    tracing::debug!("{} response status: {}", service, status);

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TravelError::service(service, status.as_u16(), &body));
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| TravelError::malformed(service, e.to_string()))
}
