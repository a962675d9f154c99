pub mod assignments;
pub mod contract_dates;
pub mod contracts;

use reqwest::{Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Thin JSON client for the booking backend.
///
/// One method per endpoint, grouped by resource in the submodules. Failures
/// are never retried here.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> AppResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("Invalid booking API url `{base_url}`: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "Booking API url `{base_url}` cannot carry a path"
            )));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            base_url,
            token,
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(&config.api_base_url, config.api_token.clone())
    }

    /// Appends percent-encoded path segments to the base url.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let builder = self.client.request(method, self.endpoint(segments));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends the request and decodes a JSON body. `label` is what gets logged,
    /// so callers keep secrets such as response tokens out of it.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder, label: &str) -> AppResult<T> {
        debug!("Calling booking backend: {label}");

        let response = request.send().await.map_err(|e| {
            let err = AppError::transport(e);
            error!("{label} failed: {err}");
            err
        })?;

        let status = response.status();
        let text = response.text().await.map_err(AppError::transport)?;

        if !status.is_success() {
            let message = error_message(&text, status);
            error!("{label} returned HTTP {status}: {message}");
            return Err(AppError::Http {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(serde_json::from_str("null")?);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// The backend puts its message in `message` or `error`; otherwise the raw
/// body is the message.
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "error"]
                .iter()
                .find_map(|field| value[*field].as_str().map(str::to_string))
        });

    match from_json {
        Some(message) => message,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => format!("HTTP {status}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_encodes_segments() {
        let api = ApiClient::new("http://backend.local/api/", None).unwrap();
        assert_eq!(
            api.endpoint(&["monthly-contracts", "7", "send"]).as_str(),
            "http://backend.local/api/monthly-contracts/7/send"
        );
        assert_eq!(
            api.endpoint(&["monthly-contract-musicians", "token", "a/b c"]).as_str(),
            "http://backend.local/api/monthly-contract-musicians/token/a%2Fb%20c"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        assert!(ApiClient::new("not a url", None).is_err());
        assert!(ApiClient::new("mailto:ops@example.com", None).is_err());
    }

    #[tokio::test]
    async fn unreachable_backend_error_hides_the_token() {
        use actix_web::ResponseError;
        use crate::models::ResponseToken;

        let api = ApiClient::new("http://127.0.0.1:9/api/", None).unwrap();
        let err = api
            .musician_contract_by_token(&ResponseToken::new("tok-SECRET-abc123"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Transport(_)));
        assert!(!err.to_string().contains("tok-SECRET-abc123"));
        assert!(!format!("{err:?}").contains("tok-SECRET-abc123"));

        let body = actix_web::body::to_bytes(err.error_response().into_body())
            .await
            .unwrap();
        assert!(!String::from_utf8_lossy(&body).contains("tok-SECRET-abc123"));
    }

    #[test]
    fn error_message_prefers_backend_fields() {
        let status = reqwest::StatusCode::BAD_REQUEST;
        assert_eq!(error_message(r#"{"message":"Planner locked"}"#, status), "Planner locked");
        assert_eq!(error_message(r#"{"error":"Not allowed"}"#, status), "Not allowed");
        assert_eq!(error_message("plain failure\n", status), "plain failure");
        assert_eq!(error_message("", status), "HTTP 400 Bad Request");
    }
}
