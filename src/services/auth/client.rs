//! HTTP adapter for the remote auth service (`POST /auths/validToken`).
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::services::auth::outcome::ValidationOutcome;
use crate::services::auth::validator::TokenValidator;

const VALID_TOKEN_PATH: &str = "auths/validToken";

#[derive(Debug, Serialize)]
struct ValidTokenRequest<'a> {
    token: &'a str,
}

#[derive(Debug, Deserialize)]
struct ValidTokenResponse {
    #[serde(rename = "statusNum", alias = "status")]
    status_num: i32,
}

/// Client-side failures. Never leaves this module: the gate only sees
/// `ValidationOutcome::TransportError`.
#[derive(Debug, Error)]
pub enum ValidatorError {
    #[error("auth service client init failed: {0}")]
    Init(#[source] reqwest::Error),
    #[error("invalid auth service url: {0}")]
    Url(#[from] url::ParseError),
    #[error("auth service request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("auth service returned {status}")]
    Status { status: u16 },
    #[error("auth service response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
}

/// `TokenValidator` backed by the auth service over HTTP.
#[derive(Debug, Clone)]
pub struct AuthServiceClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl AuthServiceClient {
    /// Build a client for `base_url`. Every call is bounded by `timeout`.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self, ValidatorError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(ValidatorError::Init)?;

        Ok(Self {
            http,
            endpoint: endpoint(base_url)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn fetch_status_num(&self, token: &str) -> Result<i32, ValidatorError> {
        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(&ValidTokenRequest { token })
            .send()
            .await
            .map_err(ValidatorError::Transport)?;

        if !resp.status().is_success() {
            return Err(ValidatorError::Status {
                status: resp.status().as_u16(),
            });
        }

        let body: ValidTokenResponse = resp.json().await.map_err(ValidatorError::Decode)?;
        Ok(body.status_num)
    }
}

/// Join the validation path onto `base`, keeping any path prefix the base
/// already carries (`http://auth/internal` -> `http://auth/internal/auths/validToken`).
fn endpoint(base: &Url) -> Result<Url, url::ParseError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(VALID_TOKEN_PATH)
}

#[async_trait]
impl TokenValidator for AuthServiceClient {
    fn backend_name(&self) -> &'static str {
        "auth-service"
    }

    async fn validate(&self, token: &str) -> ValidationOutcome {
        match self.fetch_status_num(token).await {
            Ok(n) => {
                let outcome = ValidationOutcome::from_status_num(n);
                if outcome == ValidationOutcome::TransportError {
                    tracing::warn!(status_num = n, "auth service returned unknown status");
                }
                outcome
            }
            Err(err) => {
                tracing::warn!(error = %err, endpoint = %self.endpoint, "token validation failed");
                ValidationOutcome::TransportError
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, timeout: Duration) -> AuthServiceClient {
        let base = Url::parse(&server.uri()).unwrap();
        AuthServiceClient::new(&base, timeout).unwrap()
    }

    async fn mount_status(server: &MockServer, status_num: i32) {
        Mock::given(method("POST"))
            .and(path("/auths/validToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "statusNum": status_num
            })))
            .mount(server)
            .await;
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let base = Url::parse("http://auth.local:8080").unwrap();
        assert_eq!(
            endpoint(&base).unwrap().as_str(),
            "http://auth.local:8080/auths/validToken"
        );

        let base = Url::parse("http://auth.local/internal").unwrap();
        assert_eq!(
            endpoint(&base).unwrap().as_str(),
            "http://auth.local/internal/auths/validToken"
        );

        let base = Url::parse("http://auth.local/internal/").unwrap();
        assert_eq!(
            endpoint(&base).unwrap().as_str(),
            "http://auth.local/internal/auths/validToken"
        );
    }

    #[tokio::test]
    async fn posts_token_and_decodes_each_status() {
        for (status_num, expected) in [
            (1, ValidationOutcome::Valid),
            (2, ValidationOutcome::Expired),
            (3, ValidationOutcome::Invalid),
            (0, ValidationOutcome::Missing),
        ] {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/auths/validToken"))
                .and(body_json(json!({ "token": "abc" })))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "statusNum": status_num
                })))
                .expect(1)
                .mount(&server)
                .await;

            let client = client_for(&server, Duration::from_secs(2));
            assert_eq!(client.validate("abc").await, expected);
        }
    }

    #[tokio::test]
    async fn accepts_status_alias() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auths/validToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": 1 })))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(2));
        assert_eq!(client.validate("abc").await, ValidationOutcome::Valid);
    }

    #[tokio::test]
    async fn empty_token_is_still_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auths/validToken"))
            .and(body_json(json!({ "token": "" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "statusNum": 0 })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(2));
        assert_eq!(client.validate("").await, ValidationOutcome::Missing);
    }

    #[tokio::test]
    async fn unknown_status_is_transport_error() {
        let server = MockServer::start().await;
        mount_status(&server, 7).await;

        let client = client_for(&server, Duration::from_secs(2));
        assert_eq!(client.validate("abc").await, ValidationOutcome::TransportError);
    }

    #[tokio::test]
    async fn non_2xx_is_transport_error() {
        for code in [400u16, 401, 404, 500, 503] {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(code).set_body_json(json!({ "statusNum": 1 })))
                .mount(&server)
                .await;

            let client = client_for(&server, Duration::from_secs(2));
            assert_eq!(
                client.validate("abc").await,
                ValidationOutcome::TransportError,
                "status {code}"
            );
        }
    }

    #[tokio::test]
    async fn garbage_body_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_secs(2));
        assert_eq!(client.validate("abc").await, ValidationOutcome::TransportError);
    }

    #[tokio::test]
    async fn slow_service_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "statusNum": 1 }))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, Duration::from_millis(100));
        assert_eq!(client.validate("abc").await, ValidationOutcome::TransportError);
    }

    #[tokio::test]
    async fn unreachable_service_is_transport_error() {
        let base = Url::parse("http://127.0.0.1:1").unwrap();
        let client = AuthServiceClient::new(&base, Duration::from_millis(500)).unwrap();
        assert_eq!(client.validate("abc").await, ValidationOutcome::TransportError);
    }
}
