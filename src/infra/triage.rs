use async_trait::async_trait;
use reqwest::{Client, header::CONTENT_TYPE};

use crate::config::AppConfig;
use crate::domain::triage::{TriageReply, TriageRequest};
use crate::error::{AppError, AppResult};
use crate::services::TriageService;

pub const API_KEY_HEADER: &str = "X-API-Key";

pub struct HttpTriageClient {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl HttpTriageClient {
    /// Builds a client from an already validated config.
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let api_key = config
            .api_key()
            .ok_or_else(|| AppError::Configuration("triage API key not configured".to_string()))?
            .to_string();

        let http = Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(|err| {
                AppError::Configuration(format!("failed to build triage HTTP client: {err}"))
            })?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl TriageService for HttpTriageClient {
    async fn submit(&self, request: &TriageRequest) -> AppResult<TriageReply> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|err| describe_failure("failed to call triage service", &err))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| describe_failure("failed to read triage response", &err))?;

        Ok(TriageReply { status, body })
    }
}

fn describe_failure(context: &str, err: &reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Transport(format!("{context}: request timed out"))
    } else {
        AppError::Transport(format!("{context}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::domain::ticket::{SubmitterRole, TicketId};

    fn request() -> TriageRequest {
        TriageRequest {
            ticket_id: TicketId(42),
            subject: "Printer down".to_string(),
            body: "Nothing prints".to_string(),
            vlan_source: "30".to_string(),
            user_role: SubmitterRole::User,
        }
    }

    fn config_for(endpoint: String) -> AppConfig {
        AppConfig {
            endpoint,
            api_key: Some("s3cret".to_string()),
            timeout: Duration::from_secs(2),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn posts_json_with_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/triage"))
            .and(header("content-type", "application/json"))
            .and(header("x-api-key", "s3cret"))
            .and(body_json(serde_json::json!({
                "ticket_id": 42,
                "subject": "Printer down",
                "body": "Nothing prints",
                "vlan_source": "30",
                "user_role": "user"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"action":"auto-close"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpTriageClient::new(&config_for(format!("{}/triage", server.uri()))).unwrap();
        let reply = client.submit(&request()).await.unwrap();

        assert!(reply.is_success());
        assert_eq!(reply.body, r#"{"action":"auto-close"}"#);
    }

    #[tokio::test]
    async fn returns_non_success_replies_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(418).set_body_string(r#"{"detail":"Escalate to agent"}"#))
            .mount(&server)
            .await;

        let client = HttpTriageClient::new(&config_for(server.uri())).unwrap();
        let reply = client.submit(&request()).await.unwrap();

        assert_eq!(reply.status, 418);
        assert!(!reply.is_success());
    }

    #[tokio::test]
    async fn times_out_as_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let mut config = config_for(server.uri());
        config.timeout = Duration::from_millis(200);
        let client = HttpTriageClient::new(&config).unwrap();
        let err = client.submit(&request()).await.unwrap_err();

        assert!(matches!(err, AppError::Transport(_)));
        assert!(err.to_string().contains("timed out"));
    }

    #[tokio::test]
    async fn refused_connection_is_transport_error() {
        let client = HttpTriageClient::new(&config_for("http://127.0.0.1:9/triage".to_string())).unwrap();
        let err = client.submit(&request()).await.unwrap_err();
        assert!(matches!(err, AppError::Transport(_)));
    }

    #[test]
    fn requires_api_key() {
        let config = AppConfig::default();
        assert!(matches!(
            HttpTriageClient::new(&config),
            Err(AppError::Configuration(_))
        ));
    }
}
