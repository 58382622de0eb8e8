//! This client posts the address query to Simbio and parses the answer into schedule records.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::schedule::RawScheduleRecord;

pub static URL: &str = "https://www.simbio.si/sl/moj-dan-odvoza-odpadkov";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

static ACTION: &str = "simbioOdvozOdpadkov";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request could not be built or sent, its body could not be read, or it timed out.
    #[error("failed to perform request: {0}")]
    Network(#[from] reqwest::Error),
    #[error("received non-OK HTTP status: {0}")]
    UpstreamStatus(StatusCode),
    #[error("failed to parse JSON response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("no data received in the response")]
    EmptyResult,
}

/// Anything that can deliver the schedule records for the configured address.
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    /// Perform a single attempt.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] describing why the attempt failed.
    async fn fetch_once(&self) -> Result<Vec<RawScheduleRecord>, FetchError>;
}

pub struct UpstreamClient {
    client: Client,
    url: String,
    address: String,
}

impl UpstreamClient {
    /// Create a client for `address` that gives up on every attempt after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Network`] if the HTTP client cannot be built.
    pub fn new(url: &str, address: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.to_owned(),
            address: address.to_owned(),
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait]
impl ScheduleSource for UpstreamClient {
    async fn fetch_once(&self) -> Result<Vec<RawScheduleRecord>, FetchError> {
        let response = self
            .client
            .post(&self.url)
            .form(&[("action", ACTION), ("query", self.address.as_str())])
            .send()
            .await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::UpstreamStatus(status));
        }
        parse(&response.text().await?)
    }
}

/// Parse the response body, which must be a non-empty JSON array.
fn parse(body: &str) -> Result<Vec<RawScheduleRecord>, FetchError> {
    let records: Vec<RawScheduleRecord> = serde_json::from_str(body)?;
    if records.is_empty() {
        return Err(FetchError::EmptyResult);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::StatusCode;
    use wiremock::{
        matchers::{body_string, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    const UPSTREAM_PATH: &str = "/sl/moj-dan-odvoza-odpadkov";

    fn get_test_client(mock_server: &MockServer, timeout: Duration) -> UpstreamClient {
        UpstreamClient::new(
            &format!("{}{UPSTREAM_PATH}", mock_server.uri()),
            "začret 69",
            timeout,
        )
        .unwrap()
    }

    #[test]
    fn test_parse() {
        let body = include_str!("upstream_client/tests/response.json");
        let records = parse(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Jane");
        assert_eq!(records[0].city, "Maribor");
        assert_eq!(records[0].next_mko, "2024-01-10");
        assert_eq!(records[0].next_emb, "2024-01-12");
        assert_eq!(records[0].next_bio, "2024-01-11");
        assert_eq!(records[1].query, "začret 71");
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(matches!(
            parse(r#"{"error":"unknown address"}"#),
            Err(FetchError::Decode(_))
        ));
        assert!(matches!(parse("<html></html>"), Err(FetchError::Decode(_))));
    }

    #[test]
    fn test_parse_null_fields() {
        let records = parse(
            r#"[{"id":"1","name":"Jane","query":"začret 69","city":"Maribor","next_mko":"2024-01-10","next_emb":"2024-01-12","next_bio":null}]"#,
        )
        .unwrap();
        assert_eq!(records[0].next_emb, "2024-01-12");
        assert_eq!(records[0].next_bio, "");
    }

    #[test]
    fn test_parse_empty_list() {
        assert!(matches!(parse("[]"), Err(FetchError::EmptyResult)));
    }

    #[tokio::test]
    async fn test_fetch_once_posts_form() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(UPSTREAM_PATH))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string(
                "action=simbioOdvozOdpadkov&query=za%C4%8Dret+69",
            ))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(include_str!("upstream_client/tests/response.json")),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = get_test_client(&mock_server, DEFAULT_REQUEST_TIMEOUT);
        let records = client.fetch_once().await.unwrap();
        assert_eq!(records[0].name, "Jane");
    }

    #[tokio::test]
    async fn test_fetch_once_status_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let client = get_test_client(&mock_server, DEFAULT_REQUEST_TIMEOUT);
        let result = client.fetch_once().await;
        assert!(matches!(
            result,
            Err(FetchError::UpstreamStatus(StatusCode::SERVICE_UNAVAILABLE))
        ));
    }

    #[tokio::test]
    async fn test_fetch_once_empty_result() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&mock_server)
            .await;

        let client = get_test_client(&mock_server, DEFAULT_REQUEST_TIMEOUT);
        assert!(matches!(
            client.fetch_once().await,
            Err(FetchError::EmptyResult)
        ));
    }

    #[tokio::test]
    async fn test_fetch_once_decode_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>Vzdrževalna dela</p>"))
            .mount(&mock_server)
            .await;

        let client = get_test_client(&mock_server, DEFAULT_REQUEST_TIMEOUT);
        assert!(matches!(
            client.fetch_once().await,
            Err(FetchError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_once_timeout() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("[]")
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let client = get_test_client(&mock_server, Duration::from_millis(50));
        assert!(matches!(
            client.fetch_once().await,
            Err(FetchError::Network(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_once_unreachable() {
        let client =
            UpstreamClient::new("http://127.0.0.1:1/", "začret 69", DEFAULT_REQUEST_TIMEOUT)
                .unwrap();
        assert!(matches!(
            client.fetch_once().await,
            Err(FetchError::Network(_))
        ));
    }
}
