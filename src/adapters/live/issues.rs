//! Live adapter for the `IssueApi` port using the tracker web API.

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::IssueError;
use crate::issue::{Component, IssueChange, IssueResponse, RawIssue, Rule, User};
use crate::ports::issues::{IssueApi, IssueFuture};

/// Live issue API that talks HTTP to the tracker.
pub struct LiveIssueApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl LiveIssueApi {
    /// Creates a client for the tracker described by `config`.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self { client: Client::new(), base_url: config.base_url.clone(), token: config.token.clone() }
    }

    fn url(&self, action: &str) -> String {
        format!("{}/api/issues/{action}", self.base_url.trim_end_matches('/'))
    }

    /// Tokens are sent as the basic-auth user with an empty password.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.basic_auth(token, Some("")),
            None => request,
        }
    }
}

/// Response of `api/issues/search`.
#[derive(Deserialize)]
struct SearchResponse {
    issues: Vec<RawIssue>,
    #[serde(default)]
    components: Vec<Component>,
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    rules: Vec<Rule>,
}

/// Error body returned by the tracker on non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    errors: Vec<ErrorMessage>,
}

/// A single message inside [`ErrorBody`].
#[derive(Deserialize)]
struct ErrorMessage {
    msg: String,
}

/// Reads a response body, mapping tracker errors and decode failures.
async fn read_payload<T: DeserializeOwned>(response: Response) -> Result<T, IssueError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| IssueError::Transport(format!("failed to read tracker response: {e}")))?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.errors.into_iter().next())
            .map_or(body, |e| e.msg);
        return Err(IssueError::Api { status: status.as_u16(), message });
    }

    Ok(serde_json::from_str(&body)?)
}

impl IssueApi for LiveIssueApi {
    fn fetch_issue(&self, key: &str) -> IssueFuture<'_> {
        let key = key.to_string();

        Box::pin(async move {
            debug!(issue_key = %key, "fetching issue");
            let request = self
                .client
                .get(self.url("search"))
                .query(&[("issues", key.as_str()), ("additionalFields", "_all")]);
            let response = self
                .authorize(request)
                .send()
                .await
                .map_err(|e| IssueError::Transport(e.to_string()))?;

            let search: SearchResponse = read_payload(response).await?;
            let issue = search
                .issues
                .into_iter()
                .find(|issue| issue.key == key)
                .ok_or_else(|| IssueError::NotFound(key.clone()))?;

            Ok(IssueResponse {
                issue,
                components: search.components,
                users: search.users,
                rules: search.rules,
            })
        })
    }

    fn apply_change(&self, key: &str, change: &IssueChange) -> IssueFuture<'_> {
        let action = change.endpoint();
        let form = change.form(key);
        let key = key.to_string();

        Box::pin(async move {
            debug!(issue_key = %key, action, "sending issue change");
            let request = self.client.post(self.url(action)).form(&form);
            let response = self
                .authorize(request)
                .send()
                .await
                .map_err(|e| IssueError::Transport(e.to_string()))?;
            read_payload(response).await
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    use super::*;
    use crate::issue::fixtures;

    /// Serves one canned HTTP response on a free local port.
    ///
    /// The join handle yields the raw request (head and body) that was received.
    fn serve_once(status: &str, body: &str) -> (ClientConfig, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            let head_end = loop {
                let n = stream.read(&mut buf).unwrap();
                assert!(n > 0, "connection closed before the request head");
                request.extend_from_slice(&buf[..n]);
                if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };
            let head = String::from_utf8_lossy(&request[..head_end]).to_lowercase();
            let content_length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .map_or(0, |value| value.trim().parse::<usize>().unwrap());
            while request.len() < head_end + content_length {
                let n = stream.read(&mut buf).unwrap();
                assert!(n > 0, "connection closed before the request body");
                request.extend_from_slice(&buf[..n]);
            }
            stream.write_all(response.as_bytes()).unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });

        (ClientConfig { base_url, ..ClientConfig::default() }, handle)
    }

    fn search_body(key: &str) -> String {
        let response = fixtures::response(key, "OPEN");
        serde_json::json!({
            "issues": [response.issue],
            "components": response.components,
            "users": response.users,
            "rules": response.rules,
        })
        .to_string()
    }

    #[test]
    fn builds_action_urls_without_double_slash() {
        let config = ClientConfig { base_url: "http://tracker:9000/".into(), ..ClientConfig::default() };
        let api = LiveIssueApi::new(&config);
        assert_eq!(api.url("set_tags"), "http://tracker:9000/api/issues/set_tags");
    }

    #[tokio::test]
    async fn unreachable_tracker_settles_with_transport_error() {
        // Bind then release a port so nothing is listening on it.
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();
        let config = ClientConfig { base_url: format!("http://127.0.0.1:{port}"), ..ClientConfig::default() };
        let api = LiveIssueApi::new(&config);
        let result = api.fetch_issue("AVq1").await;
        assert!(matches!(result, Err(IssueError::Transport(_))));
    }

    #[tokio::test]
    async fn fetch_joins_search_payload_for_the_requested_key() {
        let (config, server) = serve_once("200 OK", &search_body("AVq1"));
        let api = LiveIssueApi::new(&ClientConfig { token: Some("squ_123".into()), ..config });

        let response = api.fetch_issue("AVq1").await.unwrap();
        assert_eq!(response, fixtures::response("AVq1", "OPEN"));

        let request = server.join().unwrap();
        assert!(request.starts_with("GET /api/issues/search?issues=AVq1&additionalFields=_all "), "{request}");
        assert!(request.to_lowercase().contains("authorization: basic"), "{request}");
    }

    #[tokio::test]
    async fn apply_change_posts_the_form() {
        let body = serde_json::to_string(&fixtures::response("AVq1", "OPEN")).unwrap();
        let (config, server) = serve_once("200 OK", &body);
        let api = LiveIssueApi::new(&config);

        let change = IssueChange::SetTags { tags: vec!["security".into(), "cwe".into()] };
        let response = api.apply_change("AVq1", &change).await.unwrap();
        assert_eq!(response.issue.key, "AVq1");

        let request = server.join().unwrap();
        assert!(request.starts_with("POST /api/issues/set_tags "), "{request}");
        assert!(request.ends_with("issue=AVq1&tags=security%2Ccwe"), "{request}");
    }

    #[tokio::test]
    async fn tracker_error_body_becomes_api_error_with_first_message() {
        let body = r#"{"errors":[{"msg":"Transition 'x' not allowed"},{"msg":"second"}]}"#;
        let (config, server) = serve_once("400 Bad Request", body);
        let api = LiveIssueApi::new(&config);

        let change = IssueChange::Transition { transition: "x".into() };
        let err = api.apply_change("AVq1", &change).await.unwrap_err();
        server.join().unwrap();

        assert!(
            matches!(&err, IssueError::Api { status: 400, message } if message == "Transition 'x' not allowed"),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn non_json_error_body_is_passed_through() {
        let (config, server) = serve_once("502 Bad Gateway", "upstream unavailable");
        let api = LiveIssueApi::new(&config);

        let err = api.fetch_issue("AVq1").await.unwrap_err();
        server.join().unwrap();

        assert!(
            matches!(&err, IssueError::Api { status: 502, message } if message == "upstream unavailable"),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn empty_search_result_is_not_found() {
        let (config, server) = serve_once("200 OK", r#"{"issues":[]}"#);
        let api = LiveIssueApi::new(&config);

        let err = api.fetch_issue("AVq1").await.unwrap_err();
        server.join().unwrap();

        assert!(matches!(&err, IssueError::NotFound(key) if key == "AVq1"), "{err:?}");
    }

    #[tokio::test]
    async fn unparsable_success_body_is_a_decode_error() {
        let (config, server) = serve_once("200 OK", "<html>maintenance</html>");
        let api = LiveIssueApi::new(&config);

        let err = api.fetch_issue("AVq1").await.unwrap_err();
        server.join().unwrap();

        assert!(matches!(err, IssueError::Decode(_)), "{err:?}");
    }
}
