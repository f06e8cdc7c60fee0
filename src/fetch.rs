//! HTTP access and JSON decoding with status reporting.

use crate::error::LoadError;
use crate::status::StatusLog;
use crate::utils::lowercase_first;
use futures::future::{FutureExt, LocalBoxFuture};
use log::debug;
use serde::de::DeserializeOwned;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

/// A fully read HTTP response.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs GET requests. Failing to get any response is an error; a
/// response with an error status is not.
pub trait Transport {
    fn get(&self, url: &str) -> LocalBoxFuture<'static, Result<HttpResponse, LoadError>>;
}

/// `window.fetch` transport.
pub struct BrowserTransport;

impl Transport for BrowserTransport {
    fn get(&self, url: &str) -> LocalBoxFuture<'static, Result<HttpResponse, LoadError>> {
        let url = url.to_string();
        async move { browser_fetch(&url).await }.boxed_local()
    }
}

async fn browser_fetch(url: &str) -> Result<HttpResponse, LoadError> {
    let promise = gloo_utils::window().fetch_with_str(url);
    let response: Response = JsFuture::from(promise)
        .await
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;

    let status = response.status();
    let status_text = response.status_text();
    let body = JsFuture::from(response.text().map_err(js_error)?)
        .await
        .map_err(js_error)?
        .as_string()
        .unwrap_or_default();

    Ok(HttpResponse {
        status,
        status_text,
        body,
    })
}

fn js_error(value: JsValue) -> LoadError {
    LoadError::Network(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

/// Fetches JSON documents and reports each request to the status log.
#[derive(Clone)]
pub struct JsonClient {
    transport: Rc<dyn Transport>,
    status: StatusLog,
}

impl JsonClient {
    pub fn new(transport: Rc<dyn Transport>, status: StatusLog) -> Self {
        Self { transport, status }
    }

    pub fn status(&self) -> &StatusLog {
        &self.status
    }

    /// Fetch and decode `url`, showing `"<status_msg>..."` while it runs.
    ///
    /// The message doubles as the status key, so identical concurrent
    /// requests share one status entry.
    pub async fn request<T: DeserializeOwned>(
        &self,
        url: &str,
        status_msg: &str,
    ) -> Result<Option<T>, LoadError> {
        let status_msg = format!("{}...", status_msg);
        let fail_msg = format!("Failed while {}", lowercase_first(&status_msg));
        self.request_with(url, &status_msg, &fail_msg, &status_msg)
            .await
    }

    /// Fetch and decode `url` with explicit messages and status key.
    ///
    /// An empty (whitespace only) body decodes to `Ok(None)`.
    pub async fn request_with<T: DeserializeOwned>(
        &self,
        url: &str,
        status_msg: &str,
        fail_msg: &str,
        key: &str,
    ) -> Result<Option<T>, LoadError> {
        self.status.register(key, status_msg);
        debug!("GET {}", url);

        let response = match self.transport.get(url).await {
            Ok(response) => response,
            Err(e) => {
                self.status.fail(key, fail_msg);
                return Err(e);
            }
        };

        if !response.is_success() {
            let message = format!(
                "{} ({} {})",
                fail_msg, response.status, response.status_text
            );
            self.status.fail(key, &message);
            return Err(LoadError::Status {
                status: response.status,
                status_text: response.status_text,
                message,
            });
        }

        if response.body.trim().is_empty() {
            self.status.finish(key);
            return Ok(None);
        }

        match serde_json::from_str(&response.body) {
            Ok(value) => {
                self.status.success(key, " Done");
                Ok(Some(value))
            }
            Err(e) => {
                self.status
                    .fail(key, &format!("{} (Couldn't parse JSON)", fail_msg));
                Err(LoadError::Parse(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusState;
    use crate::testing::client;
    use futures::executor::block_on;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Config {
        season: u32,
    }

    #[test]
    fn successful_request_decodes_and_reports_done() {
        let (transport, _, client) = client();
        transport.json("https://x/config", json!({ "season": 23 }));

        let config: Option<Config> =
            block_on(client.request("https://x/config", "Fetching config")).unwrap();

        assert_eq!(config, Some(Config { season: 23 }));
        let entry = &client.status().entries()[0];
        assert_eq!(entry.key, "Fetching config...");
        assert_eq!(entry.text, "Fetching config... Done");
        assert_eq!(entry.state, StatusState::Success);
    }

    #[test]
    fn error_status_fails_with_code_and_text() {
        let (transport, _, client) = client();
        transport.respond("https://x/teams", 503, "down");

        let err = block_on(client.request::<Config>("https://x/teams", "Fetching teams"))
            .unwrap_err();

        match err {
            LoadError::Status { status, .. } => assert_eq!(status, 503),
            other => panic!("unexpected error {:?}", other),
        }
        let entry = &client.status().entries()[0];
        assert_eq!(entry.state, StatusState::Failed);
        assert_eq!(
            entry.text,
            "Failed while fetching teams... (503 Service Unavailable)"
        );
    }

    #[test]
    fn unreachable_host_is_a_network_error() {
        let (transport, _, client) = client();
        transport.fail_with("https://x/gone", "connection refused");

        let err = block_on(client.request::<Config>("https://x/gone", "Fetching gone"))
            .unwrap_err();

        assert_eq!(err, LoadError::Network("connection refused".into()));
        assert_eq!(
            client.status().entries()[0].text,
            "Failed while fetching gone..."
        );
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let (transport, _, client) = client();
        transport.respond("https://x/bad", 200, "{ not json");

        let err =
            block_on(client.request::<Config>("https://x/bad", "Fetching bad")).unwrap_err();

        assert!(matches!(err, LoadError::Parse(_)));
        assert_eq!(
            client.status().entries()[0].text,
            "Failed while fetching bad... (Couldn't parse JSON)"
        );
    }

    #[test]
    fn empty_body_is_no_data_and_finishes_quietly() {
        let (transport, _, client) = client();
        transport.respond("https://x/empty", 200, "  \n");

        let result = block_on(client.request::<Config>("https://x/empty", "Fetching empty"));

        assert_eq!(result, Ok(None));
        let entry = &client.status().entries()[0];
        assert_eq!(entry.state, StatusState::Finished);
        assert!(entry.hidden);
    }

    #[test]
    fn explicit_key_and_messages_are_used() {
        let (transport, _, client) = client();
        transport.respond("https://x/a", 404, "");

        let _ = block_on(client.request_with::<Config>(
            "https://x/a",
            "Loading A",
            "A is unavailable",
            "a",
        ));

        let entry = &client.status().entries()[0];
        assert_eq!(entry.key, "a");
        assert_eq!(entry.text, "A is unavailable (404 Not Found)");
    }
}
