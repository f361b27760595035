// Framework REST API HTTP client
//
// Wraps `reqwest::Client` with framework-specific URL construction,
// credential injection, and error-body parsing. Endpoint families
// (users, groups, services, devices) are implemented as inherent methods
// in separate files to keep this module focused on transport mechanics.
//
// Base path: /apiv1/
// Auth: HTTP basic auth with the user or service id and its token

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

// ── Error response shapes from the framework server ─────────────────

/// The framework reports failures as `{"error": {"message": "..."}}`,
/// or occasionally a bare `{"message": "..."}`.
#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    error: Option<ErrorDetail>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Structured { message: Option<String> },
    Text(String),
}

// ── Client ──────────────────────────────────────────────────────────

/// Async client for the framework server's REST API.
///
/// Holds the credentials for the whole invocation and attaches them to
/// every request. Constructing a client performs no network traffic.
pub struct HostClient {
    http: reqwest::Client,
    base_url: Url,
    auth_id: String,
    auth_token: SecretString,
}

impl HostClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `server` (e.g. `http://localhost`) that logs in
    /// as `auth_id` / `auth_token`.
    pub fn new(
        server: &str,
        auth_id: &str,
        auth_token: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, server, auth_id, auth_token)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        server: &str,
        auth_id: &str,
        auth_token: &SecretString,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(server)?;
        Ok(Self {
            http,
            base_url,
            auth_id: auth_id.to_owned(),
            auth_token: auth_token.clone(),
        })
    }

    /// Build the API base URL: `{server}/apiv1/`.
    ///
    /// A server URL that already ends in `/apiv1` is kept as is.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }

        let path = url.path().trim_end_matches('/').to_owned();
        if path.ends_with("/apiv1") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/apiv1/"));
        }

        Ok(url)
    }

    /// The API base URL (always ends with `/apiv1/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"service/abc/token"`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.auth_id.is_empty() {
            builder
        } else {
            builder.basic_auth(&self.auth_id, Some(self.auth_token.expose_secret()))
        }
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.authorize(self.http.get(url)).send().await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.authorize(self.http.post(url).json(body)).send().await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn post_no_response<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.authorize(self.http.post(url).json(body)).send().await?;
        Self::handle_empty(resp).await
    }

    /// POST with no body, returning the response as text.
    pub(crate) async fn post_text(&self, path: &str) -> Result<String, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.authorize(self.http.post(url)).send().await?;
        Self::handle_text(resp).await
    }

    /// PUT with no body, returning the response as text.
    pub(crate) async fn put_text(&self, path: &str) -> Result<String, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.authorize(self.http.put(url)).send().await?;
        Self::handle_text(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.authorize(self.http.delete(url)).send().await?;
        Self::handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = &body[..body.len().min(200)];
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    /// Accept either a JSON string (`"abc"`) or a bare text body.
    async fn handle_text(resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await?;
        match serde_json::from_str::<String>(&body) {
            Ok(text) => Ok(text),
            Err(_) => Ok(body.trim().to_owned()),
        }
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let message = error_message(&raw).unwrap_or_else(|| {
            if raw.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_owned()
            } else {
                raw.trim().chars().take(200).collect()
            }
        });

        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Error::Authentication { message }
            }
            reqwest::StatusCode::NOT_FOUND => Error::NotFound { message },
            reqwest::StatusCode::CONFLICT => Error::Conflict { message },
            _ => Error::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}

/// Pull the human-readable message out of a framework error body.
fn error_message(raw: &str) -> Option<String> {
    let parsed: ErrorResponse = serde_json::from_str(raw).ok()?;
    match parsed.error {
        Some(ErrorDetail::Structured { message: Some(m) }) | Some(ErrorDetail::Text(m)) => Some(m),
        _ => parsed.message,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(server: &str) -> HostClient {
        HostClient::with_client(
            reqwest::Client::new(),
            server,
            "user",
            &SecretString::from("token".to_owned()),
        )
        .unwrap()
    }

    #[test]
    fn base_url_appends_api_prefix() {
        assert_eq!(
            client("http://localhost").base_url().as_str(),
            "http://localhost/apiv1/"
        );
        assert_eq!(
            client("https://fw.example/prefix/").base_url().as_str(),
            "https://fw.example/prefix/apiv1/"
        );
        assert_eq!(
            client("https://fw.example/apiv1").base_url().as_str(),
            "https://fw.example/apiv1/"
        );
    }

    #[test]
    fn rejects_unparseable_server() {
        let result = HostClient::with_client(
            reqwest::Client::new(),
            "not a url",
            "",
            &SecretString::from(String::new()),
        );
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn url_joins_relative_paths() {
        let c = client("http://localhost:7000");
        assert_eq!(
            c.url("/service/abc/token").unwrap().as_str(),
            "http://localhost:7000/apiv1/service/abc/token"
        );
    }

    #[test]
    fn extracts_error_messages() {
        assert_eq!(
            error_message(r#"{"error":{"message":"Token already exists"}}"#).as_deref(),
            Some("Token already exists")
        );
        assert_eq!(
            error_message(r#"{"error":"plain"}"#).as_deref(),
            Some("plain")
        );
        assert_eq!(
            error_message(r#"{"message":"top level"}"#).as_deref(),
            Some("top level")
        );
        assert_eq!(error_message("<html>"), None);
    }
}
