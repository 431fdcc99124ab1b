//! Request settings for `http://` and `https://` sources.

use std::fmt;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};

use crate::error::{FormatError, FormatResult};

/// Default timeout for a whole remote request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Returns `true` if `source` names a remote document.
pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Authentication, extra headers, and timeout applied to every remote fetch.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteOptions {
    basic_auth: Option<(String, Option<String>)>,
    bearer_token: Option<String>,
    headers: Vec<(String, String)>,
    timeout: Duration,
}

impl Default for RemoteOptions {
    fn default() -> Self {
        Self {
            basic_auth: None,
            bearer_token: None,
            headers: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RemoteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send HTTP basic credentials.
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: Option<String>) -> Self {
        self.basic_auth = Some((username.into(), password));
        self
    }

    /// Send `Authorization: Bearer <token>`.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Add a request header. Later headers with the same name are sent too.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub(crate) fn client(&self, url: &str) -> FormatResult<Client> {
        Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|source| FormatError::Http {
                url: url.to_string(),
                source,
            })
    }

    /// Attach credentials and headers to a request.
    pub fn apply(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some((username, password)) = &self.basic_auth {
            request = request.basic_auth(username, password.as_ref());
        }
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        request
    }
}

impl fmt::Debug for RemoteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(n, _)| n.as_str()).collect();
        f.debug_struct("RemoteOptions")
            .field("basic_auth", &self.basic_auth.as_ref().map(|(user, _)| user))
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("headers", &header_names)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;

    fn built(options: &RemoteOptions) -> reqwest::blocking::Request {
        let client = Client::new();
        options
            .apply(client.get("http://localhost/config.json"))
            .build()
            .unwrap()
    }

    #[test]
    fn detects_remote_sources() {
        assert!(is_remote("https://example.com/a.json"));
        assert!(is_remote("http://example.com/a.json"));
        assert!(!is_remote("ftp://example.com/a.json"));
        assert!(!is_remote("./https.json"));
        assert!(!is_remote("-"));
    }

    #[test]
    fn basic_auth_header() {
        let request = built(&RemoteOptions::new().with_basic_auth("admin", Some("secret".into())));
        assert_eq!(request.headers()[AUTHORIZATION], "Basic YWRtaW46c2VjcmV0");
    }

    #[test]
    fn bearer_token_header() {
        let request = built(&RemoteOptions::new().with_bearer_token("t0ken"));
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer t0ken");
    }

    #[test]
    fn custom_headers_are_sent() {
        let options = RemoteOptions::new()
            .with_header("X-Api-Key", "k1")
            .with_header("Accept", "application/json");
        let request = built(&options);
        assert_eq!(request.headers()["x-api-key"], "k1");
        assert_eq!(request.headers()["accept"], "application/json");
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn debug_hides_secrets() {
        let options = RemoteOptions::new()
            .with_basic_auth("admin", Some("hunter2".into()))
            .with_bearer_token("t0ken")
            .with_header("X-Api-Key", "k1");
        let shown = format!("{options:?}");
        assert!(shown.contains("admin"));
        assert!(!shown.contains("hunter2"));
        assert!(!shown.contains("t0ken"));
        assert!(!shown.contains("k1"));
    }
}
