//! Client construction and request execution.
//!
//! [`ShopforgeClient`] wraps a blocking `reqwest` client with the
//! platform's conventions: tenant-scoped base URL, HTTP Basic credentials,
//! format-driven `Accept` header, and the legacy content type the API
//! requires on every request. One call is one request; there is no retry,
//! pooling, or background work.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::{debug, instrument, Span};

use crate::error::ApiError;
use crate::form;
use crate::method::RestMethod;
use crate::response::{ApiResponseValue, ResponseFormat};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum redirect hops before the transport gives up.
const MAX_REDIRECTS: usize = 5;

/// Domain suffix shared by every tenant's API host.
const API_HOST_SUFFIX: &str = "api.shopforge.io";

/// Content type the platform requires on every request. Not a standard
/// MIME type; the API rejects requests without it.
const LEGACY_CONTENT_TYPE: &str = "multiform/post-data";

/// User agent sent when the caller does not configure one.
const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Builder for configuring a [`ShopforgeClient`].
#[derive(Debug)]
pub struct ShopforgeClientBuilder {
    username: String,
    api_key: String,
    shop: String,
    user_agent: Option<String>,
    secure: bool,
    timeout: Duration,
}

impl ShopforgeClientBuilder {
    fn new(username: String, api_key: String, shop: String) -> Self {
        Self {
            username,
            api_key,
            shop,
            user_agent: None,
            secure: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Sets an explicit `User-Agent` header value.
    ///
    /// When not called, the library-identifying default is used.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Selects `https` for the base URL. Defaults to plain `http`.
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Sets the request timeout.
    ///
    /// A request that exceeds it fails with
    /// [`ApiError::Transport`], like any other transport-level failure.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the [`ShopforgeClient`].
    ///
    /// The base URL is templated from the shop identifier. No network I/O
    /// happens here and the identifier is not validated.
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<ShopforgeClient, ApiError> {
        let scheme = if self.secure { "https" } else { "http" };
        let base_url = format!("{scheme}://{shop}.{API_HOST_SUFFIX}", shop = self.shop);
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let http = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(ShopforgeClient {
            http,
            base_url,
            username: self.username,
            api_key: self.api_key,
            response_format: ResponseFormat::default(),
            process_response: true,
            last_response: None,
        })
    }
}

/// Blocking client for the Shopforge REST API.
///
/// ## Examples
///
/// ```rust,no_run
/// use shopforge_api::{ResponseFormat, RestMethod, ShopforgeClient};
///
/// # fn main() -> Result<(), shopforge_api::ApiError> {
/// let mut client = ShopforgeClient::builder("alice", "d41d8cd98f", "acme")
///     .secure(true)
///     .build()?;
///
/// client
///     .set_response_format(ResponseFormat::parse("xml")?)
///     .set_process_response(true);
///
/// let manufacturers = client.execute(RestMethod::Get, "/manufacturers", None)?;
/// # Ok(())
/// # }
/// ```
///
/// `execute` blocks the calling thread until the exchange completes or
/// fails, and the last-response slot is overwritten on every call, so a
/// client must not be shared across threads without external
/// synchronization. Use one client per thread.
///
/// HTTP status codes are never inspected: the platform reports errors in
/// the response body, so a 4xx/5xx exchange decodes exactly like a 2xx
/// one. Only transport-level failures surface as errors.
#[derive(Debug)]
pub struct ShopforgeClient {
    http: reqwest::blocking::Client,
    base_url: String,
    username: String,
    api_key: String,
    response_format: ResponseFormat,
    process_response: bool,
    last_response: Option<ApiResponseValue>,
}

impl ShopforgeClient {
    /// Creates a new builder for the given tenant.
    ///
    /// ## Arguments
    ///
    /// * `username` - Account name for HTTP Basic authentication.
    /// * `api_key` - API key used as the Basic-auth password; may be empty.
    /// * `shop` - Shop identifier templated into the API host.
    pub fn builder(
        username: impl Into<String>,
        api_key: impl Into<String>,
        shop: impl Into<String>,
    ) -> ShopforgeClientBuilder {
        ShopforgeClientBuilder::new(username.into(), api_key.into(), shop.into())
    }

    /// Base URL templated from the shop identifier.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Format used for the `Accept` header and response decoding.
    pub fn response_format(&self) -> ResponseFormat {
        self.response_format
    }

    /// Whether `execute` decodes bodies per the configured format.
    pub fn process_response(&self) -> bool {
        self.process_response
    }

    /// Result of the most recent call, raw or decoded.
    ///
    /// Overwritten on every exchange that completes at the transport
    /// level; a transport failure leaves the previous value in place. When
    /// decoding fails, the slot holds the raw body of the failed exchange.
    pub fn last_response(&self) -> Option<&ApiResponseValue> {
        self.last_response.as_ref()
    }

    /// Sets the decode format for subsequent calls. Fluent.
    ///
    /// Use [`ResponseFormat::parse`] to go from a string; it rejects
    /// unsupported format names with [`ApiError::InvalidFormat`].
    pub fn set_response_format(&mut self, format: ResponseFormat) -> &mut Self {
        self.response_format = format;
        self
    }

    /// Toggles response auto-processing. Fluent; always succeeds.
    pub fn set_process_response(&mut self, enabled: bool) -> &mut Self {
        self.process_response = enabled;
        self
    }

    /// Resolves an endpoint path against the base URL.
    ///
    /// Inputs already carrying an HTTP scheme (case-insensitive) pass
    /// through unchanged; anything else is joined to the base URL with
    /// exactly one separating slash, whatever slashes the path carries.
    pub fn resolve_endpoint_url(&self, path: &str) -> String {
        if is_absolute_url(path) {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_matches('/')
        )
    }

    /// Executes one blocking request and returns the raw or decoded body.
    ///
    /// The request carries HTTP Basic credentials, the configured user
    /// agent, an `Accept` header matching the response format, and the
    /// platform's fixed content type. POST and PUT send `data` as a
    /// nested, URL-encoded form under a single top-level `data` key; GET
    /// and DELETE ignore `data`. Redirects are followed up to 5 hops.
    ///
    /// The response status code is not inspected; see the type-level docs.
    ///
    /// ## Errors
    ///
    /// Returns an error if:
    /// - The transport fails to complete the exchange ([`ApiError::Transport`])
    /// - Auto-processing is on and the body does not parse in the
    ///   configured format ([`ApiError::JsonParse`], [`ApiError::XmlParse`])
    #[instrument(
        name = "api_request",
        skip(self, data),
        fields(
            http.method = %method,
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
        )
    )]
    pub fn execute(
        &mut self,
        method: RestMethod,
        path: &str,
        data: Option<&serde_json::Value>,
    ) -> Result<ApiResponseValue, ApiError> {
        let url = self.resolve_endpoint_url(path);
        Span::current().record("http.url", url.as_str());

        let mut request = self
            .http
            .request(method.to_reqwest(), &url)
            .basic_auth(&self.username, Some(&self.api_key))
            .header(ACCEPT, self.response_format.mime_type())
            .header(CONTENT_TYPE, LEGACY_CONTENT_TYPE);

        if method.has_body() {
            let body = data.map(form::encode_data).unwrap_or_default();
            request = request.body(body);
        }

        debug!(%method, url = %url, "dispatching API request");
        let response = request.send()?;

        // Recorded for observability only; the status never gates the result.
        Span::current().record("http.status_code", response.status().as_u16());

        let body = response.text()?;

        // The raw body is stored first; decoding overwrites it.
        self.last_response = Some(ApiResponseValue::Text(body.clone()));
        let value = if self.process_response {
            self.response_format.decode(&body)?
        } else {
            ApiResponseValue::Text(body)
        };
        self.last_response = Some(value.clone());

        Ok(value)
    }
}

fn is_absolute_url(path: &str) -> bool {
    starts_with_ignore_case(path, "http://") || starts_with_ignore_case(path, "https://")
}

fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack
        .as_bytes()
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn client() -> ShopforgeClient {
        ShopforgeClient::builder("alice", "secret", "acme")
            .build()
            .unwrap()
    }

    #[test]
    fn test_base_url_insecure_by_default() {
        assert_eq!(client().base_url(), "http://acme.api.shopforge.io");
    }

    #[test]
    fn test_base_url_secure() {
        let client = ShopforgeClient::builder("alice", "secret", "acme")
            .secure(true)
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "https://acme.api.shopforge.io");
    }

    #[test]
    fn test_shop_identifier_is_not_validated() {
        let client = ShopforgeClient::builder("alice", "secret", "weird shop!")
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://weird shop!.api.shopforge.io");
    }

    #[test]
    fn test_resolve_normalizes_slashes() {
        let client = client();
        let expected = "http://acme.api.shopforge.io/manufacturers";
        assert_eq!(client.resolve_endpoint_url("/manufacturers"), expected);
        assert_eq!(client.resolve_endpoint_url("manufacturers"), expected);
        assert_eq!(client.resolve_endpoint_url("manufacturers/"), expected);
        assert_eq!(client.resolve_endpoint_url("//manufacturers//"), expected);
    }

    #[test]
    fn test_resolve_keeps_nested_paths() {
        assert_eq!(
            client().resolve_endpoint_url("manufacturers/1/products"),
            "http://acme.api.shopforge.io/manufacturers/1/products"
        );
    }

    #[test]
    fn test_resolve_passes_absolute_urls_through() {
        let client = client();
        for url in [
            "http://elsewhere.example/x",
            "https://elsewhere.example/x",
            "HTTP://ELSEWHERE.EXAMPLE/X",
            "HttpS://elsewhere.example/x",
        ] {
            assert_eq!(client.resolve_endpoint_url(url), url);
        }
    }

    #[test]
    fn test_resolve_does_not_mistake_similar_prefixes() {
        assert_eq!(
            client().resolve_endpoint_url("httpx://not-a-scheme"),
            "http://acme.api.shopforge.io/httpx://not-a-scheme"
        );
    }

    #[test]
    fn test_defaults() {
        let client = client();
        assert_eq!(client.response_format(), ResponseFormat::Json);
        assert!(client.process_response());
        assert!(client.last_response().is_none());
    }

    #[test]
    fn test_fluent_setters_chain() {
        let mut client = client();
        client
            .set_response_format(ResponseFormat::Xml)
            .set_process_response(false);
        assert_eq!(client.response_format(), ResponseFormat::Xml);
        assert!(!client.process_response());
    }

    #[traced_test]
    #[test]
    fn test_transport_error_is_surfaced_and_instrumented() {
        // Nothing listens on this port; the request is dispatched and the
        // connection fails at the transport level.
        let mut client = client();
        let result = client.execute(RestMethod::Get, "http://127.0.0.1:1/x", None);
        assert!(matches!(result, Err(ApiError::Transport(_))));
        assert!(client.last_response().is_none());
        assert!(logs_contain("dispatching API request"));
    }
}
