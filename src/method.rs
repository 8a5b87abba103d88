//! HTTP method types for the Shopforge REST API.

use strum::{Display, EnumIter, EnumString};

use crate::error::ApiError;

/// HTTP verbs the Shopforge API accepts.
///
/// The platform rejects everything outside GET/POST/PUT/DELETE, so the
/// enum carries exactly those four. String input goes through
/// [`RestMethod::parse`], which refuses other verbs before any request is
/// built.
///
/// ## Examples
///
/// ```rust
/// use shopforge_api::RestMethod;
///
/// let method = RestMethod::Get;
/// assert!(!method.has_body());
/// assert!(method.is_idempotent());
///
/// // Parse from string
/// let parsed = RestMethod::parse("POST").unwrap();
/// assert_eq!(parsed, RestMethod::Post);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum RestMethod {
    /// HTTP GET - Retrieve a resource.
    Get,
    /// HTTP POST - Create a resource.
    Post,
    /// HTTP PUT - Replace a resource.
    Put,
    /// HTTP DELETE - Remove a resource.
    Delete,
}

impl RestMethod {
    /// Parses a method name, case-insensitively.
    ///
    /// ## Errors
    ///
    /// Returns [`ApiError::UnsupportedMethod`] for any verb outside the
    /// supported set. Rejected verbs never reach the network.
    pub fn parse(method: impl AsRef<str>) -> Result<Self, ApiError> {
        let method = method.as_ref();
        method
            .to_ascii_uppercase()
            .parse()
            .map_err(|_| ApiError::UnsupportedMethod(method.to_string()))
    }

    /// Returns `true` if this method carries a request body.
    ///
    /// POST and PUT send the form-encoded `data` payload; GET and DELETE
    /// send none.
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }

    /// Returns `true` if this method is idempotent.
    pub fn is_idempotent(&self) -> bool {
        !matches!(self, Self::Post)
    }

    /// Returns `true` if this method is safe (read-only).
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Get)
    }

    /// Converts to the equivalent `reqwest::Method`.
    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl From<RestMethod> for reqwest::Method {
    fn from(method: RestMethod) -> Self {
        method.to_reqwest()
    }
}
