//! Response handling module.
//!
//! [`ResponseFormat`] selects how `execute` decodes a body, and
//! [`ApiResponseValue`] carries the outcome of one call: the raw body when
//! auto-processing is off, a JSON value or an XML tree when it is on.

mod xml;

pub use xml::XmlElement;

use strum::{Display, EnumIter, EnumString};

use crate::error::ApiError;

/// Wire formats the Shopforge API can answer with.
///
/// Selected per client via
/// [`set_response_format`](crate::ShopforgeClient::set_response_format);
/// drives both the `Accept` header and response decoding. There is no
/// fallback: any other format name is rejected at
/// [`parse`](ResponseFormat::parse).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ResponseFormat {
    /// JSON body, decoded into a [`serde_json::Value`].
    #[default]
    Json,
    /// XML body, decoded into an [`XmlElement`] tree.
    Xml,
}

impl ResponseFormat {
    /// Parses a format name, case-insensitively.
    ///
    /// ## Errors
    ///
    /// Returns [`ApiError::InvalidFormat`] for anything but `json` or
    /// `xml`. The format never silently defaults.
    pub fn parse(format: impl AsRef<str>) -> Result<Self, ApiError> {
        let format = format.as_ref();
        format
            .to_ascii_lowercase()
            .parse()
            .map_err(|_| ApiError::InvalidFormat(format.to_string()))
    }

    /// MIME type sent in the `Accept` header, `application/{format}`.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml",
        }
    }

    /// Decodes a response body in this format.
    ///
    /// ## Errors
    ///
    /// Returns [`ApiError::JsonParse`] or [`ApiError::XmlParse`] when the
    /// body does not parse in the selected format.
    pub fn decode(&self, body: &str) -> Result<ApiResponseValue, ApiError> {
        match self {
            Self::Json => Ok(ApiResponseValue::Json(serde_json::from_str(body)?)),
            Self::Xml => Ok(ApiResponseValue::Xml(xml::parse(body)?)),
        }
    }
}

/// A raw or decoded response body.
///
/// Returned by [`execute`](crate::ShopforgeClient::execute) and retained
/// as the client's last response.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponseValue {
    /// Raw body, kept when auto-processing is disabled.
    Text(String),
    /// Decoded JSON value.
    Json(serde_json::Value),
    /// Decoded XML tree.
    Xml(XmlElement),
}

impl ApiResponseValue {
    /// Returns the raw body, if this value was left unprocessed.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(body) => Some(body),
            _ => None,
        }
    }

    /// Returns the decoded JSON value, if any.
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the decoded XML tree, if any.
    pub fn as_xml(&self) -> Option<&XmlElement> {
        match self {
            Self::Xml(element) => Some(element),
            _ => None,
        }
    }
}
