//! Blocking client for the Shopforge e-commerce REST API.
//!
//! Shopforge exposes a tenant-scoped REST API at
//! `{shop}.api.shopforge.io`, authenticated with HTTP Basic credentials.
//! This crate wraps one authenticated request/response exchange: resolve
//! the endpoint URL, send the request, and optionally decode the body as
//! JSON or XML.
//!
//! ## Core Types
//!
//! - [`ShopforgeClient`] - Configured client; one blocking request per call
//! - [`RestMethod`] - HTTP verbs the platform accepts
//! - [`ResponseFormat`] - Wire format for decoding (JSON or XML)
//! - [`ApiResponseValue`] - Raw or decoded response body
//! - [`XmlElement`] - Navigable tree for XML responses
//! - [`ApiError`] - Everything that can go wrong
//!
//! ## Example
//!
//! ```rust,no_run
//! use shopforge_api::{RestMethod, ShopforgeClient};
//!
//! # fn main() -> Result<(), shopforge_api::ApiError> {
//! let mut client = ShopforgeClient::builder("alice", "d41d8cd98f", "acme")
//!     .secure(true)
//!     .build()?;
//!
//! let manufacturers = client.execute(RestMethod::Get, "/manufacturers", None)?;
//! println!("{manufacturers:?}");
//! # Ok(())
//! # }
//! ```
//!
//! The client is synchronous and not thread-safe: `execute` blocks until
//! the exchange completes, and the last-response slot is overwritten on
//! every call. Use one client per thread, or add external
//! synchronization.
//!
//! HTTP status codes are never inspected. The platform reports errors in
//! the response body, so a 4xx/5xx exchange decodes exactly like a 2xx
//! one; only transport-level failures surface as errors.

mod client;
mod error;
mod form;
mod method;
pub mod response;

pub use client::{ShopforgeClient, ShopforgeClientBuilder};
pub use error::ApiError;
pub use method::RestMethod;
pub use response::{ApiResponseValue, ResponseFormat, XmlElement};
