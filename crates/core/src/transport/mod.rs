//! Transport abstraction.
//!
//! [`SessionClient`](crate::SessionClient) builds one [`OutgoingRequest`] per
//! attempt and hands it to a [`Transport`]. The production implementation is
//! [`HttpTransport`] (reqwest with a shared cookie jar); [`fake`] provides an
//! in-memory backend for tests.

pub mod fake;
mod http;

use async_trait::async_trait;
use reqwest::Method;
use url::Url;

pub use http::HttpTransport;

use crate::error::Result;
use crate::request::RequestBody;
use crate::response::Response;

/// A fully prepared request: absolute URL and every header the client adds.
#[derive(Debug, Clone)]
pub struct OutgoingRequest {
	pub method: Method,
	pub url: Url,
	pub headers: Vec<(String, String)>,
	pub body: RequestBody,
}

impl OutgoingRequest {
	pub fn new(method: Method, url: Url) -> Self {
		Self {
			method,
			url,
			headers: Vec::new(),
			body: RequestBody::Empty,
		}
	}

	/// Sets `name`, replacing any earlier value (names compare case-insensitively).
	pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
		let name = name.into();
		self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
		self.headers.push((name, value.into()));
	}

	/// First value of header `name`, compared case-insensitively.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
	}
}

/// Sends prepared requests and returns buffered responses.
///
/// Non-2xx statuses are responses, not errors; only failures that produce no
/// response at all map to [`Error::Network`](crate::Error::Network).
#[async_trait]
pub trait Transport: Send + Sync {
	async fn send(&self, request: OutgoingRequest) -> Result<Response>;
}
