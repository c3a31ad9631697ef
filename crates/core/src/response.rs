//! Buffered HTTP responses.

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

/// A fully read response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
	pub status: u16,
	pub url: String,
	pub body: Vec<u8>,
}

impl Response {
	pub fn new(status: u16, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
		Self {
			status,
			url: url.into(),
			body: body.into(),
		}
	}

	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Body as text, replacing invalid UTF-8.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Decodes the body as JSON. An empty body decodes as `null`.
	pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
		let body: &[u8] = if self.body.iter().all(u8::is_ascii_whitespace) { b"null" } else { &self.body };
		serde_json::from_slice(body).map_err(|source| Error::Decode {
			url: self.url.clone(),
			source,
		})
	}
}
