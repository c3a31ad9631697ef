//! Error types for the session client.

use edutrack_protocol::ApiMessage;
use reqwest::Method;
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by [`SessionClient`](crate::SessionClient) and the API facades.
#[derive(Debug, Error)]
pub enum Error {
	/// The request never produced a response (connection refused, DNS, timeout, ...).
	#[error("network error on {method} {url}: {message}")]
	Network { method: Method, url: String, message: String },

	/// The server answered with a non-2xx status that is not retried.
	///
	/// `body` holds the raw response text so callers can show the server's
	/// message (see [`Error::server_message`]).
	#[error("{method} {url} failed with HTTP {code}")]
	HttpStatus {
		code: u16,
		method: Method,
		url: String,
		body: String,
	},

	/// The anti-forgery token was rejected again after one re-prime and retry.
	#[error("{method} {url} rejected the anti-forgery token twice (HTTP {code})")]
	CredentialExpiry {
		code: u16,
		method: Method,
		url: String,
		body: String,
	},

	/// Base URL or endpoint path did not form a valid URL.
	#[error("invalid URL: {0}")]
	InvalidUrl(String),

	/// The request could not be built (bad header value, bad MIME type, ...).
	#[error("invalid request: {0}")]
	InvalidRequest(String),

	/// The HTTP client could not be constructed.
	#[error("failed to build HTTP client: {0}")]
	Client(String),

	/// A response body did not match the expected payload.
	#[error("failed to decode response from {url}: {source}")]
	Decode {
		url: String,
		#[source]
		source: serde_json::Error,
	},

	/// I/O error (reading an upload from disk)
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// JSON serialization error
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl Error {
	/// HTTP status carried by the error, if the server answered at all.
	pub fn status(&self) -> Option<u16> {
		match self {
			Error::HttpStatus { code, .. } | Error::CredentialExpiry { code, .. } => Some(*code),
			_ => None,
		}
	}

	/// Returns `true` for HTTP 401 (no or expired session).
	pub fn is_unauthenticated(&self) -> bool {
		self.status() == Some(401)
	}

	/// Returns `true` for transport-level failures.
	pub fn is_network(&self) -> bool {
		matches!(self, Error::Network { .. })
	}

	/// Message from a JSON error payload: `message`, else the first validation error.
	pub fn server_message(&self) -> Option<String> {
		let body = match self {
			Error::HttpStatus { body, .. } | Error::CredentialExpiry { body, .. } => body,
			_ => return None,
		};
		let message: ApiMessage = serde_json::from_str(body).ok()?;
		message.summary().map(str::to_string)
	}

	/// Text to show a user: the server's message when present, else `fallback`.
	pub fn user_message(&self, fallback: &str) -> String {
		self.server_message().unwrap_or_else(|| fallback.to_string())
	}
}
