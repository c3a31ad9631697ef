//! Client configuration.

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

/// Backend used when neither an explicit URL nor [`BASE_URL_ENV`] is given.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8001";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "EDUTRACK_API_URL";

/// Token-issuing endpoint.
pub const DEFAULT_CSRF_PATH: &str = "/sanctum/csrf-cookie";

/// Cookie carrying the anti-forgery token.
pub const DEFAULT_XSRF_COOKIE: &str = "XSRF-TOKEN";

/// Header echoing the anti-forgery token.
pub const DEFAULT_XSRF_HEADER: &str = "X-XSRF-TOKEN";

/// Status the backend uses for "token mismatch / expired".
pub const DEFAULT_EXPIRY_STATUS: u16 = 419;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// When the client primes the anti-forgery token before mutating requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrimingPolicy {
	/// Force a fresh token before every mutating request.
	#[default]
	Always,
	/// Prime once per client instance, skipping the call when a token cookie exists.
	OncePerSession,
}

/// Configuration for a [`SessionClient`](crate::SessionClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
	base_url: String,
	csrf_path: String,
	cookie_name: String,
	header_name: String,
	expiry_status: u16,
	timeout: Duration,
	priming: PrimingPolicy,
}

impl ClientConfig {
	/// Creates a configuration for `base_url`. The URL is stored in its
	/// canonical form (lowercase host, default port dropped, no trailing slash).
	pub fn new(base_url: &str) -> Result<Self> {
		let base_url = normalize_base_url(base_url)?;
		Ok(Self {
			base_url,
			csrf_path: DEFAULT_CSRF_PATH.to_string(),
			cookie_name: DEFAULT_XSRF_COOKIE.to_string(),
			header_name: DEFAULT_XSRF_HEADER.to_string(),
			expiry_status: DEFAULT_EXPIRY_STATUS,
			timeout: DEFAULT_TIMEOUT,
			priming: PrimingPolicy::default(),
		})
	}

	/// Reads the base URL from [`BASE_URL_ENV`], falling back to [`DEFAULT_BASE_URL`].
	pub fn from_env() -> Result<Self> {
		match std::env::var(BASE_URL_ENV) {
			Ok(url) if !url.trim().is_empty() => Self::new(&url),
			_ => Self::new(DEFAULT_BASE_URL),
		}
	}

	/// Sets the token-issuing endpoint path.
	pub fn with_csrf_path(mut self, path: impl Into<String>) -> Self {
		self.csrf_path = path.into();
		self
	}

	/// Sets the anti-forgery cookie name.
	pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
		self.cookie_name = name.into();
		self
	}

	/// Sets the anti-forgery header name.
	pub fn with_header_name(mut self, name: impl Into<String>) -> Self {
		self.header_name = name.into();
		self
	}

	/// Sets the status code treated as the expiry signal.
	pub fn with_expiry_status(mut self, status: u16) -> Self {
		self.expiry_status = status;
		self
	}

	/// Sets the per-request timeout.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	/// Sets the priming policy for mutating requests.
	pub fn with_priming(mut self, priming: PrimingPolicy) -> Self {
		self.priming = priming;
		self
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	pub fn csrf_path(&self) -> &str {
		&self.csrf_path
	}

	pub fn cookie_name(&self) -> &str {
		&self.cookie_name
	}

	pub fn header_name(&self) -> &str {
		&self.header_name
	}

	pub fn expiry_status(&self) -> u16 {
		self.expiry_status
	}

	pub fn timeout(&self) -> Duration {
		self.timeout
	}

	pub fn priming(&self) -> PrimingPolicy {
		self.priming
	}

	/// Origin URL used to look up cookies in the jar.
	pub fn origin(&self) -> Result<Url> {
		Url::parse(&format!("{}/", self.base_url)).map_err(|e| Error::InvalidUrl(format!("{}: {e}", self.base_url)))
	}

	/// Absolute URL for an API path. Paths are appended to the base URL, so a
	/// base with a path prefix (`https://host/backend`) keeps its prefix.
	pub fn endpoint(&self, path: &str) -> Result<Url> {
		let joined = if path.starts_with('/') {
			format!("{}{}", self.base_url, path)
		} else {
			format!("{}/{}", self.base_url, path)
		};
		Url::parse(&joined).map_err(|e| Error::InvalidUrl(format!("{joined}: {e}")))
	}
}

fn normalize_base_url(raw: &str) -> Result<String> {
	let trimmed = raw.trim().trim_end_matches('/');
	let url = Url::parse(trimmed).map_err(|e| Error::InvalidUrl(format!("{raw}: {e}")))?;
	if !matches!(url.scheme(), "http" | "https") {
		return Err(Error::InvalidUrl(format!("{raw}: unsupported scheme {}", url.scheme())));
	}
	Ok(url.as_str().trim_end_matches('/').to_string())
}
