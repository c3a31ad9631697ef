//! Anti-forgery token access.
//!
//! The client never parses cookies itself; it asks a [`CredentialStore`] for
//! the decoded token. Production code uses [`CookieJar`], which wraps the
//! `reqwest` cookie jar the transport writes `Set-Cookie` headers into. Tests
//! use [`MemoryCredentialStore`].
//!
//! Token values are secrets: implementations must never log them.

use std::sync::Arc;

use edutrack_protocol::{Cookie, SessionState};
use parking_lot::RwLock;
use reqwest::cookie::{CookieStore, Jar};
use url::Url;

use crate::config::ClientConfig;
use crate::error::Result;

/// Read access to the current anti-forgery token.
///
/// Implementations must be `Send + Sync`; the client shares one store across
/// concurrent requests.
pub trait CredentialStore: Send + Sync {
	/// Returns the decoded token, or `None` when no token cookie is present.
	fn read_token(&self) -> Option<String>;

	/// Cheap presence check used to short-circuit non-forced priming.
	fn has_token(&self) -> bool {
		self.read_token().is_some()
	}
}

/// Percent-decodes a raw cookie value. Invalid UTF-8 escapes fall back to the raw value.
pub fn decode_token(raw: &str) -> String {
	urlencoding::decode(raw).map(|v| v.into_owned()).unwrap_or_else(|_| raw.to_string())
}

/// Extracts and decodes cookie `name` from a `Cookie` header value.
pub fn token_from_cookie_header(header: &str, name: &str) -> Option<String> {
	Cookie::parse_header(header)
		.into_iter()
		.find(|c| c.name == name && !c.value.is_empty())
		.map(|c| decode_token(&c.value))
}

/// Cookie jar shared with the HTTP transport.
///
/// Holds every cookie the backend sets (session and anti-forgery) and exposes
/// them for persistence through [`CookieJar::snapshot`] / [`CookieJar::restore`].
#[derive(Debug)]
pub struct CookieJar {
	jar: Arc<Jar>,
	origin: Url,
	cookie_name: String,
}

impl CookieJar {
	/// Creates an empty jar scoped to `origin`.
	pub fn new(origin: Url, cookie_name: impl Into<String>) -> Self {
		Self {
			jar: Arc::new(Jar::default()),
			origin,
			cookie_name: cookie_name.into(),
		}
	}

	/// Creates an empty jar for the configured base URL and cookie name.
	pub fn for_config(config: &ClientConfig) -> Result<Self> {
		Ok(Self::new(config.origin()?, config.cookie_name()))
	}

	/// The underlying jar, for `reqwest::ClientBuilder::cookie_provider`.
	pub fn provider(&self) -> Arc<Jar> {
		Arc::clone(&self.jar)
	}

	pub fn origin(&self) -> &Url {
		&self.origin
	}

	/// Raw `Cookie` header the jar would send to the origin.
	fn header(&self) -> Option<String> {
		let value = self.jar.cookies(&self.origin)?;
		value.to_str().ok().map(str::to_string)
	}

	/// Copies the cookies currently held for the origin.
	pub fn snapshot(&self) -> SessionState {
		let cookies = self.header().map(|h| Cookie::parse_header(&h)).unwrap_or_default();
		SessionState::with_cookies(self.origin.as_str().trim_end_matches('/'), cookies)
	}

	/// Inserts previously saved cookies for the origin.
	pub fn restore(&self, state: &SessionState) {
		for cookie in &state.cookies {
			self.jar.add_cookie_str(&cookie.to_set_cookie(), &self.origin);
		}
	}
}

impl CredentialStore for CookieJar {
	fn read_token(&self) -> Option<String> {
		token_from_cookie_header(&self.header()?, &self.cookie_name)
	}
}

/// In-memory token holder for tests and fakes.
///
/// Stores the raw (percent-encoded) value, like a browser cookie store would.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
	raw: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a store already holding `raw`.
	pub fn with_raw(raw: impl Into<String>) -> Self {
		Self {
			raw: RwLock::new(Some(raw.into())),
		}
	}

	/// Replaces the raw cookie value (`None` removes the cookie).
	pub fn set_raw(&self, raw: Option<String>) {
		*self.raw.write() = raw;
	}

	pub fn raw(&self) -> Option<String> {
		self.raw.read().clone()
	}
}

impl CredentialStore for MemoryCredentialStore {
	fn read_token(&self) -> Option<String> {
		self.raw.read().as_deref().filter(|v| !v.is_empty()).map(decode_token)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_percent_encoded_tokens() {
		assert_eq!(decode_token("eyJpdiI6IkFCQyJ9%3D%3D"), "eyJpdiI6IkFCQyJ9==");
		assert_eq!(decode_token("plain"), "plain");
	}

	#[test]
	fn finds_token_among_other_cookies() {
		let header = "laravel_session=abc; XSRF-TOKEN=tok%2Fen%3D; theme=dark";
		assert_eq!(token_from_cookie_header(header, "XSRF-TOKEN").as_deref(), Some("tok/en="));
		assert_eq!(token_from_cookie_header(header, "MISSING"), None);
	}

	#[test]
	fn name_match_is_exact() {
		assert_eq!(token_from_cookie_header("X-XSRF-TOKEN-OLD=1", "XSRF-TOKEN"), None);
		assert_eq!(token_from_cookie_header("XSRF-TOKEN=", "XSRF-TOKEN"), None);
	}

	#[test]
	fn memory_store_tracks_presence() {
		let store = MemoryCredentialStore::new();
		assert!(!store.has_token());
		store.set_raw(Some("a%3Db".into()));
		assert_eq!(store.read_token().as_deref(), Some("a=b"));
		store.set_raw(None);
		assert_eq!(store.read_token(), None);
	}

	#[test]
	fn cookie_jar_reads_token_set_by_server() {
		let origin = Url::parse("http://localhost:8001/").unwrap();
		let jar = CookieJar::new(origin.clone(), "XSRF-TOKEN");
		assert!(!jar.has_token());

		jar.provider().add_cookie_str("XSRF-TOKEN=abc%3D%3D; Path=/; SameSite=Lax", &origin);
		jar.provider().add_cookie_str("laravel_session=s3ss; Path=/; HttpOnly", &origin);

		assert_eq!(jar.read_token().as_deref(), Some("abc=="));
	}

	#[test]
	fn cookie_jar_snapshot_restores_into_fresh_jar() {
		let origin = Url::parse("http://localhost:8001/").unwrap();
		let jar = CookieJar::new(origin.clone(), "XSRF-TOKEN");
		jar.provider().add_cookie_str("XSRF-TOKEN=t%3D1; Path=/", &origin);
		jar.provider().add_cookie_str("laravel_session=s; Path=/", &origin);

		let state = jar.snapshot();
		assert_eq!(state.base_url.as_deref(), Some("http://localhost:8001"));
		assert_eq!(state.cookies.len(), 2);

		let fresh = CookieJar::new(origin, "XSRF-TOKEN");
		fresh.restore(&state);
		assert_eq!(fresh.read_token().as_deref(), Some("t=1"));
		assert!(fresh.snapshot().cookie("laravel_session").is_some());
	}

	#[test]
	fn snapshot_base_url_matches_config() {
		for raw in ["http://LOCALHOST:8001", "http://campus.example.edu:80", "https://Campus.Example.edu:443/backend/"] {
			let config = ClientConfig::new(raw).unwrap();
			let jar = CookieJar::for_config(&config).unwrap();
			assert_eq!(jar.snapshot().base_url.as_deref(), Some(config.base_url()), "{raw}");
		}
	}
}
