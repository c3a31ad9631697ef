//! Cookie and session state types for persisting an authenticated session.
//!
//! The backend authenticates with two cookies: the session cookie and the
//! `XSRF-TOKEN` anti-forgery cookie. [`SessionState`] captures both so a
//! session can be saved and restored between processes.

use serde::{Deserialize, Serialize};

/// A cookie as held by the client cookie jar.
///
/// `value` is stored exactly as the server sent it (still percent-encoded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
	/// Cookie name
	pub name: String,

	/// Raw cookie value
	pub value: String,

	/// Path for the cookie (default: "/")
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub path: Option<String>,
}

impl Cookie {
	/// Creates a new cookie.
	pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
			path: None,
		}
	}

	/// Sets the path for the cookie.
	pub fn path(mut self, path: impl Into<String>) -> Self {
		self.path = Some(path.into());
		self
	}

	/// Renders the cookie as a `Set-Cookie` style string for re-insertion into a jar.
	pub fn to_set_cookie(&self) -> String {
		format!("{}={}; Path={}", self.name, self.value, self.path.as_deref().unwrap_or("/"))
	}

	/// Parses a `Cookie` request header (`a=1; b=2`) into cookies.
	///
	/// Malformed pairs without `=` are skipped.
	pub fn parse_header(header: &str) -> Vec<Cookie> {
		header
			.split(';')
			.filter_map(|pair| {
				let (name, value) = pair.trim().split_once('=')?;
				let name = name.trim();
				if name.is_empty() {
					return None;
				}
				Some(Cookie::new(name, value.trim()))
			})
			.collect()
	}
}

/// Saved session: the API origin and every cookie the jar held for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
	/// Base URL the cookies belong to
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub base_url: Option<String>,
	/// All cookies for the origin
	#[serde(default)]
	pub cookies: Vec<Cookie>,
}

impl SessionState {
	/// Creates an empty session state.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a session state for `base_url` with cookies.
	pub fn with_cookies(base_url: impl Into<String>, cookies: Vec<Cookie>) -> Self {
		Self {
			base_url: Some(base_url.into()),
			cookies,
		}
	}

	/// Looks up a cookie by name.
	pub fn cookie(&self, name: &str) -> Option<&Cookie> {
		self.cookies.iter().find(|c| c.name == name)
	}

	/// Loads session state from a JSON file.
	pub fn from_file(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
		let content = std::fs::read_to_string(path)?;
		serde_json::from_str(&content).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
	}

	/// Saves session state to a JSON file.
	pub fn to_file(&self, path: impl AsRef<std::path::Path>) -> std::io::Result<()> {
		let content = serde_json::to_string_pretty(self).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
		std::fs::write(path, content)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_header_splits_pairs() {
		let cookies = Cookie::parse_header("laravel_session=abc; XSRF-TOKEN=eyJpdiI6%3D%3D");
		assert_eq!(cookies.len(), 2);
		assert_eq!(cookies[0], Cookie::new("laravel_session", "abc"));
		assert_eq!(cookies[1].name, "XSRF-TOKEN");
		assert_eq!(cookies[1].value, "eyJpdiI6%3D%3D");
	}

	#[test]
	fn parse_header_skips_malformed_pairs() {
		let cookies = Cookie::parse_header("garbage; =nameless; ok=1;");
		assert_eq!(cookies, vec![Cookie::new("ok", "1")]);
	}

	#[test]
	fn set_cookie_defaults_to_root_path() {
		assert_eq!(Cookie::new("a", "b").to_set_cookie(), "a=b; Path=/");
		assert_eq!(Cookie::new("a", "b").path("/api").to_set_cookie(), "a=b; Path=/api");
	}

	#[test]
	fn session_state_round_trips_through_file() {
		let dir = tempfile::TempDir::new().unwrap();
		let path = dir.path().join("session.json");

		let state = SessionState::with_cookies("http://localhost:8001", vec![Cookie::new("XSRF-TOKEN", "t%3D")]);
		state.to_file(&path).unwrap();

		let loaded = SessionState::from_file(&path).unwrap();
		assert_eq!(loaded, state);
		assert_eq!(loaded.cookie("XSRF-TOKEN").map(|c| c.value.as_str()), Some("t%3D"));
	}
}
