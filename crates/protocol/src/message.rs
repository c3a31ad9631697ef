//! Error and status message payloads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// `{ "message": ..., "errors": { field: [..] } }` body returned on failures
/// and by some mutating endpoints on success.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiMessage {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	/// Validation errors keyed by field name.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub errors: BTreeMap<String, Vec<String>>,
}

impl ApiMessage {
	/// First validation message, ordered by field name.
	pub fn first_error(&self) -> Option<&str> {
		self.errors.values().flat_map(|messages| messages.iter()).map(String::as_str).find(|m| !m.trim().is_empty())
	}

	/// Best human-readable summary: `message`, else the first validation error.
	pub fn summary(&self) -> Option<&str> {
		self.message
			.as_deref()
			.filter(|m| !m.trim().is_empty())
			.or_else(|| self.first_error())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn summary_prefers_message() {
		let msg: ApiMessage = serde_json::from_str(r#"{"message":"The given data was invalid.","errors":{"email":["Taken"]}}"#).unwrap();
		assert_eq!(msg.summary(), Some("The given data was invalid."));
		assert_eq!(msg.first_error(), Some("Taken"));
	}

	#[test]
	fn summary_falls_back_to_validation_error() {
		let msg: ApiMessage = serde_json::from_str(r#"{"message":"","errors":{"year":["Year must be 1-4."],"code":["Required"]}}"#).unwrap();
		assert_eq!(msg.summary(), Some("Required"));
	}

	#[test]
	fn empty_body_has_no_summary() {
		let msg: ApiMessage = serde_json::from_str("{}").unwrap();
		assert_eq!(msg.summary(), None);
	}
}
