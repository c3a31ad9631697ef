use std::path::PathBuf;

use thiserror::Error;

use crate::output::{CommandError, ErrorCode};

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error("invalid input: {0}")]
	InvalidInput(String),

	#[error("session file {path} is unusable: {message}")]
	Session { path: PathBuf, message: String },

	#[error("failed to read {path}")]
	ReadFile {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error(transparent)]
	Client(#[from] edutrack::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

/// Maps an HTTP status to the envelope code callers branch on.
fn classify_status(code: u16) -> ErrorCode {
	match code {
		401 => ErrorCode::Unauthenticated,
		403 => ErrorCode::Forbidden,
		404 => ErrorCode::NotFound,
		422 => ErrorCode::ValidationFailed,
		_ => ErrorCode::HttpError,
	}
}

impl CliError {
	/// Convert this error to a CommandError for structured output
	pub fn to_command_error(&self) -> CommandError {
		let (code, message, details) = match self {
			CliError::InvalidInput(msg) => (ErrorCode::InvalidInput, msg.clone(), None),
			CliError::Session { path, message } => (
				ErrorCode::SessionError,
				format!("Session file {} is unusable: {message}", path.display()),
				Some(serde_json::json!({ "path": path })),
			),
			CliError::ReadFile { path, source } => (
				ErrorCode::IoError,
				format!("Failed to read {}: {source}", path.display()),
				Some(serde_json::json!({ "path": path })),
			),
			CliError::Client(err) => client_error(err),
			CliError::Io(err) => (ErrorCode::IoError, err.to_string(), None),
			CliError::Json(err) => (ErrorCode::InternalError, format!("JSON error: {err}"), None),
		};

		CommandError { code, message, details }
	}
}

fn client_error(err: &edutrack::Error) -> (ErrorCode, String, Option<serde_json::Value>) {
	use edutrack::Error;

	match err {
		Error::Network { method, url, message } => (
			ErrorCode::NetworkError,
			format!("Could not reach the server: {message}"),
			Some(serde_json::json!({ "method": method.as_str(), "url": url })),
		),
		Error::HttpStatus { code, method, url, .. } => (
			classify_status(*code),
			err.user_message(&format!("Request failed with HTTP {code}.")),
			Some(serde_json::json!({ "status": code, "method": method.as_str(), "url": url })),
		),
		Error::CredentialExpiry { code, method, url, .. } => (
			ErrorCode::CredentialExpired,
			err.user_message("Your session expired. Sign in again."),
			Some(serde_json::json!({ "status": code, "method": method.as_str(), "url": url })),
		),
		Error::InvalidUrl(msg) => (ErrorCode::InvalidInput, format!("Invalid URL: {msg}"), None),
		Error::Decode { url, source } => (
			ErrorCode::DecodeError,
			format!("Unexpected response from {url}: {source}"),
			Some(serde_json::json!({ "url": url })),
		),
		Error::Io(io) => (ErrorCode::IoError, io.to_string(), None),
		Error::InvalidRequest(_) | Error::Client(_) | Error::Json(_) => (ErrorCode::InternalError, err.to_string(), None),
	}
}

#[cfg(test)]
mod tests {
	use edutrack::Method;

	use super::*;

	fn http(code: u16, body: &str) -> CliError {
		CliError::Client(edutrack::Error::HttpStatus {
			code,
			method: Method::POST,
			url: "http://localhost:8001/api/enrollments".into(),
			body: body.into(),
		})
	}

	#[test]
	fn validation_errors_use_server_message() {
		let err = http(422, r#"{"message":"The given data was invalid.","errors":{"offering_id":["Already enrolled."]}}"#).to_command_error();

		assert_eq!(err.code, ErrorCode::ValidationFailed);
		assert_eq!(err.message, "The given data was invalid.");
		let details = err.details.unwrap();
		assert_eq!(details["status"], 422);
		assert_eq!(details["method"], "POST");
	}

	#[test]
	fn statuses_map_to_codes() {
		assert_eq!(http(401, "").to_command_error().code, ErrorCode::Unauthenticated);
		assert_eq!(http(403, "").to_command_error().code, ErrorCode::Forbidden);
		assert_eq!(http(404, "").to_command_error().code, ErrorCode::NotFound);
		assert_eq!(http(500, "<html/>").to_command_error().code, ErrorCode::HttpError);
		assert_eq!(http(500, "<html/>").to_command_error().message, "Request failed with HTTP 500.");
	}

	#[test]
	fn credential_expiry_has_its_own_code() {
		let err = CliError::from(edutrack::Error::CredentialExpiry {
			code: 419,
			method: Method::DELETE,
			url: "http://localhost:8001/api/achievements/3".into(),
			body: String::new(),
		})
		.to_command_error();

		assert_eq!(err.code, ErrorCode::CredentialExpired);
		assert_eq!(err.message, "Your session expired. Sign in again.");
	}

	#[test]
	fn network_errors_keep_url() {
		let err = CliError::from(edutrack::Error::Network {
			method: Method::GET,
			url: "http://localhost:8001/api/courses".into(),
			message: "connection refused".into(),
		})
		.to_command_error();

		assert_eq!(err.code, ErrorCode::NetworkError);
		assert_eq!(err.details.unwrap()["url"], "http://localhost:8001/api/courses");
	}
}
