//! Structured output envelope for all CLI commands.
//!
//! Every command produces a result envelope on stdout:
//!
//! ```json
//! {
//!   "schemaVersion": 1,
//!   "ok": true,
//!   "command": "enrollments.list",
//!   "data": [ ... ],
//!   "timings": { "durationMs": 84 },
//!   "config": { "baseUrl": "http://localhost:8001", "profile": "default" }
//! }
//! ```
//!
//! On failure:
//!
//! ```json
//! {
//!   "ok": false,
//!   "command": "enroll",
//!   "error": {
//!     "code": "VALIDATION_FAILED",
//!     "message": "You are already enrolled in this module.",
//!     "details": { "status": 422, "url": "http://localhost:8001/api/enrollments" }
//!   }
//! }
//! ```

#[cfg(test)]
mod tests;

use std::io::{self, Write};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Current schema version for command output.
///
/// Increment this when making breaking changes to the output structure.
pub const SCHEMA_VERSION: u32 = 1;

/// Output format for CLI results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
	/// TOON output (default, token-efficient for LLMs)
	#[default]
	Toon,
	/// JSON output
	Json,
	/// Newline-delimited JSON (streaming)
	Ndjson,
	/// Human-readable text
	Text,
}

impl std::fmt::Display for OutputFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			OutputFormat::Toon => write!(f, "toon"),
			OutputFormat::Json => write!(f, "json"),
			OutputFormat::Ndjson => write!(f, "ndjson"),
			OutputFormat::Text => write!(f, "text"),
		}
	}
}

/// The result envelope returned by all commands.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T: Serialize> {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub schema_version: Option<u32>,

	/// Whether the command succeeded
	pub ok: bool,

	/// Command name (e.g., "login", "admin.users.list")
	pub command: String,

	/// Inputs used for this command (passwords are never included)
	#[serde(skip_serializing_if = "Option::is_none")]
	pub inputs: Option<serde_json::Value>,

	/// Command-specific result data (only present on success)
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,

	/// Error information (only present on failure)
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<CommandError>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub timings: Option<Timings>,

	/// Warnings and notes produced while running the command
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub diagnostics: Vec<Diagnostic>,

	/// Effective configuration used for this command
	#[serde(skip_serializing_if = "Option::is_none")]
	pub config: Option<EffectiveConfig>,
}

/// Error information for failed commands
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
	pub code: ErrorCode,

	/// Human-readable message, preferably the server's own
	pub message: String,

	/// HTTP status, URL and similar context
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<serde_json::Value>,
}

/// Standardized error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	/// The backend could not be reached
	NetworkError,
	/// No session, or the session expired (HTTP 401)
	Unauthenticated,
	/// Signed in but not allowed (HTTP 403)
	Forbidden,
	/// Resource does not exist (HTTP 404)
	NotFound,
	/// The backend rejected the input (HTTP 422)
	ValidationFailed,
	/// Anti-forgery token rejected even after refreshing it
	CredentialExpired,
	/// Any other non-2xx response
	HttpError,
	/// The response did not have the expected shape
	DecodeError,
	/// File I/O error
	IoError,
	/// Stored session could not be read or written
	SessionError,
	/// Invalid input provided
	InvalidInput,
	/// Unknown/internal error
	InternalError,
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ErrorCode::NetworkError => write!(f, "NETWORK_ERROR"),
			ErrorCode::Unauthenticated => write!(f, "UNAUTHENTICATED"),
			ErrorCode::Forbidden => write!(f, "FORBIDDEN"),
			ErrorCode::NotFound => write!(f, "NOT_FOUND"),
			ErrorCode::ValidationFailed => write!(f, "VALIDATION_FAILED"),
			ErrorCode::CredentialExpired => write!(f, "CREDENTIAL_EXPIRED"),
			ErrorCode::HttpError => write!(f, "HTTP_ERROR"),
			ErrorCode::DecodeError => write!(f, "DECODE_ERROR"),
			ErrorCode::IoError => write!(f, "IO_ERROR"),
			ErrorCode::SessionError => write!(f, "SESSION_ERROR"),
			ErrorCode::InvalidInput => write!(f, "INVALID_INPUT"),
			ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
		}
	}
}

/// Timing information for the command
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timings {
	pub duration_ms: u64,
}

impl From<Duration> for Timings {
	fn from(duration: Duration) -> Self {
		Timings {
			duration_ms: duration.as_millis() as u64,
		}
	}
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
	pub level: DiagnosticLevel,
	pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
	Info,
	Warning,
	Error,
}

/// Effective configuration used for the command
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveConfig {
	pub base_url: String,
	pub profile: String,
	/// Whether the saved session held an anti-forgery token before the command ran
	#[serde(default)]
	pub resumed: bool,
}

/// Builder for constructing command results
pub struct ResultBuilder<T: Serialize> {
	schema_version: Option<u32>,
	command: String,
	inputs: Option<serde_json::Value>,
	data: Option<T>,
	error: Option<CommandError>,
	start_time: Option<Instant>,
	timings: Option<Timings>,
	diagnostics: Vec<Diagnostic>,
	config: Option<EffectiveConfig>,
}

impl<T: Serialize> ResultBuilder<T> {
	/// Create a new result builder for the given command.
	///
	/// The schema version is automatically set to [`SCHEMA_VERSION`].
	pub fn new(command: impl Into<String>) -> Self {
		Self {
			schema_version: Some(SCHEMA_VERSION),
			command: command.into(),
			inputs: None,
			data: None,
			error: None,
			start_time: Some(Instant::now()),
			timings: None,
			diagnostics: Vec::new(),
			config: None,
		}
	}

	pub fn inputs(mut self, inputs: serde_json::Value) -> Self {
		self.inputs = Some(inputs);
		self
	}

	pub fn data(mut self, data: T) -> Self {
		self.data = Some(data);
		self
	}

	pub fn error(mut self, code: ErrorCode, message: impl Into<String>) -> Self {
		self.error = Some(CommandError {
			code,
			message: message.into(),
			details: None,
		});
		self
	}

	pub fn error_from(mut self, error: CommandError) -> Self {
		self.error = Some(error);
		self
	}

	pub fn diagnostic(mut self, level: DiagnosticLevel, message: impl Into<String>) -> Self {
		self.diagnostics.push(Diagnostic {
			level,
			message: message.into(),
		});
		self
	}

	pub fn config(mut self, config: EffectiveConfig) -> Self {
		self.config = Some(config);
		self
	}

	/// Override timings (if not using automatic timing from start_time)
	pub fn timings(mut self, timings: Timings) -> Self {
		self.timings = Some(timings);
		self
	}

	pub fn build(self) -> CommandResult<T> {
		let ok = self.error.is_none() && self.data.is_some();

		let timings = self.timings.or_else(|| self.start_time.map(|start| Timings::from(start.elapsed())));

		CommandResult {
			schema_version: self.schema_version,
			ok,
			command: self.command,
			inputs: self.inputs,
			data: self.data,
			error: self.error,
			timings,
			diagnostics: self.diagnostics,
			config: self.config,
		}
	}
}

/// Print a command result to stdout in the specified format
pub fn print_result<T: Serialize>(result: &CommandResult<T>, format: OutputFormat) {
	match format {
		OutputFormat::Toon => {
			if let Ok(json_value) = serde_json::to_value(result) {
				println!("{}", toon::encode(&json_value, None));
			}
		}
		OutputFormat::Json => {
			if let Ok(json) = serde_json::to_string_pretty(result) {
				println!("{json}");
			}
		}
		OutputFormat::Ndjson => {
			if let Ok(json) = serde_json::to_string(result) {
				println!("{json}");
			}
		}
		OutputFormat::Text => {
			let mut stdout = io::stdout().lock();
			let _ = write_result_text(&mut stdout, result);
		}
	}
}

/// Writes the human-readable rendering of `result`.
pub fn write_result_text<T: Serialize, W: Write>(out: &mut W, result: &CommandResult<T>) -> io::Result<()> {
	if result.ok {
		if let Some(value) = result.data.as_ref().and_then(|d| serde_json::to_value(d).ok()) {
			write_value_text(out, &value)?;
		}
	} else if let Some(ref error) = result.error {
		writeln!(out, "Error [{}]: {}", error.code, error.message)?;
		if let Some(ref details) = error.details {
			if let Ok(json) = serde_json::to_string_pretty(details) {
				writeln!(out, "Details: {json}")?;
			}
		}
	}

	for diag in &result.diagnostics {
		let prefix = match diag.level {
			DiagnosticLevel::Info => "info",
			DiagnosticLevel::Warning => "warning",
			DiagnosticLevel::Error => "error",
		};
		writeln!(out, "[{prefix}] {}", diag.message)?;
	}
	Ok(())
}

/// Strings print bare, arrays one element per line, everything else as pretty JSON.
fn write_value_text<W: Write>(out: &mut W, value: &serde_json::Value) -> io::Result<()> {
	match value {
		serde_json::Value::Null => Ok(()),
		serde_json::Value::String(s) => writeln!(out, "{s}"),
		serde_json::Value::Array(items) if items.is_empty() => writeln!(out, "(none)"),
		serde_json::Value::Array(items) => {
			for item in items {
				match item {
					serde_json::Value::String(s) => writeln!(out, "{s}")?,
					other => writeln!(out, "{other}")?,
				}
			}
			Ok(())
		}
		other => writeln!(out, "{}", serde_json::to_string_pretty(other).unwrap_or_default()),
	}
}

/// Print error to stderr (for human consumption)
pub fn print_error_stderr(error: &CommandError) {
	eprintln!("Error [{}]: {}", error.code, error.message);
}
