//! Command execution.
//!
//! [`dispatch`] restores the profile's cookie session, runs one command
//! against a [`SessionClient`], saves the (possibly refreshed) cookies back and
//! prints the result envelope. Each area module exposes `execute` functions
//! that take the client and return an [`Outcome`], so they can be driven by
//! the in-memory transport in tests.

mod achievements;
mod admin;
mod auth;
mod courses;
mod enrollments;
mod profile;
mod results;
mod session;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use edutrack::{ClientConfig, CookieJar, FilePart, SessionClient};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use crate::output::{DiagnosticLevel, EffectiveConfig, OutputFormat, ResultBuilder, print_result};
use crate::session_store::SessionStore;

/// Environment variable consulted when `--password` is omitted.
pub const PASSWORD_ENV: &str = "EDUTRACK_PASSWORD";

/// What a command produced: envelope data plus optional echo of its inputs.
#[derive(Debug, Default)]
pub struct Outcome {
	pub data: Value,
	pub inputs: Option<Value>,
	pub diagnostics: Vec<(DiagnosticLevel, String)>,
}

impl Outcome {
	pub fn new(data: impl Into<Value>) -> Self {
		Self {
			data: data.into(),
			..Default::default()
		}
	}

	/// Serializes `data` into the envelope payload.
	pub fn from_serialize<T: serde::Serialize>(data: &T) -> Result<Self> {
		Ok(Self::new(serde_json::to_value(data)?))
	}

	pub fn inputs(mut self, inputs: Value) -> Self {
		self.inputs = Some(inputs);
		self
	}

	pub fn diagnostic(mut self, level: DiagnosticLevel, message: impl Into<String>) -> Self {
		self.diagnostics.push((level, message.into()));
		self
	}
}

pub async fn dispatch(cli: Cli) -> Result<()> {
	let Cli {
		format,
		base_url,
		profile,
		session_dir,
		command,
		..
	} = cli;
	let name = command.name();
	let store = SessionStore::open(session_dir.as_deref())?;

	// session management never talks to the backend
	if let Commands::Session(action) = command {
		let outcome = session::execute(action, &store, &profile)?;
		emit(name, outcome, None, format);
		return Ok(());
	}

	let config = client_config(base_url.as_deref())?;
	let jar = Arc::new(CookieJar::for_config(&config)?);
	let mut startup = Vec::new();

	if let Some(saved) = store.load(&profile)? {
		match saved.base_url.as_deref() {
			Some(url) if url != config.base_url() => {
				warn!(target: "edutrack.cli", profile = %profile, saved = url, "ignoring session saved for another backend");
				startup.push((
					DiagnosticLevel::Warning,
					format!("saved session for {url} ignored; signing in again will replace it"),
				));
			}
			_ => {
				debug!(target: "edutrack.cli", profile = %profile, cookies = saved.cookies.len(), "restoring session");
				jar.restore(&saved);
			}
		}
	}

	let client = SessionClient::with_cookie_jar(config.clone(), Arc::clone(&jar))?;
	let effective = EffectiveConfig {
		base_url: config.base_url().to_string(),
		profile: profile.clone(),
		resumed: client.has_token(),
	};

	let mut outcome = run_and_save(command, &client, &store, &profile, &jar).await?;
	startup.append(&mut outcome.diagnostics);
	outcome.diagnostics = startup;
	emit(name, outcome, Some(effective), format);
	Ok(())
}

/// `--base-url` wins, then `EDUTRACK_API_URL`, then the local default.
fn client_config(base_url: Option<&str>) -> Result<ClientConfig> {
	let config = match base_url {
		Some(url) => ClientConfig::new(url)?,
		None => ClientConfig::from_env()?,
	};
	Ok(config)
}

/// Runs `command`, then saves the jar. A failed save is logged and never
/// replaces the command's own result.
async fn run_and_save(command: Commands, client: &SessionClient, store: &SessionStore, profile: &str, jar: &CookieJar) -> Result<Outcome> {
	let result = run(command, client).await;

	// priming may have rotated cookies even when the command failed
	match store.save(profile, &jar.snapshot()) {
		Ok(path) => {
			debug!(target: "edutrack.cli", path = %path.display(), "session saved");
			result
		}
		Err(err) => {
			warn!(target: "edutrack.cli", profile, error = %err, "failed to save session");
			result.map(|outcome| outcome.diagnostic(DiagnosticLevel::Warning, format!("session not saved: {err}")))
		}
	}
}

pub async fn run(command: Commands, client: &SessionClient) -> Result<Outcome> {
	match command {
		Commands::Login(args) => auth::login(client, args).await,
		Commands::Register(args) => auth::register(client, args).await,
		Commands::Logout => auth::logout(client).await,
		Commands::Me => auth::me(client).await,
		Commands::Csrf { force } => auth::csrf(client, force).await,
		Commands::Courses(action) => courses::execute(client, action).await,
		Commands::Enrollments(action) => enrollments::execute(client, action).await,
		Commands::Results { grouped } => results::execute(client, grouped).await,
		Commands::Achievements(action) => achievements::execute(client, action).await,
		Commands::Profile(action) => profile::execute(client, action).await,
		Commands::Admin(action) => admin::execute(client, action).await,
		Commands::Session(_) => Err(CliError::InvalidInput("session commands run without a client".into())),
	}
}

fn emit(name: &'static str, outcome: Outcome, config: Option<EffectiveConfig>, format: OutputFormat) {
	let mut builder = ResultBuilder::new(name).data(outcome.data);
	if let Some(inputs) = outcome.inputs {
		builder = builder.inputs(inputs);
	}
	if let Some(config) = config {
		builder = builder.config(config);
	}
	for (level, message) in outcome.diagnostics {
		builder = builder.diagnostic(level, message);
	}
	print_result(&builder.build(), format);
}

/// Resolves a password from the flag or [`PASSWORD_ENV`].
pub(crate) fn resolve_password(flag: Option<String>) -> Result<String> {
	flag.or_else(|| std::env::var(PASSWORD_ENV).ok())
		.filter(|p| !p.is_empty())
		.ok_or_else(|| CliError::InvalidInput(format!("password is required (pass --password or set {PASSWORD_ENV})")))
}

/// Reads an upload from disk, keeping the path in the error.
pub(crate) fn read_upload(path: &Path) -> Result<FilePart> {
	FilePart::from_path(path).map_err(|err| match err {
		edutrack::Error::Io(source) => CliError::ReadFile {
			path: PathBuf::from(path),
			source,
		},
		other => other.into(),
	})
}


#[cfg(test)]
mod tests {
	use edutrack::Method;
	use serde_json::json;

	use super::*;
	use crate::cli::{CoursesAction, EnrollmentsAction};

	#[test]
	fn explicit_base_url_wins() {
		let config = client_config(Some("https://campus.example.edu/")).unwrap();
		assert_eq!(config.base_url(), "https://campus.example.edu");
		assert!(client_config(Some("ftp://nope")).is_err());
	}

	#[test]
	fn password_flag_is_used_when_given() {
		assert_eq!(resolve_password(Some("secret".into())).unwrap(), "secret");
	}

	#[test]
	fn missing_upload_names_the_path() {
		let err = read_upload(Path::new("/definitely/not/here.png")).unwrap_err();
		match err {
			CliError::ReadFile { path, .. } => assert_eq!(path, PathBuf::from("/definitely/not/here.png")),
			other => panic!("expected ReadFile, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn run_routes_to_area_modules() {
		let (client, controller) = testing::client();
		controller.route_json(Method::GET, "/api/courses", 200, json!({"items": [{"id": 1, "code": "IT1010", "title": "Intro"}]}));
		controller.route_json(Method::POST, "/api/enrollments", 201, json!({"enrollment_id": 9}));

		let listed = run(Commands::Courses(CoursesAction::List { level: None, search: None }), &client).await.unwrap();
		assert_eq!(listed.data[0]["code"], "IT1010");

		let enrolled = run(Commands::Enrollments(EnrollmentsAction::Add { offering_id: 4 }), &client).await.unwrap();
		assert_eq!(enrolled.data["enrollment_id"], 9);
		assert_eq!(controller.priming_calls(), 1);
	}

	fn unwritable_store() -> (tempfile::TempDir, SessionStore) {
		let dir = tempfile::TempDir::new().unwrap();
		let blocker = dir.path().join("sessions");
		std::fs::write(&blocker, b"not a directory").unwrap();
		(dir, SessionStore::new(blocker))
	}

	#[tokio::test]
	async fn save_failure_keeps_command_error() {
		let (client, controller) = testing::client();
		controller.route_json(Method::POST, "/api/enrollments", 422, json!({"message": "Already enrolled."}));
		let (_dir, store) = unwritable_store();
		let jar = CookieJar::for_config(client.config()).unwrap();

		let err = run_and_save(Commands::Enrollments(EnrollmentsAction::Add { offering_id: 4 }), &client, &store, "default", &jar)
			.await
			.unwrap_err();

		match err {
			CliError::Client(err) => {
				assert_eq!(err.status(), Some(422));
				assert_eq!(err.server_message().as_deref(), Some("Already enrolled."));
			}
			other => panic!("expected client error, got {other:?}"),
		}
	}

	#[tokio::test]
	async fn save_failure_after_success_is_a_warning() {
		let (client, controller) = testing::client();
		controller.route_json(Method::POST, "/api/enrollments", 201, json!({"enrollment_id": 9}));
		let (_dir, store) = unwritable_store();
		let jar = CookieJar::for_config(client.config()).unwrap();

		let outcome = run_and_save(Commands::Enrollments(EnrollmentsAction::Add { offering_id: 4 }), &client, &store, "default", &jar)
			.await
			.unwrap();

		assert_eq!(outcome.data["enrollment_id"], 9);
		assert!(matches!(outcome.diagnostics.as_slice(), [(DiagnosticLevel::Warning, msg)] if msg.starts_with("session not saved")));
	}

	#[tokio::test]
	async fn session_commands_are_rejected_by_run() {
		let (client, _controller) = testing::client();
		let err = run(Commands::Session(crate::cli::SessionAction::Show), &client).await.unwrap_err();
		assert!(matches!(err, CliError::InvalidInput(_)));
	}
}
