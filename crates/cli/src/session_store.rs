//! Per-profile persistence of the cookie session between CLI invocations.
//!
//! Sessions live under `$XDG_CONFIG_HOME/edutrack/sessions/<profile>.json`
//! (falling back to `~/.config`). Files hold session cookies, so they are
//! written owner-only on unix. Cookie values are never printed.

use std::fs;
use std::path::{Path, PathBuf};

use edutrack_protocol::SessionState;

use crate::error::{CliError, Result};

/// Profile used when `--profile` is not given.
pub const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, Clone)]
pub struct SessionStore {
	dir: PathBuf,
}

impl SessionStore {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	/// Opens the store at `dir_override`, or the default config location.
	pub fn open(dir_override: Option<&Path>) -> Result<Self> {
		match dir_override {
			Some(dir) => Ok(Self::new(dir)),
			None => Ok(Self::new(default_dir()?)),
		}
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// File backing `profile`.
	pub fn path(&self, profile: &str) -> Result<PathBuf> {
		validate_profile(profile)?;
		Ok(self.dir.join(format!("{profile}.json")))
	}

	/// Loads the saved session, `None` when the profile has never been saved.
	pub fn load(&self, profile: &str) -> Result<Option<SessionState>> {
		let path = self.path(profile)?;
		if !path.exists() {
			return Ok(None);
		}
		SessionState::from_file(&path).map(Some).map_err(|e| CliError::Session {
			path,
			message: e.to_string(),
		})
	}

	pub fn save(&self, profile: &str, state: &SessionState) -> Result<PathBuf> {
		let path = self.path(profile)?;
		fs::create_dir_all(&self.dir)?;
		state.to_file(&path)?;
		#[cfg(unix)]
		{
			use std::os::unix::fs::PermissionsExt;
			fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
		}
		Ok(path)
	}

	/// Removes the saved session. Returns whether a file existed.
	pub fn clear(&self, profile: &str) -> Result<bool> {
		let path = self.path(profile)?;
		match fs::remove_file(&path) {
			Ok(()) => Ok(true),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
			Err(e) => Err(e.into()),
		}
	}

	/// Names of all saved profiles, sorted.
	pub fn profiles(&self) -> Result<Vec<String>> {
		let entries = match fs::read_dir(&self.dir) {
			Ok(entries) => entries,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
			Err(e) => return Err(e.into()),
		};

		let mut names = Vec::new();
		for entry in entries {
			let path = entry?.path();
			if path.extension().is_some_and(|ext| ext == "json") {
				if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
					names.push(stem.to_string());
				}
			}
		}
		names.sort();
		Ok(names)
	}
}

fn default_dir() -> Result<PathBuf> {
	let config_home = std::env::var_os("XDG_CONFIG_HOME")
		.map(PathBuf::from)
		.filter(|p| p.is_absolute())
		.or_else(|| dirs::home_dir().map(|h| h.join(".config")))
		.ok_or_else(|| CliError::InvalidInput("could not determine home directory; pass --session-dir".into()))?;
	Ok(config_home.join("edutrack").join("sessions"))
}

fn validate_profile(profile: &str) -> Result<()> {
	let valid = !profile.is_empty() && profile.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')) && !profile.starts_with('.');
	if valid {
		Ok(())
	} else {
		Err(CliError::InvalidInput(format!(
			"invalid profile name {profile:?}: use letters, digits, '-', '_' or '.'"
		)))
	}
}
