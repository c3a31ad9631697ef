use serde_json::json;

use super::Outcome;
use crate::cli::SessionAction;
use crate::error::Result;
use crate::session_store::SessionStore;

/// Saved-session management. Only cookie names are reported, never values.
pub fn execute(action: SessionAction, store: &SessionStore, profile: &str) -> Result<Outcome> {
	match action {
		SessionAction::Show => {
			let path = store.path(profile)?;
			let data = match store.load(profile)? {
				Some(state) => json!({
					"profile": profile,
					"path": path,
					"saved": true,
					"baseUrl": state.base_url,
					"cookies": state.cookies.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
				}),
				None => json!({ "profile": profile, "path": path, "saved": false }),
			};
			Ok(Outcome::new(data))
		}
		SessionAction::List => {
			let profiles = store.profiles()?;
			Ok(Outcome::new(json!({ "dir": store.dir(), "profiles": profiles })))
		}
		SessionAction::Clear => {
			let cleared = store.clear(profile)?;
			Ok(Outcome::new(json!({ "profile": profile, "cleared": cleared })))
		}
	}
}
