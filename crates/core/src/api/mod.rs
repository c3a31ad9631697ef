//! Typed endpoint facades.
//!
//! Each facade borrows a [`SessionClient`] and maps one backend area to
//! methods returning `edutrack-protocol` payloads. Priming and retry are the
//! client's business; facades only add the extra priming the login flows need.

mod achievements;
mod admin;
mod auth;
mod courses;
mod enrollments;
mod profile;
mod results;

pub use achievements::Achievements;
pub use admin::Admin;
pub use auth::Auth;
pub use courses::Courses;
pub use enrollments::Enrollments;
pub use profile::Profile;
pub use results::Results;

use crate::session::SessionClient;

impl SessionClient {
	pub fn auth(&self) -> Auth<'_> {
		Auth::new(self)
	}

	pub fn profile(&self) -> Profile<'_> {
		Profile::new(self)
	}

	pub fn courses(&self) -> Courses<'_> {
		Courses::new(self)
	}

	pub fn enrollments(&self) -> Enrollments<'_> {
		Enrollments::new(self)
	}

	pub fn results(&self) -> Results<'_> {
		Results::new(self)
	}

	pub fn achievements(&self) -> Achievements<'_> {
		Achievements::new(self)
	}

	/// Admin console endpoints. Use a separate client instance (and cookie jar)
	/// from the student session.
	pub fn admin(&self) -> Admin<'_> {
		Admin::new(self)
	}
}
