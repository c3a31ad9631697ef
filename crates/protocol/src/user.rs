//! Account and profile types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An account as returned by `/user`, `/api/me` and the admin user endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
	/// Absent on the admin profile endpoint
	#[serde(default)]
	pub id: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub full_name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// Student index number (absent for admins)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub index_number: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub avatar_url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email_verified_at: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub updated_at: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub enrollments_count: Option<u64>,
	/// Fields not modelled above
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl User {
	/// Display name: `full_name`, else `name`, else the email.
	pub fn display_name(&self) -> Option<&str> {
		self.full_name.as_deref().or(self.name.as_deref()).or(self.email.as_deref())
	}
}

/// `/user` returns the bare user, `/api/me` and admin endpoints may wrap it in
/// `{ "user": ... }`, `{ "admin": ... }` or `{ "data": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserPayload {
	Wrapped { user: User },
	Admin { admin: User },
	Data { data: User },
	Bare(User),
}

impl UserPayload {
	pub fn into_user(self) -> User {
		match self {
			UserPayload::Wrapped { user }
			| UserPayload::Admin { admin: user }
			| UserPayload::Data { data: user }
			| UserPayload::Bare(user) => user,
		}
	}
}

/// Login form body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
	pub email: String,
	pub password: String,
	#[serde(default, skip_serializing_if = "std::ops::Not::not")]
	pub remember: bool,
}

impl Credentials {
	pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
		Self {
			email: email.into(),
			password: password.into(),
			remember: false,
		}
	}

	pub fn remember(mut self, remember: bool) -> Self {
		self.remember = remember;
		self
	}
}

/// Registration form body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
	pub name: String,
	pub email: String,
	pub password: String,
	pub password_confirmation: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub index_number: Option<String>,
}

impl Registration {
	/// Builds a registration whose confirmation matches `password`.
	pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
		let password = password.into();
		Self {
			name: name.into(),
			email: email.into(),
			password_confirmation: password.clone(),
			password,
			index_number: None,
		}
	}

	pub fn index_number(mut self, index_number: impl Into<String>) -> Self {
		self.index_number = Some(index_number.into());
		self
	}
}

/// Profile update body (admin profile page).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
}

impl ProfileUpdate {
	/// Trims both fields; blank values are dropped.
	pub fn new(name: Option<&str>, email: Option<&str>) -> Self {
		let clean = |v: Option<&str>| v.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);
		Self {
			name: clean(name),
			email: clean(email),
		}
	}
}

/// `{ "avatar_url": ... }` returned by the avatar upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarUpload {
	pub avatar_url: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn user_payload_accepts_all_shapes() {
		let bare: UserPayload = serde_json::from_str(r#"{"id":1,"name":"Ada"}"#).unwrap();
		let wrapped: UserPayload = serde_json::from_str(r#"{"user":{"id":2,"name":"Bo"}}"#).unwrap();
		let data: UserPayload = serde_json::from_str(r#"{"data":{"id":3,"email":"c@x.io"}}"#).unwrap();
		let admin: UserPayload = serde_json::from_str(r#"{"admin":{"id":4,"full_name":"Root"}}"#).unwrap();

		assert_eq!(bare.into_user().id, 1);
		assert_eq!(wrapped.into_user().name.as_deref(), Some("Bo"));
		assert_eq!(data.into_user().display_name(), Some("c@x.io"));
		assert_eq!(admin.into_user().display_name(), Some("Root"));
	}

	#[test]
	fn user_keeps_unknown_fields() {
		let user: User = serde_json::from_str(r#"{"id":7,"role":"admin"}"#).unwrap();
		assert_eq!(user.extra.get("role"), Some(&Value::String("admin".into())));
	}

	#[test]
	fn registration_confirms_password() {
		let reg = Registration::new("Ada", "ada@uni.edu", "s3cret").index_number("IT2001");
		let json = serde_json::to_value(&reg).unwrap();
		assert_eq!(json["password_confirmation"], "s3cret");
		assert_eq!(json["index_number"], "IT2001");
	}

	#[test]
	fn credentials_omit_remember_when_false() {
		let json = serde_json::to_value(Credentials::new("a@b.c", "pw")).unwrap();
		assert!(json.get("remember").is_none());
		let json = serde_json::to_value(Credentials::new("a@b.c", "pw").remember(true)).unwrap();
		assert_eq!(json["remember"], true);
	}

	#[test]
	fn profile_update_drops_blank_fields() {
		let update = ProfileUpdate::new(Some("  Admin  "), Some("   "));
		assert_eq!(update.name.as_deref(), Some("Admin"));
		assert_eq!(update.email, None);
	}
}
