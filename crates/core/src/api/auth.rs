use edutrack_protocol::{Credentials, Registration, User, UserPayload};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::request::RequestDescriptor;
use crate::session::SessionClient;

/// Student session endpoints.
#[derive(Debug, Clone, Copy)]
pub struct Auth<'a> {
	client: &'a SessionClient,
}

impl<'a> Auth<'a> {
	pub(crate) fn new(client: &'a SessionClient) -> Self {
		Self { client }
	}

	/// Primes the anti-forgery token; see [`SessionClient::prime_credential`].
	pub async fn csrf(&self, force: bool) -> Result<()> {
		self.client.prime_credential(force).await
	}

	/// Creates an account and signs in. The session rotates, so the token is re-primed.
	pub async fn register(&self, registration: &Registration) -> Result<Value> {
		let res = self.client.request(&RequestDescriptor::post("/register").json(registration)?).await?;
		self.client.prime_credential(true).await?;
		res.json()
	}

	/// Signs in and re-primes the token for the new session.
	pub async fn login(&self, credentials: &Credentials) -> Result<Value> {
		let res = self.client.request(&RequestDescriptor::post("/login").json(credentials)?).await?;
		self.client.prime_credential(true).await?;
		res.json()
	}

	/// Signs out. The token is re-primed whether or not the logout succeeded;
	/// a priming failure takes precedence over the logout result.
	pub async fn logout(&self) -> Result<()> {
		let outcome = self.client.send(&RequestDescriptor::post("/logout")).await;
		self.client.prime_credential(true).await?;
		outcome
	}

	/// Current user: `GET /user`, falling back to `GET /api/me` on any error.
	pub async fn me(&self) -> Result<User> {
		match self.client.json::<UserPayload>(&RequestDescriptor::get("/user")).await {
			Ok(payload) => Ok(payload.into_user()),
			Err(err) => {
				debug!(target: "edutrack.session", error = %err, "GET /user failed, trying /api/me");
				let payload: UserPayload = self.client.json(&RequestDescriptor::get("/api/me")).await?;
				Ok(payload.into_user())
			}
		}
	}
}
