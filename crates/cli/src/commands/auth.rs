use edutrack::SessionClient;
use edutrack_protocol::{Credentials, Registration};
use serde_json::json;
use tracing::info;

use super::{Outcome, resolve_password};
use crate::cli::{LoginArgs, RegisterArgs};
use crate::error::Result;

pub async fn login(client: &SessionClient, args: LoginArgs) -> Result<Outcome> {
	let password = resolve_password(args.password)?;
	let credentials = Credentials::new(args.email.clone(), password).remember(args.remember);

	let response = if args.admin {
		client.admin().login(&credentials).await?
	} else {
		client.auth().login(&credentials).await?
	};
	info!(target: "edutrack.cli", admin = args.admin, "signed in");

	Ok(Outcome::new(json!({ "signedIn": true, "response": response })).inputs(json!({
		"email": args.email,
		"admin": args.admin,
		"remember": args.remember,
	})))
}

pub async fn register(client: &SessionClient, args: RegisterArgs) -> Result<Outcome> {
	let password = resolve_password(args.password)?;
	let mut registration = Registration::new(args.name.clone(), args.email.clone(), password);
	if let Some(index) = args.index_number.clone() {
		registration = registration.index_number(index);
	}

	let response = if args.admin {
		client.admin().register(&registration).await?
	} else {
		client.auth().register(&registration).await?
	};
	info!(target: "edutrack.cli", admin = args.admin, "registered");

	Ok(Outcome::new(json!({ "registered": true, "response": response })).inputs(json!({
		"name": args.name,
		"email": args.email,
		"indexNumber": args.index_number,
		"admin": args.admin,
	})))
}

pub async fn logout(client: &SessionClient) -> Result<Outcome> {
	client.auth().logout().await?;
	Ok(Outcome::new(json!({ "signedOut": true })))
}

pub async fn me(client: &SessionClient) -> Result<Outcome> {
	let user = client.auth().me().await?;
	Outcome::from_serialize(&user)
}

pub async fn csrf(client: &SessionClient, force: bool) -> Result<Outcome> {
	let had_token = client.has_token();
	client.auth().csrf(force).await?;
	Ok(Outcome::new(json!({
		"fetched": force || !had_token,
		"hasToken": client.has_token(),
	}))
	.inputs(json!({ "force": force })))
}

#[cfg(test)]
mod tests {
	use edutrack::Method;
	use serde_json::json;

	use super::*;
	use crate::commands::testing;

	fn login_args(admin: bool) -> LoginArgs {
		LoginArgs {
			email: "ada@uni.edu".into(),
			password: Some("secret".into()),
			remember: false,
			admin,
		}
	}

	#[tokio::test]
	async fn login_never_echoes_password() {
		let (client, controller) = testing::client();
		controller.route_json(Method::POST, "/login", 204, json!(null));

		let outcome = login(&client, login_args(false)).await.unwrap();

		let inputs = outcome.inputs.unwrap();
		assert_eq!(inputs["email"], "ada@uni.edu");
		assert!(!inputs.to_string().contains("secret"));
		assert_eq!(outcome.data["signedIn"], true);
		let calls = controller.api_calls();
		assert_eq!(calls[0].json().unwrap()["password"], "secret");
	}

	#[tokio::test]
	async fn admin_login_uses_admin_endpoint() {
		let (client, controller) = testing::client();
		controller.route_json(Method::POST, "/admin/login", 200, json!({"admin": {"name": "Root"}}));

		login(&client, login_args(true)).await.unwrap();

		assert_eq!(
			controller.sent_lines(),
			vec!["GET /sanctum/csrf-cookie", "POST /admin/login", "GET /sanctum/csrf-cookie"]
		);
	}

	#[tokio::test]
	async fn register_sends_index_number() {
		let (client, controller) = testing::client();
		controller.route_json(Method::POST, "/register", 201, json!({"user": {"id": 4}}));

		let args = RegisterArgs {
			name: "Ada".into(),
			email: "ada@uni.edu".into(),
			password: Some("secret".into()),
			index_number: Some("IT2001".into()),
			admin: false,
		};
		register(&client, args).await.unwrap();

		let calls = controller.api_calls();
		let body = calls[0].json().unwrap();
		assert_eq!(body["index_number"], "IT2001");
		assert_eq!(body["password_confirmation"], "secret");
	}

	#[tokio::test]
	async fn csrf_reports_whether_it_fetched() {
		let (client, controller) = testing::client();

		let first = csrf(&client, false).await.unwrap();
		let second = csrf(&client, false).await.unwrap();

		assert_eq!(first.data["fetched"], true);
		assert_eq!(second.data["fetched"], false);
		assert_eq!(second.data["hasToken"], true);
		assert_eq!(controller.priming_calls(), 1);
	}
}
