//! Priming and expiry-retry behavior of `SessionClient` against the in-memory backend.

use std::time::Duration;

use edutrack::transport::fake::{FakeTransport, FakeTransportController};
use edutrack::{ClientConfig, Error, Method, PrimingPolicy, RequestDescriptor, SessionClient};
use serde_json::json;

fn config() -> ClientConfig {
	ClientConfig::new("http://localhost:8001").unwrap()
}

fn strict_client() -> (SessionClient, FakeTransportController) {
	FakeTransport::builder().enforce_token().build_client(config())
}

#[tokio::test]
async fn mutating_header_matches_cookie_at_send_time() -> anyhow::Result<()> {
	let (client, controller) = strict_client();
	controller.route_json(Method::POST, "/api/enrollments", 201, json!({"id": 1}));
	controller.route_json(Method::PUT, "/api/admin/profile", 200, json!({"data": {"name": "Root"}}));
	controller.route_json(Method::PATCH, "/api/admin/offerings/3", 200, json!({"data": {"id": 3}}));
	controller.route_json(Method::DELETE, "/api/achievements/9", 204, json!(null));

	client.request(&RequestDescriptor::post("/api/enrollments").json(&json!({"offering_id": 4}))?).await?;
	client.request(&RequestDescriptor::put("/api/admin/profile").json(&json!({"name": "Root"}))?).await?;
	client.request(&RequestDescriptor::patch("/api/admin/offerings/3")).await?;
	client.request(&RequestDescriptor::delete("/api/achievements/9")).await?;

	let calls = controller.api_calls();
	assert_eq!(calls.len(), 4);
	for call in calls {
		assert!(call.header_token.is_some(), "{} sent without token", call.line());
		assert_eq!(call.header_token, call.cookie_token, "{}", call.line());
	}
	Ok(())
}

#[tokio::test]
async fn unforced_priming_is_skipped_when_cookie_present() {
	let (client, controller) = FakeTransport::builder().with_cookie("existing%3D").build_client(config());

	client.prime_credential(false).await.unwrap();

	assert!(controller.sent().is_empty());
}

#[tokio::test]
async fn unforced_priming_fetches_when_cookie_missing() {
	let (client, controller) = FakeTransport::builder().build_client(config());

	client.prime_credential(false).await.unwrap();

	assert_eq!(controller.sent_lines(), vec!["GET /sanctum/csrf-cookie"]);
	assert!(client.has_token());
}

#[tokio::test]
async fn forced_priming_always_calls_once() {
	let (client, controller) = FakeTransport::builder().with_cookie("existing%3D").build_client(config());

	client.prime_credential(true).await.unwrap();
	assert_eq!(controller.priming_calls(), 1);

	client.prime_credential(true).await.unwrap();
	assert_eq!(controller.priming_calls(), 2);
}

#[tokio::test]
async fn single_expiry_is_retried_with_refreshed_header() {
	let (client, controller) = strict_client();
	controller.route_json(Method::POST, "/api/enrollments", 201, json!({"enrollment_id": 12}));
	controller.expire_next(1);

	let res = client.request(&RequestDescriptor::post("/api/enrollments")).await.unwrap();

	assert_eq!(res.status, 201);
	assert_eq!(res.json::<serde_json::Value>().unwrap()["enrollment_id"], 12);
	assert_eq!(
		controller.sent_lines(),
		vec!["GET /sanctum/csrf-cookie", "POST /api/enrollments", "GET /sanctum/csrf-cookie", "POST /api/enrollments"]
	);
	let posts = controller.api_calls();
	assert_eq!(posts[0].header_token.as_deref(), Some("token=1"));
	assert_eq!(posts[1].header_token.as_deref(), Some("token=2"));
}

#[tokio::test]
async fn second_expiry_is_surfaced_without_another_retry() {
	let (client, controller) = strict_client();
	controller.route_json(Method::DELETE, "/api/enrollments/5", 204, json!(null));
	controller.expire_next(2);

	let err = client.request(&RequestDescriptor::delete("/api/enrollments/5")).await.unwrap_err();

	match &err {
		Error::CredentialExpiry { code, method, url, .. } => {
			assert_eq!(*code, 419);
			assert_eq!(*method, Method::DELETE);
			assert!(url.ends_with("/api/enrollments/5"));
		}
		other => panic!("expected CredentialExpiry, got {other:?}"),
	}
	assert_eq!(err.server_message().as_deref(), Some("CSRF token mismatch."));
	assert_eq!(controller.api_calls().len(), 2);
	assert_eq!(controller.priming_calls(), 2);
}

#[tokio::test]
async fn failed_retry_surfaces_its_own_status() {
	let (client, controller) = strict_client();
	controller.respond(Method::POST, "/api/enrollments", 419, r#"{"message":"CSRF token mismatch."}"#);
	controller.respond_json(Method::POST, "/api/enrollments", 500, json!({"message": "Server Error"}));

	let err = client.request(&RequestDescriptor::post("/api/enrollments")).await.unwrap_err();

	assert!(matches!(err, Error::HttpStatus { code: 500, .. }), "{err:?}");
	assert_eq!(err.server_message().as_deref(), Some("Server Error"));
	assert_eq!(controller.api_calls().len(), 2);
	assert_eq!(controller.priming_calls(), 2);
}

#[tokio::test]
async fn other_error_statuses_are_not_retried() {
	for code in [401u16, 403, 404, 422, 500] {
		let (client, controller) = strict_client();
		controller.respond_json(Method::POST, "/api/achievements", code, json!({"message": format!("status {code}")}));

		let err = client.request(&RequestDescriptor::post("/api/achievements")).await.unwrap_err();

		assert!(matches!(err, Error::HttpStatus { code: c, .. } if c == code), "{code}: {err:?}");
		assert_eq!(err.server_message(), Some(format!("status {code}")));
		assert_eq!(controller.api_calls().len(), 1, "{code} was retried");
		assert_eq!(controller.priming_calls(), 1);
	}
}

#[tokio::test]
async fn safe_request_errors_are_not_retried() {
	let (client, controller) = strict_client();
	controller.respond_json(Method::GET, "/user", 401, json!({"message": "Unauthenticated."}));

	let err = client.request(&RequestDescriptor::get("/user")).await.unwrap_err();

	assert!(err.is_unauthenticated());
	assert_eq!(controller.sent_lines(), vec!["GET /user"]);
}

#[tokio::test]
async fn network_errors_propagate_unchanged() {
	let (client, controller) = strict_client();
	controller.fail_next(Method::POST, "/login", "connection refused");

	let err = client.request(&RequestDescriptor::post("/login")).await.unwrap_err();

	assert!(err.is_network());
	assert_eq!(controller.api_calls().len(), 1);
}

#[tokio::test]
async fn delete_without_cookie_primes_then_sends() {
	let (client, controller) = strict_client();
	controller.route_json(Method::DELETE, "/api/achievements/3", 204, json!(null));
	assert!(!client.has_token());

	client.request(&RequestDescriptor::delete("/api/achievements/3")).await.unwrap();

	assert_eq!(controller.sent_lines(), vec!["GET /sanctum/csrf-cookie", "DELETE /api/achievements/3"]);
}

#[tokio::test]
async fn stale_cookie_recovers_with_one_retry() {
	let config = config().with_priming(PrimingPolicy::OncePerSession);
	let (client, controller) = FakeTransport::builder().enforce_token().with_cookie("stale%3Dtoken").build_client(config);
	controller.route_json(Method::POST, "/api/enrollments", 200, json!({"ok": true}));

	let res = client.request(&RequestDescriptor::post("/api/enrollments")).await.unwrap();

	assert_eq!(res.status, 200);
	assert_eq!(
		controller.sent_lines(),
		vec!["POST /api/enrollments", "GET /sanctum/csrf-cookie", "POST /api/enrollments"]
	);
	let posts = controller.api_calls();
	assert_eq!(posts[0].header_token.as_deref(), Some("stale=token"));
	assert_eq!(posts[1].header_token.as_deref(), Some("token=1"));
}

#[tokio::test]
async fn cleared_cookie_is_recovered_by_the_expiry_retry() {
	let config = config().with_priming(PrimingPolicy::OncePerSession);
	let (client, controller) = FakeTransport::builder().enforce_token().build_client(config);
	controller.route_json(Method::POST, "/api/enrollments", 201, json!({}));

	client.request(&RequestDescriptor::post("/api/enrollments")).await.unwrap();
	controller.clear_cookie();
	assert!(!client.has_token());

	client.request(&RequestDescriptor::post("/api/enrollments")).await.unwrap();

	assert_eq!(
		controller.sent_lines(),
		vec!["GET /sanctum/csrf-cookie", "POST /api/enrollments", "POST /api/enrollments", "GET /sanctum/csrf-cookie", "POST /api/enrollments"]
	);
	let posts = controller.api_calls();
	assert_eq!(posts[1].header_token, None);
	assert_eq!(posts[2].header_token.as_deref(), Some("token=1"));
}

#[tokio::test]
async fn cookie_overwritten_mid_session_recovers_with_one_retry() {
	let config = config().with_priming(PrimingPolicy::OncePerSession);
	let (client, controller) = FakeTransport::builder().enforce_token().build_client(config);
	controller.route_json(Method::POST, "/api/enrollments", 201, json!({}));

	client.request(&RequestDescriptor::post("/api/enrollments")).await.unwrap();
	controller.set_stale_cookie("forged%3D");

	let res = client.request(&RequestDescriptor::post("/api/enrollments")).await.unwrap();

	assert_eq!(res.status, 201);
	let posts = controller.api_calls();
	assert_eq!(posts.len(), 3);
	assert_eq!(posts[1].header_token.as_deref(), Some("forged="));
	assert_eq!(posts[2].header_token, posts[2].cookie_token);
	assert_eq!(controller.priming_calls(), 2);
}

#[tokio::test]
async fn once_per_session_primes_only_first_mutation() {
	let config = config().with_priming(PrimingPolicy::OncePerSession);
	let (client, controller) = FakeTransport::builder().enforce_token().build_client(config);
	controller.route_json(Method::POST, "/api/enrollments", 201, json!({}));

	for _ in 0..3 {
		client.request(&RequestDescriptor::post("/api/enrollments")).await.unwrap();
	}

	assert_eq!(controller.priming_calls(), 1);
	assert_eq!(controller.api_calls().len(), 3);
}

#[tokio::test]
async fn primed_flag_is_per_instance() {
	let config = config().with_priming(PrimingPolicy::OncePerSession);
	let (student, student_ctl) = FakeTransport::builder().build_client(config.clone());
	let (admin, admin_ctl) = FakeTransport::builder().build_client(config);
	student_ctl.route_json(Method::POST, "/login", 204, json!(null));
	admin_ctl.route_json(Method::POST, "/admin/login", 204, json!(null));

	student.request(&RequestDescriptor::post("/login")).await.unwrap();
	admin.request(&RequestDescriptor::post("/admin/login")).await.unwrap();

	assert_eq!(student_ctl.priming_calls(), 1);
	assert_eq!(admin_ctl.priming_calls(), 1);
}

#[tokio::test]
async fn always_policy_primes_before_every_mutation() {
	let (client, controller) = strict_client();
	controller.route_json(Method::POST, "/api/enrollments", 201, json!({}));
	controller.route_json(Method::GET, "/api/my-courses", 200, json!({"items": []}));

	client.request(&RequestDescriptor::post("/api/enrollments")).await.unwrap();
	client.request(&RequestDescriptor::get("/api/my-courses")).await.unwrap();
	client.request(&RequestDescriptor::post("/api/enrollments")).await.unwrap();

	assert_eq!(
		controller.sent_lines(),
		vec![
			"GET /sanctum/csrf-cookie",
			"POST /api/enrollments",
			"GET /api/my-courses",
			"GET /sanctum/csrf-cookie",
			"POST /api/enrollments",
		]
	);
}

#[tokio::test]
async fn concurrent_requests_keep_independent_retry_state() {
	let (client, controller) = FakeTransport::builder().enforce_token().latency(Duration::from_millis(5)).build_client(config());
	controller.route_json(Method::POST, "/api/enrollments", 201, json!({}));
	controller.route_json(Method::GET, "/api/courses", 200, json!({"items": []}));

	let mut tasks = tokio::task::JoinSet::new();
	for i in 0..8 {
		let client = client.clone();
		tasks.spawn(async move {
			let desc = if i % 2 == 0 { RequestDescriptor::post("/api/enrollments") } else { RequestDescriptor::get("/api/courses") };
			client.request(&desc).await.map(|res| res.status)
		});
	}

	let mut statuses = Vec::new();
	while let Some(joined) = tasks.join_next().await {
		statuses.push(joined.unwrap().unwrap());
	}
	statuses.sort_unstable();
	assert_eq!(statuses, vec![200, 200, 200, 200, 201, 201, 201, 201]);
	assert_eq!(controller.priming_calls(), 4);
	assert_eq!(controller.issued_tokens(), 1);
}

#[tokio::test]
async fn abandoned_request_does_not_disturb_others() {
	let (client, controller) = FakeTransport::builder().enforce_token().latency(Duration::from_millis(50)).build_client(config());
	controller.route_json(Method::POST, "/api/enrollments", 201, json!({}));

	let abandoned = tokio::time::timeout(Duration::from_millis(10), client.request(&RequestDescriptor::post("/api/enrollments"))).await;
	assert!(abandoned.is_err());

	let res = client.request(&RequestDescriptor::post("/api/enrollments")).await.unwrap();
	assert_eq!(res.status, 201);
}
