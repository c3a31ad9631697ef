//! In-memory Sanctum-like backend for tests.
//!
//! [`FakeTransport`] implements [`Transport`] without touching the network.
//! It issues anti-forgery tokens on the priming path (writing the raw cookie
//! into a shared [`MemoryCredentialStore`]), optionally validates the token
//! header of mutating requests, answers scripted responses and records every
//! request it sees. Tests drive and inspect it through the paired
//! [`FakeTransportController`].
//!
//! ```ignore
//! let (client, controller) = FakeTransport::builder().enforce_token().build_client(config);
//! controller.respond_json(Method::POST, "/api/enrollments", 201, json!({"id": 1}));
//! client.enrollments().create(4).await?;
//! assert_eq!(controller.priming_calls(), 1);
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Method;
use serde_json::{Value, json};

use super::{OutgoingRequest, Transport};
use crate::config::{ClientConfig, DEFAULT_CSRF_PATH, DEFAULT_EXPIRY_STATUS, DEFAULT_XSRF_HEADER};
use crate::credential::{CredentialStore, MemoryCredentialStore};
use crate::error::{Error, Result};
use crate::request::{RequestBody, is_mutating};
use crate::response::Response;
use crate::session::SessionClient;

/// A request as the fake backend saw it.
#[derive(Debug, Clone)]
pub struct SentRequest {
	pub method: Method,
	pub path: String,
	pub query: Vec<(String, String)>,
	pub headers: Vec<(String, String)>,
	/// Value of the anti-forgery header, if sent.
	pub header_token: Option<String>,
	/// Decoded token cookie at send time.
	pub cookie_token: Option<String>,
	pub body: RequestBody,
}

impl SentRequest {
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
	}

	/// `"METHOD /path"`, convenient for asserting call sequences.
	pub fn line(&self) -> String {
		format!("{} {}", self.method, self.path)
	}

	pub fn json(&self) -> Option<&Value> {
		match &self.body {
			RequestBody::Json(value) => Some(value),
			_ => None,
		}
	}
}

#[derive(Debug, Clone)]
struct Scripted {
	status: u16,
	body: Vec<u8>,
}

#[derive(Debug, Clone)]
enum Reply {
	Respond(Scripted),
	NetworkError(String),
}

#[derive(Debug)]
struct FakeState {
	csrf_path: String,
	header_name: String,
	expiry_status: u16,
	enforce_token: bool,
	latency: Option<Duration>,
	credentials: Arc<MemoryCredentialStore>,
	issued: u64,
	server_token: Option<String>,
	queued: HashMap<(Method, String), VecDeque<Reply>>,
	routes: HashMap<(Method, String), Scripted>,
	forced_expiry: usize,
	sent: Vec<SentRequest>,
}

impl FakeState {
	/// Sets the token cookie. Like Sanctum, the token belongs to the session:
	/// repeated priming re-sends the same token until the session rotates.
	fn issue_token(&mut self, url: String) -> Response {
		let token = match &self.server_token {
			Some(token) => token.clone(),
			None => {
				self.issued += 1;
				let token = format!("token={}", self.issued);
				self.server_token = Some(token.clone());
				token
			}
		};
		self.credentials.set_raw(Some(urlencoding::encode(&token).into_owned()));
		Response::new(204, url, Vec::new())
	}

	fn handle(&mut self, request: &OutgoingRequest) -> Result<Response> {
		let path = request.url.path().to_string();
		let header_token = request.header(&self.header_name).map(str::to_string);
		self.sent.push(SentRequest {
			method: request.method.clone(),
			path: path.clone(),
			query: request.url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect(),
			headers: request.headers.clone(),
			header_token: header_token.clone(),
			cookie_token: self.credentials.read_token(),
			body: request.body.clone(),
		});

		let key = (request.method.clone(), path.clone());
		let queued = self.queued.get_mut(&key).and_then(VecDeque::pop_front);
		if let Some(Reply::NetworkError(message)) = &queued {
			return Err(Error::Network {
				method: request.method.clone(),
				url: request.url.to_string(),
				message: message.clone(),
			});
		}

		let url = request.url.to_string();
		if request.method == Method::GET && path == self.csrf_path {
			return Ok(match queued {
				Some(Reply::Respond(s)) => Response::new(s.status, url, s.body),
				_ => self.issue_token(url),
			});
		}

		if is_mutating(&request.method) {
			if self.forced_expiry > 0 {
				self.forced_expiry -= 1;
				self.server_token = None;
				return Ok(self.expired(url));
			}
			if self.enforce_token && (header_token.is_none() || header_token != self.server_token) {
				return Ok(self.expired(url));
			}
		}

		let scripted = match queued {
			Some(Reply::Respond(s)) => s,
			_ => match self.routes.get(&key) {
				Some(s) => s.clone(),
				None => Scripted {
					status: 404,
					body: br#"{"message":"Not Found"}"#.to_vec(),
				},
			},
		};
		Ok(Response::new(scripted.status, url, scripted.body))
	}

	fn expired(&self, url: String) -> Response {
		Response::new(self.expiry_status, url, br#"{"message":"CSRF token mismatch."}"#.to_vec())
	}
}

/// Builder for a [`FakeTransport`] / [`FakeTransportController`] pair.
#[derive(Debug)]
pub struct FakeTransportBuilder {
	csrf_path: String,
	header_name: String,
	expiry_status: u16,
	enforce_token: bool,
	latency: Option<Duration>,
	credentials: Option<Arc<MemoryCredentialStore>>,
}

impl Default for FakeTransportBuilder {
	fn default() -> Self {
		Self {
			csrf_path: DEFAULT_CSRF_PATH.to_string(),
			header_name: DEFAULT_XSRF_HEADER.to_string(),
			expiry_status: DEFAULT_EXPIRY_STATUS,
			enforce_token: false,
			latency: None,
			credentials: None,
		}
	}
}

impl FakeTransportBuilder {
	/// Answer mutating requests whose header does not match the issued token with the expiry status.
	pub fn enforce_token(mut self) -> Self {
		self.enforce_token = true;
		self
	}

	/// Sleep before answering each request.
	pub fn latency(mut self, latency: Duration) -> Self {
		self.latency = Some(latency);
		self
	}

	/// Start with a raw token cookie already present.
	///
	/// The backend does not know the token, so with [`enforce_token`](Self::enforce_token) it is stale.
	pub fn with_cookie(mut self, raw: impl Into<String>) -> Self {
		self.credentials = Some(Arc::new(MemoryCredentialStore::with_raw(raw)));
		self
	}

	/// Mirror non-default settings of `config`.
	pub fn for_config(mut self, config: &ClientConfig) -> Self {
		self.csrf_path = config.csrf_path().to_string();
		self.header_name = config.header_name().to_string();
		self.expiry_status = config.expiry_status();
		self
	}

	pub fn build(self) -> (FakeTransport, FakeTransportController) {
		let state = Arc::new(Mutex::new(FakeState {
			csrf_path: self.csrf_path,
			header_name: self.header_name,
			expiry_status: self.expiry_status,
			enforce_token: self.enforce_token,
			latency: self.latency,
			credentials: self.credentials.unwrap_or_default(),
			issued: 0,
			server_token: None,
			queued: HashMap::new(),
			routes: HashMap::new(),
			forced_expiry: 0,
			sent: Vec::new(),
		}));
		(
			FakeTransport {
				state: Arc::clone(&state),
			},
			FakeTransportController { state },
		)
	}

	/// Builds the pair and a [`SessionClient`] wired to it.
	pub fn build_client(self, config: ClientConfig) -> (SessionClient, FakeTransportController) {
		let (transport, controller) = self.for_config(&config).build();
		let client = SessionClient::from_parts(config, Arc::new(transport), controller.credentials());
		(client, controller)
	}
}

/// The [`Transport`] half handed to the client.
#[derive(Debug, Clone)]
pub struct FakeTransport {
	state: Arc<Mutex<FakeState>>,
}

impl FakeTransport {
	pub fn builder() -> FakeTransportBuilder {
		FakeTransportBuilder::default()
	}

	fn handle(&self, request: &OutgoingRequest) -> Result<Response> {
		self.state.lock().handle(request)
	}
}

#[async_trait]
impl Transport for FakeTransport {
	async fn send(&self, request: OutgoingRequest) -> Result<Response> {
		let latency = self.state.lock().latency;
		if let Some(latency) = latency {
			tokio::time::sleep(latency).await;
		}
		self.handle(&request)
	}
}

/// Test-side handle: scripts responses and inspects captured requests.
#[derive(Debug, Clone)]
pub struct FakeTransportController {
	state: Arc<Mutex<FakeState>>,
}

impl FakeTransportController {
	/// The credential store the fake writes issued tokens into.
	pub fn credentials(&self) -> Arc<MemoryCredentialStore> {
		Arc::clone(&self.state.lock().credentials)
	}

	/// Queues a one-shot response for `method path`.
	pub fn respond(&self, method: Method, path: &str, status: u16, body: impl Into<Vec<u8>>) {
		let reply = Reply::Respond(Scripted {
			status,
			body: body.into(),
		});
		self.state.lock().queued.entry((method, path.to_string())).or_default().push_back(reply);
	}

	/// Queues a one-shot JSON response.
	pub fn respond_json(&self, method: Method, path: &str, status: u16, body: Value) {
		self.respond(method, path, status, body.to_string());
	}

	/// Sets the response used whenever nothing is queued for `method path`.
	pub fn route_json(&self, method: Method, path: &str, status: u16, body: Value) {
		let scripted = Scripted {
			status,
			body: body.to_string().into_bytes(),
		};
		self.state.lock().routes.insert((method, path.to_string()), scripted);
	}

	/// Makes the next request to `method path` fail without a response.
	pub fn fail_next(&self, method: Method, path: &str, message: &str) {
		let reply = Reply::NetworkError(message.to_string());
		self.state.lock().queued.entry((method, path.to_string())).or_default().push_back(reply);
	}

	/// Expires the session on the next `count` mutating requests: each is
	/// answered with the expiry status regardless of its token, and the next
	/// priming call issues a new token.
	pub fn expire_next(&self, count: usize) {
		self.state.lock().forced_expiry += count;
	}

	/// Forgets the issued token server-side, as if the session had rotated.
	pub fn rotate_session(&self) {
		self.state.lock().server_token = None;
	}

	/// Overwrites the client's token cookie with a raw value the backend never issued.
	pub fn set_stale_cookie(&self, raw: &str) {
		self.state.lock().credentials.set_raw(Some(raw.to_string()));
	}

	/// Removes the client's token cookie.
	pub fn clear_cookie(&self) {
		self.state.lock().credentials.set_raw(None);
	}

	/// Every request seen so far, priming calls included.
	pub fn sent(&self) -> Vec<SentRequest> {
		self.state.lock().sent.clone()
	}

	/// `"METHOD /path"` for every captured request.
	pub fn sent_lines(&self) -> Vec<String> {
		self.state.lock().sent.iter().map(SentRequest::line).collect()
	}

	/// Captured requests other than priming calls.
	pub fn api_calls(&self) -> Vec<SentRequest> {
		let state = self.state.lock();
		state.sent.iter().filter(|r| r.path != state.csrf_path).cloned().collect()
	}

	/// Number of requests to the priming path.
	pub fn priming_calls(&self) -> usize {
		let state = self.state.lock();
		state.sent.iter().filter(|r| r.method == Method::GET && r.path == state.csrf_path).count()
	}

	/// Number of distinct tokens issued so far.
	pub fn issued_tokens(&self) -> u64 {
		self.state.lock().issued
	}

	/// Decoded token the backend currently accepts.
	pub fn server_token(&self) -> Option<String> {
		self.state.lock().server_token.clone()
	}
}

/// JSON body for a Laravel validation failure.
pub fn validation_error(field: &str, message: &str) -> Value {
	json!({
		"message": message,
		"errors": { field: [message] },
	})
}
