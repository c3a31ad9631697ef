//! The session client: cookie-authenticated requests with anti-forgery priming
//! and a one-shot retry on token expiry.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::{ClientConfig, PrimingPolicy};
use crate::credential::{CookieJar, CredentialStore};
use crate::error::{Error, Result};
use crate::request::{Attempt, RequestDescriptor};
use crate::response::Response;
use crate::transport::{HttpTransport, OutgoingRequest, Transport};

const ACCEPT: (&str, &str) = ("Accept", "application/json");
const REQUESTED_WITH: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

/// Cookie-session HTTP client.
///
/// Cheap to clone; clones share the transport, the credential store and the
/// "primed" flag. Independent instances (for example a student client and an
/// admin client) share nothing unless built over the same [`CookieJar`].
#[derive(Clone)]
pub struct SessionClient {
	inner: Arc<Inner>,
}

struct Inner {
	config: ClientConfig,
	transport: Arc<dyn Transport>,
	credentials: Arc<dyn CredentialStore>,
	jar: Option<Arc<CookieJar>>,
	primed: AtomicBool,
}

impl std::fmt::Debug for SessionClient {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SessionClient")
			.field("base_url", &self.inner.config.base_url())
			.field("priming", &self.inner.config.priming())
			.field("primed", &self.inner.primed.load(Ordering::Relaxed))
			.finish_non_exhaustive()
	}
}

impl SessionClient {
	/// Creates a client with a fresh cookie jar and the `reqwest` transport.
	pub fn new(config: ClientConfig) -> Result<Self> {
		let jar = Arc::new(CookieJar::for_config(&config)?);
		Self::with_cookie_jar(config, jar)
	}

	/// Creates a client over an existing cookie jar, e.g. one restored from disk.
	pub fn with_cookie_jar(config: ClientConfig, jar: Arc<CookieJar>) -> Result<Self> {
		let transport = HttpTransport::new(&config, &jar)?;
		let credentials: Arc<dyn CredentialStore> = jar.clone();
		Ok(Self::assemble(config, Arc::new(transport), credentials, Some(jar)))
	}

	/// Assembles a client from an arbitrary transport and credential store.
	pub fn from_parts(config: ClientConfig, transport: Arc<dyn Transport>, credentials: Arc<dyn CredentialStore>) -> Self {
		Self::assemble(config, transport, credentials, None)
	}

	fn assemble(
		config: ClientConfig,
		transport: Arc<dyn Transport>,
		credentials: Arc<dyn CredentialStore>,
		jar: Option<Arc<CookieJar>>,
	) -> Self {
		Self {
			inner: Arc::new(Inner {
				config,
				transport,
				credentials,
				jar,
				primed: AtomicBool::new(false),
			}),
		}
	}

	pub fn config(&self) -> &ClientConfig {
		&self.inner.config
	}

	/// The cookie jar, when the client was built over one.
	pub fn cookie_jar(&self) -> Option<&Arc<CookieJar>> {
		self.inner.jar.as_ref()
	}

	/// Returns `true` when a token cookie is currently present.
	pub fn has_token(&self) -> bool {
		self.inner.credentials.has_token()
	}

	/// Fetches a fresh anti-forgery token.
	///
	/// Without `force`, returns immediately when a token cookie already exists.
	/// Concurrent calls are not deduplicated; the issuing endpoint is idempotent.
	pub async fn prime_credential(&self, force: bool) -> Result<()> {
		if !force && self.inner.credentials.has_token() {
			debug!(target: "edutrack.session", "token present, skipping priming");
			return Ok(());
		}

		let config = &self.inner.config;
		let mut request = OutgoingRequest::new(Method::GET, config.endpoint(config.csrf_path())?);
		self.apply_headers(&mut request, &[]);

		debug!(target: "edutrack.session", force, "priming anti-forgery token");
		let url = request.url.to_string();
		let res = self.inner.transport.send(request).await?;
		if !res.is_success() {
			return Err(Error::HttpStatus {
				code: res.status,
				method: Method::GET,
				url,
				body: res.text(),
			});
		}
		self.inner.primed.store(true, Ordering::Release);
		Ok(())
	}

	/// Sends `descriptor`, priming first when it mutates server state.
	///
	/// An expiry answer triggers one re-prime and resubmission; a second
	/// expiry is returned as [`Error::CredentialExpiry`].
	pub async fn request(&self, descriptor: &RequestDescriptor) -> Result<Response> {
		self.ensure_primed(descriptor).await?;

		let expiry = self.inner.config.expiry_status();
		let mut attempt = Attempt::first();
		loop {
			let request = self.prepare(descriptor)?;
			let url = request.url.to_string();
			let res = self.inner.transport.send(request).await?;

			if res.is_success() {
				return Ok(res);
			}
			if res.status != expiry {
				return Err(Error::HttpStatus {
					code: res.status,
					method: descriptor.method().clone(),
					url,
					body: res.text(),
				});
			}

			match attempt.next() {
				Some(next) => {
					warn!(
						target: "edutrack.session",
						method = %descriptor.method(),
						%url,
						status = res.status,
						"anti-forgery token rejected, re-priming and retrying once"
					);
					self.prime_credential(true).await?;
					attempt = next;
				}
				None => {
					return Err(Error::CredentialExpiry {
						code: res.status,
						method: descriptor.method().clone(),
						url,
						body: res.text(),
					});
				}
			}
		}
	}

	/// Sends `descriptor` and decodes the JSON body.
	pub async fn json<T: DeserializeOwned>(&self, descriptor: &RequestDescriptor) -> Result<T> {
		self.request(descriptor).await?.json()
	}

	/// Sends `descriptor`, discarding the body.
	pub async fn send(&self, descriptor: &RequestDescriptor) -> Result<()> {
		self.request(descriptor).await.map(drop)
	}

	async fn ensure_primed(&self, descriptor: &RequestDescriptor) -> Result<()> {
		if !descriptor.is_mutating() {
			return Ok(());
		}
		match self.inner.config.priming() {
			PrimingPolicy::Always => self.prime_credential(true).await,
			PrimingPolicy::OncePerSession => {
				if self.inner.primed.load(Ordering::Acquire) {
					return Ok(());
				}
				self.prime_credential(false).await?;
				self.inner.primed.store(true, Ordering::Release);
				Ok(())
			}
		}
	}

	/// Builds the wire request for one attempt. The token is read here, so a
	/// retry picks up the cookie set by the re-prime.
	fn prepare(&self, descriptor: &RequestDescriptor) -> Result<OutgoingRequest> {
		let mut url = self.inner.config.endpoint(descriptor.path())?;
		if !descriptor.query_pairs().is_empty() {
			url.query_pairs_mut().extend_pairs(descriptor.query_pairs());
		}
		let mut request = OutgoingRequest::new(descriptor.method().clone(), url);
		request.body = descriptor.body().clone();
		self.apply_headers(&mut request, descriptor.headers());
		Ok(request)
	}

	fn apply_headers(&self, request: &mut OutgoingRequest, extra: &[(String, String)]) {
		request.set_header(ACCEPT.0, ACCEPT.1);
		request.set_header(REQUESTED_WITH.0, REQUESTED_WITH.1);
		for (name, value) in extra {
			request.set_header(name.clone(), value.clone());
		}
		if let Some(token) = self.inner.credentials.read_token() {
			request.set_header(self.inner.config.header_name(), token);
		}
	}
}
