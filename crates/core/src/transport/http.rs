use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use super::{OutgoingRequest, Transport};
use crate::config::ClientConfig;
use crate::credential::CookieJar;
use crate::error::{Error, Result};
use crate::request::{Multipart, PartValue, RequestBody};
use crate::response::Response;

/// `reqwest`-backed transport sharing a [`CookieJar`] with the credential store.
#[derive(Debug, Clone)]
pub struct HttpTransport {
	client: reqwest::Client,
}

impl HttpTransport {
	/// Builds a client that stores cookies in `jar` and applies the configured timeout.
	pub fn new(config: &ClientConfig, jar: &CookieJar) -> Result<Self> {
		let client = reqwest::Client::builder()
			.cookie_provider(jar.provider())
			.timeout(config.timeout())
			.build()
			.map_err(|e| Error::Client(e.to_string()))?;
		Ok(Self { client })
	}
}

#[async_trait]
impl Transport for HttpTransport {
	async fn send(&self, request: OutgoingRequest) -> Result<Response> {
		let OutgoingRequest { method, url, headers, body } = request;
		let url_str = url.to_string();

		let mut builder = self.client.request(method.clone(), url);
		for (name, value) in &headers {
			builder = builder.header(name.as_str(), value.as_str());
		}
		builder = match body {
			RequestBody::Empty => builder,
			RequestBody::Json(value) => builder.json(&value),
			RequestBody::Multipart(form) => builder.multipart(to_form(form)?),
		};
		let built = builder.build().map_err(|e| Error::InvalidRequest(e.to_string()))?;

		debug!(target: "edutrack.http", %method, url = %url_str, "sending request");
		let network = |e: reqwest::Error| Error::Network {
			method: method.clone(),
			url: url_str.clone(),
			message: describe(&e),
		};

		let res = self.client.execute(built).await.map_err(network)?;
		let status = res.status().as_u16();
		let final_url = res.url().to_string();
		let body = res.bytes().await.map_err(network)?;
		debug!(target: "edutrack.http", %method, url = %url_str, status, bytes = body.len(), "response received");

		Ok(Response::new(status, final_url, body.to_vec()))
	}
}

fn to_form(multipart: Multipart) -> Result<Form> {
	let mut form = Form::new();
	for part in multipart.parts() {
		form = match &part.value {
			PartValue::Text(text) => form.text(part.name.clone(), text.clone()),
			PartValue::File(file) => {
				let mut body = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
				if let Some(mime) = &file.mime {
					body = body.mime_str(mime).map_err(|e| Error::InvalidRequest(format!("{}: {e}", file.file_name)))?;
				}
				form.part(part.name.clone(), body)
			}
		};
	}
	Ok(form)
}

fn describe(err: &reqwest::Error) -> String {
	if err.is_timeout() {
		format!("timed out: {err}")
	} else if err.is_connect() {
		format!("connection failed: {err}")
	} else {
		err.to_string()
	}
}
