//! Request descriptors and retry bookkeeping.
//!
//! A [`RequestDescriptor`] is built once by a facade and never mutated by the
//! client: header injection happens on a fresh
//! [`OutgoingRequest`](crate::OutgoingRequest) per attempt, and the retry state
//! lives in an [`Attempt`] value owned by the send loop.

use std::path::Path;

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// Returns `true` for methods with create/update/delete semantics.
pub fn is_mutating(method: &Method) -> bool {
	matches!(*method, Method::POST | Method::PUT | Method::PATCH | Method::DELETE)
}

/// One logical API call: method, path relative to the base URL, query, extra headers, body.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
	method: Method,
	path: String,
	query: Vec<(String, String)>,
	headers: Vec<(String, String)>,
	body: RequestBody,
}

impl RequestDescriptor {
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			query: Vec::new(),
			headers: Vec::new(),
			body: RequestBody::Empty,
		}
	}

	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::GET, path)
	}

	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::POST, path)
	}

	pub fn put(path: impl Into<String>) -> Self {
		Self::new(Method::PUT, path)
	}

	pub fn patch(path: impl Into<String>) -> Self {
		Self::new(Method::PATCH, path)
	}

	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::DELETE, path)
	}

	/// Appends query pairs.
	pub fn query<I, K, V>(mut self, pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.query.extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
		self
	}

	/// Adds an extra request header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));
		self
	}

	/// Sets a JSON body.
	pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
		self.body = RequestBody::Json(serde_json::to_value(body)?);
		Ok(self)
	}

	/// Sets a `multipart/form-data` body.
	pub fn multipart(mut self, form: Multipart) -> Self {
		self.body = RequestBody::Multipart(form);
		self
	}

	pub fn method(&self) -> &Method {
		&self.method
	}

	pub fn path(&self) -> &str {
		&self.path
	}

	pub fn query_pairs(&self) -> &[(String, String)] {
		&self.query
	}

	pub fn headers(&self) -> &[(String, String)] {
		&self.headers
	}

	pub fn body(&self) -> &RequestBody {
		&self.body
	}

	pub fn is_mutating(&self) -> bool {
		is_mutating(&self.method)
	}
}

/// Request payload. Cloneable so a rejected request can be resubmitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
	#[default]
	Empty,
	Json(Value),
	Multipart(Multipart),
}

/// Ordered `multipart/form-data` parts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Multipart {
	parts: Vec<FormPart>,
}

impl Multipart {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a text field.
	pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.parts.push(FormPart {
			name: name.into(),
			value: PartValue::Text(value.into()),
		});
		self
	}

	/// Appends a file field.
	pub fn file(mut self, name: impl Into<String>, file: FilePart) -> Self {
		self.parts.push(FormPart {
			name: name.into(),
			value: PartValue::File(file),
		});
		self
	}

	pub fn parts(&self) -> &[FormPart] {
		&self.parts
	}

	/// Value of the first text field named `name`.
	pub fn text_value(&self, name: &str) -> Option<&str> {
		self.parts.iter().find(|p| p.name == name).and_then(|p| match &p.value {
			PartValue::Text(v) => Some(v.as_str()),
			PartValue::File(_) => None,
		})
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormPart {
	pub name: String,
	pub value: PartValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PartValue {
	Text(String),
	File(FilePart),
}

/// An in-memory file upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
	pub file_name: String,
	pub mime: Option<String>,
	pub bytes: Vec<u8>,
}

impl FilePart {
	pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
		let file_name = file_name.into();
		let mime = guess_mime(&file_name).map(str::to_string);
		Self {
			file_name,
			mime,
			bytes: bytes.into(),
		}
	}

	/// Reads `path` into memory, naming the part after the file.
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let bytes = std::fs::read(path)?;
		let file_name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| "upload".to_string());
		Ok(Self::new(file_name, bytes))
	}

	pub fn mime(mut self, mime: impl Into<String>) -> Self {
		self.mime = Some(mime.into());
		self
	}
}

fn guess_mime(file_name: &str) -> Option<&'static str> {
	let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
	Some(match ext.as_str() {
		"csv" => "text/csv",
		"png" => "image/png",
		"jpg" | "jpeg" => "image/jpeg",
		"gif" => "image/gif",
		"webp" => "image/webp",
		"pdf" => "application/pdf",
		"txt" => "text/plain",
		_ => return None,
	})
}

/// Retry bookkeeping for one descriptor.
///
/// Starts at zero retries; [`Attempt::next`] yields the single allowed retry
/// and `None` afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
	retries: u8,
}

impl Attempt {
	/// Retries allowed per descriptor after an expiry signal.
	pub const MAX_RETRIES: u8 = 1;

	pub fn first() -> Self {
		Self { retries: 0 }
	}

	pub fn is_first(self) -> bool {
		self.retries == 0
	}

	pub fn retries(self) -> u8 {
		self.retries
	}

	/// The retry attempt, or `None` once the budget is spent.
	pub fn next(self) -> Option<Self> {
		(self.retries < Self::MAX_RETRIES).then_some(Self { retries: self.retries + 1 })
	}
}
