//! Response envelopes shared by most endpoints.
//!
//! The backend wraps payloads in one of three shapes:
//!
//! * `{ "items": [...] }` for student-facing lists ([`Items`])
//! * `{ "data": ... }` for single admin resources ([`Data`])
//! * Laravel length-aware pagination for admin lists ([`Paginated`])

use serde::{Deserialize, Serialize};

/// `{ "items": [...] }` list envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Items<T> {
	#[serde(default = "Vec::new")]
	pub items: Vec<T>,
}

impl<T> Default for Items<T> {
	fn default() -> Self {
		Self { items: Vec::new() }
	}
}

impl<T> Items<T> {
	pub fn into_inner(self) -> Vec<T> {
		self.items
	}
}

/// `{ "data": ... }` resource envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Data<T> {
	pub data: T,
}

impl<T> Data<T> {
	pub fn into_inner(self) -> T {
		self.data
	}
}

/// Length-aware paginated list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
	#[serde(default = "Vec::new")]
	pub data: Vec<T>,
	#[serde(default = "first_page")]
	pub current_page: u32,
	#[serde(default = "first_page")]
	pub last_page: u32,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub per_page: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub total: Option<u64>,
}

fn first_page() -> u32 {
	1
}

impl<T> Paginated<T> {
	/// Returns `true` when pages after the current one exist.
	pub fn has_more(&self) -> bool {
		self.current_page < self.last_page
	}

	/// Page number to request next, if any.
	pub fn next_page(&self) -> Option<u32> {
		self.has_more().then(|| self.current_page + 1)
	}
}

/// Sort direction accepted by admin list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
	#[default]
	Asc,
	Desc,
}

impl SortDir {
	pub fn as_str(self) -> &'static str {
		match self {
			SortDir::Asc => "asc",
			SortDir::Desc => "desc",
		}
	}
}

/// Query parameters shared by paginated admin lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
	pub q: Option<String>,
	pub page: Option<u32>,
	pub per_page: Option<u32>,
	pub sort: Option<String>,
	pub dir: Option<SortDir>,
}

impl ListQuery {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn search(mut self, q: impl Into<String>) -> Self {
		self.q = Some(q.into());
		self
	}

	pub fn page(mut self, page: u32) -> Self {
		self.page = Some(page);
		self
	}

	pub fn per_page(mut self, per_page: u32) -> Self {
		self.per_page = Some(per_page);
		self
	}

	pub fn sort(mut self, key: impl Into<String>, dir: SortDir) -> Self {
		self.sort = Some(key.into());
		self.dir = Some(dir);
		self
	}

	/// Renders the query as URL pairs, skipping unset and blank values.
	pub fn to_pairs(&self) -> Vec<(String, String)> {
		let mut pairs = Vec::new();
		if let Some(q) = self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
			pairs.push(("q".to_string(), q.to_string()));
		}
		if let Some(page) = self.page {
			pairs.push(("page".to_string(), page.to_string()));
		}
		if let Some(per_page) = self.per_page {
			pairs.push(("per_page".to_string(), per_page.to_string()));
		}
		if let Some(sort) = &self.sort {
			pairs.push(("sort".to_string(), sort.clone()));
		}
		if let Some(dir) = self.dir {
			pairs.push(("dir".to_string(), dir.as_str().to_string()));
		}
		pairs
	}
}
