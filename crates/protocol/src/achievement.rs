//! Achievement (portfolio) types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored achievement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
	pub id: u64,
	#[serde(default)]
	pub title: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub desc: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub link: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub date: Option<String>,
	/// Public URLs of uploaded attachments
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub files: Vec<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub created_at: Option<String>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// Text fields of a new achievement; attachments travel as multipart parts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAchievement {
	pub title: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub desc: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub link: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub date: Option<String>,
}

impl NewAchievement {
	pub fn new(title: impl Into<String>) -> Self {
		Self {
			title: title.into(),
			..Default::default()
		}
	}

	pub fn desc(mut self, desc: impl Into<String>) -> Self {
		self.desc = Some(desc.into());
		self
	}

	pub fn link(mut self, link: impl Into<String>) -> Self {
		self.link = Some(link.into());
		self
	}

	pub fn date(mut self, date: impl Into<String>) -> Self {
		self.date = Some(date.into());
		self
	}

	/// Non-empty text fields in form order.
	pub fn form_fields(&self) -> Vec<(&'static str, String)> {
		let mut fields = vec![("title", self.title.clone())];
		let optional = [("desc", &self.desc), ("link", &self.link), ("date", &self.date)];
		for (name, value) in optional {
			if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
				fields.push((name, value.to_string()));
			}
		}
		fields
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn form_fields_skip_missing_values() {
		let new = NewAchievement::new("Hackathon winner").link("https://example.org").desc("");
		assert_eq!(
			new.form_fields(),
			vec![("title", "Hackathon winner".to_string()), ("link", "https://example.org".to_string())]
		);
	}
}
