//! Course catalog and offering types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A catalog course.
///
/// Student listings carry `year`/`semester` directly; admin listings carry
/// them per offering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Course {
	pub id: u64,
	#[serde(default)]
	pub code: String,
	#[serde(default)]
	pub title: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub credits: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub level: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub year: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub semester: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub status: Option<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub offerings: Vec<Offering>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl Course {
	/// Case-insensitive search on title or code. A blank query matches everything.
	pub fn matches(&self, query: &str) -> bool {
		let q = query.trim().to_lowercase();
		if q.is_empty() {
			return true;
		}
		self.title.to_lowercase().contains(&q) || self.code.to_lowercase().contains(&q)
	}

	/// Distinct years this course runs in: its own `year`, else those of its offerings.
	pub fn years(&self) -> Vec<u32> {
		match self.year {
			Some(year) => vec![year],
			None => self.offerings.iter().filter_map(|o| o.year).collect::<BTreeSet<_>>().into_iter().collect(),
		}
	}

	/// Distinct semesters: its own `semester`, else those of its offerings.
	pub fn semesters(&self) -> Vec<u32> {
		match self.semester {
			Some(semester) => vec![semester],
			None => self.offerings.iter().filter_map(|o| o.semester).collect::<BTreeSet<_>>().into_iter().collect(),
		}
	}
}

/// Filters `courses` with [`Course::matches`].
pub fn search_courses<'a>(courses: &'a [Course], query: &str) -> Vec<&'a Course> {
	courses.iter().filter(|c| c.matches(query)).collect()
}

/// A scheduled run of a course (module offering).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Offering {
	pub id: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub course_id: Option<u64>,
	/// Offering type code, for example `CT`
	#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pathway: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub year: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub semester: Option<u32>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// Query for `GET /api/courses`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseQuery {
	/// Server-side level filter
	pub level: Option<u32>,
}

impl CourseQuery {
	pub fn level(level: u32) -> Self {
		Self { level: Some(level) }
	}

	pub fn to_pairs(&self) -> Vec<(String, String)> {
		self.level.map(|l| vec![("level".to_string(), l.to_string())]).unwrap_or_default()
	}
}

/// Body for creating a course.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCourse {
	pub title: String,
	pub code: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub credits: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub year: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub semester: Option<u32>,
}

/// Body for updating a course.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseUpdate {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub credits: Option<u32>,
}

/// Body for creating or patching an offering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferingInput {
	#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pathway: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub year: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub semester: Option<u32>,
}
