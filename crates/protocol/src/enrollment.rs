//! Enrollment types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body for `POST /api/enrollments`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRequest {
	pub offering_id: u64,
}

/// A row of `GET /api/my-courses`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrolledCourse {
	pub enrollment_id: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub offering_id: Option<u64>,
	#[serde(default)]
	pub code: String,
	#[serde(default)]
	pub title: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub credits: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub year: Option<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub semester: Option<u32>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}
