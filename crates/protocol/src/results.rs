//! Academic result types and grouping.

use serde::{Deserialize, Serialize};

/// One graded course.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
	#[serde(default)]
	pub code: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub grade: String,
	#[serde(default)]
	pub level: u32,
	#[serde(default)]
	pub semester: u32,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub academic_year: Option<String>,
}

/// `GET /api/results` payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsReport {
	#[serde(default)]
	pub items: Vec<ResultRow>,
	#[serde(default)]
	pub gpa: Option<f64>,
}

/// Results of one level/semester block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultGroup {
	pub level: u32,
	pub semester: u32,
	pub rows: Vec<ResultRow>,
}

impl ResultsReport {
	/// Groups rows by `(level, semester)`, ascending; rows keep their order.
	pub fn grouped(&self) -> Vec<ResultGroup> {
		let mut groups: Vec<ResultGroup> = Vec::new();
		for row in &self.items {
			match groups.iter_mut().find(|g| g.level == row.level && g.semester == row.semester) {
				Some(group) => group.rows.push(row.clone()),
				None => groups.push(ResultGroup {
					level: row.level,
					semester: row.semester,
					rows: vec![row.clone()],
				}),
			}
		}
		groups.sort_by_key(|g| (g.level, g.semester));
		groups
	}

	/// GPA rendered with two decimals, `None` when the backend has none yet.
	pub fn gpa_display(&self) -> Option<String> {
		self.gpa.map(|gpa| format!("{gpa:.2}"))
	}
}
