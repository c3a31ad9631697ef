//! Admin dashboard payloads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// `GET /api/admin/results/pending-count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCount {
	#[serde(default)]
	pub count: u64,
}

/// Per-user enrollment counts keyed by user id.
///
/// The endpoint answers either `{ "data": { "12": 3 } }` or the bare map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnrollmentCounts {
	Data { data: BTreeMap<String, u64> },
	Bare(BTreeMap<String, u64>),
}

impl EnrollmentCounts {
	pub fn into_map(self) -> BTreeMap<String, u64> {
		match self {
			EnrollmentCounts::Data { data } | EnrollmentCounts::Bare(data) => data,
		}
	}
}
