use edutrack_protocol::{Course, CourseQuery, Items};
use serde_json::Value;

use crate::error::Result;
use crate::request::RequestDescriptor;
use crate::session::SessionClient;

/// Student course catalog.
#[derive(Debug, Clone, Copy)]
pub struct Courses<'a> {
	client: &'a SessionClient,
}

impl<'a> Courses<'a> {
	pub(crate) fn new(client: &'a SessionClient) -> Self {
		Self { client }
	}

	/// Catalog, optionally filtered by level on the server.
	pub async fn list(&self, query: &CourseQuery) -> Result<Vec<Course>> {
		let desc = RequestDescriptor::get("/api/courses").query(query.to_pairs());
		let items: Items<Course> = self.client.json(&desc).await?;
		Ok(items.into_inner())
	}

	/// Content and syllabus for a module offering. The shape is course-specific.
	pub async fn content(&self, offering_id: u64) -> Result<Value> {
		self.client.json(&RequestDescriptor::get(format!("/api/courses/{offering_id}/content"))).await
	}
}
