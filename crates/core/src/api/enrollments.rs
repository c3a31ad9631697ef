use edutrack_protocol::{EnrolledCourse, EnrollmentRequest, Items};
use serde_json::Value;

use crate::error::Result;
use crate::request::RequestDescriptor;
use crate::session::SessionClient;

#[derive(Debug, Clone, Copy)]
pub struct Enrollments<'a> {
	client: &'a SessionClient,
}

impl<'a> Enrollments<'a> {
	pub(crate) fn new(client: &'a SessionClient) -> Self {
		Self { client }
	}

	/// Enrolls the current user in an offering.
	pub async fn create(&self, offering_id: u64) -> Result<Value> {
		let desc = RequestDescriptor::post("/api/enrollments").json(&EnrollmentRequest { offering_id })?;
		self.client.json(&desc).await
	}

	/// Courses the current user is enrolled in.
	pub async fn mine(&self) -> Result<Vec<EnrolledCourse>> {
		let items: Items<EnrolledCourse> = self.client.json(&RequestDescriptor::get("/api/my-courses")).await?;
		Ok(items.into_inner())
	}

	pub async fn remove(&self, enrollment_id: u64) -> Result<()> {
		self.client.send(&RequestDescriptor::delete(format!("/api/enrollments/{enrollment_id}"))).await
	}
}
