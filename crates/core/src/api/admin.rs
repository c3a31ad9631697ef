use std::collections::BTreeMap;

use edutrack_protocol::{
	ApiMessage, Course, CourseUpdate, Credentials, Data, EnrollmentCounts, ListQuery, NewCourse, Offering, OfferingInput, Paginated,
	PendingCount, ProfileUpdate, Registration, User, UserPayload,
};
use serde_json::Value;

use crate::error::Result;
use crate::request::{FilePart, Multipart, RequestDescriptor};
use crate::session::SessionClient;

/// Admin console endpoints.
///
/// The admin guard has its own session, so callers normally keep a dedicated
/// [`SessionClient`] for it.
#[derive(Debug, Clone, Copy)]
pub struct Admin<'a> {
	client: &'a SessionClient,
}

impl<'a> Admin<'a> {
	pub(crate) fn new(client: &'a SessionClient) -> Self {
		Self { client }
	}

	pub async fn login(&self, credentials: &Credentials) -> Result<Value> {
		let res = self.client.request(&RequestDescriptor::post("/admin/login").json(credentials)?).await?;
		self.client.prime_credential(true).await?;
		res.json()
	}

	pub async fn register(&self, registration: &Registration) -> Result<Value> {
		let res = self.client.request(&RequestDescriptor::post("/admin/register").json(registration)?).await?;
		self.client.prime_credential(true).await?;
		res.json()
	}

	/// The signed-in administrator.
	pub async fn me(&self) -> Result<User> {
		let payload: UserPayload = self.client.json(&RequestDescriptor::get("/api/admin/me")).await?;
		Ok(payload.into_user())
	}

	// users

	pub async fn list_users(&self, query: &ListQuery) -> Result<Paginated<User>> {
		self.client.json(&RequestDescriptor::get("/api/admin/users").query(query.to_pairs())).await
	}

	pub async fn get_user(&self, id: u64) -> Result<User> {
		let payload: UserPayload = self.client.json(&RequestDescriptor::get(format!("/api/admin/users/{id}"))).await?;
		Ok(payload.into_user())
	}

	pub async fn delete_user(&self, id: u64) -> Result<()> {
		self.client.send(&RequestDescriptor::delete(format!("/api/admin/users/{id}"))).await
	}

	// courses

	pub async fn list_courses(&self, query: &ListQuery) -> Result<Paginated<Course>> {
		self.client.json(&RequestDescriptor::get("/api/admin/courses").query(query.to_pairs())).await
	}

	pub async fn create_course(&self, course: &NewCourse) -> Result<Course> {
		let data: Data<Course> = self.client.json(&RequestDescriptor::post("/api/admin/courses").json(course)?).await?;
		Ok(data.into_inner())
	}

	pub async fn update_course(&self, id: u64, update: &CourseUpdate) -> Result<Course> {
		let desc = RequestDescriptor::put(format!("/api/admin/courses/{id}")).json(update)?;
		let data: Data<Course> = self.client.json(&desc).await?;
		Ok(data.into_inner())
	}

	/// Archives a course. Archived courses can be brought back with [`Admin::restore_course`].
	pub async fn remove_course(&self, id: u64) -> Result<()> {
		self.client.send(&RequestDescriptor::delete(format!("/api/admin/courses/{id}"))).await
	}

	pub async fn restore_course(&self, id: u64) -> Result<()> {
		self.client.send(&RequestDescriptor::post(format!("/api/admin/courses/{id}/restore"))).await
	}

	// offerings

	pub async fn list_offerings(&self, course_id: u64) -> Result<Vec<Offering>> {
		let desc = RequestDescriptor::get(format!("/api/admin/courses/{course_id}/offerings"));
		let data: Data<Vec<Offering>> = self.client.json(&desc).await?;
		Ok(data.into_inner())
	}

	pub async fn create_offering(&self, course_id: u64, offering: &OfferingInput) -> Result<Offering> {
		let desc = RequestDescriptor::post(format!("/api/admin/courses/{course_id}/offerings")).json(offering)?;
		let data: Data<Offering> = self.client.json(&desc).await?;
		Ok(data.into_inner())
	}

	pub async fn update_offering(&self, id: u64, offering: &OfferingInput) -> Result<Offering> {
		let desc = RequestDescriptor::put(format!("/api/admin/offerings/{id}")).json(offering)?;
		let data: Data<Offering> = self.client.json(&desc).await?;
		Ok(data.into_inner())
	}

	pub async fn remove_offering(&self, id: u64) -> Result<()> {
		self.client.send(&RequestDescriptor::delete(format!("/api/admin/offerings/{id}"))).await
	}

	// profile

	pub async fn profile(&self) -> Result<User> {
		let payload: UserPayload = self.client.json(&RequestDescriptor::get("/api/admin/profile")).await?;
		Ok(payload.into_user())
	}

	pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
		let payload: UserPayload = self.client.json(&RequestDescriptor::put("/api/admin/profile").json(update)?).await?;
		Ok(payload.into_user())
	}

	// results

	/// Uploads a results sheet (multipart field `file`) and returns the server's message.
	pub async fn upload_results(&self, sheet: FilePart) -> Result<ApiMessage> {
		let desc = RequestDescriptor::post("/api/admin/results/upload").multipart(Multipart::new().file("file", sheet));
		self.client.json(&desc).await
	}

	pub async fn pending_results(&self) -> Result<u64> {
		let pending: PendingCount = self.client.json(&RequestDescriptor::get("/api/admin/results/pending-count")).await?;
		Ok(pending.count)
	}

	/// Enrolled course count per user id.
	pub async fn enrollment_counts(&self) -> Result<BTreeMap<String, u64>> {
		let counts: EnrollmentCounts = self.client.json(&RequestDescriptor::get("/api/admin/enrollments/user-counts")).await?;
		Ok(counts.into_map())
	}
}
