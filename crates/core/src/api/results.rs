use edutrack_protocol::ResultsReport;

use crate::error::Result;
use crate::request::RequestDescriptor;
use crate::session::SessionClient;

#[derive(Debug, Clone, Copy)]
pub struct Results<'a> {
	client: &'a SessionClient,
}

impl<'a> Results<'a> {
	pub(crate) fn new(client: &'a SessionClient) -> Self {
		Self { client }
	}

	/// Graded results and GPA of the current user.
	pub async fn list(&self) -> Result<ResultsReport> {
		self.client.json(&RequestDescriptor::get("/api/results")).await
	}
}
