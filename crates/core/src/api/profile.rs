use edutrack_protocol::AvatarUpload;

use crate::error::Result;
use crate::request::{FilePart, Multipart, RequestDescriptor};
use crate::session::SessionClient;

#[derive(Debug, Clone, Copy)]
pub struct Profile<'a> {
	client: &'a SessionClient,
}

impl<'a> Profile<'a> {
	pub(crate) fn new(client: &'a SessionClient) -> Self {
		Self { client }
	}

	/// Uploads a new avatar image as multipart field `avatar`.
	pub async fn upload_avatar(&self, image: FilePart) -> Result<AvatarUpload> {
		let form = Multipart::new().file("avatar", image);
		self.client.json(&RequestDescriptor::post("/api/me/avatar").multipart(form)).await
	}
}
