use edutrack_protocol::{Achievement, NewAchievement};
use serde_json::Value;

use crate::error::Result;
use crate::request::{FilePart, Multipart, RequestDescriptor};
use crate::session::SessionClient;

/// Portfolio achievements of the current user.
#[derive(Debug, Clone, Copy)]
pub struct Achievements<'a> {
	client: &'a SessionClient,
}

impl<'a> Achievements<'a> {
	pub(crate) fn new(client: &'a SessionClient) -> Self {
		Self { client }
	}

	pub async fn list(&self) -> Result<Vec<Achievement>> {
		self.client.json(&RequestDescriptor::get("/api/achievements")).await
	}

	/// Creates an achievement; attachments are sent as `files[0]`, `files[1]`, ...
	pub async fn create(&self, achievement: &NewAchievement, files: Vec<FilePart>) -> Result<Value> {
		let desc = RequestDescriptor::post("/api/achievements").multipart(achievement_form(achievement, files));
		self.client.json(&desc).await
	}

	pub async fn remove(&self, id: u64) -> Result<()> {
		self.client.send(&RequestDescriptor::delete(format!("/api/achievements/{id}"))).await
	}
}

fn achievement_form(achievement: &NewAchievement, files: Vec<FilePart>) -> Multipart {
	let form = achievement.form_fields().into_iter().fold(Multipart::new(), |form, (name, value)| form.text(name, value));
	files.into_iter().enumerate().fold(form, |form, (i, file)| form.file(format!("files[{i}]"), file))
}
