use edutrack::SessionClient;
use serde_json::json;

use super::{Outcome, read_upload};
use crate::cli::ProfileAction;
use crate::error::Result;

pub async fn execute(client: &SessionClient, action: ProfileAction) -> Result<Outcome> {
	match action {
		ProfileAction::Avatar { file } => {
			let image = read_upload(&file)?;
			let uploaded = client.profile().upload_avatar(image).await?;
			Ok(Outcome::from_serialize(&uploaded)?.inputs(json!({ "file": file })))
		}
	}
}
