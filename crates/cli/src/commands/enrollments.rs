use edutrack::SessionClient;
use serde_json::json;

use super::Outcome;
use crate::cli::EnrollmentsAction;
use crate::error::Result;

pub async fn execute(client: &SessionClient, action: EnrollmentsAction) -> Result<Outcome> {
	match action {
		EnrollmentsAction::Add { offering_id } => {
			let created = client.enrollments().create(offering_id).await?;
			Ok(Outcome::new(created).inputs(json!({ "offeringId": offering_id })))
		}
		EnrollmentsAction::List => {
			let mine = client.enrollments().mine().await?;
			Outcome::from_serialize(&mine)
		}
		EnrollmentsAction::Remove { id } => {
			client.enrollments().remove(id).await?;
			Ok(Outcome::new(json!({ "removed": id })))
		}
	}
}
