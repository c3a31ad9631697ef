use edutrack::SessionClient;
use edutrack_protocol::{CourseQuery, search_courses};
use serde_json::json;

use super::Outcome;
use crate::cli::CoursesAction;
use crate::error::Result;

pub async fn execute(client: &SessionClient, action: CoursesAction) -> Result<Outcome> {
	match action {
		CoursesAction::List { level, search } => {
			let query = CourseQuery { level };
			let courses = client.courses().list(&query).await?;
			// the catalogue endpoint has no text search; filter locally like the course page does
			let matched = match search.as_deref() {
				Some(q) => search_courses(&courses, q),
				None => courses.iter().collect(),
			};
			Ok(Outcome::from_serialize(&matched)?.inputs(json!({ "level": level, "search": search })))
		}
		CoursesAction::Content { offering_id } => {
			let content = client.courses().content(offering_id).await?;
			Ok(Outcome::new(content).inputs(json!({ "offeringId": offering_id })))
		}
	}
}

#[cfg(test)]
mod tests {
	use edutrack::Method;
	use serde_json::json;

	use super::*;
	use crate::commands::testing;

	#[tokio::test]
	async fn search_filters_locally_after_level_query() {
		let (client, controller) = testing::client();
		controller.route_json(
			Method::GET,
			"/api/courses",
			200,
			json!({"items": [
				{"id": 1, "code": "SE3010", "title": "Software Engineering"},
				{"id": 2, "code": "IT3020", "title": "Databases"},
			]}),
		);

		let outcome = execute(
			&client,
			CoursesAction::List {
				level: Some(3),
				search: Some("software".into()),
			},
		)
		.await
		.unwrap();

		let courses = outcome.data.as_array().unwrap();
		assert_eq!(courses.len(), 1);
		assert_eq!(courses[0]["code"], "SE3010");
		let calls = controller.api_calls();
		assert_eq!(calls[0].query, vec![("level".to_string(), "3".to_string())]);
	}
}
