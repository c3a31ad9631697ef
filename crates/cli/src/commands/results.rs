use edutrack::SessionClient;
use serde_json::json;

use super::Outcome;
use crate::error::Result;

/// Results with the GPA formatted the way the results page shows it.
pub async fn execute(client: &SessionClient, grouped: bool) -> Result<Outcome> {
	let report = client.results().list().await?;
	let gpa = report.gpa_display();

	let data = if grouped {
		json!({ "gpa": gpa, "groups": report.grouped() })
	} else {
		json!({ "gpa": gpa, "items": report.items })
	};
	Ok(Outcome::new(data).inputs(json!({ "grouped": grouped })))
}

#[cfg(test)]
mod tests {
	use edutrack::Method;
	use serde_json::json;

	use super::*;
	use crate::commands::testing;

	#[tokio::test]
	async fn grouped_results_carry_formatted_gpa() {
		let (client, controller) = testing::client();
		controller.route_json(
			Method::GET,
			"/api/results",
			200,
			json!({"gpa": 3.666, "items": [
				{"code": "IT2010", "grade": "A", "level": 2, "semester": 1},
				{"code": "IT1010", "grade": "B+", "level": 1, "semester": 1},
			]}),
		);

		let outcome = execute(&client, true).await.unwrap();

		assert_eq!(outcome.data["gpa"], "3.67");
		assert_eq!(outcome.data["groups"][0]["level"], 1);
		assert_eq!(outcome.data["groups"][1]["rows"][0]["code"], "IT2010");
	}

	#[tokio::test]
	async fn missing_gpa_is_null() {
		let (client, controller) = testing::client();
		controller.route_json(Method::GET, "/api/results", 200, json!({"items": []}));

		let outcome = execute(&client, false).await.unwrap();

		assert!(outcome.data["gpa"].is_null());
		assert_eq!(outcome.data["items"], json!([]));
	}
}
