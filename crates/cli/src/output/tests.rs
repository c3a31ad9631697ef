use serde_json::json;

use super::*;

#[test]
fn result_builder_success() {
	let result: CommandResult<serde_json::Value> = ResultBuilder::new("enrollments.list")
		.inputs(json!({"profile": "default"}))
		.data(json!([{"code": "IT1010"}]))
		.build();

	assert!(result.ok);
	assert_eq!(result.command, "enrollments.list");
	assert!(result.data.is_some());
	assert!(result.error.is_none());
	assert_eq!(result.schema_version, Some(SCHEMA_VERSION));
}

#[test]
fn result_builder_error() {
	let result: CommandResult<serde_json::Value> = ResultBuilder::new("enroll").error(ErrorCode::ValidationFailed, "Already enrolled").build();

	assert!(!result.ok);
	assert!(result.data.is_none());
	assert_eq!(result.error.as_ref().unwrap().code, ErrorCode::ValidationFailed);
}

#[test]
fn missing_data_is_not_ok() {
	let result: CommandResult<()> = ResultBuilder::new("logout").build();
	assert!(!result.ok);
}

#[test]
fn error_code_display_matches_serde() {
	for code in [ErrorCode::CredentialExpired, ErrorCode::NetworkError, ErrorCode::ValidationFailed] {
		let serialized = serde_json::to_value(code).unwrap();
		assert_eq!(serialized, json!(code.to_string()));
	}
	assert_eq!(ErrorCode::Unauthenticated.to_string(), "UNAUTHENTICATED");
}

#[test]
fn output_format_parse() {
	use clap::ValueEnum;

	assert_eq!(OutputFormat::from_str("json", false).unwrap(), OutputFormat::Json);
	assert_eq!(OutputFormat::from_str("NDJSON", true).unwrap(), OutputFormat::Ndjson);
	assert!(OutputFormat::from_str("yaml", true).is_err());
	assert_eq!(OutputFormat::default().to_string(), "toon");
}

#[test]
fn envelope_uses_camel_case() {
	let result: CommandResult<serde_json::Value> = ResultBuilder::new("me")
		.data(json!({"id": 1}))
		.config(EffectiveConfig {
			base_url: "http://localhost:8001".into(),
			profile: "default".into(),
			resumed: true,
		})
		.timings(Timings { duration_ms: 12 })
		.build();

	let value = serde_json::to_value(&result).unwrap();
	assert_eq!(value["schemaVersion"], 1);
	assert_eq!(value["config"]["baseUrl"], "http://localhost:8001");
	assert_eq!(value["timings"]["durationMs"], 12);
	assert!(value.get("error").is_none());
}

#[test]
fn text_rendering_lists_arrays_line_by_line() {
	let result: CommandResult<serde_json::Value> = ResultBuilder::new("courses.list")
		.data(json!(["IT1010  Intro to Programming", "SE3010  Software Engineering"]))
		.diagnostic(DiagnosticLevel::Warning, "saved session belongs to another backend")
		.build();

	let mut out = Vec::new();
	write_result_text(&mut out, &result).unwrap();
	let text = String::from_utf8(out).unwrap();

	assert_eq!(
		text,
		"IT1010  Intro to Programming\nSE3010  Software Engineering\n[warning] saved session belongs to another backend\n"
	);
}

#[test]
fn text_rendering_of_errors() {
	let mut result: CommandResult<serde_json::Value> = ResultBuilder::new("enroll").error(ErrorCode::NotFound, "Offering not found").build();
	result.error.as_mut().unwrap().details = Some(json!({"status": 404}));

	let mut out = Vec::new();
	write_result_text(&mut out, &result).unwrap();
	let text = String::from_utf8(out).unwrap();

	assert!(text.starts_with("Error [NOT_FOUND]: Offering not found\nDetails: {"));
}
