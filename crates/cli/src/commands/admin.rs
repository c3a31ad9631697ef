use edutrack::SessionClient;
use edutrack_protocol::{CourseUpdate, NewCourse, OfferingInput, ProfileUpdate};
use serde_json::json;

use super::{Outcome, read_upload};
use crate::cli::{
	AdminAction, AdminCoursesAction, AdminOfferingsAction, AdminProfileAction, AdminResultsAction, AdminUsersAction, OfferingArgs,
};
use crate::error::{CliError, Result};
use crate::output::DiagnosticLevel;

pub async fn execute(client: &SessionClient, action: AdminAction) -> Result<Outcome> {
	match action {
		AdminAction::Me => Outcome::from_serialize(&client.admin().me().await?),
		AdminAction::Users(action) => users(client, action).await,
		AdminAction::Courses(action) => courses(client, action).await,
		AdminAction::Offerings(action) => offerings(client, action).await,
		AdminAction::Profile(action) => profile(client, action).await,
		AdminAction::Results(action) => results(client, action).await,
		AdminAction::EnrollmentCounts => Outcome::from_serialize(&client.admin().enrollment_counts().await?),
	}
}

async fn users(client: &SessionClient, action: AdminUsersAction) -> Result<Outcome> {
	match action {
		AdminUsersAction::List(args) => {
			let page = client.admin().list_users(&args.to_query()).await?;
			let mut outcome = Outcome::from_serialize(&page)?;
			if let Some(next) = page.next_page() {
				outcome = outcome.diagnostic(DiagnosticLevel::Info, format!("more users available: --page {next}"));
			}
			Ok(outcome)
		}
		AdminUsersAction::Show { id } => Outcome::from_serialize(&client.admin().get_user(id).await?),
		AdminUsersAction::Delete { id } => {
			client.admin().delete_user(id).await?;
			Ok(Outcome::new(json!({ "deleted": id })))
		}
	}
}

async fn courses(client: &SessionClient, action: AdminCoursesAction) -> Result<Outcome> {
	match action {
		AdminCoursesAction::List(args) => {
			let page = client.admin().list_courses(&args.to_query()).await?;
			let mut outcome = Outcome::from_serialize(&page)?;
			if let Some(next) = page.next_page() {
				outcome = outcome.diagnostic(DiagnosticLevel::Info, format!("more courses available: --page {next}"));
			}
			Ok(outcome)
		}
		AdminCoursesAction::Create {
			title,
			code,
			credits,
			year,
			semester,
		} => {
			let course = NewCourse {
				title,
				code,
				credits,
				year,
				semester,
			};
			Outcome::from_serialize(&client.admin().create_course(&course).await?)
		}
		AdminCoursesAction::Update { id, title, credits } => {
			if title.is_none() && credits.is_none() {
				return Err(CliError::InvalidInput("nothing to update: pass --title and/or --credits".into()));
			}
			let update = CourseUpdate { title, credits };
			Outcome::from_serialize(&client.admin().update_course(id, &update).await?)
		}
		AdminCoursesAction::Archive { id } => {
			client.admin().remove_course(id).await?;
			Ok(Outcome::new(json!({ "archived": id })))
		}
		AdminCoursesAction::Restore { id } => {
			client.admin().restore_course(id).await?;
			Ok(Outcome::new(json!({ "restored": id })))
		}
	}
}

fn offering_input(args: OfferingArgs) -> OfferingInput {
	OfferingInput {
		kind: args.kind,
		pathway: args.pathway,
		year: args.year,
		semester: args.semester,
	}
}

async fn offerings(client: &SessionClient, action: AdminOfferingsAction) -> Result<Outcome> {
	match action {
		AdminOfferingsAction::List { course_id } => {
			let list = client.admin().list_offerings(course_id).await?;
			Ok(Outcome::from_serialize(&list)?.inputs(json!({ "courseId": course_id })))
		}
		AdminOfferingsAction::Create { course_id, offering } => {
			let created = client.admin().create_offering(course_id, &offering_input(offering)).await?;
			Outcome::from_serialize(&created)
		}
		AdminOfferingsAction::Update { id, offering } => {
			let updated = client.admin().update_offering(id, &offering_input(offering)).await?;
			Outcome::from_serialize(&updated)
		}
		AdminOfferingsAction::Delete { id } => {
			client.admin().remove_offering(id).await?;
			Ok(Outcome::new(json!({ "deleted": id })))
		}
	}
}

async fn profile(client: &SessionClient, action: AdminProfileAction) -> Result<Outcome> {
	match action {
		AdminProfileAction::Show => Outcome::from_serialize(&client.admin().profile().await?),
		AdminProfileAction::Update { name, email } => {
			let update = ProfileUpdate::new(name.as_deref(), email.as_deref());
			if update == ProfileUpdate::default() {
				return Err(CliError::InvalidInput("nothing to update: pass --name and/or --email".into()));
			}
			Outcome::from_serialize(&client.admin().update_profile(&update).await?)
		}
	}
}

async fn results(client: &SessionClient, action: AdminResultsAction) -> Result<Outcome> {
	match action {
		AdminResultsAction::Upload { file } => {
			let sheet = read_upload(&file)?;
			let message = client.admin().upload_results(sheet).await?;
			Ok(Outcome::from_serialize(&message)?.inputs(json!({ "file": file })))
		}
		AdminResultsAction::Pending => {
			let count = client.admin().pending_results().await?;
			Ok(Outcome::new(json!({ "pending": count })))
		}
	}
}
