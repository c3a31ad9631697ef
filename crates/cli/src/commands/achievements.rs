use edutrack::SessionClient;
use edutrack_protocol::NewAchievement;
use serde_json::json;

use super::{Outcome, read_upload};
use crate::cli::AchievementsAction;
use crate::error::Result;

pub async fn execute(client: &SessionClient, action: AchievementsAction) -> Result<Outcome> {
	match action {
		AchievementsAction::List => {
			let list = client.achievements().list().await?;
			Outcome::from_serialize(&list)
		}
		AchievementsAction::Add {
			title,
			desc,
			link,
			date,
			files,
		} => {
			let mut achievement = NewAchievement::new(title);
			if let Some(desc) = desc {
				achievement = achievement.desc(desc);
			}
			if let Some(link) = link {
				achievement = achievement.link(link);
			}
			if let Some(date) = date {
				achievement = achievement.date(date);
			}
			// read everything before the first request so a bad path sends nothing
			let uploads = files.iter().map(|path| read_upload(path)).collect::<Result<Vec<_>>>()?;

			let created = client.achievements().create(&achievement, uploads).await?;
			Ok(Outcome::new(created).inputs(json!({
				"title": achievement.title,
				"files": files,
			})))
		}
		AchievementsAction::Remove { id } => {
			client.achievements().remove(id).await?;
			Ok(Outcome::new(json!({ "removed": id })))
		}
	}
}
