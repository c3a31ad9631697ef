
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use edutrack_protocol::{ListQuery, SortDir};

use crate::output::OutputFormat;
use crate::session_store::DEFAULT_PROFILE;
use crate::styles::cli_styles;

/// Root CLI for the EduTrack API.
#[derive(Parser, Debug)]
#[command(name = "edutrack")]
#[command(about = "EduTrack command-line client: courses, enrollments, results and admin tools")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format: toon (default), json, ndjson, or text
	#[arg(short = 'f', long, global = true, value_enum, default_value = "toon")]
	pub format: OutputFormat,

	/// Backend base URL (defaults to $EDUTRACK_API_URL, then http://localhost:8001)
	#[arg(long, global = true, value_name = "URL")]
	pub base_url: Option<String>,

	/// Saved session to use; keep student and admin sessions in separate profiles
	#[arg(long, global = true, value_name = "NAME", default_value = DEFAULT_PROFILE)]
	pub profile: String,

	/// Directory holding saved sessions
	#[arg(long, global = true, value_name = "DIR")]
	pub session_dir: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Sign in and save the session cookies.
	Login(LoginArgs),
	/// Create an account and sign in.
	Register(RegisterArgs),
	/// Sign out and refresh the anti-forgery token.
	Logout,
	/// Show the signed-in user.
	Me,
	/// Fetch an anti-forgery token.
	Csrf {
		/// Fetch even when a token cookie is already stored
		#[arg(long)]
		force: bool,
	},
	/// Browse the course catalogue.
	#[command(subcommand)]
	Courses(CoursesAction),
	/// Manage your enrollments.
	#[command(subcommand)]
	Enrollments(EnrollmentsAction),
	/// Show your results and GPA.
	Results {
		/// Group rows by level and semester
		#[arg(long)]
		grouped: bool,
	},
	/// Manage your achievements.
	#[command(subcommand)]
	Achievements(AchievementsAction),
	/// Update your profile.
	#[command(subcommand)]
	Profile(ProfileAction),
	/// Administrator commands.
	#[command(subcommand)]
	Admin(AdminAction),
	/// Inspect or clear saved sessions.
	#[command(subcommand)]
	Session(SessionAction),
}

#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
	#[arg(long)]
	pub email: String,

	/// Password (falls back to $EDUTRACK_PASSWORD)
	#[arg(long)]
	pub password: Option<String>,

	/// Ask the server for a long-lived session
	#[arg(long)]
	pub remember: bool,

	/// Sign in through the administrator endpoint
	#[arg(long)]
	pub admin: bool,
}

#[derive(Args, Debug, Clone)]
pub struct RegisterArgs {
	#[arg(long)]
	pub name: String,

	#[arg(long)]
	pub email: String,

	/// Password (falls back to $EDUTRACK_PASSWORD)
	#[arg(long)]
	pub password: Option<String>,

	/// Student index number
	#[arg(long, value_name = "INDEX")]
	pub index_number: Option<String>,

	/// Register an administrator account
	#[arg(long)]
	pub admin: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CoursesAction {
	/// List courses, optionally filtered.
	List {
		/// Server-side level filter
		#[arg(long)]
		level: Option<u32>,
		/// Case-insensitive match on title or code
		#[arg(long, short = 'q')]
		search: Option<String>,
	},
	/// Show the content of a course offering.
	Content {
		#[arg(value_name = "OFFERING_ID")]
		offering_id: u64,
	},
}

#[derive(Subcommand, Debug, Clone)]
pub enum EnrollmentsAction {
	/// Enroll in a course offering.
	Add {
		#[arg(value_name = "OFFERING_ID")]
		offering_id: u64,
	},
	/// List your enrolled courses.
	List,
	/// Drop an enrollment.
	Remove {
		#[arg(value_name = "ENROLLMENT_ID")]
		id: u64,
	},
}

#[derive(Subcommand, Debug, Clone)]
pub enum AchievementsAction {
	/// List your achievements.
	List,
	/// Add an achievement with optional attachments.
	Add {
		#[arg(long)]
		title: String,
		#[arg(long)]
		desc: Option<String>,
		#[arg(long)]
		link: Option<String>,
		/// Date in YYYY-MM-DD form
		#[arg(long)]
		date: Option<String>,
		/// Attachment to upload (repeatable)
		#[arg(long = "file", value_name = "PATH")]
		files: Vec<PathBuf>,
	},
	/// Delete an achievement.
	Remove {
		#[arg(value_name = "ID")]
		id: u64,
	},
}

#[derive(Subcommand, Debug, Clone)]
pub enum ProfileAction {
	/// Upload a new avatar image.
	Avatar {
		#[arg(value_name = "FILE")]
		file: PathBuf,
	},
}

#[derive(Subcommand, Debug, Clone)]
pub enum AdminAction {
	/// Show the signed-in administrator.
	Me,
	/// Manage users.
	#[command(subcommand)]
	Users(AdminUsersAction),
	/// Manage courses.
	#[command(subcommand)]
	Courses(AdminCoursesAction),
	/// Manage course offerings.
	#[command(subcommand)]
	Offerings(AdminOfferingsAction),
	/// Show or update the administrator profile.
	#[command(subcommand)]
	Profile(AdminProfileAction),
	/// Upload or inspect results.
	#[command(subcommand)]
	Results(AdminResultsAction),
	/// Enrollment counts per user.
	EnrollmentCounts,
}

#[derive(Subcommand, Debug, Clone)]
pub enum AdminUsersAction {
	List(ListArgs),
	Show {
		#[arg(value_name = "ID")]
		id: u64,
	},
	Delete {
		#[arg(value_name = "ID")]
		id: u64,
	},
}

#[derive(Subcommand, Debug, Clone)]
pub enum AdminCoursesAction {
	List(ListArgs),
	Create {
		#[arg(long)]
		title: String,
		#[arg(long)]
		code: String,
		#[arg(long)]
		credits: Option<u32>,
		#[arg(long)]
		year: Option<u32>,
		#[arg(long)]
		semester: Option<u32>,
	},
	Update {
		#[arg(value_name = "ID")]
		id: u64,
		#[arg(long)]
		title: Option<String>,
		#[arg(long)]
		credits: Option<u32>,
	},
	/// Archive (soft-delete) a course.
	Archive {
		#[arg(value_name = "ID")]
		id: u64,
	},
	/// Restore an archived course.
	Restore {
		#[arg(value_name = "ID")]
		id: u64,
	},
}

#[derive(Subcommand, Debug, Clone)]
pub enum AdminOfferingsAction {
	List {
		#[arg(value_name = "COURSE_ID")]
		course_id: u64,
	},
	Create {
		#[arg(value_name = "COURSE_ID")]
		course_id: u64,
		#[command(flatten)]
		offering: OfferingArgs,
	},
	Update {
		#[arg(value_name = "OFFERING_ID")]
		id: u64,
		#[command(flatten)]
		offering: OfferingArgs,
	},
	Delete {
		#[arg(value_name = "OFFERING_ID")]
		id: u64,
	},
}

#[derive(Args, Debug, Clone, Default)]
pub struct OfferingArgs {
	/// Offering type (for example: core, elective)
	#[arg(long = "type", value_name = "TYPE")]
	pub kind: Option<String>,
	#[arg(long)]
	pub pathway: Option<String>,
	#[arg(long)]
	pub year: Option<u32>,
	#[arg(long)]
	pub semester: Option<u32>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum AdminProfileAction {
	Show,
	Update {
		#[arg(long)]
		name: Option<String>,
		#[arg(long)]
		email: Option<String>,
	},
}

#[derive(Subcommand, Debug, Clone)]
pub enum AdminResultsAction {
	/// Upload a results spreadsheet (CSV).
	Upload {
		#[arg(value_name = "FILE")]
		file: PathBuf,
	},
	/// Number of results awaiting publication.
	Pending,
}

#[derive(Subcommand, Debug, Clone)]
pub enum SessionAction {
	/// Show what the selected profile holds (cookie names only).
	Show,
	/// List saved profiles.
	List,
	/// Forget the selected profile's cookies.
	Clear,
}

/// Paging and sorting for admin lists.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
	#[arg(long, short = 'q')]
	pub search: Option<String>,
	#[arg(long)]
	pub page: Option<u32>,
	#[arg(long)]
	pub per_page: Option<u32>,
	/// Column to sort by
	#[arg(long)]
	pub sort: Option<String>,
	/// Sort descending
	#[arg(long, requires = "sort")]
	pub desc: bool,
}

impl ListArgs {
	pub fn to_query(&self) -> ListQuery {
		let mut query = ListQuery::new();
		if let Some(q) = &self.search {
			query = query.search(q.clone());
		}
		if let Some(page) = self.page {
			query = query.page(page);
		}
		if let Some(per_page) = self.per_page {
			query = query.per_page(per_page);
		}
		if let Some(sort) = &self.sort {
			let dir = if self.desc { SortDir::Desc } else { SortDir::Asc };
			query = query.sort(sort.clone(), dir);
		}
		query
	}
}

impl Commands {
	/// Dotted command name used in the output envelope.
	pub fn name(&self) -> &'static str {
		match self {
			Commands::Login(_) => "login",
			Commands::Register(_) => "register",
			Commands::Logout => "logout",
			Commands::Me => "me",
			Commands::Csrf { .. } => "csrf",
			Commands::Courses(CoursesAction::List { .. }) => "courses.list",
			Commands::Courses(CoursesAction::Content { .. }) => "courses.content",
			Commands::Enrollments(EnrollmentsAction::Add { .. }) => "enrollments.add",
			Commands::Enrollments(EnrollmentsAction::List) => "enrollments.list",
			Commands::Enrollments(EnrollmentsAction::Remove { .. }) => "enrollments.remove",
			Commands::Results { .. } => "results",
			Commands::Achievements(AchievementsAction::List) => "achievements.list",
			Commands::Achievements(AchievementsAction::Add { .. }) => "achievements.add",
			Commands::Achievements(AchievementsAction::Remove { .. }) => "achievements.remove",
			Commands::Profile(ProfileAction::Avatar { .. }) => "profile.avatar",
			Commands::Admin(action) => action.name(),
			Commands::Session(SessionAction::Show) => "session.show",
			Commands::Session(SessionAction::List) => "session.list",
			Commands::Session(SessionAction::Clear) => "session.clear",
		}
	}
}

impl AdminAction {
	pub fn name(&self) -> &'static str {
		match self {
			AdminAction::Me => "admin.me",
			AdminAction::Users(AdminUsersAction::List(_)) => "admin.users.list",
			AdminAction::Users(AdminUsersAction::Show { .. }) => "admin.users.show",
			AdminAction::Users(AdminUsersAction::Delete { .. }) => "admin.users.delete",
			AdminAction::Courses(AdminCoursesAction::List(_)) => "admin.courses.list",
			AdminAction::Courses(AdminCoursesAction::Create { .. }) => "admin.courses.create",
			AdminAction::Courses(AdminCoursesAction::Update { .. }) => "admin.courses.update",
			AdminAction::Courses(AdminCoursesAction::Archive { .. }) => "admin.courses.archive",
			AdminAction::Courses(AdminCoursesAction::Restore { .. }) => "admin.courses.restore",
			AdminAction::Offerings(AdminOfferingsAction::List { .. }) => "admin.offerings.list",
			AdminAction::Offerings(AdminOfferingsAction::Create { .. }) => "admin.offerings.create",
			AdminAction::Offerings(AdminOfferingsAction::Update { .. }) => "admin.offerings.update",
			AdminAction::Offerings(AdminOfferingsAction::Delete { .. }) => "admin.offerings.delete",
			AdminAction::Profile(AdminProfileAction::Show) => "admin.profile.show",
			AdminAction::Profile(AdminProfileAction::Update { .. }) => "admin.profile.update",
			AdminAction::Results(AdminResultsAction::Upload { .. }) => "admin.results.upload",
			AdminAction::Results(AdminResultsAction::Pending) => "admin.results.pending",
			AdminAction::EnrollmentCounts => "admin.enrollment-counts",
		}
	}
}
