use clap::Parser;
use edutrack_cli::cli::Cli;
use edutrack_cli::error::CliError;
use edutrack_cli::output::{self, OutputFormat, ResultBuilder};
use edutrack_cli::{commands, logging};

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let format = cli.format;
	let command = cli.command.name();

	if let Err(err) = commands::dispatch(cli).await {
		handle_error(command, err, format);
		std::process::exit(1);
	}
}

fn handle_error(command: &'static str, err: CliError, format: OutputFormat) {
	let cmd_error = err.to_command_error();

	// humans read stderr
	output::print_error_stderr(&cmd_error);

	// agents read the envelope on stdout
	if format != OutputFormat::Text {
		let result: output::CommandResult<()> = ResultBuilder::new(command).error_from(cmd_error).build();
		output::print_result(&result, format);
	}
}
