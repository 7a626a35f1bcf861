use anyhow::Result;
use clap::Parser;
use tracing::Instrument;

use publishing_desk::cli::commands::{
    channels::ChannelsCommand,
    isbn::IsbnCommand,
    project::{ProjectCommand, ProjectCommandRunner},
    publish::PublishCommand,
    show_how_to_get_started,
    spine::SpineCommand,
    Command,
};
use publishing_desk::cli::{Cli, Commands, ProjectAction};
use publishing_desk::config::PublishingDeskConfig;
use publishing_desk::telemetry::{create_command_span, generate_correlation_id, init_telemetry};

fn command_name(command: &Option<Commands>) -> &'static str {
    match command {
        None => "help",
        Some(Commands::Isbn { .. }) => "isbn",
        Some(Commands::Channels) => "channels",
        Some(Commands::Spine { .. }) => "spine",
        Some(Commands::Project { .. }) => "project",
        Some(Commands::Publish { .. }) => "publish",
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    PublishingDeskConfig::load_env_file()?;
    let config = PublishingDeskConfig::load()?;
    init_telemetry(&config.observability)?;

    let span = create_command_span(command_name(&cli.command), &generate_correlation_id());

    tokio::runtime::Runtime::new()?.block_on(
        async move {
            match cli.command {
                None => show_how_to_get_started().await,
                Some(Commands::Isbn { value }) => IsbnCommand::new(value).execute().await,
                Some(Commands::Channels) => ChannelsCommand.execute().await,
                Some(Commands::Spine { pages, words, paper }) => {
                    SpineCommand {
                        pages,
                        words,
                        paper,
                        print: config.print.clone(),
                    }
                    .execute()
                    .await
                }
                Some(Commands::Project { action }) => {
                    let command = match action {
                        ProjectAction::New {
                            name,
                            chapters,
                            tags,
                        } => ProjectCommand::New {
                            name,
                            chapters,
                            tags,
                        },
                        ProjectAction::List => ProjectCommand::List,
                        ProjectAction::Show { id } => ProjectCommand::Show { id },
                        ProjectAction::Delete { id } => ProjectCommand::Delete { id },
                    };
                    ProjectCommandRunner { command, config }.execute().await
                }
                Some(Commands::Publish {
                    id,
                    channel,
                    isbn,
                    template,
                    covers,
                    author,
                    paper,
                }) => {
                    PublishCommand {
                        id,
                        channel,
                        isbn,
                        template,
                        covers,
                        author,
                        paper,
                        config,
                    }
                    .execute()
                    .await
                }
            }
        }
        .instrument(span),
    )
}
