use crate::actions::handlers::LABEL_ENTITY;
use crate::actions::{ActionRegistry, BotMessage, Tracker};
use crate::cli;
use crate::config::Settings;
use crate::github::client::GitHubClient;
use crate::output;
use crate::query::IssueQueryService;
use crate::server;
use anyhow::Context;
use std::sync::Arc;

/// Builds the registry serving every action against the configured repository.
pub fn build_registry(settings: &Settings) -> anyhow::Result<ActionRegistry<GitHubClient>> {
    let client = GitHubClient::new(&settings.api_base_url, settings.repository.clone())?;
    Ok(ActionRegistry::new(
        IssueQueryService::new(client),
        settings.project_name.clone(),
    ))
}

/// Executes the command named by `args`.
///
/// `settings` replaces the file/environment configuration when given.
pub async fn run(
    args: Vec<String>,
    mut stdout_additional: Option<&mut dyn std::io::Write>,
    settings: Option<Settings>,
) -> anyhow::Result<()> {
    match cli::parser::parse_args(&args) {
        cli::parser::Command::Help => {
            output::println(cli::parser::USAGE, &mut stdout_additional)?;
        }
        cli::parser::Command::Serve => {
            let settings = resolve_settings(settings)?;
            let registry = Arc::new(build_registry(&settings)?);
            let listener = tokio::net::TcpListener::bind(&settings.listen_address)
                .await
                .with_context(|| format!("Failed to bind {}", settings.listen_address))?;
            tracing::info!(
                repository = %settings.repository,
                api = %settings.api_base_url,
                "serving actions"
            );
            server::serve(listener, registry).await?;
        }
        cli::parser::Command::ListActions => {
            let settings = resolve_settings(settings)?;
            let registry = build_registry(&settings)?;
            for name in registry.names() {
                output::println(name, &mut stdout_additional)?;
            }
        }
        cli::parser::Command::RunAction { action, label } => {
            let settings = resolve_settings(settings)?;
            let registry = build_registry(&settings)?;
            let tracker = match &label {
                Some(label) => Tracker::with_entities(&[(LABEL_ENTITY, label.as_str())]),
                None => Tracker::default(),
            };
            let response = registry.run(&action, &tracker).await?;
            for message in &response.responses {
                let line = match message {
                    BotMessage::Text(text) => text.trim_end_matches('\n').to_string(),
                    BotMessage::Template(name) => format!("[template] {name}"),
                };
                output::println(&line, &mut stdout_additional)?;
            }
        }
        cli::parser::Command::Unknown(detail) => {
            output::println(
                &format!("Invalid command or arguments: {detail}. Use --help for usage."),
                &mut stdout_additional,
            )?;
        }
    }
    Ok(())
}

fn resolve_settings(settings: Option<Settings>) -> anyhow::Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => {
            let cwd = std::env::current_dir().context("Failed to get current directory")?;
            Settings::load(&cwd)
        }
    }
}
