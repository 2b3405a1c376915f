//! Stepwise CLI Application
//!
//! Command-line editor for workflow process definitions: drafts live in a
//! local JSON file and are submitted to the local store or a REST API.

mod args;
mod cli;
mod handler;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use handler::CommandHandler;
use log::info;
use renderer::TerminalRenderer;
use stepwise_core::{params::ListWorkflows, ClientBuilder};
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        api_url,
        no_color,
        command,
    } = Args::parse();

    let client = ClientBuilder::new()
        .with_database_path(database_file)
        .with_api_url(api_url)
        .build()
        .await
        .context("Failed to initialize workflow client")?;

    info!("Stepwise started against {}", client.backend_name());

    let handler = CommandHandler::new(client, TerminalRenderer::new(!no_color));
    match command {
        Some(Workflow { command }) => handler.handle_workflow_command(command).await,
        Some(Step { command }) => handler.handle_step_command(command).await,
        Some(Group { command }) => handler.handle_group_command(command).await,
        Some(Department { command }) => handler.handle_department_command(command).await,
        Some(Tag { command }) => handler.handle_tag_command(command),
        None => handler.list_workflows(&ListWorkflows::default()).await,
    }
}
