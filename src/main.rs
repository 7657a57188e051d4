use clap::Parser;
use console::style;

mod app;
mod cli;
mod commands;
mod config;
mod core;
mod display;
mod input;
mod providers;
mod store;

use crate::app::Application;
use crate::cli::Args;
use crate::commands::create_command_registry;
use crate::config::Config;
use crate::core::error::ChatError;
use crate::providers::ollama::{DEFAULT_ENDPOINT, OllamaProvider};

async fn run(args: Args) -> Result<(), ChatError> {
    let config = Config::load()?;

    let endpoint = args
        .endpoint
        .clone()
        .or_else(|| config.endpoint.clone())
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
    let provider = Box::new(OllamaProvider::new(endpoint));

    let command_dispatcher = create_command_registry();

    let mut application = Application::new(args, config, provider, command_dispatcher)?;
    application.run().await
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("{} {}", style("Error:").bold().red(), e);
        std::process::exit(1);
    }
}
