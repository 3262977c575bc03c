//! code-ownership CLI entry point.

use anyhow::Result;
use clap::Parser;

use code_ownership::cli::{commands, handle_error, Cli, Commands};
use code_ownership::infrastructure::config::ConfigLoader;
use code_ownership::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(err) = run(cli).await {
        handle_error(err, json);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = ConfigLoader::load_with(cli.config.as_deref())?;
    let _logger = LoggerImpl::init(&LogConfig::try_from(&config.logging)?)?;

    match cli.command {
        Commands::ForFile(args) => commands::for_file::execute(args, &config, cli.json).await,
        Commands::Watch(args) => commands::watch::execute(args, &config, cli.json).await,
    }
}
