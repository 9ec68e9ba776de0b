//! Docent CLI entry point.

use clap::Parser;

use docent::cli::{commands, handle_error, Cli, Commands};
use docent::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match commands::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    let _logger = match LogConfig::try_from(&config.logging).and_then(|c| LoggerImpl::init(&c)) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Status => commands::status::execute(&config, cli.json).await,
        Commands::Models => commands::models::execute(&config, cli.json).await,
        Commands::Ask {
            question,
            document,
            general,
        } => commands::ask::execute(&config, question, document, general, cli.json).await,
        Commands::Chat { document } => commands::chat::execute(&config, document, cli.json).await,
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
