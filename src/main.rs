//! Zyra CLI binary entry point.

use clap::Parser;
use zyra::cli::{Cli, Commands};
use zyra::config::ZyraConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = ZyraConfig::from_env();

    let result = match cli.command {
        Commands::Login(args) => {
            let mut config = config;
            if let Some(url) = args.server_url {
                config = config.with_server_url(url);
            }
            if let Some(id) = args.client_id {
                config = config.with_client_id(id);
            }
            zyra::cli::auth::handle_login(&config).await
        }
        Commands::Logout => zyra::cli::auth::handle_logout(&config),
        Commands::Whoami(args) => {
            let mut config = config;
            if let Some(url) = args.server_url {
                config = config.with_server_url(url);
            }
            zyra::cli::auth::handle_whoami(&config).await
        }
        Commands::Chat(args) => zyra::cli::chat::handle_chat(&config, args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
