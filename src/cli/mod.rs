//! CLI entry point for Zyra.

pub mod auth;
pub mod chat;

use clap::{Parser, Subcommand};
use uuid::Uuid;

/// Zyra CLI
#[derive(Parser, Debug)]
#[command(name = "zyra", version, about = "Zyra — CLI based AI tool")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Login via the OAuth device flow
    Login(LoginArgs),
    /// Logout and clear stored credentials
    Logout,
    /// Show the current authenticated user
    Whoami(WhoamiArgs),
    /// Chat with the AI model
    Chat(ChatArgs),
}

/// Arguments for `zyra login`.
#[derive(Parser, Debug)]
pub struct LoginArgs {
    /// The auth server URL
    #[arg(long)]
    pub server_url: Option<String>,

    /// The OAuth client ID
    #[arg(long)]
    pub client_id: Option<String>,
}

/// Arguments for `zyra whoami`.
#[derive(Parser, Debug)]
pub struct WhoamiArgs {
    /// The auth server URL
    #[arg(long)]
    pub server_url: Option<String>,
}

/// Arguments for `zyra chat`.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Model to use
    #[arg(short, long)]
    pub model: Option<String>,

    /// Resume an existing conversation by id
    #[arg(short, long)]
    pub conversation: Option<Uuid>,

    /// One-shot prompt; omit for an interactive session
    pub prompt: Option<String>,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
