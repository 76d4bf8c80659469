pub mod client;
pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::auth::BasicCredentials;
use client::{ApiClient, ClientAuth};

#[derive(Parser)]
#[command(name = "item-cli")]
#[command(about = "Command-line client for the Item API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format (default is human-readable text)")]
    pub json: bool,

    #[arg(
        long,
        global = true,
        env = "ITEM_API_URL",
        default_value = "http://127.0.0.1:3000",
        help = "Server base URL"
    )]
    pub server: String,

    #[arg(long, global = true, env = "ITEM_API_USER", help = "Username for basic auth")]
    pub user: Option<String>,

    #[arg(long, global = true, env = "ITEM_API_PASSWORD", help = "Password for basic auth")]
    pub password: Option<String>,

    #[arg(long, global = true, env = "ITEM_API_TOKEN", help = "Bearer token (takes precedence over --user)")]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Item CRUD operations")]
    Items {
        #[command(subcommand)]
        cmd: commands::items::ItemCommands,
    },

    #[command(about = "Server information and health")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },

    #[command(about = "Token acquisition")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

impl Cli {
    pub fn client_auth(&self) -> ClientAuth {
        if let Some(token) = &self.token {
            return ClientAuth::Bearer(token.clone());
        }
        self.basic_auth()
    }

    /// `--user`/`--password` only, ignoring `--token`
    pub fn basic_auth(&self) -> ClientAuth {
        match (&self.user, &self.password) {
            (Some(username), password) => ClientAuth::Basic(BasicCredentials {
                username: username.clone(),
                password: password.clone().unwrap_or_default(),
            }),
            (None, _) => ClientAuth::None,
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let client = ApiClient::new(&cli.server, cli.client_auth())?;
    let credentials = cli.basic_auth();

    match cli.command {
        Commands::Items { cmd } => commands::items::handle(cmd, &client, output_format).await,
        Commands::Server { cmd } => commands::server::handle(cmd, &client, output_format).await,
        Commands::Auth { cmd } => commands::auth::handle(cmd, &client, &credentials, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_item_create() {
        let cli = Cli::try_parse_from([
            "item-cli", "--json", "--server", "http://localhost:4000", "items", "create", "--name", "Laptop",
        ])
        .unwrap();
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));
        assert_eq!(cli.server, "http://localhost:4000");
        assert!(matches!(cli.command, Commands::Items { .. }));
    }

    #[test]
    fn output_defaults_to_text() {
        let cli = Cli::try_parse_from(["item-cli", "server", "health"]).unwrap();
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Text));
        assert!(Cli::try_parse_from(["item-cli", "--text", "server", "health"]).is_err());
    }

    #[test]
    fn token_takes_precedence_over_basic() {
        let cli = Cli::try_parse_from([
            "item-cli", "--user", "user", "--password", "pw", "--token", "abc", "items", "list",
        ])
        .unwrap();
        assert!(matches!(cli.client_auth(), ClientAuth::Bearer(t) if t == "abc"));
    }

    #[test]
    fn user_without_token_uses_basic() {
        let cli = Cli::try_parse_from(["item-cli", "--user", "user", "items", "list"]).unwrap();
        match cli.client_auth() {
            ClientAuth::Basic(creds) => {
                assert_eq!(creds.username, "user");
                assert_eq!(creds.password, "");
            }
            other => panic!("expected basic auth, got {:?}", other),
        }
    }
}
