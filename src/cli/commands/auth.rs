use anyhow::anyhow;
use clap::Subcommand;
use serde_json::json;

use crate::cli::client::{ApiClient, ClientAuth};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Exchange --user/--password for a bearer token")]
    Token,
}

pub async fn handle(
    cmd: AuthCommands,
    client: &ApiClient,
    credentials: &ClientAuth,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Token => {
            let ClientAuth::Basic(creds) = credentials else {
                return Err(anyhow!("auth token requires --user and --password"));
            };

            let data = client
                .post("/auth/token", &json!({ "username": creds.username, "password": creds.password }))
                .await?;

            match output_format {
                OutputFormat::Json => output_success(output_format, "Token issued", Some(data)),
                OutputFormat::Text => {
                    // Bare token so it can be captured with $(item-cli auth token)
                    println!("{}", data.get("token").and_then(|t| t.as_str()).unwrap_or_default());
                    Ok(())
                }
            }
        }
    }
}
