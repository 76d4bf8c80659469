use clap::Subcommand;

use crate::cli::client::ApiClient;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Check server health status from API /health endpoint")]
    Health,

    #[command(about = "Show server information from API root endpoint")]
    Info,
}

pub async fn handle(cmd: ServerCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let (path, data) = match cmd {
        ServerCommands::Health => ("/health", client.get("/health").await?),
        ServerCommands::Info => ("/", client.get("/").await?),
    };

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&data)?),
        OutputFormat::Text => {
            println!("{}{}", client.url("/")?.as_str().trim_end_matches('/'), path);
            if let Some(fields) = data.as_object() {
                for (key, value) in fields {
                    match value.as_str() {
                        Some(s) => println!("  {}: {}", key, s),
                        None => println!("  {}: {}", key, value),
                    }
                }
            }
        }
    }
    Ok(())
}
