use clap::Subcommand;

use crate::cli::client::ApiClient;
use crate::cli::utils::{output_item, output_items, output_success};
use crate::cli::OutputFormat;
use crate::store::ItemCandidate;

#[derive(Subcommand)]
pub enum ItemCommands {
    #[command(about = "List all items")]
    List,

    #[command(about = "Show a single item")]
    Get {
        #[arg(help = "Item ID")]
        id: u64,
    },

    #[command(about = "Create an item")]
    Create {
        #[arg(long, help = "Item name (2-50 characters)")]
        name: String,
        #[arg(long, help = "Optional description")]
        description: Option<String>,
    },

    #[command(about = "Replace an item's name and description")]
    Update {
        #[arg(help = "Item ID")]
        id: u64,
        #[arg(long, help = "Item name (2-50 characters)")]
        name: String,
        #[arg(long, help = "Optional description")]
        description: Option<String>,
    },

    #[command(about = "Delete an item")]
    Delete {
        #[arg(help = "Item ID")]
        id: u64,
    },
}

pub async fn handle(cmd: ItemCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ItemCommands::List => {
            let items = client.get("/api/items").await?;
            output_items(output_format, &items)
        }
        ItemCommands::Get { id } => {
            let item = client.get(&format!("/api/items/{}", id)).await?;
            output_item(output_format, &item)
        }
        ItemCommands::Create { name, description } => {
            let item = client.post("/api/items", &ItemCandidate::new(name, description)).await?;
            output_item(output_format, &item)
        }
        ItemCommands::Update { id, name, description } => {
            let item = client
                .put(&format!("/api/items/{}", id), &ItemCandidate::new(name, description))
                .await?;
            output_item(output_format, &item)
        }
        ItemCommands::Delete { id } => {
            client.delete(&format!("/api/items/{}", id)).await?;
            output_success(output_format, &format!("Item {} deleted", id), None)
        }
    }
}
