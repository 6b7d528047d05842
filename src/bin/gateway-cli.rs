use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Command-line client for the omni gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080", env = "GATEWAY_URL")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Liveness check
    Health,
    /// Service metadata
    Info,
    /// Row counts per table
    Stats,
    /// List a resource (users, platforms, workspaces, conversations, messages)
    List {
        resource: String,
        /// Only messages of this conversation
        #[arg(long)]
        conversation_id: Option<String>,
    },
    /// Create a record from a JSON object
    Create {
        resource: String,
        /// Request body, e.g. '{"username":"alice"}'
        body: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = format!("{}/api", cli.url.trim_end_matches('/'));

    let res = match cli.command {
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
        Commands::Info => client.get(format!("{}/info", base)).send().await?,
        Commands::Stats => client.get(format!("{}/stats", base)).send().await?,
        Commands::List {
            resource,
            conversation_id,
        } => {
            let mut request = client.get(format!("{}/{}", base, resource));
            if let Some(id) = conversation_id {
                request = request.query(&[("conversationId", id)]);
            }
            request.send().await?
        }
        Commands::Create { resource, body } => {
            let body: Value = serde_json::from_str(&body)?;
            client
                .post(format!("{}/{}", base, resource))
                .json(&body)
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
