//! relayq CLI - submit and inspect queued URLs through the daemon's HTTP API

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tabled::{Table, Tabled};

const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";

#[derive(Parser)]
#[command(name = "relayq")]
#[command(about = "relayq URL dispatch queue CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Submission API base URL
    #[arg(long, env = "RELAYQ_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Queue a URL for dispatch
    Submit {
        /// URL to call
        url: String,
    },

    /// List queued URLs (oldest first)
    List,

    /// Show daemon status
    Status,
}

#[derive(Deserialize)]
struct MessageResponse {
    message: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Deserialize)]
struct ListResponse {
    urls: Vec<String>,
}

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Tabled)]
struct UrlRow {
    #[tabled(rename = "#")]
    position: usize,
    url: String,
}

fn endpoint(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

/// Decode a JSON body, turning the API's `{"error": ..}` shape into an error
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await.context("Failed to read response")?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error)
            .unwrap_or(body);
        anyhow::bail!("API error ({}): {}", status.as_u16(), message);
    }

    serde_json::from_str(&body).context("Failed to parse response")
}

async fn submit(client: &reqwest::Client, api_url: &str, url: &str) -> Result<MessageResponse> {
    let response = client
        .post(endpoint(api_url, "/urls"))
        .form(&[("url", url)])
        .send()
        .await
        .context("Failed to connect to daemon")?;
    read_json(response).await
}

async fn list(client: &reqwest::Client, api_url: &str) -> Result<ListResponse> {
    let response = client
        .get(endpoint(api_url, "/urls"))
        .send()
        .await
        .context("Failed to connect to daemon")?;
    read_json(response).await
}

async fn health(client: &reqwest::Client, api_url: &str) -> Result<HealthResponse> {
    let response = client
        .get(endpoint(api_url, "/health"))
        .send()
        .await
        .context("Failed to connect to daemon")?;
    read_json(response).await
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Submit { url } => {
            let result = submit(&client, &cli.api_url, &url).await?;
            println!("{}", format!("✓ {}", result.message).green().bold());
            println!("  {} {}", "URL:".bold(), url);
        }

        Commands::List => {
            let result = list(&client, &cli.api_url).await?;

            if result.urls.is_empty() {
                println!("{}", "Queue is empty".yellow());
                return Ok(());
            }

            println!("{}", format!("{} queued URL(s)", result.urls.len()).cyan().bold());
            println!();

            let rows: Vec<UrlRow> = result
                .urls
                .into_iter()
                .enumerate()
                .map(|(i, url)| UrlRow {
                    position: i + 1,
                    url,
                })
                .collect();
            println!("{}", Table::new(rows));
        }

        Commands::Status => {
            println!("{}", "System Status".cyan().bold());
            println!();
            println!("  {} {}", "API URL:".bold(), cli.api_url);

            match health(&client, &cli.api_url).await {
                Ok(health) => {
                    println!("  {} {}", "Status:".bold(), health.status.to_uppercase().green());
                    println!("  {} {}", "Version:".bold(), health.version);
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }
    }

    Ok(())
}
