use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "router-cli")]
#[command(about = "Command-line client for a running resource router", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the discovery index (resource name → collection URL)
    Index,
    /// List members of a resource
    List { resource: String },
    /// Retrieve one member
    Get { resource: String, id: String },
    /// Delete one member
    Delete { resource: String, id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Index => client.get(format!("{base}/")).send().await?,
        Commands::List { resource } => client.get(format!("{base}/{resource}/")).send().await?,
        Commands::Get { resource, id } => {
            client.get(format!("{base}/{resource}/{id}/")).send().await?
        }
        Commands::Delete { resource, id } => {
            client
                .delete(format!("{base}/{resource}/{id}/"))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        let text = res.text().await.unwrap_or_default();
        return Err(format!("server returned status {status}: {text}").into());
    }

    if status == reqwest::StatusCode::NO_CONTENT {
        println!("{}", status);
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http;

    fn response(status: u16, body: &'static str) -> reqwest::Response {
        http::Response::builder()
            .status(status)
            .body(body)
            .unwrap()
            .into()
    }

    #[tokio::test]
    async fn test_error_status_fails_the_command() {
        let err = print_response(response(404, r#"{"detail":"Not found."}"#))
            .await
            .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("Not found."));
    }

    #[tokio::test]
    async fn test_success_statuses() {
        assert!(print_response(response(200, r#"{"users":"http://x/users/"}"#))
            .await
            .is_ok());
        assert!(print_response(response(204, "")).await.is_ok());
    }
}
