use clap::{Parser, Subcommand};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Send test traffic through the NATS gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish a JSON body to a topic (no reply)
    Publish { topic: String, body: String },
    /// Send a JSON body to a topic and print the reply
    Request { topic: String, body: String },
    /// Check whether the gateway is connected to the bus
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let res = match cli.command {
        Commands::Publish { topic, body } => {
            post(&client, format!("{}/topics/{}", cli.url, topic), body).await?
        }
        Commands::Request { topic, body } => {
            post(&client, format!("{}/requests/{}", cli.url, topic), body).await?
        }
        Commands::Health => client.get(format!("{}/health", cli.url)).send().await?,
    };
    print_response(res).await?;

    Ok(())
}

async fn post(
    client: &reqwest::Client,
    url: String,
    body: String,
) -> Result<reqwest::Response, Box<dyn std::error::Error>> {
    // Fail early on bodies the gateway would reject anyway.
    serde_json::from_str::<Value>(&body)?;
    Ok(client
        .post(url)
        .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
        .body(body)
        .send()
        .await?)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    println!("{}", status);
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) if text.is_empty() => {}
        Err(_) => println!("{}", text),
    }
    Ok(())
}
