use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Inspection CLI for the ViCare gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[arg(long, default_value = "/health")]
    health_path: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the full health report
    Health,
    /// Show request statistics and the last failure
    Stats,
    /// Show the Loxone sleep mode state
    SleepMode,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}{}", base, cli.health_path)).send().await?;
            if let Some(report) = read_json(res).await? {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Commands::Stats => {
            let res = client.get(format!("{}{}", base, cli.health_path)).send().await?;
            if let Some(report) = read_json(res).await? {
                println!("status_code: {}", report["status_code"]);
                println!("{}", serde_json::to_string_pretty(&report["requests"])?);
            }
        }
        Commands::SleepMode => {
            let res = client.get(format!("{}/loxone/mode/sleep/state", base)).send().await?;
            if let Some(state) = read_json(res).await? {
                println!("sleep mode: {}", state);
            }
        }
    }

    Ok(())
}

async fn read_json(res: reqwest::Response) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(None);
    }
    Ok(Some(res.json().await?))
}
