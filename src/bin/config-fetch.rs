use std::path::PathBuf;

use clap::Parser;
use reqwest::{Method, StatusCode};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "config-fetch")]
#[command(about = "Fetch a pool configuration document from a machine config server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:22623")]
    url: String,

    /// Pool whose document to fetch (e.g. master, worker).
    #[arg(short, long)]
    pool: String,

    /// Send HEAD and print status and headers only.
    #[arg(long)]
    head: bool,

    /// Write the raw document to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let url = format!("{}/config/{}", cli.url.trim_end_matches('/'), cli.pool);
    let method = if cli.head { Method::HEAD } else { Method::GET };

    let res = client.request(method, &url).send().await?;
    let status = res.status();
    if status != StatusCode::OK {
        return Err(format!("{} returned {}", url, status).into());
    }

    if cli.head {
        println!("{}", status);
        for (name, value) in res.headers() {
            println!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
        }
        return Ok(());
    }

    let body = res.bytes().await?;
    match cli.output {
        Some(path) => {
            std::fs::write(&path, &body)?;
            eprintln!("Wrote {} bytes to {}", body.len(), path.display());
        }
        None => {
            let json: Value = serde_json::from_slice(&body)?;
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    Ok(())
}
