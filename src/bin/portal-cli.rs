use clap::{Parser, Subcommand};
use reqwest::header::{COOKIE, LOCATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "portal-cli")]
#[command(about = "Command-line client for a running parking portal", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://127.0.0.1:5173")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the route table
    Routes,
    /// Create an account
    Register { username: String, password: String },
    /// Log in and print the issued session token
    Login { username: String, password: String },
    /// Navigate to a path and show where it lands
    Visit {
        path: String,
        /// Session credential to send as the saToken cookie
        #[arg(short, long)]
        token: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;

    match cli.command {
        Commands::Routes => {
            let res = client.get(format!("{}/_shell/routes", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Register { username, password } => {
            let res = client
                .post(format!("{}/api/register", cli.url))
                .json(&json!({ "username": username, "password": password }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Login { username, password } => {
            let res = client
                .post(format!("{}/api/login", cli.url))
                .json(&json!({ "username": username, "password": password }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Visit { path, token } => {
            let mut req = client.get(format!("{}{}", cli.url, path));
            if let Some(token) = token {
                req = req.header(COOKIE, format!("saToken={}", token));
            }
            let res = req.send().await?;
            let status = res.status();
            println!("{}", status);
            if let Some(location) = res.headers().get(LOCATION).and_then(|v| v.to_str().ok()) {
                println!("Location: {}", location);
            }
            let body = res.text().await?;
            if !body.is_empty() {
                println!("{}", body);
            }
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: portal returned status {}", status);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
