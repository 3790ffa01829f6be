use clap::{Parser, Subcommand};
use order_service::orders::{CreateOrder, PaymentMethod, UpdateOrder};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "orders-cli")]
#[command(about = "Command-line client for the order service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:4000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List orders, optionally filtered
    List {
        #[arg(long)]
        client_id: Option<i64>,
        #[arg(long)]
        payment_method: Option<PaymentMethod>,
    },
    /// Show one order
    Get { id: String },
    /// Create an order
    Create {
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        longitude: f64,
        #[arg(long)]
        latitude: f64,
        #[arg(long)]
        client_id: i64,
        #[arg(long, default_value = "cash")]
        payment_method: PaymentMethod,
    },
    /// Change fields of an order
    Update {
        id: String,
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long)]
        longitude: Option<f64>,
        #[arg(long)]
        latitude: Option<f64>,
        #[arg(long)]
        client_id: Option<i64>,
        #[arg(long)]
        payment_method: Option<PaymentMethod>,
    },
    /// Delete an order
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::List {
            client_id,
            payment_method,
        } => {
            let mut query = Vec::new();
            if let Some(id) = client_id {
                query.push(("clientId", id.to_string()));
            }
            if let Some(method) = payment_method {
                query.push(("paymentMethod", method.to_string()));
            }
            let res = client
                .get(format!("{}/orders", base))
                .query(&query)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Get { id } => {
            let res = client.get(format!("{}/orders/{}", base, id)).send().await?;
            print_response(res).await?;
        }
        Commands::Create {
            amount,
            longitude,
            latitude,
            client_id,
            payment_method,
        } => {
            let body = CreateOrder {
                amount,
                longitude,
                latitude,
                client_id,
                payment_method,
            };
            let res = client
                .post(format!("{}/orders", base))
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Update {
            id,
            amount,
            longitude,
            latitude,
            client_id,
            payment_method,
        } => {
            let body = UpdateOrder {
                amount,
                longitude,
                latitude,
                client_id,
                payment_method,
            };
            let res = client
                .put(format!("{}/orders/{}", base, id))
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Delete { id } => {
            let res = client
                .delete(format!("{}/orders/{}", base, id))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: order service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let text = res.text().await?;
    if text.is_empty() {
        println!("{}", status);
        return Ok(());
    }

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
