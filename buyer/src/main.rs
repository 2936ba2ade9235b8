pub mod cli;
pub mod shopping;

use std::time::Duration;

use clap::Parser;
use market::Strategy;
use seller::client::{PriceClient, PriceReply};

use cli::Cli;
use shopping::{Cart, Decision};

async fn price(client: &mut PriceClient, strategy: Strategy, item: &str) -> anyhow::Result<Option<f64>> {
    match client.quote(strategy, item).await? {
        PriceReply::Quoted { price, .. } => Ok(Some(price)),
        PriceReply::Error(msg) => {
            println!("  {strategy} price for {item} unavailable: {msg}");
            Ok(None)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    common::init_logger("buyer", false);

    let mut client = match PriceClient::connect((cli.host.as_str(), cli.port)).await {
        Ok(c) => c,
        Err(e) => {
            eprintln!("cannot reach seller at {}:{}: {e}", cli.host, cli.port);
            std::process::exit(1);
        }
    };
    tracing::info!(host = %cli.host, port = cli.port, "connected to seller");

    let mut cart = Cart::new(cli.budget);

    for item in &cli.items {
        println!("\n{item}:");

        let Some(base) = price(&mut client, Strategy::Static, item).await? else {
            continue;
        };
        println!("  catalog price: {base:.0}");

        let Some(current) = price(&mut client, Strategy::Dynamic, item).await? else {
            continue;
        };
        println!("  market price:  {current:.0}");

        match cart.consider(item, base, current, cli.max_markup) {
            Decision::Buy => println!("  -> buying {item} for {current:.0}"),
            Decision::TooExpensive => println!("  -> skipping {item}: too far above catalog price"),
            Decision::OverBudget => println!("  -> skipping {item}: not enough budget left"),
        }

        tokio::time::sleep(Duration::from_millis(cli.pause_ms)).await;
    }

    println!("\nShopping finished");
    println!("purchased: {:?}", cart.purchased().collect::<Vec<_>>());
    println!("total spent: {:.0}", cart.spent());
    println!("budget left: {:.0}", cart.remaining());

    client.close().await?;
    Ok(())
}
