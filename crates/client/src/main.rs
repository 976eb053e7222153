//! `empower-plants` command-line client.

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use empower_client::{CatalogSyncService, ClientConfig, DEFAULT_BATCH_SIZE, DEFAULT_BULK_COUNT, Session};
use empower_infra::{CatalogSource, HttpCatalogSource, ProductStore, SqliteProductStore};

#[derive(Debug, Parser)]
#[command(name = "empower-plants", version, about = "EmpowerPlants catalog client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load the local catalog and populate it from the feed if it is empty.
    Sync,
    /// Print the local catalog without contacting the feed.
    List,
    /// Add a product with the given title and placeholder details.
    Add { title: String },
    /// Delete every product currently in the catalog.
    Clear,
    /// Delete every row in the local database.
    Wipe,
    /// Write synthetic products in chunks.
    Generate {
        #[arg(long, default_value_t = DEFAULT_BULK_COUNT)]
        count: usize,
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,
    },
    /// Put the products at the given list positions into a cart and print it.
    Cart {
        #[arg(required = true)]
        indexes: Vec<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (config, rejected) = ClientConfig::from_env();

    empower_observability::init_with(config.log_format);
    for setting in &rejected {
        setting.log();
    }

    let database_url = config
        .database_url()
        .context("failed to resolve the catalog database location")?;
    let store = SqliteProductStore::connect(&database_url)
        .await
        .with_context(|| format!("failed to open catalog database at {database_url}"))?;
    let source = HttpCatalogSource::new(config.feed_url.clone(), config.http_timeout)
        .context("failed to build the feed client")?;

    tracing::info!(database = %database_url, feed = source.url(), "starting");

    let service = Arc::new(CatalogSyncService::new(store, source).with_bulk_pause(config.bulk_pause));
    let mut session = Session::new(service);

    match cli.command.unwrap_or(Command::Sync) {
        Command::Sync => {
            session.start().await;
        }
        Command::List => {
            session.refresh().await;
        }
        Command::Add { title } => {
            session.refresh().await;
            session.add_titled(&title).await;
        }
        Command::Clear => {
            session.refresh().await;
            session.clear().await;
        }
        Command::Wipe => {
            session.wipe().await;
        }
        Command::Generate { count, batch_size } => {
            let report = session.generate(count, batch_size).await;
            println!(
                "generated {} of {} products in {} chunks ({} failed)",
                report.persisted,
                report.requested,
                report.chunks,
                report.failed_chunks.len()
            );
            println!("{}", session.header_title().await);
            return Ok(());
        }
        Command::Cart { indexes } => {
            session.refresh().await;
            for index in indexes {
                if session.select(index).await.is_none() {
                    eprintln!("no product at position {index}");
                }
            }
            print_cart(&session);
            return Ok(());
        }
    }

    print_catalog(&session).await;
    Ok(())
}

async fn print_catalog<S, R>(session: &Session<S, R>)
where
    S: ProductStore,
    R: CatalogSource,
{
    println!("{}", session.header_title().await);
    for (index, title) in session.titles().await.iter().enumerate() {
        println!("{index:>6}  {title}");
    }
}

fn print_cart<S, R>(session: &Session<S, R>)
where
    S: ProductStore,
    R: CatalogSource,
{
    let cart = session.cart();
    for line in cart.lines() {
        println!("{:>4} x {}  @ {}", line.quantity, line.product.title(), line.product.price());
    }

    let subtotal = cart.subtotal();
    println!("{} items, subtotal {}", cart.item_count(), subtotal.amount);
    if subtotal.unpriced_lines > 0 {
        println!("({} lines without a numeric price)", subtotal.unpriced_lines);
    }
}
