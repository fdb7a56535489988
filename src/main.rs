mod cli;
mod client;
mod config;
mod enhance;
mod error;
mod filter;
mod model;
mod output;
mod paginate;
mod session;
mod view;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, FilterArgs};
use config::AppConfig;

use crate::client::CatalogClient;
use crate::error::UserMessage;
use crate::model::{FilterUpdate, Product, SearchFilters};
use crate::paginate::PageInfo;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "catalog_cli=debug"
    } else {
        "catalog_cli=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load(cli.base_url, cli.enhance, cli.timeout)?;
    tracing::debug!("Using catalog at {}", config.base_url);

    ctrlc::set_handler(|| {
        eprintln!("\nInterrupted.");
        std::process::exit(130);
    })
    .context("Failed to set Ctrl+C handler")?;

    let client = CatalogClient::new(&config).context("Failed to build HTTP client")?;

    match cli.command {
        Commands::List {
            term,
            filters,
            page,
            json,
        } => cmd_list(&client, &config, &term, filters, page, json).await,
        Commands::Product { id, json } => cmd_product(&client, id, json).await,
        Commands::Categories { json } => cmd_categories(&client, json).await,
        Commands::Category { name, page, json } => {
            cmd_category(&client, &config, &name, page, json).await
        }
        Commands::Browse => session::run(client, config.page_size)
            .await
            .context("Interactive session failed"),
    }
}

async fn cmd_list(
    client: &CatalogClient,
    config: &AppConfig,
    term: &str,
    args: FilterArgs,
    page: usize,
    json: bool,
) -> Result<()> {
    let mut filters = SearchFilters::default();
    filters.apply(filter_update(args));

    let products = match client.search(term, &filters).await {
        Ok(products) => products,
        Err(e) => {
            tracing::debug!("Search failed: {}", e);
            anyhow::bail!(UserMessage::Search);
        }
    };

    print_page(&products, page, config.page_size, term, json)
}

async fn cmd_product(client: &CatalogClient, id: u64, json: bool) -> Result<()> {
    let product = match client.get_product(id).await {
        Ok(product) => product,
        Err(e) => {
            tracing::debug!("Detail fetch failed: {}", e);
            anyhow::bail!(UserMessage::Detail);
        }
    };

    if json {
        println!("{}", output::to_json(&product)?);
    } else {
        print!("{}", output::format_product_detail(&product));
    }
    Ok(())
}

async fn cmd_categories(client: &CatalogClient, json: bool) -> Result<()> {
    let categories = match client.list_categories().await {
        Ok(categories) => categories,
        Err(e) => {
            tracing::debug!("Category fetch failed: {}", e);
            anyhow::bail!(UserMessage::InitialLoad);
        }
    };

    if json {
        println!("{}", output::to_json(&categories)?);
    } else {
        print!("{}", output::format_categories(&categories));
    }
    Ok(())
}

async fn cmd_category(
    client: &CatalogClient,
    config: &AppConfig,
    name: &str,
    page: usize,
    json: bool,
) -> Result<()> {
    let products = match client.list_products_by_category(name).await {
        Ok(products) => products,
        Err(e) => {
            tracing::debug!("Category listing failed: {}", e);
            anyhow::bail!(UserMessage::Search);
        }
    };

    print_page(&products, page, config.page_size, "", json)
}

fn print_page(
    products: &[Product],
    page: usize,
    page_size: usize,
    term: &str,
    json: bool,
) -> Result<()> {
    let items = paginate::paginate(products, page, page_size);
    if json {
        println!("{}", output::to_json(items)?);
    } else {
        let info = PageInfo::new(page, page_size, products.len());
        print!("{}", output::format_product_page(items, &info, term));
    }
    Ok(())
}

fn filter_update(args: FilterArgs) -> FilterUpdate {
    FilterUpdate {
        min_price: args.min_price,
        max_price: args.max_price,
        category: args.category,
        brand: args.brand,
        color: args.color,
        size: args.size,
    }
}
