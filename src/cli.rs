use crate::enhance::EnhanceMode;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "catalog-cli",
    version,
    about = "Browse, search and filter a remote product catalog"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Catalog service base URL (default: https://fakestoreapi.com)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// How synthesized brand, stock and tags are generated
    #[arg(long, global = true, value_enum)]
    pub enhance: Option<EnhanceMode>,

    /// Request timeout in seconds (default: 30)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Verbose logging
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List products, optionally searched and filtered
    List {
        /// Search term matched against titles and descriptions
        #[arg(long, default_value = "")]
        term: String,

        #[command(flatten)]
        filters: FilterArgs,

        /// Page to show (1-indexed)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Print the page as JSON instead of Markdown
        #[arg(long)]
        json: bool,
    },

    /// Show one product in detail
    Product {
        /// Numeric product ID
        id: u64,

        #[arg(long)]
        json: bool,
    },

    /// List category names
    Categories {
        #[arg(long)]
        json: bool,
    },

    /// List the products the catalog files under one category
    Category {
        /// Category name (e.g., electronics, "men's clothing")
        name: String,

        #[arg(long, default_value = "1")]
        page: usize,

        #[arg(long)]
        json: bool,
    },

    /// Interactive browsing session
    Browse,
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Minimum price, inclusive (default: 0)
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Maximum price, inclusive (default: 1000)
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Exact category name
    #[arg(long)]
    pub category: Option<String>,

    /// Exact brand name
    #[arg(long)]
    pub brand: Option<String>,

    /// Color tag the product must carry
    #[arg(long)]
    pub color: Option<String>,

    /// Size tag the product must carry
    #[arg(long)]
    pub size: Option<String>,
}
