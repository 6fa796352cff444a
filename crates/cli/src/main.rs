//! Coaxx CLI - storefront cart and catalog admin from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! coaxx catalog list --deals
//!
//! # Build a cart (persisted under COAXX_DATA_DIR)
//! coaxx cart add lace-bodysuit-1 -q 2 -v size=M -v color=black
//! coaxx cart update lace-bodysuit-1 1 -v size=M -v color=black
//! coaxx cart show
//!
//! # Place a pending order
//! coaxx checkout --email jane@example.com --name "Jane Doe"
//!
//! # Edit the catalog draft and publish it
//! coaxx admin upsert --name "Silk Robe" --price 79.99 --tags sleepwear,bridal
//! coaxx admin publish
//! ```
//!
//! # Commands
//!
//! - `cart` - Show and edit the cart
//! - `catalog` - List products
//! - `checkout` - Turn the cart into a pending order
//! - `admin` - Edit, publish or reset the catalog draft

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "coaxx")]
#[command(author, version, about = "Coaxx storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Browse the published catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Place a pending order for the cart contents
    Checkout {
        /// Customer email address
        #[arg(short, long)]
        email: String,

        /// Customer full name
        #[arg(short, long)]
        name: String,

        /// Street address
        #[arg(long)]
        address: Option<String>,

        /// City
        #[arg(long)]
        city: Option<String>,

        /// State or region
        #[arg(long)]
        state: Option<String>,

        /// Postal code
        #[arg(long)]
        zip: Option<String>,

        /// Country code
        #[arg(long, default_value = "US")]
        country: String,
    },
    /// Manage the catalog draft
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart with totals
    Show,
    /// Add a product
    Add {
        /// Product ID
        product_id: String,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,

        /// Variant attribute, repeatable (e.g. `-v size=M`)
        #[arg(short, long = "variant", value_parser = commands::parse_attribute)]
        variant: Vec<(String, String)>,
    },
    /// Remove a product line
    Remove {
        /// Product ID
        product_id: String,

        /// Variant attribute, repeatable
        #[arg(short, long = "variant", value_parser = commands::parse_attribute)]
        variant: Vec<(String, String)>,
    },
    /// Set a line's quantity (0 or less removes it)
    Update {
        /// Product ID
        product_id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,

        /// Variant attribute, repeatable
        #[arg(short, long = "variant", value_parser = commands::parse_attribute)]
        variant: Vec<(String, String)>,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List {
        /// Free-text search
        #[arg(short, long)]
        search: Option<String>,

        /// Tag slug
        #[arg(short, long)]
        tag: Option<String>,

        /// Collection name
        #[arg(short, long)]
        collection: Option<String>,

        /// Experience level ("all" for every level)
        #[arg(long)]
        experience: Option<String>,

        /// Only featured products
        #[arg(long)]
        featured: bool,

        /// Only discounted products, deepest discount first
        #[arg(long)]
        deals: bool,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// List draft products
    List {
        /// Search name and tags
        #[arg(short, long)]
        search: Option<String>,

        /// Category
        #[arg(long)]
        category: Option<String>,

        /// Collection name
        #[arg(short, long)]
        collection: Option<String>,

        /// Experience level ("all" for every level)
        #[arg(long)]
        experience: Option<String>,
    },
    /// Create a product, or edit one with `--id`
    Upsert(commands::admin::UpsertArgs),
    /// Delete a product
    Delete {
        /// Product ID
        id: String,
    },
    /// Write the draft to the published catalog file
    Publish {
        /// Output path (default: `COAXX_CATALOG_PATH`)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Discard the draft and reload the published catalog
    Reset,
}

fn main() {
    // Load .env file if present (ignore errors if not found)
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "coaxx=info,coaxx_storefront=info,coaxx_admin=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Cart { action } => {
            let config = coaxx_storefront::StorefrontConfig::from_env()?;
            match action {
                CartAction::Show => commands::cart::show(&config)?,
                CartAction::Add {
                    product_id,
                    quantity,
                    variant,
                } => commands::cart::add(&config, &product_id, quantity, variant)?,
                CartAction::Remove {
                    product_id,
                    variant,
                } => commands::cart::remove(&config, &product_id, variant)?,
                CartAction::Update {
                    product_id,
                    quantity,
                    variant,
                } => commands::cart::update(&config, &product_id, quantity, variant)?,
                CartAction::Clear => commands::cart::clear(&config)?,
            }
        }
        Commands::Catalog { action } => {
            let config = coaxx_storefront::StorefrontConfig::from_env()?;
            match action {
                CatalogAction::List {
                    search,
                    tag,
                    collection,
                    experience,
                    featured,
                    deals,
                } => {
                    let query = coaxx_storefront::CatalogQuery {
                        search,
                        tag,
                        collection,
                        experience_level: experience,
                        featured_only: featured,
                        deals_only: deals,
                        ..coaxx_storefront::CatalogQuery::default()
                    };
                    commands::catalog::list(&config, &query)?;
                }
            }
        }
        Commands::Checkout {
            email,
            name,
            address,
            city,
            state,
            zip,
            country,
        } => {
            let config = coaxx_storefront::StorefrontConfig::from_env()?;
            let customer = coaxx_storefront::CustomerDetails {
                email,
                name,
                address,
                city,
                state,
                zip,
                country,
            };
            commands::checkout::place_order(&config, &customer)?;
        }
        Commands::Admin { action } => {
            let config = coaxx_admin::AdminConfig::from_env()?;
            match action {
                AdminAction::List {
                    search,
                    category,
                    collection,
                    experience,
                } => {
                    let filter = coaxx_admin::DraftFilter {
                        search,
                        category,
                        collection,
                        experience_level: experience,
                    };
                    commands::admin::list(&config, &filter)?;
                }
                AdminAction::Upsert(args) => commands::admin::upsert(&config, args)?,
                AdminAction::Delete { id } => commands::admin::delete(&config, &id)?,
                AdminAction::Publish { out } => {
                    let path = out.unwrap_or_else(|| config.catalog_path.clone());
                    commands::admin::publish(&config, &path)?;
                }
                AdminAction::Reset => commands::admin::reset(&config)?,
            }
        }
    }
    Ok(())
}
