//! MarketHub CLI - persisted per-seller carts and checkout handoff.
//!
//! # Usage
//!
//! ```bash
//! # Add products from a catalog file
//! mh-cart add --catalog catalog.yaml --business 1 --product 1-1 --quantity 2
//!
//! # Review carts
//! mh-cart show
//!
//! # Hand the cart off to the seller's chat
//! mh-cart checkout --business 1 --name "Asha" --phone "+91 98765 43210"
//! ```
//!
//! # Commands
//!
//! - `add`, `remove`, `set-quantity` - Edit a seller's cart
//! - `clear`, `clear-all` - Empty one or every cart
//! - `show` - List carts with item counts and subtotals
//! - `checkout` - Print the order message and chat link
//! - `inquire` - Ask a seller about a product
//!
//! Carts are stored under `MARKETHUB_DATA_DIR`; see [`markethub_cart::config`]
//! for the full list of environment variables.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use markethub_cart::{BuyerInfo, CartConfig, CartError, MessageBuilder};
use markethub_core::{BusinessId, ProductId};

mod catalog;
mod commands;

use catalog::Catalog;
use commands::CommandError;

#[derive(Parser)]
#[command(name = "mh-cart")]
#[command(author, version, about = "MarketHub cart tools")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a catalog product to its seller's cart
    Add {
        /// Catalog YAML file
        #[arg(short, long, default_value = "catalog.yaml")]
        catalog: PathBuf,

        #[arg(short, long)]
        business: String,

        #[arg(short, long)]
        product: String,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Remove a product from a seller's cart
    Remove {
        #[arg(short, long)]
        business: String,

        #[arg(short, long)]
        product: String,
    },
    /// Set a line's quantity (zero or less is ignored)
    SetQuantity {
        #[arg(short, long)]
        business: String,

        #[arg(short, long)]
        product: String,

        #[arg(short, long, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty one seller's cart
    Clear {
        #[arg(short, long)]
        business: String,
    },
    /// Empty every cart
    ClearAll,
    /// Show carts with counts and subtotals
    Show {
        /// Show this seller's lines only
        #[arg(short, long)]
        business: Option<String>,
    },
    /// Print the order message and chat link for a cart
    Checkout {
        #[arg(short, long, required_unless_present = "all", conflicts_with = "all")]
        business: Option<String>,

        /// One link per cart; carts are kept
        #[arg(long)]
        all: bool,

        #[command(flatten)]
        buyer: BuyerArgs,

        /// Leave the cart in place after printing
        #[arg(long, conflicts_with = "all")]
        keep: bool,
    },
    /// Ask a seller about a product
    Inquire {
        /// Catalog YAML file
        #[arg(short, long, default_value = "catalog.yaml")]
        catalog: PathBuf,

        #[arg(short, long)]
        business: String,

        #[arg(short, long)]
        product: String,

        #[command(flatten)]
        buyer: BuyerArgs,

        /// Extra text for the seller
        #[arg(long)]
        note: Option<String>,
    },
}

#[derive(clap::Args)]
struct BuyerArgs {
    /// Buyer name (default: Customer)
    #[arg(long)]
    name: Option<String>,

    /// Buyer phone number
    #[arg(long)]
    phone: Option<String>,
}

impl From<BuyerArgs> for BuyerInfo {
    fn from(args: BuyerArgs) -> Self {
        Self::new(args.name, args.phone)
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("markethub_cli=info,markethub_cart=info"));
    let registry = tracing_subscriber::registry().with(env_filter);
    if cli.json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    match run(cli) {
        Ok(output) => print_output(&output),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

#[allow(clippy::print_stdout)]
fn print_output(output: &str) {
    println!("{output}");
}

fn run(cli: Cli) -> Result<String, CommandError> {
    let config = CartConfig::from_env().map_err(CartError::from)?;
    let builder = MessageBuilder::from_config(&config);
    let mut store = commands::open_store(&config);

    let output = match cli.command {
        Commands::Add {
            catalog,
            business,
            product,
            quantity,
        } => {
            let catalog = Catalog::load(&catalog)?;
            commands::cart::add(
                &mut store,
                &catalog,
                &BusinessId::new(business),
                &ProductId::new(product),
                quantity,
            )?
        }
        Commands::Remove { business, product } => {
            commands::cart::remove(&mut store, &BusinessId::new(business), &ProductId::new(product))
        }
        Commands::SetQuantity {
            business,
            product,
            quantity,
        } => commands::cart::set_quantity(
            &mut store,
            &BusinessId::new(business),
            &ProductId::new(product),
            quantity,
        ),
        Commands::Clear { business } => commands::cart::clear(&mut store, &BusinessId::new(business)),
        Commands::ClearAll => commands::cart::clear_all(&mut store),
        Commands::Show { business } => {
            let business = business.map(BusinessId::new);
            commands::cart::show(&store, &builder, business.as_ref())?
        }
        Commands::Checkout {
            business,
            all,
            buyer,
            keep,
        } => {
            let buyer = BuyerInfo::from(buyer);
            match business {
                Some(business) if !all => commands::checkout::checkout(
                    &mut store,
                    &builder,
                    &BusinessId::new(business),
                    &buyer,
                    keep,
                )?,
                _ => commands::checkout::checkout_all(&store, &builder, &buyer),
            }
        }
        Commands::Inquire {
            catalog,
            business,
            product,
            buyer,
            note,
        } => {
            let catalog = Catalog::load(&catalog)?;
            commands::checkout::inquire(
                &catalog,
                &builder,
                &BusinessId::new(business),
                &ProductId::new(product),
                &BuyerInfo::from(buyer),
                note.as_deref(),
            )?
        }
    };

    Ok(output)
}
