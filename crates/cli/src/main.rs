//! ArtCrafts CLI - drive the storefront cart from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Add a product (adding the same id again bumps its quantity)
//! artcrafts cart add --id 12 --name "Pashmina Shawl" --price 3400 \
//!     --city Srinagar --state "Jammu and Kashmir" --tag textile --tag wool
//!
//! # Set a quantity (0 or less removes the line)
//! artcrafts cart set-qty 12 3
//!
//! # Show the cart with subtotal, shipping, and total
//! artcrafts cart show
//!
//! # Place a (simulated) order
//! artcrafts checkout --name "Asha Verma" --email asha@example.in \
//!     --phone 9876543210 --address "14 Hawa Mahal Road" \
//!     --city Jaipur --state Rajasthan --pincode 302002
//! ```
//!
//! # Commands
//!
//! - `cart` - Add, remove, update, clear, and show cart lines
//! - `checkout` - Validate shipping details and place an order
//! - `prefs` - Visitor id, location preference, and demo reset

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use artcrafts_cart::{CartConfig, LogFormat, PaymentMethod, ShippingForm};
use artcrafts_core::ProductId;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "artcrafts")]
#[command(author, version, about = "ArtCrafts cart tools")]
struct Cli {
    /// Directory for stored values (overrides `ARTCRAFTS_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place a simulated order for everything in the cart
    Checkout(CheckoutArgs),
    /// Manage shopper preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add one unit of a product
    Add(AddArgs),
    /// Remove a product's line
    Remove {
        /// Product id
        id: ProductId,
    },
    /// Set a product's quantity (0 or less removes it)
    SetQty {
        /// Product id
        id: ProductId,

        /// New quantity
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
    },
    /// Remove every line
    Clear,
    /// Show lines and totals
    Show {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct AddArgs {
    /// Product id (numeric or handle)
    #[arg(long)]
    id: ProductId,

    /// Product name
    #[arg(long)]
    name: String,

    /// Unit price
    #[arg(long)]
    price: Decimal,

    /// Image reference
    #[arg(long)]
    image: Option<String>,

    /// City of origin
    #[arg(long, default_value = "")]
    city: String,

    /// State of origin
    #[arg(long, default_value = "")]
    state: String,

    /// Tag (repeatable)
    #[arg(long = "tag")]
    tags: Vec<String>,
}

#[derive(Args)]
struct CheckoutArgs {
    /// Full name
    #[arg(long)]
    name: String,

    /// Email address
    #[arg(long)]
    email: String,

    /// Phone number
    #[arg(long)]
    phone: String,

    /// Street address
    #[arg(long)]
    address: String,

    /// City
    #[arg(long)]
    city: String,

    /// State
    #[arg(long)]
    state: String,

    /// PIN code
    #[arg(long)]
    pincode: String,

    /// Payment method (`cod` or `online`)
    #[arg(long, default_value = "cod")]
    payment: PaymentMethod,

    /// Print the confirmation as JSON
    #[arg(long)]
    json: bool,
}

impl From<CheckoutArgs> for ShippingForm {
    fn from(args: CheckoutArgs) -> Self {
        Self {
            name: args.name,
            email: args.email,
            phone: args.phone,
            address: args.address,
            city: args.city,
            state: args.state,
            pincode: args.pincode,
        }
    }
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Show the visitor id and saved location
    Show,
    /// Save a preferred location
    Location {
        /// City
        city: String,
        /// State
        state: String,
    },
    /// Wipe the cart and all preferences
    Reset,
}

/// Initialize tracing on stderr so command output stays clean on stdout.
fn init_tracing(format: LogFormat) {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "artcrafts_cart=info,artcrafts_cli=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CartConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::default());
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };
    init_tracing(config.log_format);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mut config: CartConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    let storage = config.open_storage();

    match cli.command {
        Commands::Cart { action } => {
            let cart = commands::cart::open(&storage, &config);
            match action {
                CartAction::Add(args) => {
                    let product = artcrafts_cart::Product {
                        id: args.id,
                        name: args.name,
                        price: args.price,
                        image: args.image,
                        city: args.city,
                        state: args.state,
                        tags: args.tags,
                    };
                    commands::cart::add(&cart, &product);
                }
                CartAction::Remove { id } => commands::cart::remove(&cart, &id),
                CartAction::SetQty { id, quantity } => {
                    commands::cart::set_quantity(&cart, &id, quantity);
                }
                CartAction::Clear => commands::cart::clear(&cart),
                CartAction::Show { json } => commands::cart::show(&cart, &config, json)?,
            }
        }
        Commands::Checkout(args) => {
            let cart = commands::cart::open(&storage, &config);
            let payment = args.payment;
            let json = args.json;
            commands::checkout::place_order(&cart, &config, args.into(), payment, json).await?;
        }
        Commands::Prefs { action } => {
            let prefs = artcrafts_cart::Preferences::new(storage);
            match action {
                PrefsAction::Show => commands::prefs::show(&prefs),
                PrefsAction::Location { city, state } => {
                    commands::prefs::set_location(&prefs, &city, &state)?;
                }
                PrefsAction::Reset => commands::prefs::reset(&prefs)?,
            }
        }
    }
    Ok(())
}
