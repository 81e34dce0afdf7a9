//! Quickcart CLI - users, catalog, carts and bulk lists from the shell.
//!
//! # Usage
//!
//! ```bash
//! # Create a user and a SKU
//! qc user create 1 Parker Perry
//! qc sku add sku123 AirPods 199.99
//!
//! # Work with a cart
//! qc cart add 1 sku123 -q 2
//! qc cart remove 1 sku123
//! qc cart view 1 --json
//!
//! # Rebuild and read a bulk list
//! qc list load biglist -n 10000
//! qc list read biglist --start 0 --end 9
//!
//! # Replay the sample flow against a throwaway in-process store
//! qc --in-memory demo
//! ```
//!
//! # Environment Variables
//!
//! See `quickcart::config` (`REDIS_URL`, `QUICKCART_NAMESPACE`, timeouts).
//! `RUST_LOG` overrides the default log filter.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use quickcart::{AppState, MemoryStore, QuickcartConfig, RedisStore};
use quickcart_core::{Price, SkuId, UserId};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use output::Output;

#[derive(Parser)]
#[command(name = "qc")]
#[command(author, version, about = "Quickcart CLI tools")]
struct Cli {
    /// Print results as JSON on stdout
    #[arg(long, global = true)]
    json: bool,

    /// Use a throwaway in-process store instead of Redis
    #[arg(long, global = true)]
    in_memory: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage user profiles
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage catalog SKUs
    Sku {
        #[command(subcommand)]
        action: SkuAction,
    },
    /// Manage a user's cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Bulk-load and read integer lists
    List {
        #[command(subcommand)]
        action: ListAction,
    },
    /// Check that the store answers
    Ping,
    /// Run the sample shopping flow end to end
    Demo,
}

#[derive(Subcommand)]
enum UserAction {
    /// Create or overwrite a user
    Create {
        user_id: UserId,
        first_name: String,
        last_name: String,
    },
    /// Show a user
    Get { user_id: UserId },
}

#[derive(Subcommand)]
enum SkuAction {
    /// Create or update a SKU
    Add {
        sku_id: SkuId,
        name: String,
        price: Price,
    },
    /// Show a SKU
    Get { sku_id: SkuId },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add units of a SKU
    Add {
        user_id: UserId,
        sku_id: SkuId,
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove units of a SKU (removing all or more deletes the entry)
    Remove {
        user_id: UserId,
        sku_id: SkuId,
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Show the priced cart
    View { user_id: UserId },
    /// Empty the cart
    Clear { user_id: UserId },
}

#[derive(Subcommand)]
enum ListAction {
    /// Replace a list with 1..=n, prepending each value
    Load {
        #[arg(default_value = "biglist")]
        name: String,
        #[arg(short, default_value_t = 10_000, allow_negative_numbers = true)]
        n: i64,
    },
    /// Read a range of a list (inclusive; negative indices count from the end)
    Read {
        #[arg(default_value = "biglist")]
        name: String,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        start: i64,
        #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
        end: i64,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "quickcart=info,qc=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = QuickcartConfig::from_env()?;
    let state = if cli.in_memory {
        tracing::info!("Using in-memory store");
        AppState::new(MemoryStore::new(), config.keys())
    } else {
        let store = RedisStore::connect(&config).await?;
        AppState::new(store, config.keys())
    };
    let out = Output::new(cli.json);

    match cli.command {
        Commands::User { action } => match action {
            UserAction::Create {
                user_id,
                first_name,
                last_name,
            } => commands::user::create(&state, &user_id, first_name, last_name).await?,
            UserAction::Get { user_id } => commands::user::get(&state, &out, &user_id).await?,
        },
        Commands::Sku { action } => match action {
            SkuAction::Add {
                sku_id,
                name,
                price,
            } => commands::sku::add(&state, &sku_id, name, price).await?,
            SkuAction::Get { sku_id } => commands::sku::get(&state, &out, &sku_id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Add {
                user_id,
                sku_id,
                quantity,
            } => commands::cart::add(&state, &out, &user_id, &sku_id, quantity).await?,
            CartAction::Remove {
                user_id,
                sku_id,
                quantity,
            } => commands::cart::remove(&state, &out, &user_id, &sku_id, quantity).await?,
            CartAction::View { user_id } => commands::cart::view(&state, &out, &user_id).await?,
            CartAction::Clear { user_id } => commands::cart::clear(&state, &user_id).await?,
        },
        Commands::List { action } => match action {
            ListAction::Load { name, n } => commands::list::load(&state, &out, &name, n).await?,
            ListAction::Read { name, start, end } => {
                commands::list::read(&state, &out, &name, start, end).await?;
            }
        },
        Commands::Ping => commands::ping(&state).await?,
        Commands::Demo => commands::demo::run(&state, &out).await?,
    }
    Ok(())
}
